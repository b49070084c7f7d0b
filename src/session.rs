//! User sessions and access tokens
//!
//! Sessions live in the database so any number of server instances can
//! validate the same access-token cookie.

use axum::RequestPartsExt;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{TimeDelta, Utc};
use common::{DbConn, DbPool, Error, InternalServerError};
use db::{ProfileRole, profile, session};
use diesel::prelude::*;
use primitive_profile::PrimitiveProfile;
use time::Duration;
use uuid::Uuid;

use crate::AppState;

/// Session token stored in the request extensions by the auth middleware
#[derive(Clone, Copy, Debug)]
pub struct SessionToken(pub Uuid);

/// A session for any authenticated profile
///
/// ```rs
/// pub async fn foo_route(session: Session) -> impl IntoResponse {
///     println!("{:?}", session.data.profile_id);
///
///     ()
/// }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Session {
	pub token: Uuid,
	pub data:  SessionData,
}

/// A session for any admin profile
#[derive(Clone, Copy, Debug)]
pub struct AdminSession {
	pub token: Uuid,
	pub data:  SessionData,
}

#[derive(Clone, Copy, Debug)]
pub struct SessionData {
	pub profile_id:       i32,
	pub profile_is_admin: bool,
}

impl FromRequestParts<AppState> for Session {
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let token = match parts.extensions.get::<SessionToken>() {
			Some(token) => token.0,
			None => {
				return Err(InternalServerError::SessionWithoutAuthError.into());
			},
		};

		let State(pool) = parts
			.extract_with_state::<State<DbPool>, AppState>(state)
			.await
			.map_err(|_| Error::InternalServerError)?;

		let conn = pool.get().await?;

		let session = Self::get(token, &conn).await?;

		let Some(session) = session else {
			return Err(Error::Infallible(
				"failed to retrieve session despite passing auth middleware"
					.to_string(),
			));
		};

		Ok(session)
	}
}

impl FromRequestParts<AppState> for AdminSession {
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let session =
			parts.extract_with_state::<Session, AppState>(state).await?;

		if !session.data.profile_is_admin {
			return Err(Error::Forbidden);
		}

		let admin_session =
			Self { token: session.token, data: session.data };

		Ok(admin_session)
	}
}

impl Session {
	/// Create and store a new [`Session`] for a given profile
	#[instrument(skip(conn, profile))]
	pub async fn create(
		lifetime: Duration,
		profile: &PrimitiveProfile,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let token = Uuid::new_v4();
		let profile_id = profile.id;
		let profile_is_admin = profile.is_admin();

		let expires_at = Utc::now().naive_utc()
			+ TimeDelta::seconds(lifetime.whole_seconds());

		conn.interact(move |conn| {
			diesel::insert_into(session::table)
				.values((
					session::token.eq(token),
					session::profile_id.eq(profile_id),
					session::expires_at.eq(expires_at),
				))
				.execute(conn)
		})
		.await??;

		debug!("stored session {token} for profile {profile_id}");

		Ok(Self { token, data: SessionData { profile_id, profile_is_admin } })
	}

	/// Get a stored session given its token
	///
	/// Expired sessions are treated as absent.
	#[instrument(skip(conn))]
	pub async fn get(token: Uuid, conn: &DbConn) -> Result<Option<Self>, Error> {
		let record = conn
			.interact(move |conn| {
				session::table
					.inner_join(profile::table)
					.filter(session::token.eq(token))
					.select((session::expires_at, profile::id, profile::role))
					.get_result::<(chrono::NaiveDateTime, i32, ProfileRole)>(conn)
					.optional()
			})
			.await??;

		let Some((expires_at, profile_id, role)) = record else {
			return Ok(None);
		};

		if expires_at < Utc::now().naive_utc() {
			return Ok(None);
		}

		let data = SessionData {
			profile_id,
			profile_is_admin: role == ProfileRole::Admin,
		};

		Ok(Some(Self { token, data }))
	}

	/// Remove a session given its token
	#[instrument(skip(conn))]
	pub async fn delete(token: Uuid, conn: &DbConn) -> Result<(), Error> {
		conn.interact(move |conn| {
			diesel::delete(session::table.find(token)).execute(conn)
		})
		.await??;

		Ok(())
	}

	/// Convert this [`Session`] into an access token cookie
	#[must_use]
	pub fn to_access_token_cookie(
		self,
		name: String,
		lifetime: Duration,
		secure: bool,
	) -> Cookie<'static> {
		Cookie::build((name, self.token.to_string()))
			.http_only(true)
			.max_age(lifetime)
			.path("/")
			.same_site(SameSite::Lax)
			.secure(secure)
			.into()
	}
}
