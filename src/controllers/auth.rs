//! Controllers for registration, login, and the current profile

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, NoContent};
use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::Cookie;
use common::LoginError;
use profile::{NewProfile, Profile};
use validator::Validate;

use crate::schemas::auth::{
	ChangePasswordRequest,
	LoginRequest,
	RegisterRequest,
};
use crate::schemas::profile::ProfileResponse;
use crate::session::Session;
use crate::{Config, DbPool, Error};

#[instrument(skip_all)]
pub(crate) async fn register_profile(
	State(pool): State<DbPool>,
	Json(register_data): Json<RegisterRequest>,
) -> Result<impl IntoResponse, Error> {
	register_data.validate()?;

	let new_profile = NewProfile {
		name:           register_data.name,
		student_number: register_data.student_number,
		email:          register_data.email,
		password:       register_data.password,
	};

	let conn = pool.get().await?;
	let profile = new_profile.insert(&conn).await?;

	let response = ProfileResponse::from(profile);

	Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip_all)]
pub(crate) async fn login_profile(
	State(pool): State<DbPool>,
	State(config): State<Config>,
	jar: PrivateCookieJar,
	Json(login_data): Json<LoginRequest>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let profile = Profile::get_by_email(login_data.email.clone(), &conn)
		.await?
		.ok_or(LoginError::UnknownEmail(login_data.email))?;

	let parsed_hash = PasswordHash::new(&profile.password_hash)?;

	Argon2::default()
		.verify_password(login_data.password.as_bytes(), &parsed_hash)?;

	let session =
		Session::create(config.access_token_lifetime, &profile, &conn).await?;

	let access_token_cookie = session.to_access_token_cookie(
		config.access_token_name.clone(),
		config.access_token_lifetime,
		config.production,
	);

	let jar = jar.add(access_token_cookie);

	info!("logged in profile {}", profile.id);

	let response = ProfileResponse::from(profile);

	Ok((StatusCode::OK, jar, Json(response)))
}

#[instrument(skip_all)]
pub(crate) async fn logout_profile(
	State(pool): State<DbPool>,
	State(config): State<Config>,
	session: Session,
	jar: PrivateCookieJar,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	Session::delete(session.token, &conn).await?;

	let removal: Cookie<'static> =
		Cookie::build((config.access_token_name.clone(), "")).path("/").into();
	let jar = jar.remove(removal);

	Ok((jar, NoContent))
}

#[instrument(skip(pool))]
pub(crate) async fn get_current_profile(
	State(pool): State<DbPool>,
	session: Session,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let profile = Profile::get_by_id(session.data.profile_id, &conn).await?;

	Ok((StatusCode::OK, Json(ProfileResponse::from(profile))))
}

#[instrument(skip_all)]
pub(crate) async fn change_password(
	State(pool): State<DbPool>,
	session: Session,
	Json(request): Json<ChangePasswordRequest>,
) -> Result<NoContent, Error> {
	request.validate()?;

	let conn = pool.get().await?;

	let profile = Profile::get_by_id(session.data.profile_id, &conn).await?;

	let parsed_hash = PasswordHash::new(&profile.password_hash)?;

	Argon2::default()
		.verify_password(request.current_password.as_bytes(), &parsed_hash)?;

	Profile::update_password(profile.id, request.new_password, &conn).await?;

	Ok(NoContent)
}
