#[macro_use]
extern crate tracing;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHasher};
use common::{DbConn, Error};
use db::{ProfileRole, profile};
use diesel::pg::Pg;
use diesel::prelude::*;
use primitive_profile::PrimitiveProfile;
use serde::{Deserialize, Serialize};

/// Queries over registered profiles
pub struct Profile;

impl Profile {
	/// Get a [`PrimitiveProfile`] by its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(
		p_id: i32,
		conn: &DbConn,
	) -> Result<PrimitiveProfile, Error> {
		let profile = conn
			.interact(move |conn| {
				profile::table
					.find(p_id)
					.select(PrimitiveProfile::as_select())
					.get_result(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("profile {p_id}")))?;

		Ok(profile)
	}

	/// Get a [`PrimitiveProfile`] by its email address
	#[instrument(skip(conn))]
	pub async fn get_by_email(
		email: String,
		conn: &DbConn,
	) -> Result<Option<PrimitiveProfile>, Error> {
		let profile = conn
			.interact(move |conn| {
				profile::table
					.filter(profile::email.eq(email))
					.select(PrimitiveProfile::as_select())
					.get_result(conn)
					.optional()
			})
			.await??;

		Ok(profile)
	}

	/// Replace the password hash of the profile with the given id
	#[instrument(skip(conn, password))]
	pub async fn update_password(
		p_id: i32,
		password: String,
		conn: &DbConn,
	) -> Result<(), Error> {
		let password_hash = hash_password(&password)?;

		conn.interact(move |conn| {
			diesel::update(profile::table.find(p_id))
				.set((
					profile::password_hash.eq(password_hash),
					profile::updated_at.eq(diesel::dsl::now),
				))
				.execute(conn)
		})
		.await??;

		info!("updated password for profile {p_id}");

		Ok(())
	}
}

/// Hash a plaintext password with the default argon2 parameters
pub fn hash_password(password: &str) -> Result<String, Error> {
	let salt = SaltString::generate(&mut OsRng);
	let hash = Argon2::default()
		.hash_password(password.as_bytes(), &salt)?
		.to_string();

	Ok(hash)
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
	pub name:           String,
	pub student_number: String,
	pub email:          String,
	pub password:       String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = profile)]
#[diesel(check_for_backend(Pg))]
struct InsertableNewProfile {
	name:           String,
	student_number: String,
	email:          String,
	password_hash:  String,
	role:           ProfileRole,
}

impl NewProfile {
	/// Insert this [`NewProfile`] as a student account
	///
	/// The plaintext password never reaches the database, only its argon2
	/// hash is stored.
	#[instrument(skip(self, conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<PrimitiveProfile, Error> {
		let insertable = InsertableNewProfile {
			name:           self.name,
			student_number: self.student_number,
			email:          self.email,
			password_hash:  hash_password(&self.password)?,
			role:           ProfileRole::Student,
		};

		let profile = conn
			.interact(|conn| {
				diesel::insert_into(profile::table)
					.values(insertable)
					.returning(PrimitiveProfile::as_returning())
					.get_result(conn)
			})
			.await??;

		info!(
			"registered new profile id: {} student number: {}",
			profile.id, profile.student_number
		);

		Ok(profile)
	}
}

/// Insert a profile with a precomputed hash and an explicit role
///
/// Bypasses the student-only rule of [`NewProfile`], used by the seeder to
/// create the admin account.
#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = profile)]
#[diesel(check_for_backend(Pg))]
pub struct NewProfileDirect {
	pub name:           String,
	pub student_number: String,
	pub email:          String,
	pub password_hash:  String,
	pub role:           ProfileRole,
}

impl NewProfileDirect {
	#[instrument(skip(self, conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<PrimitiveProfile, Error> {
		let profile = conn
			.interact(|conn| {
				diesel::insert_into(profile::table)
					.values(self)
					.returning(PrimitiveProfile::as_returning())
					.get_result(conn)
			})
			.await??;

		Ok(profile)
	}
}
