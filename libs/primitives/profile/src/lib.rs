use chrono::NaiveDateTime;
use db::{ProfileRole, profile};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
	AsChangeset,
	Clone,
	Debug,
	Deserialize,
	Identifiable,
	Queryable,
	Selectable,
	Serialize,
)]
#[diesel(table_name = profile)]
#[diesel(check_for_backend(Pg))]
pub struct PrimitiveProfile {
	pub id:             i32,
	pub name:           String,
	pub student_number: String,
	pub email:          String,
	#[serde(skip)]
	pub password_hash:  String,
	pub role:           ProfileRole,
	pub created_at:     NaiveDateTime,
	pub updated_at:     NaiveDateTime,
}

impl PrimitiveProfile {
	/// Whether this profile may manage facilities and see every booking
	#[must_use]
	pub fn is_admin(&self) -> bool { self.role == ProfileRole::Admin }
}
