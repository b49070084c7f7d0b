use chrono::NaiveDateTime;
use db::ProfileRole;
use primitive_profile::PrimitiveProfile;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
	pub id:             i32,
	pub name:           String,
	pub student_number: String,
	pub email:          String,
	pub role:           ProfileRole,
	pub created_at:     NaiveDateTime,
}

impl From<PrimitiveProfile> for ProfileResponse {
	fn from(value: PrimitiveProfile) -> Self {
		Self {
			id:             value.id,
			name:           value.name,
			student_number: value.student_number,
			email:          value.email,
			role:           value.role,
			created_at:     value.created_at,
		}
	}
}
