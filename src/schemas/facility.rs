use chrono::NaiveDateTime;
use db::{FacilityKind, FacilityStatus};
use primitive_facility::PrimitiveFacility;
use serde::{Deserialize, Serialize};
use validator_derive::Validate;

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacilityRequest {
	#[validate(length(
		min = 1,
		max = 128,
		message = "name must be between 1 and 128 characters long",
		code = "name-length"
	))]
	pub name:     String,
	pub kind:     FacilityKind,
	#[validate(length(
		min = 1,
		max = 256,
		message = "location must be between 1 and 256 characters long",
		code = "location-length"
	))]
	pub location: String,
	#[validate(range(
		min = 1,
		message = "capacity must be a positive number",
		code = "capacity-range"
	))]
	pub capacity: i32,
	#[serde(default)]
	pub status:   FacilityStatus,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFacilityRequest {
	pub name:     Option<String>,
	pub kind:     Option<FacilityKind>,
	pub location: Option<String>,
	#[validate(range(
		min = 1,
		message = "capacity must be a positive number",
		code = "capacity-range"
	))]
	pub capacity: Option<i32>,
	pub status:   Option<FacilityStatus>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityResponse {
	pub id:         i32,
	pub name:       String,
	pub kind:       FacilityKind,
	pub location:   String,
	pub capacity:   i32,
	pub status:     FacilityStatus,
	pub created_at: NaiveDateTime,
	pub updated_at: NaiveDateTime,
}

impl From<PrimitiveFacility> for FacilityResponse {
	fn from(value: PrimitiveFacility) -> Self {
		Self {
			id:         value.id,
			name:       value.name,
			kind:       value.kind,
			location:   value.location,
			capacity:   value.capacity,
			status:     value.status,
			created_at: value.created_at,
			updated_at: value.updated_at,
		}
	}
}
