use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, PartialEq, Eq, Serialize,
)]
#[ExistingTypePath = "crate::sql_types::BookingState"]
pub enum BookingState {
	#[default]
	Confirmed,
	Cancelled,
	Completed,
}

impl BookingState {
	/// Whether a booking in this state may move to `next`
	///
	/// Cancelled and Completed are terminal; the only legal transitions are
	/// Confirmed -> Cancelled and Confirmed -> Completed.
	#[must_use]
	pub fn can_become(self, next: Self) -> bool {
		matches!(
			(self, next),
			(Self::Confirmed, Self::Cancelled | Self::Completed)
		)
	}
}

#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, PartialEq, Eq, Serialize,
)]
#[ExistingTypePath = "crate::sql_types::FacilityKind"]
pub enum FacilityKind {
	#[default]
	Snooker,
	Football,
	Badminton,
}

#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, PartialEq, Eq, Serialize,
)]
#[ExistingTypePath = "crate::sql_types::FacilityStatus"]
pub enum FacilityStatus {
	#[default]
	Active,
	Maintenance,
}

#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, PartialEq, Eq, Serialize,
)]
#[ExistingTypePath = "crate::sql_types::ProfileRole"]
pub enum ProfileRole {
	#[default]
	Student,
	Admin,
}
