use booking::{Booking, Slot};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use db::BookingState;
use models_common::hhmm;
use serde::{Deserialize, Serialize};

use crate::schemas::facility::FacilityResponse;
use crate::schemas::profile::ProfileResponse;

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
	pub facility_id: i32,
	pub date:        NaiveDate,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
	pub slots:     Vec<Slot>,
	pub all_slots: Vec<Slot>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
	pub facility_id: i32,
	pub date:        NaiveDate,
	#[serde(with = "hhmm")]
	pub start_time:  NaiveTime,
	#[serde(with = "hhmm")]
	pub end_time:    NaiveTime,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct BookingListQuery {
	#[serde(default)]
	pub mine: bool,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct UpdateBookingRequest {
	pub status: BookingState,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
	pub id:         i32,
	pub date:       NaiveDate,
	#[serde(with = "hhmm")]
	pub start_time: NaiveTime,
	#[serde(with = "hhmm")]
	pub end_time:   NaiveTime,
	pub status:     BookingState,
	pub facility:   FacilityResponse,
	pub profile:    ProfileResponse,
	pub created_at: NaiveDateTime,
	pub updated_at: NaiveDateTime,
}

impl From<Booking> for BookingResponse {
	fn from(value: Booking) -> Self {
		Self {
			id:         value.booking.id,
			date:       value.booking.day,
			start_time: value.booking.start_time,
			end_time:   value.booking.end_time,
			status:     value.booking.state,
			facility:   value.facility.into(),
			profile:    value.profile.into(),
			created_at: value.booking.created_at,
			updated_at: value.booking.updated_at,
		}
	}
}
