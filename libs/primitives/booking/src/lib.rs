#[macro_use]
extern crate tracing;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use common::{DbConn, Error};
use db::{BookingState, booking};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = booking)]
#[diesel(check_for_backend(Pg))]
pub struct PrimitiveBooking {
	pub id:          i32,
	pub profile_id:  i32,
	pub facility_id: i32,
	pub day:         NaiveDate,
	pub start_time:  NaiveTime,
	pub end_time:    NaiveTime,
	pub state:       BookingState,
	pub created_at:  NaiveDateTime,
	pub updated_at:  NaiveDateTime,
}

impl PrimitiveBooking {
	/// Get a [`PrimitiveBooking`] by its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(b_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let booking = conn
			.interact(move |conn| {
				booking::table
					.find(b_id)
					.select(Self::as_select())
					.get_result(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("booking {b_id}")))?;

		Ok(booking)
	}
}
