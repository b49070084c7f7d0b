#[macro_use]
extern crate tracing;

use chrono::NaiveDateTime;
use common::{DbConn, Error};
use db::{FacilityKind, FacilityStatus, facility};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = facility)]
#[diesel(check_for_backend(Pg))]
pub struct PrimitiveFacility {
	pub id:         i32,
	pub name:       String,
	pub kind:       FacilityKind,
	pub location:   String,
	pub capacity:   i32,
	pub status:     FacilityStatus,
	pub created_at: NaiveDateTime,
	pub created_by: Option<i32>,
	pub updated_at: NaiveDateTime,
	pub updated_by: Option<i32>,
}

impl PrimitiveFacility {
	/// Get a [`PrimitiveFacility`] by its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(f_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let facility = conn
			.interact(move |conn| {
				facility::table
					.find(f_id)
					.select(Self::as_select())
					.get_result(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("facility {f_id}")))?;

		Ok(facility)
	}
}
