#[macro_use]
extern crate tracing;

use common::{DbConn, Error};
use db::{FacilityKind, FacilityStatus, facility};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use models_common::{BoxedCondition, ToFilter};
use primitive_facility::PrimitiveFacility;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityFilter {
	pub kind:   Option<FacilityKind>,
	pub status: Option<FacilityStatus>,
}

impl<S> ToFilter<S> for FacilityFilter
where
	S: 'static,
	facility::kind: SelectableExpression<S>,
	facility::status: SelectableExpression<S>,
{
	type SqlType = Bool;

	fn to_filter(&self) -> BoxedCondition<S, Self::SqlType> {
		let mut filter: BoxedCondition<S, Self::SqlType> =
			Box::new(true.into_sql::<Bool>());

		if let Some(kind) = self.kind {
			filter = Box::new(filter.and(facility::kind.eq(kind)));
		}

		if let Some(status) = self.status {
			filter = Box::new(filter.and(facility::status.eq(status)));
		}

		filter
	}
}

/// Queries over the facility catalogue
pub struct Facility;

impl Facility {
	/// Get all facilities matching `filter`, newest first
	#[instrument(skip(conn))]
	pub async fn get_all(
		filter: FacilityFilter,
		conn: &DbConn,
	) -> Result<Vec<PrimitiveFacility>, Error> {
		let facilities = conn
			.interact(move |conn| {
				facility::table
					.filter(filter.to_filter())
					.order(facility::created_at.desc())
					.select(PrimitiveFacility::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(facilities)
	}

	/// Delete a facility given its id
	#[instrument(skip(conn))]
	pub async fn delete_by_id(f_id: i32, conn: &DbConn) -> Result<(), Error> {
		let deleted = conn
			.interact(move |conn| {
				diesel::delete(facility::table.find(f_id)).execute(conn)
			})
			.await??;

		if deleted == 0 {
			return Err(Error::NotFound(format!("facility {f_id}")));
		}

		info!("deleted facility with id {f_id}");

		Ok(())
	}
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = facility)]
#[diesel(check_for_backend(Pg))]
pub struct NewFacility {
	pub name:       String,
	pub kind:       FacilityKind,
	pub location:   String,
	pub capacity:   i32,
	pub status:     FacilityStatus,
	pub created_by: Option<i32>,
}

impl NewFacility {
	/// Insert this [`NewFacility`]
	#[instrument(skip(conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<PrimitiveFacility, Error> {
		let facility = conn
			.interact(|conn| {
				diesel::insert_into(facility::table)
					.values(self)
					.returning(PrimitiveFacility::as_returning())
					.get_result(conn)
			})
			.await??;

		info!("created facility {} ({:?})", facility.id, facility.kind);

		Ok(facility)
	}
}

#[derive(AsChangeset, Clone, Debug, Default, Deserialize, Serialize)]
#[diesel(table_name = facility)]
#[serde(rename_all = "camelCase")]
pub struct FacilityUpdate {
	pub name:       Option<String>,
	pub kind:       Option<FacilityKind>,
	pub location:   Option<String>,
	pub capacity:   Option<i32>,
	pub status:     Option<FacilityStatus>,
	#[serde(skip)]
	pub updated_by: Option<i32>,
}

impl FacilityUpdate {
	/// Apply this update to the facility with the given id
	#[instrument(skip(conn))]
	pub async fn apply(
		self,
		f_id: i32,
		conn: &DbConn,
	) -> Result<PrimitiveFacility, Error> {
		let facility = conn
			.interact(move |conn| {
				diesel::update(facility::table.find(f_id))
					.set((self, facility::updated_at.eq(diesel::dsl::now)))
					.returning(PrimitiveFacility::as_returning())
					.get_result(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("facility {f_id}")))?;

		info!("updated facility {}", facility.id);

		Ok(facility)
	}
}
