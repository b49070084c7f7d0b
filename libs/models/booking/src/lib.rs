#[macro_use]
extern crate tracing;

mod clock;
mod slot;
pub mod stats;

pub use clock::local_now;
pub use slot::{Slot, free_slots, slot_grid};

use chrono::{NaiveDate, NaiveTime};
use common::{CreateBookingError, DbConn, Error, TransitionError};
use db::{BookingState, booking, facility, profile};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use models_common::{BoxedCondition, ToFilter};
use primitive_booking::PrimitiveBooking;
use primitive_facility::PrimitiveFacility;
use primitive_profile::PrimitiveProfile;
use serde::{Deserialize, Serialize};

pub type JoinedBookingData =
	(PrimitiveBooking, PrimitiveFacility, PrimitiveProfile);

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilter {
	pub facility_id: Option<i32>,
	pub profile_id:  Option<i32>,
	pub date:        Option<NaiveDate>,
}

impl<S> ToFilter<S> for BookingFilter
where
	S: 'static,
	booking::facility_id: SelectableExpression<S>,
	booking::profile_id: SelectableExpression<S>,
	booking::day: SelectableExpression<S>,
{
	type SqlType = Bool;

	fn to_filter(&self) -> BoxedCondition<S, Self::SqlType> {
		let mut filter: BoxedCondition<S, Self::SqlType> =
			Box::new(true.into_sql::<Bool>());

		if let Some(facility_id) = self.facility_id {
			filter = Box::new(filter.and(booking::facility_id.eq(facility_id)));
		}

		if let Some(profile_id) = self.profile_id {
			filter = Box::new(filter.and(booking::profile_id.eq(profile_id)));
		}

		if let Some(date) = self.date {
			filter = Box::new(filter.and(booking::day.eq(date)));
		}

		filter
	}
}

/// A booking joined with its facility and owning profile
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Booking {
	pub booking:  PrimitiveBooking,
	pub facility: PrimitiveFacility,
	pub profile:  PrimitiveProfile,
}

impl Booking {
	fn from_joined(data: JoinedBookingData) -> Self {
		Self { booking: data.0, facility: data.1, profile: data.2 }
	}

	/// Get a [`Booking`] given its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(b_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let data = conn
			.interact(move |conn| {
				booking::table
					.inner_join(facility::table)
					.inner_join(profile::table)
					.filter(booking::id.eq(b_id))
					.select((
						PrimitiveBooking::as_select(),
						PrimitiveFacility::as_select(),
						PrimitiveProfile::as_select(),
					))
					.get_result(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| Error::NotFound(format!("booking {b_id}")))?;

		Ok(Self::from_joined(data))
	}

	/// Get all bookings matching `filter`, most recent day and start first
	#[instrument(skip(conn))]
	pub async fn find(
		filter: BookingFilter,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let bookings = conn
			.interact(move |conn| {
				booking::table
					.inner_join(facility::table)
					.inner_join(profile::table)
					.filter(filter.to_filter())
					.order((booking::day.desc(), booking::start_time.desc()))
					.select((
						PrimitiveBooking::as_select(),
						PrimitiveFacility::as_select(),
						PrimitiveProfile::as_select(),
					))
					.get_results(conn)
			})
			.await??
			.into_iter()
			.map(Self::from_joined)
			.collect();

		Ok(bookings)
	}

	/// Compute the free and full slot grids for a facility on a given day
	///
	/// The returned availability is an advisory snapshot read outside any
	/// transaction; it can go stale the moment a concurrent admission
	/// commits. The transactional overlap check in [`NewBooking::admit`] is
	/// the only authoritative conflict test.
	#[instrument(skip(conn))]
	pub async fn available_slots(
		f_id: i32,
		date: NaiveDate,
		conn: &DbConn,
	) -> Result<(Vec<Slot>, Vec<Slot>), Error> {
		let confirmed = conn
			.interact(move |conn| {
				booking::table
					.filter(booking::facility_id.eq(f_id))
					.filter(booking::day.eq(date))
					.filter(booking::state.eq(BookingState::Confirmed))
					.select((booking::start_time, booking::end_time))
					.get_results::<(NaiveTime, NaiveTime)>(conn)
			})
			.await??;

		let all_slots = slot_grid();
		let available = free_slots(&all_slots, &confirmed);

		Ok((available, all_slots))
	}

	/// Move a booking to `next`, enforcing the legal state transitions
	///
	/// The update is guarded on the current state so it stays atomic with
	/// respect to the expiry sweeper: if the row changed underneath us the
	/// guarded update misses and the freshly read state decides the error.
	/// A transition never re-runs the overlap check, cancelling or
	/// completing cannot introduce a new overlap.
	#[instrument(skip(conn))]
	pub async fn transition(
		b_id: i32,
		next: BookingState,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let current = PrimitiveBooking::get_by_id(b_id, conn).await?;

		if !current.state.can_become(next) {
			return Err(
				TransitionError::Illegal { from: current.state, to: next }.into()
			);
		}

		let from = current.state;
		let updated = conn
			.interact(move |conn| {
				diesel::update(
					booking::table
						.filter(booking::id.eq(b_id))
						.filter(booking::state.eq(from)),
				)
				.set((
					booking::state.eq(next),
					booking::updated_at.eq(diesel::dsl::now),
				))
				.execute(conn)
			})
			.await??;

		if updated == 0 {
			// Lost a race against the sweeper or another transition; the
			// fresh state names the transition that is now illegal
			let fresh = PrimitiveBooking::get_by_id(b_id, conn).await?;

			return Err(
				TransitionError::Illegal { from: fresh.state, to: next }.into()
			);
		}

		info!("booking {b_id} moved from {from:?} to {next:?}");

		Self::get_by_id(b_id, conn).await
	}

	/// Mark every confirmed booking whose end has passed as completed
	///
	/// Runs before any booking or stats read so no read ever returns a
	/// confirmed booking that already ended. Idempotent: a second run with
	/// no newly expired rows updates nothing.
	#[instrument(skip(conn))]
	pub async fn complete_expired(conn: &DbConn) -> Result<usize, Error> {
		let (today, now) = clock::local_now();

		Self::complete_expired_at(today, now, conn).await
	}

	/// Sweeper body with an explicit cutoff
	///
	/// `today` and `now` must be LOCAL date and wall-clock time in the same
	/// representation bookings are stored in; a UTC-based cutoff would
	/// sweep the wrong rows near midnight or across UTC-offset boundaries.
	#[instrument(skip(conn))]
	pub async fn complete_expired_at(
		today: NaiveDate,
		now: NaiveTime,
		conn: &DbConn,
	) -> Result<usize, Error> {
		let swept = conn
			.interact(move |conn| {
				let expired = booking::day
					.lt(today)
					.or(booking::day.eq(today).and(booking::end_time.le(now)));

				diesel::update(
					booking::table
						.filter(booking::state.eq(BookingState::Confirmed))
						.filter(expired),
				)
				.set((
					booking::state.eq(BookingState::Completed),
					booking::updated_at.eq(diesel::dsl::now),
				))
				.execute(conn)
			})
			.await??;

		if swept > 0 {
			info!("auto-completed {swept} expired bookings");
		}

		Ok(swept)
	}

	/// Delete a [`Booking`] given its id
	#[instrument(skip(conn))]
	pub async fn delete_by_id(b_id: i32, conn: &DbConn) -> Result<(), Error> {
		let deleted = conn
			.interact(move |conn| {
				diesel::delete(booking::table.find(b_id)).execute(conn)
			})
			.await??;

		if deleted == 0 {
			return Err(Error::NotFound(format!("booking {b_id}")));
		}

		info!("deleted booking with id {b_id}");

		Ok(())
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = booking)]
#[diesel(check_for_backend(Pg))]
pub struct NewBooking {
	pub profile_id:  i32,
	pub facility_id: i32,
	pub day:         NaiveDate,
	pub start_time:  NaiveTime,
	pub end_time:    NaiveTime,
}

impl NewBooking {
	/// Insert this [`NewBooking`] if and only if no overlapping confirmed
	/// booking exists for the same facility and day
	///
	/// The overlap check and the insert run as one SERIALIZABLE
	/// transaction, so two racing admissions for overlapping intervals can
	/// never both commit. Losing against a concurrent writer surfaces as
	/// [`CreateBookingError::SlotConflict`] when the exclusion constraint
	/// fires, or as [`Error::Transient`] on a serialization failure; the
	/// caller decides whether to retry, this function never does.
	#[instrument(skip(conn))]
	pub async fn admit(self, conn: &DbConn) -> Result<Booking, Error> {
		let inserted = conn
			.interact(move |conn| {
				conn.build_transaction().serializable().run::<_, Error, _>(
					|conn| {
						let overlap = diesel::select(diesel::dsl::exists(
							booking::table
								.filter(booking::facility_id.eq(self.facility_id))
								.filter(booking::day.eq(self.day))
								.filter(booking::state.eq(BookingState::Confirmed))
								.filter(booking::start_time.lt(self.end_time))
								.filter(booking::end_time.gt(self.start_time)),
						))
						.get_result::<bool>(conn)?;

						if overlap {
							return Err(CreateBookingError::SlotConflict.into());
						}

						let booking = diesel::insert_into(booking::table)
							.values(self)
							.returning(PrimitiveBooking::as_returning())
							.get_result(conn)?;

						Ok(booking)
					},
				)
			})
			.await??;

		info!(
			"admitted booking {} for facility {} on {} {} - {}",
			inserted.id,
			inserted.facility_id,
			inserted.day,
			inserted.start_time,
			inserted.end_time
		);

		Booking::get_by_id(inserted.id, conn).await
	}
}
