//! Aggregate booking statistics for the admin dashboard
//!
//! Callers must run the expiry sweeper first so the per-state counts
//! reflect reality at read time.

use chrono::{NaiveDate, NaiveTime};
use common::{DbConn, Error};
use db::{BookingState, FacilityKind, FacilityStatus, ProfileRole};
use db::{booking, facility, profile};
use diesel::dsl::count_star;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
	pub total_bookings:    i64,
	pub confirmed_count:   i64,
	pub cancelled_count:   i64,
	pub completed_count:   i64,
	pub total_students:    i64,
	pub total_facilities:  i64,
	pub active_facilities: i64,
}

/// Count bookings, students, and facilities by state
#[instrument(skip(conn))]
pub async fn overview(conn: &DbConn) -> Result<StatsOverview, Error> {
	let overview = conn
		.interact(|conn| -> QueryResult<StatsOverview> {
			let total_bookings =
				booking::table.count().get_result::<i64>(conn)?;
			let confirmed_count = booking::table
				.filter(booking::state.eq(BookingState::Confirmed))
				.count()
				.get_result::<i64>(conn)?;
			let cancelled_count = booking::table
				.filter(booking::state.eq(BookingState::Cancelled))
				.count()
				.get_result::<i64>(conn)?;
			let completed_count = booking::table
				.filter(booking::state.eq(BookingState::Completed))
				.count()
				.get_result::<i64>(conn)?;
			let total_students = profile::table
				.filter(profile::role.eq(ProfileRole::Student))
				.count()
				.get_result::<i64>(conn)?;
			let total_facilities =
				facility::table.count().get_result::<i64>(conn)?;
			let active_facilities = facility::table
				.filter(facility::status.eq(FacilityStatus::Active))
				.count()
				.get_result::<i64>(conn)?;

			Ok(StatsOverview {
				total_bookings,
				confirmed_count,
				cancelled_count,
				completed_count,
				total_students,
				total_facilities,
				active_facilities,
			})
		})
		.await??;

	Ok(overview)
}

/// Booking totals per facility kind, busiest kind first
#[instrument(skip(conn))]
pub async fn bookings_per_kind(
	conn: &DbConn,
) -> Result<Vec<(FacilityKind, i64)>, Error> {
	let mut rows = conn
		.interact(|conn| {
			booking::table
				.inner_join(facility::table)
				.group_by(facility::kind)
				.select((facility::kind, count_star()))
				.get_results::<(FacilityKind, i64)>(conn)
		})
		.await??;

	rows.sort_by(|a, b| b.1.cmp(&a.1));

	Ok(rows)
}

/// The `limit` most booked facilities by name, busiest first
#[instrument(skip(conn))]
pub async fn top_facilities(
	limit: usize,
	conn: &DbConn,
) -> Result<Vec<(String, i64)>, Error> {
	let mut rows = conn
		.interact(|conn| {
			booking::table
				.inner_join(facility::table)
				.group_by((facility::id, facility::name))
				.select((facility::name, count_star()))
				.get_results::<(String, i64)>(conn)
		})
		.await??;

	rows.sort_by(|a, b| b.1.cmp(&a.1));
	rows.truncate(limit);

	Ok(rows)
}

/// Confirmed bookings per start time, busiest hour first
#[instrument(skip(conn))]
pub async fn peak_hours(conn: &DbConn) -> Result<Vec<(NaiveTime, i64)>, Error> {
	let mut rows = conn
		.interact(|conn| {
			booking::table
				.filter(booking::state.eq(BookingState::Confirmed))
				.group_by(booking::start_time)
				.select((booking::start_time, count_star()))
				.get_results::<(NaiveTime, i64)>(conn)
		})
		.await??;

	rows.sort_by(|a, b| b.1.cmp(&a.1));

	Ok(rows)
}

/// Booking totals for the `days` most recent booked days, oldest first
#[instrument(skip(conn))]
pub async fn daily_totals(
	days: usize,
	conn: &DbConn,
) -> Result<Vec<(NaiveDate, i64)>, Error> {
	let mut rows = conn
		.interact(|conn| {
			booking::table
				.group_by(booking::day)
				.select((booking::day, count_star()))
				.get_results::<(NaiveDate, i64)>(conn)
		})
		.await??;

	rows.sort_by(|a, b| b.0.cmp(&a.0));
	rows.truncate(days);
	rows.reverse();

	Ok(rows)
}
