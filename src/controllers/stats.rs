//! Controllers for the admin statistics dashboard

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use booking::{Booking, stats};

use crate::schemas::stats::{
	DayCount,
	FacilityCount,
	HourCount,
	KindCount,
	StatsResponse,
};
use crate::session::AdminSession;
use crate::{DbPool, Error};

const TOP_FACILITY_LIMIT: usize = 5;
const DAILY_BOOKING_DAYS: usize = 14;

/// Aggregate booking statistics, admins only
///
/// The sweeper runs first so the per-state counts reflect reality at read
/// time rather than at last write.
#[instrument(skip(pool))]
pub(crate) async fn get_stats(
	State(pool): State<DbPool>,
	_session: AdminSession,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	Booking::complete_expired(&conn).await?;

	let overview = stats::overview(&conn).await?;
	let bookings_per_kind = stats::bookings_per_kind(&conn).await?;
	let top_facilities =
		stats::top_facilities(TOP_FACILITY_LIMIT, &conn).await?;
	let peak_hours = stats::peak_hours(&conn).await?;
	let daily_bookings = stats::daily_totals(DAILY_BOOKING_DAYS, &conn).await?;

	let response = StatsResponse {
		overview:          overview.into(),
		bookings_per_kind: bookings_per_kind
			.into_iter()
			.map(KindCount::from)
			.collect(),
		top_facilities:    top_facilities
			.into_iter()
			.map(FacilityCount::from)
			.collect(),
		peak_hours:        peak_hours.into_iter().map(HourCount::from).collect(),
		daily_bookings:    daily_bookings
			.into_iter()
			.map(DayCount::from)
			.collect(),
	};

	Ok((StatusCode::OK, Json(response)))
}
