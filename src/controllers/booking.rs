//! Controllers for bookings and slot availability
//!
//! Every handler that reads or writes bookings first runs the expiry
//! sweeper so no response ever contains a confirmed booking whose end time
//! has already passed.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, NoContent};
use booking::{Booking, BookingFilter, NewBooking};
use chrono::NaiveTime;
use common::CreateBookingError;
use db::FacilityStatus;
use models_common::{closes_at, opens_at};
use primitive_booking::PrimitiveBooking;
use primitive_facility::PrimitiveFacility;

use crate::schemas::booking::{
	AvailabilityQuery,
	AvailabilityResponse,
	BookingListQuery,
	BookingResponse,
	CreateBookingRequest,
	UpdateBookingRequest,
};
use crate::session::Session;
use crate::{DbPool, Error};

/// Compute the free and full slot grids for a facility on a date
///
/// Advisory only: the returned availability is a snapshot that may go
/// stale while the response is in flight. Admission re-checks overlap
/// transactionally.
#[instrument(skip(pool))]
pub(crate) async fn get_availability(
	State(pool): State<DbPool>,
	Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	Booking::complete_expired(&conn).await?;

	let (slots, all_slots) =
		Booking::available_slots(query.facility_id, query.date, &conn).await?;

	Ok((StatusCode::OK, Json(AvailabilityResponse { slots, all_slots })))
}

/// Admit a new booking if its interval is still free
#[instrument(skip(pool))]
pub(crate) async fn create_booking(
	State(pool): State<DbPool>,
	session: Session,
	Json(request): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, Error> {
	check_booking_times(request.start_time, request.end_time)?;

	let conn = pool.get().await?;

	Booking::complete_expired(&conn).await?;

	let facility =
		PrimitiveFacility::get_by_id(request.facility_id, &conn).await?;

	if facility.status == FacilityStatus::Maintenance {
		return Err(CreateBookingError::UnderMaintenance.into());
	}

	let new_booking = NewBooking {
		profile_id:  session.data.profile_id,
		facility_id: facility.id,
		day:         request.date,
		start_time:  request.start_time,
		end_time:    request.end_time,
	};

	let booking = new_booking.admit(&conn).await?;

	Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// Times must be ordered and within operating hours; overlap is checked
/// transactionally at admission, never here.
fn check_booking_times(
	start_time: NaiveTime,
	end_time: NaiveTime,
) -> Result<(), Error> {
	if start_time >= end_time {
		return Err(CreateBookingError::StartNotBeforeEnd.into());
	}

	if start_time < opens_at() || end_time > closes_at() {
		return Err(CreateBookingError::OutOfHours {
			open:  opens_at(),
			close: closes_at(),
		}
		.into());
	}

	Ok(())
}

/// Get bookings, students see their own, admins see everything unless
/// `?mine=true`
#[instrument(skip(pool))]
pub(crate) async fn get_all_bookings(
	State(pool): State<DbPool>,
	session: Session,
	Query(query): Query<BookingListQuery>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	Booking::complete_expired(&conn).await?;

	let filter = if session.data.profile_is_admin && !query.mine {
		BookingFilter::default()
	} else {
		BookingFilter {
			profile_id: Some(session.data.profile_id),
			..BookingFilter::default()
		}
	};

	let bookings = Booking::find(filter, &conn).await?;
	let response: Vec<BookingResponse> =
		bookings.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn get_booking(
	State(pool): State<DbPool>,
	session: Session,
	Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	Booking::complete_expired(&conn).await?;

	let booking = Booking::get_by_id(id, &conn).await?;

	check_owner_or_admin(&session, booking.booking.profile_id)?;

	Ok((StatusCode::OK, Json(BookingResponse::from(booking))))
}

/// Move a booking through its state machine
#[instrument(skip(pool))]
pub(crate) async fn update_booking_state(
	State(pool): State<DbPool>,
	session: Session,
	Path(id): Path<i32>,
	Json(request): Json<UpdateBookingRequest>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	Booking::complete_expired(&conn).await?;

	let current = PrimitiveBooking::get_by_id(id, &conn).await?;

	check_owner_or_admin(&session, current.profile_id)?;

	let booking = Booking::transition(id, request.status, &conn).await?;

	Ok((StatusCode::OK, Json(BookingResponse::from(booking))))
}

/// Remove a booking record entirely, orthogonal to its lifecycle
#[instrument(skip(pool))]
pub(crate) async fn delete_booking(
	State(pool): State<DbPool>,
	session: Session,
	Path(id): Path<i32>,
) -> Result<NoContent, Error> {
	let conn = pool.get().await?;

	let booking = PrimitiveBooking::get_by_id(id, &conn).await?;

	check_owner_or_admin(&session, booking.profile_id)?;

	Booking::delete_by_id(id, &conn).await?;

	Ok(NoContent)
}

/// Ownership mismatch is [`Error::Forbidden`], a distinct error from an
/// illegal state transition.
fn check_owner_or_admin(session: &Session, owner_id: i32) -> Result<(), Error> {
	if session.data.profile_is_admin || session.data.profile_id == owner_id {
		Ok(())
	} else {
		Err(Error::Forbidden)
	}
}
