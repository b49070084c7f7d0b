//! Controllers for the facility catalogue

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, NoContent};
use facility::{Facility, FacilityFilter, FacilityUpdate, NewFacility};
use primitive_facility::PrimitiveFacility;
use validator::Validate;

use crate::schemas::facility::{
	CreateFacilityRequest,
	FacilityResponse,
	UpdateFacilityRequest,
};
use crate::session::AdminSession;
use crate::{DbPool, Error};

#[instrument(skip(pool))]
pub(crate) async fn get_all_facilities(
	State(pool): State<DbPool>,
	Query(filter): Query<FacilityFilter>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let facilities = Facility::get_all(filter, &conn).await?;
	let response: Vec<FacilityResponse> =
		facilities.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn get_facility(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let facility = PrimitiveFacility::get_by_id(id, &conn).await?;

	Ok((StatusCode::OK, Json(FacilityResponse::from(facility))))
}

/// Create a new facility, admins only.
#[instrument(skip(pool))]
pub(crate) async fn create_facility(
	State(pool): State<DbPool>,
	session: AdminSession,
	Json(request): Json<CreateFacilityRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let new_facility = NewFacility {
		name:       request.name,
		kind:       request.kind,
		location:   request.location,
		capacity:   request.capacity,
		status:     request.status,
		created_by: Some(session.data.profile_id),
	};

	let conn = pool.get().await?;
	let facility = new_facility.insert(&conn).await?;

	Ok((StatusCode::CREATED, Json(FacilityResponse::from(facility))))
}

/// Update a facility, admins only.
#[instrument(skip(pool))]
pub(crate) async fn update_facility(
	State(pool): State<DbPool>,
	session: AdminSession,
	Path(id): Path<i32>,
	Json(request): Json<UpdateFacilityRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let update = FacilityUpdate {
		name:       request.name,
		kind:       request.kind,
		location:   request.location,
		capacity:   request.capacity,
		status:     request.status,
		updated_by: Some(session.data.profile_id),
	};

	let conn = pool.get().await?;
	let facility = update.apply(id, &conn).await?;

	Ok((StatusCode::OK, Json(FacilityResponse::from(facility))))
}

/// Delete a facility, admins only.
#[instrument(skip(pool))]
pub(crate) async fn delete_facility(
	State(pool): State<DbPool>,
	_session: AdminSession,
	Path(id): Path<i32>,
) -> Result<NoContent, Error> {
	let conn = pool.get().await?;

	Facility::delete_by_id(id, &conn).await?;

	Ok(NoContent)
}
