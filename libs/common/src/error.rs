//! Library-wide error types and [`From`] impls

use std::collections::HashMap;
use std::sync::LazyLock;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveTime;
use db::BookingState;
use diesel::result::DatabaseErrorKind;
use thiserror::Error;

/// Name of the exclusion constraint that forbids overlapping confirmed
/// bookings for the same facility and day
pub const BOOKING_OVERLAP_CONSTRAINT: &str = "booking_no_overlap";

/// Top level application error, can be converted into a [`Response`]
#[derive(Debug, Error)]
pub enum Error {
	/// Duplicate resource created
	#[error("{0}")]
	Duplicate(String),
	/// Request/operation forbidden
	#[error("forbidden")]
	Forbidden,
	/// An error that should never happen
	#[error("{0}")]
	Infallible(String),
	/// Opaque internal server error
	#[error("internal server error")]
	InternalServerError,
	/// Resource not found
	#[error("not found - {0}")]
	NotFound(String),
	/// Any error related to logging in
	#[error(transparent)]
	LoginError(#[from] LoginError),
	/// Invalid or missing token
	#[error(transparent)]
	TokenError(#[from] TokenError),
	/// Any error related to creating a booking
	#[error(transparent)]
	CreateBookingError(#[from] CreateBookingError),
	/// Any error related to changing a booking state
	#[error(transparent)]
	TransitionError(#[from] TransitionError),
	/// Transient storage failure, the request may be retried by the caller
	#[error("{0}")]
	Transient(String),
	/// Resource could not be validated
	#[error("{0}")]
	ValidationError(String),
}

impl Error {
	/// Return a unique identifying code for this error
	///
	/// When modifying this function the error code should only ever increase,
	/// an error code should never be reused once its assigned to avoid
	/// unexpectedly breaking the frontend
	fn code(&self) -> i32 {
		match self {
			Self::Duplicate(_) => 1,
			Self::Forbidden => 2,
			Self::Infallible(_) => 3,
			Self::InternalServerError => 4,
			Self::NotFound(_) => 5,
			Self::LoginError(e) => {
				match e {
					LoginError::UnknownEmail(_) => 6,
					LoginError::InvalidPassword => 7,
				}
			},
			Self::TokenError(e) => {
				match e {
					TokenError::MissingAccessToken => 8,
					TokenError::MissingSession => 9,
					TokenError::ExpiredSession => 10,
				}
			},
			Self::CreateBookingError(e) => {
				match e {
					CreateBookingError::OutOfHours { .. } => 11,
					CreateBookingError::StartNotBeforeEnd => 12,
					CreateBookingError::UnderMaintenance => 13,
					CreateBookingError::SlotConflict => 14,
				}
			},
			Self::TransitionError(TransitionError::Illegal { .. }) => 15,
			Self::Transient(_) => 16,
			Self::ValidationError(_) => 17,
		}
	}

	/// Return additional information about the error
	fn info(&self) -> Option<String> {
		match self {
			Self::Duplicate(m)
			| Self::NotFound(m)
			| Self::LoginError(LoginError::UnknownEmail(m))
			| Self::ValidationError(m) => Some(m.to_owned()),
			Self::CreateBookingError(CreateBookingError::OutOfHours {
				open,
				close,
			}) => {
				Some(serde_json::json!({"open": open, "close": close}).to_string())
			},
			Self::TransitionError(TransitionError::Illegal { from, to }) => {
				Some(serde_json::json!({"from": from, "to": to}).to_string())
			},
			_ => None,
		}
	}
}

/// Convert an error into a [`Response`]
impl IntoResponse for Error {
	fn into_response(self) -> Response {
		error!("{self:?}");

		let message = self.to_string();

		let data = serde_json::json!({
			"message": message,
			"code": self.code(),
			"info": self.info(),
		});

		let status = match self {
			Self::Duplicate(_)
			| Self::CreateBookingError(CreateBookingError::SlotConflict) => {
				StatusCode::CONFLICT
			},
			Self::InternalServerError | Self::Infallible(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			},
			Self::LoginError(_) | Self::TokenError(_) => StatusCode::UNAUTHORIZED,
			Self::Forbidden => StatusCode::FORBIDDEN,
			Self::CreateBookingError(_) | Self::TransitionError(_) => {
				StatusCode::BAD_REQUEST
			},
			Self::NotFound(_) => StatusCode::NOT_FOUND,
			Self::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
			Self::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
		};

		(status, axum::Json(data)).into_response()
	}
}

/// Any error related to logging in
#[derive(Debug, Error)]
pub enum LoginError {
	#[error("no profile with email '{0}' was found")]
	UnknownEmail(String),
	#[error("invalid password")]
	InvalidPassword,
}

/// Any error related to an access token
#[derive(Debug, Error)]
pub enum TokenError {
	#[error("missing or invalid access token")]
	MissingAccessToken,
	#[error("missing session")]
	MissingSession,
	#[error("session has expired")]
	ExpiredSession,
}

#[derive(Debug, Error)]
pub enum CreateBookingError {
	/// The requested interval falls outside the facility operating hours
	#[error("bookings must fall within operating hours")]
	OutOfHours { open: NaiveTime, close: NaiveTime },
	/// The requested start time is not strictly before the end time
	#[error("start time must be before end time")]
	StartNotBeforeEnd,
	/// The facility is under maintenance and rejects new bookings
	#[error("facility is under maintenance")]
	UnderMaintenance,
	/// An overlapping confirmed booking already exists for this facility
	/// and day
	#[error("time slot is already booked")]
	SlotConflict,
}

#[derive(Debug, Error)]
pub enum TransitionError {
	/// The requested state change is not a legal transition
	#[error("cannot change booking state from {from:?} to {to:?}")]
	Illegal { from: BookingState, to: BookingState },
}

/// A list of possible internal errors
///
/// API end users should never see these details
#[derive(Debug, Error)]
pub enum InternalServerError {
	/// Unknown database constraint violation
	#[error("constraint error -- {0:?}")]
	ConstraintError(String),
	/// Error executing some database operation
	#[error("database error -- {0:?}")]
	DatabaseError(diesel::result::Error),
	/// Error interacting with a database connection
	#[error("database interaction error -- {0:?}")]
	DatabaseInteractionError(deadpool_diesel::InteractError),
	/// Error hashing some value
	#[error("hash error -- {0:?}")]
	HashError(argon2::password_hash::Error),
	/// Error handling some form of I/O
	#[error("I/O error -- {0:?}")]
	IOError(std::io::Error),
	/// Error acquiring database pool connection
	#[error("database pool error -- {0:?}")]
	PoolError(deadpool_diesel::PoolError),
	/// Error related to `serde_json`
	#[error("serde_json error -- {0:?}")]
	SerdeJsonError(serde_json::Error),
	/// Attempted to extract a session from a request that has not been
	/// authorized
	#[error("attempted to extract session without checking authorization")]
	SessionWithoutAuthError,
}

// Map internal server errors to application errors
impl From<InternalServerError> for Error {
	fn from(value: InternalServerError) -> Self {
		error!("internal server error -- {value}");

		Self::InternalServerError
	}
}

/// Map validation errors to application errors
impl From<validator::ValidationErrors> for Error {
	fn from(err: validator::ValidationErrors) -> Self {
		let errs = err.field_errors();
		let repr = errs
			.values()
			.map(|v| {
				v.iter()
					.map(ToString::to_string)
					.collect::<Vec<String>>()
					.join("\n")
			})
			.collect::<Vec<String>>()
			.join("\n");

		Self::ValidationError(repr)
	}
}

/// Map password hashing errors to application errors
impl From<argon2::password_hash::Error> for Error {
	fn from(err: argon2::password_hash::Error) -> Self {
		match err {
			argon2::password_hash::Error::Password => {
				LoginError::InvalidPassword.into()
			},
			_ => InternalServerError::HashError(err).into(),
		}
	}
}

/// Map database interaction errors to application errors
impl From<deadpool_diesel::InteractError> for Error {
	fn from(value: deadpool_diesel::InteractError) -> Self {
		InternalServerError::DatabaseInteractionError(value).into()
	}
}

/// Map of constraint names to column names.
static CONSTRAINT_TO_COLUMN: LazyLock<HashMap<&str, &str>> =
	LazyLock::new(|| {
		HashMap::from([
			("profile_email_key", "email"),
			("profile_student_number_key", "student number"),
			("facility_name_key", "facility name"),
		])
	});

/// Map database result errors to application errors.
impl From<diesel::result::Error> for Error {
	fn from(err: diesel::result::Error) -> Self {
		match &err {
			// No rows returned by query that expected at least one
			diesel::result::Error::NotFound => {
				Self::NotFound("no context provided".to_string())
			},
			// The overlap exclusion constraint fired: a concurrent writer
			// committed a conflicting confirmed booking first
			diesel::result::Error::DatabaseError(_, info)
				if info.constraint_name() == Some(BOOKING_OVERLAP_CONSTRAINT) =>
			{
				CreateBookingError::SlotConflict.into()
			},
			// The serializable admission transaction lost against a
			// concurrent one; the caller may retry
			diesel::result::Error::DatabaseError(
				DatabaseErrorKind::SerializationFailure,
				info,
			) => Self::Transient(info.message().to_string()),
			// Unique constraint violation
			diesel::result::Error::DatabaseError(
				DatabaseErrorKind::UniqueViolation,
				info,
			) => {
				let constraint_name = info.constraint_name().unwrap_or_default();

				match CONSTRAINT_TO_COLUMN.get(constraint_name) {
					Some(field) => {
						Self::Duplicate(format!("{field} is already in use"))
					},
					None => InternalServerError::DatabaseError(err).into(),
				}
			},
			// Foreign key constraint violation
			diesel::result::Error::DatabaseError(
				DatabaseErrorKind::ForeignKeyViolation,
				info,
			) => Error::ValidationError(info.message().to_string()),
			_ => InternalServerError::DatabaseError(err).into(),
		}
	}
}

impl From<deadpool_diesel::PoolError> for Error {
	fn from(value: deadpool_diesel::PoolError) -> Self {
		InternalServerError::PoolError(value).into()
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		InternalServerError::SerdeJsonError(err).into()
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		InternalServerError::IOError(err).into()
	}
}
