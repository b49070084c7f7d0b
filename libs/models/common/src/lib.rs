use chrono::NaiveTime;
use diesel::BoxableExpression;
use diesel::pg::Pg;
use diesel::sql_types::{Bool, Nullable};

pub mod hhmm;

/// First bookable hour of the day (inclusive)
pub const OPEN_HOUR: u32 = 8;
/// Hour at which every facility closes (exclusive slot bound)
pub const CLOSE_HOUR: u32 = 22;

pub type BoxedCondition<S, T = Nullable<Bool>> =
	Box<dyn BoxableExpression<S, Pg, SqlType = T>>;

pub trait ToFilter<S> {
	type SqlType;

	fn to_filter(&self) -> BoxedCondition<S, Self::SqlType>;
}

/// The earliest bookable time of day
#[must_use]
pub fn opens_at() -> NaiveTime {
	// In-range constants, cannot fail
	NaiveTime::from_hms_opt(OPEN_HOUR, 0, 0).unwrap()
}

/// The time of day at which facilities close
#[must_use]
pub fn closes_at() -> NaiveTime {
	NaiveTime::from_hms_opt(CLOSE_HOUR, 0, 0).unwrap()
}
