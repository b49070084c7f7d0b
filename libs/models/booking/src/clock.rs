//! Local wall-clock access for the expiry sweeper

use chrono::{Local, NaiveDate, NaiveTime};

/// The current LOCAL calendar date and wall-clock time
///
/// Bookings store local dates and times. Sweeping against a UTC clock
/// would complete the wrong rows near midnight for any non-zero UTC
/// offset, so the sweeper must compare like with like.
#[must_use]
pub fn local_now() -> (NaiveDate, NaiveTime) {
	let now = Local::now().naive_local();

	(now.date(), now.time())
}
