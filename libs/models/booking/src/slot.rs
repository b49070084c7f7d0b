//! The fixed hourly slot grid and availability filtering

use chrono::NaiveTime;
use models_common::{CLOSE_HOUR, OPEN_HOUR, hhmm};
use serde::{Deserialize, Serialize};

/// A fixed one-hour candidate booking interval within operating hours
///
/// Generated fresh per request, never persisted, and carries no identity
/// beyond its time bounds.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
	#[serde(with = "hhmm")]
	pub start_time: NaiveTime,
	#[serde(with = "hhmm")]
	pub end_time:   NaiveTime,
}

/// The ordered sequence of one-hour slots over operating hours
#[must_use]
pub fn slot_grid() -> Vec<Slot> {
	(OPEN_HOUR..CLOSE_HOUR)
		.map(|hour| {
			Slot {
				// Hours stay strictly below 24, cannot fail
				start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
				end_time:   NaiveTime::from_hms_opt(hour + 1, 0, 0).unwrap(),
			}
		})
		.collect()
}

/// The subset of `grid` not overlapped by any interval in `taken`
///
/// Half-open interval semantics: an interval ending exactly when a slot
/// starts does not block that slot, and vice versa.
#[must_use]
pub fn free_slots(grid: &[Slot], taken: &[(NaiveTime, NaiveTime)]) -> Vec<Slot> {
	grid.iter()
		.copied()
		.filter(|slot| {
			!taken
				.iter()
				.any(|&(start, end)| start < slot.end_time && end > slot.start_time)
		})
		.collect()
}
