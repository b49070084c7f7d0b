use booking::stats::StatsOverview;
use chrono::{NaiveDate, NaiveTime};
use db::FacilityKind;
use models_common::hhmm;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
	pub overview:          OverviewResponse,
	pub bookings_per_kind: Vec<KindCount>,
	pub top_facilities:    Vec<FacilityCount>,
	pub peak_hours:        Vec<HourCount>,
	pub daily_bookings:    Vec<DayCount>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
	pub total_bookings:        i64,
	pub confirmed_count:       i64,
	pub cancelled_count:       i64,
	pub completed_count:       i64,
	pub total_students:        i64,
	pub total_facilities:      i64,
	pub active_facilities:     i64,
	pub cancellation_rate:     f64,
	pub completion_rate:       f64,
	pub avg_bookings_per_user: f64,
}

impl From<StatsOverview> for OverviewResponse {
	fn from(value: StatsOverview) -> Self {
		let percentage = |count: i64| {
			if value.total_bookings > 0 {
				round1(count as f64 / value.total_bookings as f64 * 100.0)
			} else {
				0.0
			}
		};

		let avg_bookings_per_user = if value.total_students > 0 {
			round1(value.total_bookings as f64 / value.total_students as f64)
		} else {
			0.0
		};

		Self {
			total_bookings: value.total_bookings,
			confirmed_count: value.confirmed_count,
			cancelled_count: value.cancelled_count,
			completed_count: value.completed_count,
			total_students: value.total_students,
			total_facilities: value.total_facilities,
			active_facilities: value.active_facilities,
			cancellation_rate: percentage(value.cancelled_count),
			completion_rate: percentage(value.completed_count),
			avg_bookings_per_user,
		}
	}
}

fn round1(value: f64) -> f64 { (value * 10.0).round() / 10.0 }

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindCount {
	pub kind:  FacilityKind,
	pub count: i64,
}

impl From<(FacilityKind, i64)> for KindCount {
	fn from(value: (FacilityKind, i64)) -> Self {
		Self { kind: value.0, count: value.1 }
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityCount {
	pub name:  String,
	pub count: i64,
}

impl From<(String, i64)> for FacilityCount {
	fn from(value: (String, i64)) -> Self {
		Self { name: value.0, count: value.1 }
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourCount {
	#[serde(with = "hhmm")]
	pub start_time: NaiveTime,
	pub count:      i64,
}

impl From<(NaiveTime, i64)> for HourCount {
	fn from(value: (NaiveTime, i64)) -> Self {
		Self { start_time: value.0, count: value.1 }
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCount {
	pub date:  NaiveDate,
	pub count: i64,
}

impl From<(NaiveDate, i64)> for DayCount {
	fn from(value: (NaiveDate, i64)) -> Self {
		Self { date: value.0, count: value.1 }
	}
}
