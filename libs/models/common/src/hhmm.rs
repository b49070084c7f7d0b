//! Serde helpers for wall-clock times in zero-padded `HH:MM` format
//!
//! Bookings travel over the wire as `HH:MM` strings; chrono's default
//! [`NaiveTime`] representation includes seconds and would leak into the
//! API surface.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

const FORMAT: &str = "%H:%M";

pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&time.format(FORMAT).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
	D: Deserializer<'de>,
{
	let value = String::deserialize(deserializer)?;

	NaiveTime::parse_from_str(&value, FORMAT).map_err(serde::de::Error::custom)
}
