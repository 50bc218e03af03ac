//! UTC timestamps as stored in the cache file
//!
//! Format: `yyyy-MM-ddTHH:mm:ss.SSSZ`. Everything is kept at millisecond
//! precision so that a timestamp survives a cache round trip unchanged.

use std::time::SystemTime;

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

/// `strftime` pattern of the cache timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub fn format_utc(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_utc(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map(|naive| naive.and_utc())
}

/// Drop everything below milliseconds.
pub fn truncate(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp.trunc_subsecs(3)
}

/// The current time at cache precision.
pub fn now() -> DateTime<Utc> {
    truncate(Utc::now())
}

pub fn from_system_time(time: SystemTime) -> DateTime<Utc> {
    truncate(DateTime::<Utc>::from(time))
}

pub fn to_system_time(timestamp: DateTime<Utc>) -> SystemTime {
    SystemTime::from(timestamp)
}
