//! Command implementations for wiki-cli

pub mod codec;
pub mod file;
pub mod list;
pub mod rebuild;

pub use codec::{run_decode, run_encode};
pub use file::{run_cat, run_put, run_rm};
pub use list::{run_changed, run_list, run_recent};
pub use rebuild::run_rebuild;

use chrono::{DateTime, Utc};
use wiki_store::timestamp;

use crate::error::{CliError, Result};

/// Accept the cache format as well as any RFC 3339 timestamp.
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    timestamp::parse_utc(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|ts| ts.with_timezone(&Utc)))
        .map(timestamp::truncate)
        .map_err(|_| CliError::InvalidTimestamp {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cache_and_rfc3339_timestamps() {
        let cache = parse_timestamp("2020-01-20T21:39:58.804Z").unwrap();
        let rfc = parse_timestamp("2020-01-20T22:39:58.804+01:00").unwrap();
        assert_eq!(cache, rfc);
        assert_eq!(cache.timestamp_millis(), 1_579_556_398_804);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_timestamp("last tuesday"),
            Err(CliError::InvalidTimestamp { .. })
        ));
    }
}
