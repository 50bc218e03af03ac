//! Timestamp queries over a set of records

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::record::FileRecord;

/// Records with a timestamp strictly later than `threshold`.
///
/// Without a threshold every timestamped record matches; untimestamped
/// records never do.
pub fn modified_after<'a>(
    records: impl IntoIterator<Item = &'a FileRecord>,
    threshold: Option<DateTime<Utc>>,
) -> HashSet<FileRecord> {
    records
        .into_iter()
        .filter(|record| match (record.timestamp(), threshold) {
            (Some(ts), Some(threshold)) => ts > threshold,
            (Some(_), None) => true,
            (None, _) => false,
        })
        .cloned()
        .collect()
}

/// Up to `count` records accepted by `filter`, newest first.
pub fn last_modified<F>(records: Vec<FileRecord>, count: usize, filter: F) -> Vec<FileRecord>
where
    F: Fn(&FileRecord) -> bool,
{
    let mut matching: Vec<FileRecord> = records.into_iter().filter(|r| filter(r)).collect();
    matching.sort_by(compare_newest_first);
    matching.truncate(count);
    matching
}

/// Newer timestamps first, untimestamped records last. Equal keys compare
/// equal so a stable sort keeps their input order.
pub fn compare_newest_first(a: &FileRecord, b: &FileRecord) -> Ordering {
    match (a.timestamp(), b.timestamp()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
