//! Metadata for a single file in the repository

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file in the repository: its logical path and, if known, the time its
/// content last changed.
///
/// Identity is the path alone. Two records with the same path are equal and
/// hash the same no matter what their timestamps say, so a set of records
/// never holds two entries for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    path: String,
    timestamp: Option<DateTime<Utc>>,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            path: path.into(),
            timestamp,
        }
    }

    /// A record without a known timestamp, e.g. a bundled asset.
    pub fn untimestamped(path: impl Into<String>) -> Self {
        Self::new(path, None)
    }

    /// Logical path, always starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last content change. Usually the file's mtime; synchronization may
    /// set it to the partner's timestamp instead.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

impl PartialEq for FileRecord {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for FileRecord {}

impl Hash for FileRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl PartialOrd for FileRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FileRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}

impl fmt::Display for FileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}
