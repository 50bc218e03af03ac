//! Repository configuration
//!
//! ```toml
//! base_root = "repository"
//! shadow_root = "repository/shadow"
//! exclude_from_sync = ["/local-settings.txt"]
//! scan_on_startup = true
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wiki_fs::{ConfigStore, RobustnessConfig};

use crate::Result;

fn default_true() -> bool {
    true
}

fn default_lock_timeout_ms() -> u64 {
    5000
}

/// Everything needed to open a [`RepositoryStore`](crate::RepositoryStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Writable root; created if missing.
    pub base_root: PathBuf,

    /// Optional secondary root, consulted after the base.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_root: Option<PathBuf>,

    /// Logical paths the synchronization service must leave alone.
    #[serde(default)]
    pub exclude_from_sync: BTreeSet<String>,

    /// Scan the roots when no usable cache file exists.
    #[serde(default = "default_true")]
    pub scan_on_startup: bool,

    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    #[serde(default = "default_true")]
    pub enable_fsync: bool,
}

impl RepositoryConfig {
    pub fn new(base_root: impl Into<PathBuf>) -> Self {
        Self {
            base_root: base_root.into(),
            shadow_root: None,
            exclude_from_sync: BTreeSet::new(),
            scan_on_startup: true,
            lock_timeout_ms: default_lock_timeout_ms(),
            enable_fsync: true,
        }
    }

    pub fn with_shadow(mut self, shadow_root: impl Into<PathBuf>) -> Self {
        self.shadow_root = Some(shadow_root.into());
        self
    }

    pub fn with_excluded<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_from_sync.extend(
            paths
                .into_iter()
                .map(|p| wiki_fs::canonical_logical_path(p.as_ref())),
        );
        self
    }

    pub fn with_scan_on_startup(mut self, scan: bool) -> Self {
        self.scan_on_startup = scan;
        self
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.lock_timeout_ms = u64::try_from(robustness.lock_timeout.as_millis()).unwrap_or(u64::MAX);
        self.enable_fsync = robustness.enable_fsync;
        self
    }

    /// Load from a TOML, JSON or YAML file.
    ///
    /// Relative roots are taken relative to the folder holding the file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut config: Self = ConfigStore::new().load(path)?;
        let anchor = path.parent().unwrap_or_else(|| Path::new("."));
        config.base_root = anchor.join(&config.base_root);
        config.shadow_root = config.shadow_root.map(|shadow| anchor.join(shadow));
        config.exclude_from_sync = config
            .exclude_from_sync
            .iter()
            .map(|p| wiki_fs::canonical_logical_path(p))
            .collect();
        Ok(config)
    }

    pub fn robustness(&self) -> RobustnessConfig {
        RobustnessConfig {
            lock_timeout: Duration::from_millis(self.lock_timeout_ms),
            enable_fsync: self.enable_fsync,
        }
    }
}
