//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use backoff::ExponentialBackoff;
use fs2::FileExt;

use crate::{Error, Result};

/// Tuning knobs for [`write_atomic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// How long to keep retrying the advisory lock before giving up.
    pub lock_timeout: Duration,
    /// Whether to `fsync` the temporary file before renaming it into place.
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            enable_fsync: true,
        }
    }
}

/// Source of unique temporary file names within this process.
static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Write content atomically to a file with locking.
///
/// Missing parent folders are created first; a failure there is reported as
/// [`Error::CreateDir`] so callers can tell it apart from the write itself.
/// The content goes to a temporary file in the same folder which is then
/// renamed over the target, so readers never observe a partial file and a
/// failed write leaves the previous content untouched.
pub fn write_atomic(path: &Path, content: &[u8], config: RobustnessConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.is_dir() {
            fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let staging = staging_path(path);
    let result = stage(&staging, path, content, config)
        .and_then(|()| fs::rename(&staging, path).map_err(|e| Error::io(path, e)));

    if result.is_err() && staging.exists() {
        if let Err(e) = fs::remove_file(&staging) {
            tracing::warn!(path = ?staging, error = %e, "Failed to remove temporary file");
        }
    }
    result
}

/// Sibling of `path` to stage a write in.
///
/// The name is independent of the target's, so it stays short no matter how
/// close the target name is to the filesystem's length limit.
fn staging_path(path: &Path) -> PathBuf {
    let sequence = TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{}-{sequence}.tmp", std::process::id()))
}

/// Write `content` to the fresh file `staging` under an exclusive lock.
fn stage(staging: &Path, target: &Path, content: &[u8], config: RobustnessConfig) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(staging)
        .map_err(|e| Error::io(staging, e))?;

    let policy = ExponentialBackoff {
        initial_interval: Duration::from_millis(10),
        max_elapsed_time: Some(config.lock_timeout),
        ..ExponentialBackoff::default()
    };
    let lock_failed = || Error::LockFailed {
        path: target.to_path_buf(),
    };
    backoff::retry(policy, || file.try_lock_exclusive().map_err(backoff::Error::transient))
        .map_err(|_| lock_failed())?;

    file.write_all(content).map_err(|e| Error::io(staging, e))?;
    if config.enable_fsync {
        file.sync_all().map_err(|e| Error::io(staging, e))?;
    }
    FileExt::unlock(&file).map_err(|_| lock_failed())
}

/// Read the full binary content of a file.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::io(path, e))
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Write text content to a file atomically with default robustness settings.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes(), RobustnessConfig::default())
}

/// Delete a single file.
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))
}

/// Last modification time as reported by the filesystem.
pub fn modified(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| Error::io(path, e))
}

/// Overwrite the modification time of an existing file.
pub fn set_modified(path: &Path, time: SystemTime) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;
    file.set_modified(time).map_err(|e| Error::io(path, e))
}
