//! The repository store used by the rest of the wiki
//!
//! All operations go through one mutex around the [`Overlay`], so index
//! updates and cache-file writes of concurrent callers never interleave.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use wiki_fs::{PathCodec, RobustnessConfig, canonical_logical_path, io};

use crate::cache::CacheIndex;
use crate::config::RepositoryConfig;
use crate::error::{Error, Result};
use crate::overlay::{Layer, Overlay};
use crate::query;
use crate::record::FileRecord;
use crate::timestamp;

/// Thread-safe access to the files of a wiki repository.
///
/// Every path argument is a logical path. It is brought into canonical form
/// first, so `notes/todo.txt`, `/notes//todo.txt` and `/notes/todo.txt/`
/// all name the same file.
#[derive(Debug)]
pub struct RepositoryStore {
    state: Mutex<Overlay>,
    base_root: PathBuf,
    shadow_root: Option<PathBuf>,
    excluded_from_sync: BTreeSet<String>,
    robustness: RobustnessConfig,
}

impl RepositoryStore {
    /// Open the repository described by `config`.
    ///
    /// The base root is created if it does not exist. A configured shadow
    /// root that does not exist is logged and ignored.
    pub fn open(config: RepositoryConfig) -> Result<Self> {
        let root_error = |source| Error::Root {
            path: config.base_root.clone(),
            source,
        };
        fs::create_dir_all(&config.base_root).map_err(root_error)?;
        let base_root = dunce::canonicalize(&config.base_root).map_err(root_error)?;

        let shadow_root = config
            .shadow_root
            .as_deref()
            .and_then(|shadow| match dunce::canonicalize(shadow) {
                Ok(path) if path.is_dir() => Some(path),
                Ok(path) => {
                    tracing::warn!(shadow_root = ?path, "Shadow repository is not a folder, ignoring it");
                    None
                }
                Err(e) => {
                    tracing::warn!(shadow_root = ?shadow, error = %e, "Shadow repository not available, ignoring it");
                    None
                }
            });

        tracing::info!(base_root = ?base_root, shadow_root = ?shadow_root, "Opening repository");

        let robustness = config.robustness();
        let scan = config.scan_on_startup;

        let mut base = CacheIndex::new(PathCodec::new(&base_root), robustness);
        if let Some(shadow) = shadow_root.as_ref().filter(|s| s.starts_with(&base_root) && **s != base_root) {
            base = base.skip_folder(shadow.clone());
        }
        let base = base.open(scan);
        let shadow = shadow_root
            .as_ref()
            .map(|root| CacheIndex::new(PathCodec::new(root), robustness).open(scan));

        Ok(Self {
            state: Mutex::new(Overlay::new(base, shadow)),
            base_root,
            shadow_root,
            excluded_from_sync: config.exclude_from_sync,
            robustness,
        })
    }

    /// Nothing leaves the overlay half-updated, so a panicked holder is harmless.
    fn state(&self) -> MutexGuard<'_, Overlay> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn base_root(&self) -> &Path {
        &self.base_root
    }

    pub fn shadow_root(&self) -> Option<&Path> {
        self.shadow_root.as_deref()
    }

    pub fn excluded_from_sync(&self) -> &BTreeSet<String> {
        &self.excluded_from_sync
    }

    /// Whether the synchronization service should leave `path` alone.
    pub fn is_excluded_from_sync(&self, path: &str) -> bool {
        self.excluded_from_sync.contains(&canonical_logical_path(path))
    }

    /// Physical location of `path` in the given layer.
    pub fn resolve_path(&self, path: &str, layer: Layer) -> Result<PathBuf> {
        self.state()
            .resolve_path_for_io(&canonical_logical_path(path), layer)
    }

    /// Indexed record for `path`. Never touches the filesystem.
    pub fn get_file(&self, path: &str) -> Option<FileRecord> {
        self.state().get(&canonical_logical_path(path)).cloned()
    }

    /// All indexed files of base and shadow, base winning on overlap.
    pub fn list_files(&self) -> HashSet<FileRecord> {
        self.state().list_files().into_iter().collect()
    }

    /// Files changed strictly after `threshold`; every timestamped file if
    /// there is no threshold.
    pub fn files_modified_after(&self, threshold: Option<DateTime<Utc>>) -> HashSet<FileRecord> {
        let records = self.state().list_files();
        query::modified_after(&records, threshold)
    }

    /// The `count` most recently modified files accepted by `filter`.
    pub fn last_modified_files<F>(&self, count: usize, filter: F) -> Vec<FileRecord>
    where
        F: Fn(&FileRecord) -> bool,
    {
        let records = self.state().list_files();
        query::last_modified(records, count, filter)
    }

    /// Read a file as text; invalid UTF-8 is replaced.
    pub fn read_text(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }

    /// Read a file from the base root, falling back to the shadow root.
    ///
    /// The index is corrected on the way: a file found on disk but missing
    /// from the index is added, an indexed file missing on disk is dropped.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let path = canonical_logical_path(path);
        let mut state = self.state();
        let (layer, physical) = state
            .locate_for_read(&path)
            .ok_or_else(|| Error::NotFound { path: path.clone() })?;

        tracing::debug!(path = %path, layer = %layer, "Reading file");
        io::read_bytes(&physical).map_err(|e| Error::from_fs(&path, e))
    }

    /// Write a text file stamped with the current time.
    pub fn write_text(&self, path: &str, content: &str, layer: Layer) -> Result<FileRecord> {
        self.write_binary(path, content.as_bytes(), None, layer)
    }

    /// Write a file and record it with `timestamp`, or the current time.
    ///
    /// The file's mtime is set to the recorded timestamp so a later rebuild
    /// reproduces it. On failure the previous content and index entry are
    /// kept.
    pub fn write_binary(
        &self,
        path: &str,
        content: &[u8],
        timestamp: Option<DateTime<Utc>>,
        layer: Layer,
    ) -> Result<FileRecord> {
        let path = writable_path(path)?;
        let mut state = self.state();
        let index = state.index_mut(layer)?;
        let physical = index.codec().encode(&path);

        io::write_atomic(&physical, content, self.robustness)
            .map_err(|e| Error::from_fs(&path, e))?;

        let stamp = timestamp.map(timestamp::truncate).unwrap_or_else(timestamp::now);
        if let Err(e) = io::set_modified(&physical, timestamp::to_system_time(stamp)) {
            tracing::warn!(path = %path, error = %e, "Failed to set file modification time");
        }

        let record = FileRecord::new(path, Some(stamp));
        index.upsert(record.clone());
        tracing::debug!(path = %record.path(), layer = %layer, bytes = content.len(), "Wrote file");
        Ok(record)
    }

    /// Delete the file behind `record` from the given layer.
    ///
    /// A file that is already gone yields [`Error::NotFound`] and its index
    /// entry is dropped.
    pub fn delete_file(&self, record: &FileRecord, layer: Layer) -> Result<()> {
        let path = writable_path(record.path())?;
        let mut state = self.state();
        let index = state.index_mut(layer)?;
        let physical = index.codec().encode(&path);

        match io::remove_file(&physical) {
            Ok(()) => {
                index.remove(&path);
                tracing::debug!(path = %path, layer = %layer, "Deleted file");
                Ok(())
            }
            Err(e) => {
                let error = Error::from_fs(&path, e);
                if error.is_not_found() {
                    index.remove(&path);
                }
                Err(error)
            }
        }
    }

    /// Re-derive both indexes from disk; returns the number of files.
    pub fn rebuild_cache(&self) -> Result<usize> {
        Ok(self.state().rebuild()?)
    }
}

/// Canonical form of a path callers may write or delete.
fn writable_path(path: &str) -> Result<String> {
    let path = canonical_logical_path(path);
    if path == "/" || CacheIndex::is_reserved(&path) {
        return Err(Error::ReservedPath { path });
    }
    Ok(path)
}
