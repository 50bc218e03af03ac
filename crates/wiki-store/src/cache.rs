//! Persistent metadata index for one repository root
//!
//! The index maps every logical path below a root to its [`FileRecord`] and
//! mirrors that map into `/filelist.cache` after each change, so a restart
//! can skip the full directory scan.
//!
//! The cache file itself is never part of the index: its path is reserved,
//! which keeps persisting from ever triggering another persist.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use wiki_fs::{CACHE_FILE_PATH, ESCAPE_MARKER, PathCodec, RobustnessConfig, io, unescape_physical, walk};

use crate::record::FileRecord;
use crate::timestamp;

/// Why the cache file could not be used. Never surfaced to store callers;
/// the index falls back to a rebuild instead.
#[derive(Debug, thiserror::Error)]
pub enum CacheLoadError {
    #[error("Cache file {path} does not exist")]
    Missing { path: PathBuf },

    #[error("Failed to read cache file: {0}")]
    Read(#[source] wiki_fs::Error),

    #[error("Invalid cache file line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// In-memory file index of one root, written through to its cache file.
#[derive(Debug)]
pub struct CacheIndex {
    codec: PathCodec,
    entries: HashMap<String, FileRecord>,
    robustness: RobustnessConfig,
    /// Folders below the root that belong to another index.
    skipped_folders: Vec<PathBuf>,
}

impl CacheIndex {
    /// Create an empty index without touching the filesystem.
    pub fn new(codec: PathCodec, robustness: RobustnessConfig) -> Self {
        Self {
            codec,
            entries: HashMap::new(),
            robustness,
            skipped_folders: Vec::new(),
        }
    }

    /// Leave `folder` out of [`rebuild`](Self::rebuild) scans, e.g. a shadow
    /// root nested inside the base root.
    pub fn skip_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.skipped_folders.push(folder.into());
        self
    }

    /// Fill the index from the cache file if usable, otherwise by scanning
    /// the root (unless `scan` is off).
    pub fn open(mut self, scan: bool) -> Self {
        match self.load() {
            Ok(count) => {
                tracing::info!(root = ?self.root(), files = count, "Repository cache filled from cache file");
            }
            Err(e) => {
                tracing::info!(root = ?self.root(), reason = %e, "No usable cache file");
                if scan {
                    if let Err(e) = self.rebuild() {
                        tracing::warn!(root = ?self.root(), error = %e, "Failed to scan repository");
                    }
                }
            }
        }
        self
    }

    /// Whether `path` is the cache file's own logical path.
    pub fn is_reserved(path: &str) -> bool {
        path == CACHE_FILE_PATH
    }

    /// Whether `physical` lies in a folder this index leaves to another one.
    pub fn is_skipped(&self, physical: &Path) -> bool {
        self.skipped_folders.iter().any(|folder| physical.starts_with(folder))
    }

    pub fn root(&self) -> &Path {
        self.codec.root()
    }

    pub fn codec(&self) -> &PathCodec {
        &self.codec
    }

    /// Physical location of the cache file.
    pub fn cache_file(&self) -> PathBuf {
        self.codec.encode(CACHE_FILE_PATH)
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the index with the content of the cache file.
    ///
    /// All or nothing: on any error the current entries stay untouched.
    pub fn load(&mut self) -> Result<usize, CacheLoadError> {
        let cache_file = self.cache_file();
        if !cache_file.is_file() {
            return Err(CacheLoadError::Missing { path: cache_file });
        }
        let content = io::read_text(&cache_file).map_err(CacheLoadError::Read)?;
        let entries = parse_cache_content(&content)?;
        self.entries = entries;
        Ok(self.entries.len())
    }

    /// Re-derive the index from the files on disk and persist it.
    ///
    /// Files whose names do not decode to a logical path are skipped.
    pub fn rebuild(&mut self) -> wiki_fs::Result<usize> {
        let files = walk::list_files(self.root())?;
        tracing::info!(root = ?self.root(), files = files.len(), "Rebuilding repository cache");

        let mut entries = HashMap::with_capacity(files.len());
        for file in files {
            if self.is_skipped(&file) {
                continue;
            }
            let path = match self.codec.decode_canonical(&file) {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(file = ?file, error = %e, "Ignoring file with invalid name");
                    continue;
                }
            };
            if Self::is_reserved(&path) {
                continue;
            }
            let modified = match io::modified(&file) {
                Ok(modified) => Some(timestamp::from_system_time(modified)),
                Err(e) => {
                    tracing::warn!(file = ?file, error = %e, "File vanished during scan");
                    continue;
                }
            };
            entries.insert(path.clone(), FileRecord::new(path, modified));
        }

        self.entries = entries;
        self.persist_or_warn();
        Ok(self.entries.len())
    }

    /// Overwrite the cache file with the current entries.
    pub fn persist(&self) -> wiki_fs::Result<()> {
        io::write_atomic(
            &self.cache_file(),
            self.render_cache_content().as_bytes(),
            self.robustness,
        )
    }

    /// Cache file content for the current entries, sorted by path.
    ///
    /// TAB, CR, LF and the escape marker in a path are written as `%wxyz`
    /// escapes so every record stays on one line.
    pub fn render_cache_content(&self) -> String {
        let mut records: Vec<&FileRecord> = self.entries.values().collect();
        records.sort();

        let mut content = String::new();
        for record in records {
            for c in record.path().chars() {
                match c {
                    '\t' | '\n' | '\r' | ESCAPE_MARKER => {
                        content.push_str(&format!("{ESCAPE_MARKER}{:04x}", u32::from(c)));
                    }
                    _ => content.push(c),
                }
            }
            content.push('\t');
            if let Some(ts) = record.timestamp() {
                content.push_str(&timestamp::format_utc(&ts));
            }
            content.push('\n');
        }
        content
    }

    /// Insert or replace a record and persist.
    ///
    /// Returns `false` without changing anything for the reserved cache path.
    pub fn upsert(&mut self, record: FileRecord) -> bool {
        if Self::is_reserved(record.path()) {
            tracing::debug!(path = %record.path(), "Not indexing the cache file");
            return false;
        }
        self.entries.insert(record.path().to_string(), record);
        self.persist_or_warn();
        true
    }

    /// Remove a record and persist if it was present.
    pub fn remove(&mut self, path: &str) -> Option<FileRecord> {
        let removed = self.entries.remove(path)?;
        self.persist_or_warn();
        Some(removed)
    }

    /// A read-only root must not break the store, so failures are only logged.
    fn persist_or_warn(&self) {
        if let Err(e) = self.persist() {
            tracing::warn!(root = ?self.root(), error = %e, "Error writing cache file");
        }
    }
}

/// Parse cache file content into an entry map.
///
/// Empty lines are skipped. A line without TAB, with a relative path, a bad
/// escape or an unparsable timestamp rejects the whole content. Paths are
/// taken verbatim apart from their escapes, surrounding whitespace included.
/// Entries for the cache file itself are dropped.
pub fn parse_cache_content(content: &str) -> Result<HashMap<String, FileRecord>, CacheLoadError> {
    let mut entries = HashMap::new();
    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        if line.is_empty() {
            continue;
        }
        let parse_error = |reason: String| CacheLoadError::Parse {
            line: line_number,
            reason,
        };

        let (escaped, stamp) = line
            .split_once('\t')
            .ok_or_else(|| parse_error("missing TAB separator".to_string()))?;
        let path = unescape_physical(escaped).map_err(|e| parse_error(e.to_string()))?;
        if !path.starts_with('/') {
            return Err(parse_error(format!("path '{path}' is not absolute")));
        }
        let timestamp = if stamp.is_empty() {
            None
        } else {
            Some(
                timestamp::parse_utc(stamp)
                    .map_err(|e| parse_error(format!("invalid timestamp '{stamp}': {e}")))?,
            )
        };

        if CacheIndex::is_reserved(&path) {
            continue;
        }
        entries.insert(path.clone(), FileRecord::new(path, timestamp));
    }
    Ok(entries)
}
