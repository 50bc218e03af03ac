//! Base/shadow layering
//!
//! A repository consists of a writable base root and an optional shadow
//! root. Both have their own [`CacheIndex`]; lookups consult the base first
//! and the merged listing lets the base entry win when a path exists in both.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cache::CacheIndex;
use crate::error::{Error, Result};
use crate::record::FileRecord;

/// Which root a write or delete is aimed at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    #[default]
    Base,
    Shadow,
}

impl Layer {
    pub fn from_prefer_shadow(prefer_shadow: bool) -> Self {
        if prefer_shadow { Self::Shadow } else { Self::Base }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Shadow => "shadow",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pair of indexes behind a repository.
#[derive(Debug)]
pub struct Overlay {
    base: CacheIndex,
    shadow: Option<CacheIndex>,
}

impl Overlay {
    pub fn new(base: CacheIndex, shadow: Option<CacheIndex>) -> Self {
        Self { base, shadow }
    }

    pub fn has_shadow(&self) -> bool {
        self.shadow.is_some()
    }

    pub fn index(&self, layer: Layer) -> Result<&CacheIndex> {
        match layer {
            Layer::Base => Ok(&self.base),
            Layer::Shadow => self.shadow.as_ref().ok_or(Error::ShadowUnavailable),
        }
    }

    pub fn index_mut(&mut self, layer: Layer) -> Result<&mut CacheIndex> {
        match layer {
            Layer::Base => Ok(&mut self.base),
            Layer::Shadow => self.shadow.as_mut().ok_or(Error::ShadowUnavailable),
        }
    }

    /// Physical location of `path` inside the given layer.
    pub fn resolve_path_for_io(&self, path: &str, layer: Layer) -> Result<PathBuf> {
        Ok(self.index(layer)?.codec().encode(path))
    }

    /// Indexed record for `path`, base first.
    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.base
            .get(path)
            .or_else(|| self.shadow.as_ref().and_then(|shadow| shadow.get(path)))
    }

    /// Union of both layers keyed by path; base records win.
    pub fn list_files(&self) -> Vec<FileRecord> {
        let mut merged: HashMap<&str, &FileRecord> = HashMap::new();
        if let Some(shadow) = &self.shadow {
            merged.extend(shadow.records().map(|r| (r.path(), r)));
        }
        merged.extend(self.base.records().map(|r| (r.path(), r)));
        merged.into_values().cloned().collect()
    }

    /// Find the physical file to read for `path`.
    ///
    /// Each layer is checked on disk: a file that exists but is not indexed
    /// gets indexed (discovered), an indexed file that is gone gets pruned.
    /// The base layer is tried before the shadow layer.
    pub fn locate_for_read(&mut self, path: &str) -> Option<(Layer, PathBuf)> {
        if let Some(physical) = Self::locate_in(&mut self.base, path) {
            return Some((Layer::Base, physical));
        }
        let shadow = self.shadow.as_mut()?;
        Self::locate_in(shadow, path).map(|physical| (Layer::Shadow, physical))
    }

    fn locate_in(index: &mut CacheIndex, path: &str) -> Option<PathBuf> {
        let physical = index.codec().encode(path);
        if index.is_skipped(&physical) {
            return None;
        }
        if physical.is_file() {
            if !index.contains(path) {
                tracing::info!(path, root = ?index.root(), "Discovered unindexed file");
                index.upsert(discovered_record(path, &physical));
            }
            Some(physical)
        } else {
            if index.remove(path).is_some() {
                tracing::info!(path, root = ?index.root(), "Pruned stale cache entry");
            }
            None
        }
    }

    /// Rescan both layers; returns the number of files in the merged view.
    pub fn rebuild(&mut self) -> wiki_fs::Result<usize> {
        self.base.rebuild()?;
        if let Some(shadow) = self.shadow.as_mut() {
            shadow.rebuild()?;
        }
        Ok(self.list_files().len())
    }
}

/// Record for a file found on disk but missing from the index.
///
/// An unreadable mtime leaves the record untimestamped.
fn discovered_record(path: &str, physical: &Path) -> FileRecord {
    let modified = match wiki_fs::io::modified(physical) {
        Ok(modified) => Some(crate::timestamp::from_system_time(modified)),
        Err(e) => {
            tracing::warn!(path, error = %e, "Indexing file without timestamp");
            None
        }
    };
    FileRecord::new(path, modified)
}
