//! Recursive listing of the files below a repository root

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{Error, Result};

/// List every regular file below `root`, sorted by path.
///
/// Symlinks to files are listed; symlinked folders are not descended into,
/// so a link cycle cannot make the walk loop. A missing root yields an empty
/// list. Entries that vanish or cannot be read while walking are skipped
/// with a warning; only a failure to read `root` itself is an error.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !root.is_dir() {
        return Ok(files);
    }

    for entry in WalkDir::new(root).follow_links(false).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(Error::io(root, e.into())),
            Err(e) => {
                tracing::warn!(path = ?e.path(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}
