//! Access to the repository trees under `test-fixtures/repos`.
//!
//! Fixtures are never used in place: tests get a private copy, so writes,
//! deletes and rebuilt cache files cannot leak into the checked-in tree.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Folder holding the fixture repositories.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/repos")
}

/// Copy fixture `name` into a fresh temporary folder.
///
/// The copy lives at `<tempdir>/<name>` so several fixtures can share one
/// temporary folder via [`copy_fixture_into`].
///
/// # Panics
/// Panics if the fixture does not exist or cannot be copied.
pub fn copy_fixture(name: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap_or_else(|e| panic!("copy_fixture: no temp dir: {e}"));
    let root = copy_fixture_into(name, temp.path());
    (temp, root)
}

/// Copy fixture `name` to `<target>/<name>` and return that path.
pub fn copy_fixture_into(name: &str, target: &Path) -> PathBuf {
    let source = fixtures_dir().join(name);
    assert!(
        source.is_dir(),
        "copy_fixture: fixture '{name}' not found at {}",
        source.display()
    );
    let destination = target.join(name);
    copy_tree(&source, &destination);
    destination
}

fn copy_tree(source: &Path, destination: &Path) {
    fs::create_dir_all(destination)
        .unwrap_or_else(|e| panic!("copy_tree: failed to create {}: {e}", destination.display()));
    let entries = fs::read_dir(source)
        .unwrap_or_else(|e| panic!("copy_tree: failed to read {}: {e}", source.display()));
    for entry in entries {
        let entry = entry.unwrap_or_else(|e| panic!("copy_tree: bad entry: {e}"));
        let target = destination.join(entry.file_name());
        if entry.path().is_dir() {
            copy_tree(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).unwrap_or_else(|e| {
                panic!("copy_tree: failed to copy {}: {e}", entry.path().display())
            });
        }
    }
}
