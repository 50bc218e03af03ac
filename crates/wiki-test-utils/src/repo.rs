//! [`TestRepository`] builder for base/shadow repository scenarios.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

/// Name of the cache file inside each root.
pub const CACHE_FILE_NAME: &str = "filelist.cache";

/// A temporary base root, optionally paired with a shadow root.
///
/// Paths passed to the helpers are relative to the respective root and use
/// `/` as separator; they are written verbatim, without escaping.
///
/// # Example
///
/// ```rust,no_run
/// use wiki_test_utils::TestRepository;
///
/// let repo = TestRepository::new().with_shadow();
/// repo.write_base("A", "X");
/// repo.write_shadow("B", "Z");
/// repo.assert_base_file_exists("A");
/// ```
pub struct TestRepository {
    temp_dir: TempDir,
    shadow: bool,
}

impl Default for TestRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepository {
    /// Create an empty base root.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("base")).unwrap();
        Self {
            temp_dir,
            shadow: false,
        }
    }

    /// Add an empty shadow root next to the base root.
    pub fn with_shadow(mut self) -> Self {
        fs::create_dir_all(self.temp_dir.path().join("shadow")).unwrap();
        self.shadow = true;
        self
    }

    /// The temporary folder holding both roots.
    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn base_root(&self) -> PathBuf {
        self.temp_dir.path().join("base")
    }

    /// # Panics
    /// Panics if [`with_shadow`](Self::with_shadow) was not called.
    pub fn shadow_root(&self) -> PathBuf {
        assert!(self.shadow, "TestRepository: no shadow root configured");
        self.temp_dir.path().join("shadow")
    }

    pub fn write_base(&self, path: &str, content: &str) -> PathBuf {
        write_below(&self.base_root(), path, content.as_bytes())
    }

    pub fn write_shadow(&self, path: &str, content: &str) -> PathBuf {
        write_below(&self.shadow_root(), path, content.as_bytes())
    }

    /// Write a base file and set its mtime to `millis` since the epoch.
    pub fn write_base_at(&self, path: &str, content: &str, millis: u64) -> PathBuf {
        let file = self.write_base(path, content);
        set_mtime_millis(&file, millis);
        file
    }

    /// Replace the base root's cache file.
    pub fn write_base_cache(&self, content: &str) {
        fs::write(self.base_root().join(CACHE_FILE_NAME), content).unwrap();
    }

    /// Content of the base root's cache file.
    ///
    /// # Panics
    /// Panics if the cache file does not exist.
    pub fn read_base_cache(&self) -> String {
        let path = self.base_root().join(CACHE_FILE_NAME);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("cache file {} not readable: {e}", path.display()))
    }

    pub fn read_shadow_cache(&self) -> String {
        let path = self.shadow_root().join(CACHE_FILE_NAME);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("cache file {} not readable: {e}", path.display()))
    }

    /// Assert that `path` (relative to the base root) exists.
    pub fn assert_base_file_exists(&self, path: &str) {
        let full_path = self.base_root().join(path);
        assert!(
            full_path.exists(),
            "Expected base file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the base root) does not exist.
    pub fn assert_base_file_missing(&self, path: &str) {
        let full_path = self.base_root().join(path);
        assert!(
            !full_path.exists(),
            "Expected base file to be absent: {}",
            full_path.display()
        );
    }

    /// Assert that the base file at `path` contains exactly `expected`.
    pub fn assert_base_content(&self, path: &str, expected: &str) {
        let full_path = self.base_root().join(path);
        let content = fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {e}", full_path.display()));
        assert_eq!(content, expected, "Unexpected content in {}", full_path.display());
    }
}

fn write_below(root: &Path, path: &str, content: &[u8]) -> PathBuf {
    let full_path = root.join(path.trim_start_matches('/'));
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&full_path, content).unwrap();
    full_path
}

/// Set the mtime of an existing file to `millis` since the epoch.
pub fn set_mtime_millis(path: &Path, millis: u64) {
    let file = File::options()
        .write(true)
        .open(path)
        .unwrap_or_else(|e| panic!("Failed to open {}: {e}", path.display()));
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_millis(millis))
        .unwrap_or_else(|e| panic!("Failed to set mtime of {}: {e}", path.display()));
}

/// mtime of `path` in milliseconds since the epoch.
pub fn mtime_millis(path: &Path) -> u64 {
    let modified = fs::metadata(path).and_then(|m| m.modified()).unwrap();
    modified
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_roots_and_files() {
        let repo = TestRepository::new().with_shadow();
        repo.write_base("notes/a.txt", "X");
        repo.write_shadow("/b.txt", "Z");

        repo.assert_base_content("notes/a.txt", "X");
        assert!(repo.shadow_root().join("b.txt").is_file());
    }

    #[test]
    fn mtime_is_controllable() {
        let repo = TestRepository::new();
        let file = repo.write_base_at("old.txt", "x", 1_577_836_800_000);
        assert_eq!(mtime_millis(&file), 1_577_836_800_000);
    }

    #[test]
    #[should_panic(expected = "no shadow root")]
    fn shadow_requires_opt_in() {
        TestRepository::new().shadow_root();
    }
}
