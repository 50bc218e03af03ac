//! Cache-coherent file store for wiki repositories
//!
//! This crate turns a plain folder (optionally overlaid on a read-only
//! "shadow" folder) into the file store the wiki runs on:
//!
//! - **FileRecord**: logical path plus optional modification timestamp
//! - **CacheIndex**: per-root metadata index persisted as `/filelist.cache`
//! - **Overlay**: base/shadow resolution with base-wins merge semantics
//! - **RepositoryStore**: the thread-safe public contract used by the
//!   renderer, editor, search indexer and synchronization service
//!
//! # Architecture
//!
//! ```text
//!          renderer / editor / search / sync
//!                         |
//!                  RepositoryStore
//!                         |
//!                      Overlay
//!                    /         \
//!            CacheIndex     CacheIndex (shadow)
//!                    \         /
//!                wiki-fs (PathCodec, io, walk)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use wiki_store::{Layer, RepositoryConfig, RepositoryStore};
//!
//! fn example() -> wiki_store::Result<()> {
//!     let store = RepositoryStore::open(RepositoryConfig::new("/srv/wiki/repository"))?;
//!     store.write_text("/notes/todo.txt", "buy milk", Layer::Base)?;
//!     assert_eq!(store.read_text("/notes/todo.txt")?, "buy milk");
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod overlay;
pub mod query;
pub mod record;
pub mod store;
pub mod timestamp;

pub use cache::{CacheIndex, CacheLoadError};
pub use config::RepositoryConfig;
pub use error::{Error, Result};
pub use overlay::{Layer, Overlay};
pub use record::FileRecord;
pub use store::RepositoryStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_not_found_displays_path() {
        let error = Error::NotFound {
            path: "/notes/missing.txt".to_string(),
        };

        let display = format!("{}", error);
        assert!(
            display.contains("/notes/missing.txt"),
            "Error display should contain the path, got: {}",
            display
        );
    }

    #[test]
    fn store_is_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RepositoryStore>();
    }
}
