//! Filesystem layer for the wiki repository
//!
//! Provides the reversible logical/physical path codec, atomic I/O,
//! recursive directory listing and format-agnostic config loading.

pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod walk;

pub use codec::{PathCodec, canonical_logical_path, escape_logical, unescape_physical};
pub use config::ConfigStore;
pub use constants::{CACHE_FILE_PATH, ESCAPE_MARKER, RESERVED_CHARS};
pub use error::{Error, Result};
pub use io::RobustnessConfig;
