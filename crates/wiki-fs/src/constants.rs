//! Constants shared by the path codec and the cache index.

/// Logical path of the per-root file list cache.
///
/// Line format: logical path, TAB, UTC timestamp `yyyy-MM-ddTHH:mm:ss.SSSZ`
/// (empty when unknown). TAB, CR, LF and `%` in the path are `%wxyz` escaped.
pub const CACHE_FILE_PATH: &str = "/filelist.cache";

/// Marker that introduces a `%wxyz` escape in physical file names and in
/// cache file paths.
pub const ESCAPE_MARKER: char = '%';

/// Characters that are never written verbatim into a physical file name.
///
/// Covers the characters Windows rejects plus the escape marker itself.
pub const RESERVED_CHARS: &[char] = &['"', '%', '*', ':', '<', '>', '?', '\\', '|'];

/// Logical path separator, independent of the host OS.
pub const LOGICAL_SEPARATOR: char = '/';
