//! Reversible mapping between logical repository paths and physical paths
//!
//! Logical paths are `/`-separated and may contain arbitrary Unicode.
//! Physical paths live below a repository root and only ever contain
//! characters that are safe on every supported filesystem. Anything else is
//! written as a `%wxyz` escape, where `wxyz` is a UTF-16 code unit in hex.

use std::path::{Component, Path, PathBuf};

use crate::constants::{ESCAPE_MARKER, LOGICAL_SEPARATOR, RESERVED_CHARS};
use crate::{Error, Result};

/// Bring a logical path into canonical form.
///
/// The result always starts with `/`, never contains `//` and has no
/// trailing separator (except for the root `/` itself). The codec is
/// injective over canonical paths.
pub fn canonical_logical_path(path: &str) -> String {
    let mut canonical = String::with_capacity(path.len() + 1);
    canonical.push(LOGICAL_SEPARATOR);
    for c in path.chars() {
        if c == LOGICAL_SEPARATOR && canonical.ends_with(LOGICAL_SEPARATOR) {
            continue;
        }
        canonical.push(c);
    }
    if canonical.len() > 1 && canonical.ends_with(LOGICAL_SEPARATOR) {
        canonical.pop();
    }
    canonical
}

/// Escape every character of a logical path that must not reach the
/// filesystem verbatim. Separators are kept.
pub fn escape_logical(logical: &str) -> String {
    let mut escaped = String::with_capacity(logical.len());
    for (index, segment) in logical.split(LOGICAL_SEPARATOR).enumerate() {
        if index > 0 {
            escaped.push(LOGICAL_SEPARATOR);
        }
        let dot_segment = segment == "." || segment == "..";
        for c in segment.chars() {
            if needs_escape(c) || (dot_segment && c == '.') {
                push_escaped(&mut escaped, c);
            } else {
                escaped.push(c);
            }
        }
    }
    escaped
}

/// Reverse [`escape_logical`].
///
/// Fails on a `%` that is not followed by exactly four hex digits and on
/// surrogate escapes that do not form a valid pair.
pub fn unescape_physical(escaped: &str) -> Result<String> {
    let mut logical = String::with_capacity(escaped.len());
    let mut pending_high: Option<(u16, usize)> = None;
    let mut chars = escaped.char_indices();

    while let Some((offset, c)) = chars.next() {
        if c != ESCAPE_MARKER {
            if let Some((_, at)) = pending_high {
                return Err(unpaired(escaped, at));
            }
            logical.push(c);
            continue;
        }

        let hex: String = chars.by_ref().take(4).map(|(_, h)| h).collect();
        if hex.len() != 4 || !hex.chars().all(|h| h.is_ascii_hexdigit()) {
            return Err(invalid_escape(escaped, offset));
        }
        let unit = u16::from_str_radix(&hex, 16).map_err(|_| invalid_escape(escaped, offset))?;

        match (pending_high.take(), unit) {
            (None, 0xD800..=0xDBFF) => pending_high = Some((unit, offset)),
            (None, 0xDC00..=0xDFFF) => return Err(unpaired(escaped, offset)),
            (None, _) => {
                let decoded = char::from_u32(u32::from(unit))
                    .ok_or_else(|| invalid_escape(escaped, offset))?;
                logical.push(decoded);
            }
            (Some((high, _)), 0xDC00..=0xDFFF) => {
                let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                let decoded = char::from_u32(code).ok_or_else(|| unpaired(escaped, offset))?;
                logical.push(decoded);
            }
            (Some((_, at)), _) => return Err(unpaired(escaped, at)),
        }
    }

    if let Some((_, at)) = pending_high {
        return Err(unpaired(escaped, at));
    }
    Ok(logical)
}

fn needs_escape(c: char) -> bool {
    let code = u32::from(c);
    code < 32 || code > 255 || RESERVED_CHARS.contains(&c)
}

fn push_escaped(out: &mut String, c: char) {
    let mut units = [0u16; 2];
    for unit in c.encode_utf16(&mut units) {
        out.push(ESCAPE_MARKER);
        out.push_str(&format!("{:04x}", unit));
    }
}

fn invalid_escape(path: &str, offset: usize) -> Error {
    Error::InvalidEscape {
        path: path.to_string(),
        offset,
    }
}

fn unpaired(path: &str, offset: usize) -> Error {
    Error::UnpairedSurrogate {
        path: path.to_string(),
        offset,
    }
}

/// Path codec bound to one repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCodec {
    root: PathBuf,
}

impl PathCodec {
    /// Create a codec for the given root directory.
    ///
    /// The root is used as-is; callers should pass a canonical absolute path
    /// so that paths produced by walking the root decode cleanly.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The repository root this codec maps into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a logical path to its physical location below the root.
    ///
    /// Pure: never touches the filesystem. `.` and `..` segments are escaped,
    /// so the result never leaves the root.
    pub fn encode(&self, logical: &str) -> PathBuf {
        let escaped = escape_logical(logical);
        let mut physical = self.root.clone();
        for segment in escaped.split(LOGICAL_SEPARATOR).filter(|s| !s.is_empty()) {
            physical.push(segment);
        }
        physical
    }

    /// Map a physical path back to its logical path.
    pub fn decode(&self, physical: &Path) -> Result<String> {
        let escaped = self.relative_escaped(physical)?;
        unescape_physical(&escaped)
    }

    /// Like [`decode`](Self::decode), but also rejects file names that
    /// [`encode`](Self::encode) would never produce, e.g. `a:b` or `%002A`.
    ///
    /// Every path accepted here can be addressed again through `encode`.
    pub fn decode_canonical(&self, physical: &Path) -> Result<String> {
        let escaped = self.relative_escaped(physical)?;
        let logical = unescape_physical(&escaped)?;
        if escape_logical(&logical) != escaped || canonical_logical_path(&logical) != logical {
            return Err(Error::NonCanonical {
                path: physical.to_path_buf(),
                logical,
            });
        }
        Ok(logical)
    }

    /// The still-escaped, `/`-separated part of `physical` below the root.
    fn relative_escaped(&self, physical: &Path) -> Result<String> {
        let outside = || Error::OutsideRoot {
            path: physical.to_path_buf(),
            root: self.root.clone(),
        };
        let relative = physical.strip_prefix(&self.root).map_err(|_| outside())?;

        let mut escaped = String::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => {
                    let name = name.to_str().ok_or_else(|| Error::NonUtf8Name {
                        path: physical.to_path_buf(),
                    })?;
                    escaped.push(LOGICAL_SEPARATOR);
                    escaped.push_str(name);
                }
                Component::CurDir => {}
                _ => return Err(outside()),
            }
        }
        if escaped.is_empty() {
            escaped.push(LOGICAL_SEPARATOR);
        }
        Ok(escaped)
    }
}
