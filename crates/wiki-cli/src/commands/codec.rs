//! Path codec commands: encode, decode

use wiki_fs::{canonical_logical_path, escape_logical, unescape_physical};

use crate::error::Result;

/// Print the escaped, root-relative file name for a logical path.
pub fn run_encode(path: &str) -> Result<()> {
    let escaped = escape_logical(&canonical_logical_path(path));
    println!("{}", escaped.trim_start_matches('/'));
    Ok(())
}

/// Print the logical path for a root-relative file name.
pub fn run_decode(physical: &str) -> Result<()> {
    let normalized = physical.replace('\\', "/");
    let logical = unescape_physical(&canonical_logical_path(&normalized))?;
    println!("{logical}");
    Ok(())
}
