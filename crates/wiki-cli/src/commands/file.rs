//! Single-file commands: cat, put, rm

use std::io::{Read, Write};
use std::path::Path;

use colored::Colorize;
use wiki_store::{FileRecord, Layer, RepositoryStore};

use super::parse_timestamp;
use crate::error::{CliError, Result};

/// Run the cat command
pub fn run_cat(store: &RepositoryStore, path: &str) -> Result<()> {
    let content = store.read_binary(path)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&content)?;
    stdout.flush()?;
    Ok(())
}

/// Run the put command
pub fn run_put(
    store: &RepositoryStore,
    path: &str,
    from: Option<&Path>,
    shadow: bool,
    timestamp: Option<&str>,
) -> Result<()> {
    let timestamp = timestamp.map(parse_timestamp).transpose()?;
    let content = match from {
        Some(file) => std::fs::read(file).map_err(|e| {
            CliError::user(format!("Cannot read {}: {e}", file.display()))
        })?,
        None => {
            let mut buffer = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buffer)?;
            buffer
        }
    };

    let layer = Layer::from_prefer_shadow(shadow);
    let record = store.write_binary(path, &content, timestamp, layer)?;
    println!(
        "{} {} ({} bytes, {})",
        "Wrote".green().bold(),
        record.path(),
        content.len(),
        layer
    );
    Ok(())
}

/// Run the rm command
pub fn run_rm(store: &RepositoryStore, path: &str, shadow: bool) -> Result<()> {
    let record = store
        .get_file(path)
        .unwrap_or_else(|| FileRecord::untimestamped(wiki_fs::canonical_logical_path(path)));
    let layer = Layer::from_prefer_shadow(shadow);
    store.delete_file(&record, layer)?;
    println!("{} {} ({})", "Deleted".green().bold(), record.path(), layer);
    Ok(())
}
