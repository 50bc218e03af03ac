//! Listing commands: list, recent, changed

use colored::Colorize;
use regex::Regex;
use wiki_store::timestamp;
use wiki_store::{FileRecord, RepositoryStore};

use super::parse_timestamp;
use crate::error::Result;

fn print_records(records: &[FileRecord]) {
    for record in records {
        let stamp = record
            .timestamp()
            .map(|ts| timestamp::format_utc(&ts))
            .unwrap_or_else(|| "-".repeat(24));
        println!("{}  {}", stamp.dimmed(), record.path());
    }
}

fn print_json(records: &[FileRecord]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

/// Run the list command
pub fn run_list(store: &RepositoryStore, json: bool) -> Result<()> {
    let mut records: Vec<FileRecord> = store.list_files().into_iter().collect();
    records.sort();

    if json {
        return print_json(&records);
    }
    print_records(&records);
    eprintln!("{} {} files", "Total:".dimmed(), records.len());
    Ok(())
}

/// Run the recent command
pub fn run_recent(store: &RepositoryStore, count: usize, pattern: Option<&str>) -> Result<()> {
    let pattern = pattern.map(Regex::new).transpose()?;
    let records = store.last_modified_files(count, |record| {
        pattern
            .as_ref()
            .is_none_or(|pattern| pattern.is_match(record.path()))
    });
    print_records(&records);
    Ok(())
}

/// Run the changed command
pub fn run_changed(store: &RepositoryStore, since: Option<&str>, json: bool) -> Result<()> {
    let threshold = since.map(parse_timestamp).transpose()?;
    let mut records: Vec<FileRecord> = store.files_modified_after(threshold).into_iter().collect();
    records.sort();

    if json {
        return print_json(&records);
    }
    print_records(&records);
    Ok(())
}
