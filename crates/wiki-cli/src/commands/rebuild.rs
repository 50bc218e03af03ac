//! Rebuild command implementation

use colored::Colorize;
use wiki_store::RepositoryStore;

use crate::error::Result;

/// Run the rebuild command
pub fn run_rebuild(store: &RepositoryStore) -> Result<()> {
    let count = store.rebuild_cache()?;
    println!("{} {} files indexed", "Rebuilt:".green().bold(), count);
    println!("{}:   {}", "Base".dimmed(), store.base_root().display());
    if let Some(shadow) = store.shadow_root() {
        println!("{}: {}", "Shadow".dimmed(), shadow.display());
    }
    Ok(())
}
