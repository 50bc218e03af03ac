//! Which repository a command works on

use std::path::PathBuf;

use wiki_store::{RepositoryConfig, RepositoryStore};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// `<config dir>/wikirepo/config.toml`, if the platform has a config dir.
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wikirepo").join("config.toml"))
}

/// Build the repository configuration from the command line.
///
/// An explicit `--config` file is loaded first and `--base` / `--shadow`
/// override its roots. Without `--config`, `--base` alone is enough;
/// otherwise the per-user default config file is used.
pub fn resolve_config(cli: &Cli) -> Result<RepositoryConfig> {
    let mut config = match (&cli.config, &cli.base) {
        (Some(file), _) => RepositoryConfig::from_file(file)?,
        (None, Some(base)) => RepositoryConfig::new(base),
        (None, None) => {
            let file = default_config_file()
                .filter(|file| file.is_file())
                .ok_or_else(|| {
                    CliError::user("No repository given. Use --base DIR or --config FILE.")
                })?;
            tracing::debug!(config = ?file, "Using default configuration file");
            RepositoryConfig::from_file(&file)?
        }
    };

    if let Some(base) = &cli.base {
        config.base_root = base.clone();
    }
    if let Some(shadow) = &cli.shadow {
        config.shadow_root = Some(shadow.clone());
    }
    Ok(config)
}

pub fn open_store(cli: &Cli) -> Result<RepositoryStore> {
    let config = resolve_config(cli)?;
    Ok(RepositoryStore::open(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn base_flag_alone_is_enough() {
        let cli = Cli::parse_from(["wikirepo", "--base", "/srv/wiki", "rebuild"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.base_root, PathBuf::from("/srv/wiki"));
        assert_eq!(config.shadow_root, None);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("wiki.toml");
        std::fs::write(
            &file,
            "base_root = \"repo\"\nshadow_root = \"shadow\"\nscan_on_startup = false\n",
        )
        .unwrap();
        let file_arg = file.to_string_lossy().to_string();

        let cli = Cli::parse_from(["wikirepo", "--config", &file_arg, "--shadow", "/elsewhere", "list"]);
        let config = resolve_config(&cli).unwrap();

        assert_eq!(config.base_root, dir.path().join("repo"));
        assert_eq!(config.shadow_root, Some(PathBuf::from("/elsewhere")));
        assert!(!config.scan_on_startup);
    }
}
