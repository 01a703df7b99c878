//! Db command - manage named stores in the configuration

use crate::{TagnarrowError, cli::DbCommands, config::AppConfig};
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, TagnarrowError>;

/// Execute a store management command and save the configuration
///
/// # Errors
///
/// Returns `TagnarrowError` if the operation is invalid (duplicate name,
/// unknown store), the configuration cannot be saved, or filesystem
/// operations fail.
pub fn execute(config: &mut AppConfig, command: &DbCommands, quiet: bool) -> Result<()> {
    apply(config, command, quiet)?;
    if !matches!(command, DbCommands::List) {
        config.save()?;
    }
    Ok(())
}

/// Apply a store management command to `config` without saving it
///
/// # Errors
///
/// Returns `TagnarrowError` if the operation is invalid or filesystem
/// operations fail.
pub fn apply(config: &mut AppConfig, command: &DbCommands, quiet: bool) -> Result<()> {
    match command {
        DbCommands::Add { name, path } => {
            if config.get_database(name).is_some() {
                return Err(TagnarrowError::InvalidInput(format!("Database '{name}' already exists")));
            }

            let resolved_path = resolve_path(path)?;
            if !resolved_path.exists() {
                std::fs::create_dir_all(&resolved_path)?;
            }

            let first = config.databases.is_empty();
            config.add_database(name.clone(), resolved_path.clone());

            if !quiet {
                println!("Database '{name}' added at {}", resolved_path.display());
                if first {
                    println!("Set '{name}' as default database");
                }
            }
        }
        DbCommands::List => {
            if config.databases.is_empty() {
                if !quiet {
                    println!("No databases configured.");
                    println!("Add one with: tagnarrow db add <name> <path>");
                }
                return Ok(());
            }

            if !quiet {
                println!("Configured databases:");
            }
            let default_db = config.get_default_database();
            for name in config.list_databases() {
                if let Some(path) = config.get_database(name) {
                    if quiet {
                        println!("{name}");
                    } else {
                        let marker = if default_db == Some(name) { " (default)" } else { "" };
                        println!("  {name} -> {}{marker}", path.display());
                    }
                }
            }
        }
        DbCommands::Remove { name, delete_files } => {
            let was_default = config.get_default_database() == Some(name);
            let path = config
                .remove_database(name)
                .ok_or_else(|| TagnarrowError::InvalidInput(format!("Database '{name}' does not exist")))?;

            if !quiet {
                println!("Database '{name}' removed from configuration");
                if was_default {
                    println!("Warning: Removed the default database. Set a new one with 'tagnarrow db set-default'.");
                }
            }

            if *delete_files {
                if path.exists() {
                    std::fs::remove_dir_all(&path)?;
                    if !quiet {
                        println!("Database files deleted from {}", path.display());
                    }
                }
            } else if !quiet {
                println!("Note: Database files at {} were NOT deleted", path.display());
            }
        }
        DbCommands::SetDefault { name } => {
            config.set_default_database(name)?;
            if !quiet {
                println!("Set '{name}' as default database");
            }
        }
    }
    Ok(())
}

/// A bare name lands in the data directory; anything else is used as given
fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.components().count() == 1 && !path.is_absolute() {
        Ok(AppConfig::data_dir()?.join(path))
    } else {
        Ok(path.to_path_buf())
    }
}
