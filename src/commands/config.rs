//! Config command - read and write scalar settings

use crate::{TagnarrowError, cli::ConfigCommands, config::AppConfig};

type Result<T> = std::result::Result<T, TagnarrowError>;

/// Execute a config command, saving after `set`
///
/// # Errors
///
/// Returns `TagnarrowError` if the key is unknown, the value does not parse,
/// or the configuration cannot be saved.
pub fn execute(config: &mut AppConfig, command: &ConfigCommands, quiet: bool) -> Result<()> {
    if let Some(message) = apply(config, command)? {
        config.save()?;
        if !quiet {
            println!("{message}");
        }
    }
    Ok(())
}

/// Apply a config command in memory
///
/// Returns a confirmation message when a value changed.
///
/// # Errors
///
/// Returns `TagnarrowError` if the key is unknown or the value does not parse.
pub fn apply(config: &mut AppConfig, command: &ConfigCommands) -> Result<Option<String>> {
    match command {
        ConfigCommands::Set { setting } => {
            let (key, value) = setting.split_once('=').ok_or_else(|| {
                TagnarrowError::InvalidInput("Invalid format. Use: tagnarrow config set key=value".into())
            })?;
            let (key, value) = (key.trim(), value.trim());
            config.set_value(key, value)?;
            Ok(Some(format!("Set {key} = {}", config.get_value(key)?)))
        }
        ConfigCommands::Get { key } => {
            println!("{}", config.get_value(key)?);
            Ok(None)
        }
    }
}
