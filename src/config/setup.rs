//! Interactive setup wizard for first-time configuration

use super::AppConfig;
use config::ConfigError;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::PathBuf;

/// Interactive first-time setup - prompts for store name and location
///
/// 1. Prompts for a store name (default: "default")
/// 2. Prompts for the store location (default: system data directory)
/// 3. Saves the configuration with that store as the default
///
/// # Errors
///
/// Returns `ConfigError` if the data directory cannot be determined, input
/// cannot be read, or the configuration cannot be saved.
pub fn first_time_setup() -> Result<AppConfig, ConfigError> {
    println!("Welcome to tagnarrow! Let's set up your first record store.\n");

    let data_dir = AppConfig::data_dir()?;

    let db_name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Store name")
        .default("default".to_string())
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let default_path = data_dir.join(&db_name);
    let db_path_str: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Store location")
        .default(default_path.to_string_lossy().to_string())
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let mut config = AppConfig::default();
    config.add_database(db_name, PathBuf::from(db_path_str));
    config.save()?;

    println!("\nConfiguration saved successfully!");
    Ok(config)
}
