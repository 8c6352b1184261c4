//! Configuration management commands

use anyhow::{Context, Result};
use sharpsyn_core::config::CONFIG_FILE_NAMES;
use sharpsyn_core::{ConfigLoader, ProjectConfig, SharpsynError};
use std::path::PathBuf;
use tracing::debug;

use crate::GlobalOptions;

/// Config init command implementation
pub fn init_command(dir: Option<PathBuf>, force: bool) -> Result<bool> {
    let dir = dir.unwrap_or_else(|| PathBuf::from("."));
    let config_path = dir.join(CONFIG_FILE_NAMES[0]);
    debug!("Initializing configuration file at {}", config_path.display());

    // Check if file already exists
    if config_path.exists() && !force {
        return Err(SharpsynError::config_error(format!(
            "Configuration file '{}' already exists. Use --force to overwrite.",
            config_path.display()
        ))
        .into());
    }

    std::fs::write(&config_path, ProjectConfig::default_toml())
        .map_err(|e| SharpsynError::io_error(&config_path, e))?;

    println!("Created configuration file: {}", config_path.display());
    Ok(true)
}

/// Config show command implementation
pub fn show_command(global: &GlobalOptions, dir: Option<PathBuf>) -> Result<bool> {
    let dir = dir.unwrap_or_else(|| PathBuf::from("."));
    let config = ConfigLoader::load(global.config.as_deref(), Some(dir.as_path()))?;
    let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("{json}");
    Ok(true)
}
