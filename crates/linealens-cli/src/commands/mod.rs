//! CLI command implementations

pub mod config;
pub mod graph;

use anyhow::{Context, Result};
use linealens_config::{ConfigLoader, LineageConfig};

use crate::GlobalOptions;

/// Load and merge configuration for a command.
///
/// Validation is left to the commands that need a complete profile, so that
/// `config show` can display a partial configuration.
pub fn load_config(global: &GlobalOptions) -> Result<LineageConfig> {
    let working_dir =
        std::env::current_dir().context("Failed to determine working directory")?;
    let loader = ConfigLoader::new();
    let config = loader
        .load(
            &working_dir,
            global.config.as_deref(),
            Some(&global.to_config_overrides()),
        )
        .context("Failed to load configuration")?;
    Ok(config)
}
