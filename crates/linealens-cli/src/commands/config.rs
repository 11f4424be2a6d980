//! Config command - view configuration

use anyhow::{Context, Result};
use clap::Subcommand;
use linealens_config::ConfigLoader;

use super::load_config;
use crate::GlobalOptions;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the merged configuration
    Show,

    /// Show configuration file locations
    Path,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, global: GlobalOptions) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let config = load_config(&global)?;
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render configuration")?;
            println!("{rendered}");
            Ok(())
        }
        ConfigCommand::Path => {
            let loader = ConfigLoader::new();
            match loader.global_config_path() {
                Some(path) => println!("global: {}", path.display()),
                None => println!("global: (no home directory)"),
            }
            let working_dir =
                std::env::current_dir().context("Failed to determine working directory")?;
            println!("local:  {}", loader.local_config_path(&working_dir).display());
            Ok(())
        }
    }
}
