//! LineaLens Configuration Management
//!
//! Provides configuration loading with support for:
//! - Global config: `~/.linealens/config.toml`
//! - Local config: `.linealens/config.toml` (in the working directory)
//! - CLI overrides via `ConfigOverrides`
//!
//! Configuration is merged in order: global → local → CLI overrides.

mod error;
mod loader;

pub use error::ConfigError;
pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};

/// Root configuration for LineaLens.
///
/// Represents the fully merged configuration from all sources.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LineageConfig {
    /// Warehouse profile the lineage is scoped to
    pub profile: ProfileConfig,

    /// Graph display behavior
    pub graph: GraphSettings,
}

/// The warehouse profile scope.
///
/// # Example TOML
///
/// ```toml
/// [profile]
/// database_name = "analytics"
/// schema_name = "public"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProfileConfig {
    /// Database the graph is scoped to (required)
    pub database_name: Option<String>,

    /// Optional schema narrowing the scope to an exact `database.schema`
    pub schema_name: Option<String>,
}

/// Graph display settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GraphSettings {
    /// Keep vertices with no edges in the graph
    pub show_isolated_nodes: bool,

    /// Use fully qualified `database.schema.table` identifiers instead of
    /// short table names
    pub full_table_names: bool,
}

/// CLI overrides applied on top of file configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub profile_database: Option<String>,
    pub profile_schema: Option<String>,
    pub show_isolated_nodes: Option<bool>,
    pub full_table_names: Option<bool>,
}

impl LineageConfig {
    /// Apply CLI overrides in place.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if overrides.profile_database.is_some() {
            self.profile.database_name = overrides.profile_database.clone();
        }
        if overrides.profile_schema.is_some() {
            self.profile.schema_name = overrides.profile_schema.clone();
        }
        if let Some(show_isolated_nodes) = overrides.show_isolated_nodes {
            self.graph.show_isolated_nodes = show_isolated_nodes;
        }
        if let Some(full_table_names) = overrides.full_table_names {
            self.graph.full_table_names = full_table_names;
        }
    }

    /// Validate the merged configuration.
    ///
    /// The profile database is the scoping anchor; nothing works without it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.profile.database_name.as_deref() {
            None | Some("") => Err(ConfigError::ValidationError(
                "profile.database_name is required, set it in the config file or pass \
                 --profile-database"
                    .to_string(),
            )),
            Some(_) => Ok(()),
        }
    }

    /// The validated profile database name.
    pub fn profile_database(&self) -> Result<&str, ConfigError> {
        self.validate()?;
        Ok(self.profile.database_name.as_deref().unwrap_or_default())
    }
}
