//! Configuration loader with inheritance support.
//!
//! Loads configuration from multiple sources and merges them:
//! 1. Global config: `~/.linealens/config.toml`
//! 2. Local config: `.linealens/config.toml` (working directory)
//! 3. CLI overrides
//!
//! Later sources override earlier ones. An explicit config file path
//! replaces the global/local search entirely.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::{ConfigOverrides, GraphSettings, LineageConfig, ProfileConfig};

/// Configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration directory name, both global (under the home directory) and
/// local (under the working directory).
const CONFIG_DIR: &str = ".linealens";

/// Configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Global config directory (e.g., `~/.linealens`)
    global_config_dir: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    ///
    /// Automatically detects the global config directory (`~/.linealens`).
    pub fn new() -> Self {
        Self {
            global_config_dir: dirs::home_dir().map(|home| home.join(CONFIG_DIR)),
        }
    }

    /// Create a loader with a custom global config directory.
    ///
    /// Useful for testing.
    pub fn with_global_dir(global_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_config_dir: Some(global_dir.into()),
        }
    }

    /// Get the global config file path.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.global_config_dir
            .as_ref()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Get the local config file path for a working directory.
    pub fn local_config_path(&self, working_dir: &Path) -> PathBuf {
        working_dir.join(CONFIG_DIR).join(CONFIG_FILE_NAME)
    }

    /// Load configuration with optional CLI overrides.
    ///
    /// When `explicit` is given, only that file is read; otherwise global
    /// and local configs are merged in order. Overrides apply last.
    pub fn load(
        &self,
        working_dir: &Path,
        explicit: Option<&Path>,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<LineageConfig, ConfigError> {
        let mut config = if let Some(path) = explicit {
            debug!("Loading config from explicit path {:?}", path);
            load_config_file(path)?
        } else {
            let mut config = LineageConfig::default();
            if let Some(global_config) = self.load_global()? {
                config = merge_configs(config, global_config);
            }
            if let Some(local_config) = self.load_local(working_dir)? {
                config = merge_configs(config, local_config);
            }
            config
        };

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
        }

        Ok(config)
    }

    /// Load only the global configuration.
    pub fn load_global(&self) -> Result<Option<LineageConfig>, ConfigError> {
        let Some(global_path) = self.global_config_path() else {
            debug!("No home directory found, skipping global config");
            return Ok(None);
        };

        if !global_path.exists() {
            trace!("Global config not found at {:?}", global_path);
            return Ok(None);
        }

        debug!("Loading global config from {:?}", global_path);
        load_config_file(&global_path).map(Some)
    }

    /// Load only the local configuration for a working directory.
    pub fn load_local(&self, working_dir: &Path) -> Result<Option<LineageConfig>, ConfigError> {
        let local_path = self.local_config_path(working_dir);

        if !local_path.exists() {
            trace!("Local config not found at {:?}", local_path);
            return Ok(None);
        }

        debug!("Loading local config from {:?}", local_path);
        load_config_file(&local_path).map(Some)
    }
}

/// Load a configuration file from disk.
fn load_config_file(path: &Path) -> Result<LineageConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    toml::from_str(&content).map_err(|e| ConfigError::parse_toml(path, e))
}

/// Merge two configurations, with `overlay` taking precedence.
///
/// This performs a field-by-field merge, allowing partial configs. A display
/// flag enabled in either layer stays enabled.
fn merge_configs(base: LineageConfig, overlay: LineageConfig) -> LineageConfig {
    LineageConfig {
        profile: ProfileConfig {
            database_name: overlay.profile.database_name.or(base.profile.database_name),
            schema_name: overlay.profile.schema_name.or(base.profile.schema_name),
        },
        graph: GraphSettings {
            show_isolated_nodes: overlay.graph.show_isolated_nodes
                || base.graph.show_isolated_nodes,
            full_table_names: overlay.graph.full_table_names || base.graph.full_table_names,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) {
        let config_dir = dir.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join(CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_missing_configs_yield_defaults() {
        let global = TempDir::new().unwrap();
        let local = TempDir::new().unwrap();
        let loader = ConfigLoader::with_global_dir(global.path().join(CONFIG_DIR));

        let config = loader.load(local.path(), None, None).unwrap();
        assert_eq!(config, LineageConfig::default());
    }

    #[test]
    fn test_local_overrides_global() {
        let global = TempDir::new().unwrap();
        let local = TempDir::new().unwrap();
        write_config(
            global.path(),
            "[profile]\ndatabase_name = \"global_db\"\nschema_name = \"global_schema\"\n",
        );
        write_config(local.path(), "[profile]\ndatabase_name = \"local_db\"\n");

        let loader = ConfigLoader::with_global_dir(global.path().join(CONFIG_DIR));
        let config = loader.load(local.path(), None, None).unwrap();

        assert_eq!(config.profile.database_name.as_deref(), Some("local_db"));
        // Fields the local config leaves out fall back to the global one.
        assert_eq!(
            config.profile.schema_name.as_deref(),
            Some("global_schema")
        );
    }

    #[test]
    fn test_cli_overrides_apply_last() {
        let global = TempDir::new().unwrap();
        let local = TempDir::new().unwrap();
        write_config(local.path(), "[profile]\ndatabase_name = \"local_db\"\n");

        let loader = ConfigLoader::with_global_dir(global.path().join(CONFIG_DIR));
        let overrides = ConfigOverrides {
            profile_database: Some("cli_db".to_string()),
            full_table_names: Some(true),
            ..Default::default()
        };
        let config = loader.load(local.path(), None, Some(&overrides)).unwrap();

        assert_eq!(config.profile.database_name.as_deref(), Some("cli_db"));
        assert!(config.graph.full_table_names);
    }

    #[test]
    fn test_explicit_path_bypasses_search() {
        let global = TempDir::new().unwrap();
        let local = TempDir::new().unwrap();
        write_config(local.path(), "[profile]\ndatabase_name = \"local_db\"\n");

        let explicit = local.path().join("explicit.toml");
        std::fs::write(&explicit, "[profile]\ndatabase_name = \"explicit_db\"\n").unwrap();

        let loader = ConfigLoader::with_global_dir(global.path().join(CONFIG_DIR));
        let config = loader
            .load(local.path(), Some(explicit.as_path()), None)
            .unwrap();
        assert_eq!(config.profile.database_name.as_deref(), Some("explicit_db"));
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let global = TempDir::new().unwrap();
        let local = TempDir::new().unwrap();
        write_config(local.path(), "profile = not toml");

        let loader = ConfigLoader::with_global_dir(global.path().join(CONFIG_DIR));
        let err = loader.load(local.path(), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn test_missing_explicit_file_is_a_read_error() {
        let local = TempDir::new().unwrap();
        let loader = ConfigLoader::with_global_dir(local.path().join(CONFIG_DIR));
        let err = loader
            .load(local.path(), Some(Path::new("/nonexistent/config.toml")), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
