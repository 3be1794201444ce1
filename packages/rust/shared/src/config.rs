//! Application configuration for malldir.
//!
//! User config lives at `~/.malldir/malldir.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MallDirError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "malldir.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".malldir";

// ---------------------------------------------------------------------------
// Config structs (matching malldir.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Per-mall source overrides.
    #[serde(default)]
    pub malls: Vec<MallRegistryEntry>,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory that receives `<slug>.json` documents.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "data/directories".into()
}

/// `[[malls]]` entry: overrides the source metadata of a built-in strategy,
/// or registers an alias slug that reuses one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MallRegistryEntry {
    /// Slug written into the directory document and used as the file name.
    pub slug: String,
    /// Built-in strategy slug to use (defaults to `slug`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Human-readable source name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    /// Page or API the data was taken from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl MallRegistryEntry {
    /// The strategy slug this entry resolves to.
    pub fn strategy_slug(&self) -> &str {
        self.strategy.as_deref().unwrap_or(&self.slug)
    }
}

impl AppConfig {
    /// Find the registry entry for a mall slug, if one is configured.
    pub fn mall(&self, slug: &str) -> Option<&MallRegistryEntry> {
        self.malls.iter().find(|m| m.slug == slug)
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.malldir/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| MallDirError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.malldir/malldir.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| MallDirError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| MallDirError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let path = config_file_path()?;
    init_config_at(&path)?;
    Ok(path)
}

/// Write a default config file at `path`, creating parent directories.
pub fn init_config_at(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| MallDirError::io(dir, e))?;
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| MallDirError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| MallDirError::io(path, e))?;
    tracing::info!(?path, "created default config file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("data/directories"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.output_dir, "data/directories");
        assert!(parsed.malls.is_empty());
    }

    #[test]
    fn config_with_malls() {
        let toml_str = r#"
[defaults]
output_dir = "/tmp/directories"

[[malls]]
slug = "central-cwt"
strategy = "central-chaengwattana"
source_name = "Central Chaengwattana (mirror)"

[[malls]]
slug = "iconsiam"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.output_dir, "/tmp/directories");
        assert_eq!(config.malls.len(), 2);

        let alias = config.mall("central-cwt").expect("alias entry");
        assert_eq!(alias.strategy_slug(), "central-chaengwattana");
        assert_eq!(config.mall("iconsiam").unwrap().strategy_slug(), "iconsiam");
        assert!(config.mall("siam-paragon").is_none());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config_from(Path::new("/definitely/not/here/malldir.toml")).unwrap_err();
        assert!(matches!(err, MallDirError::Io { .. }));
    }

    #[test]
    fn init_at_writes_loadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("malldir.toml");
        init_config_at(&path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.defaults.output_dir, "data/directories");
        assert!(loaded.malls.is_empty());
    }
}
