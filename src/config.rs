use serde::Deserialize;
use std::path::{Path, PathBuf};

// =============================================================================
// Time-related constants
// =============================================================================

/// Cache time-to-live in milliseconds (30 minutes)
pub const CACHE_TTL_MS: i64 = 30 * 60 * 1000;

// =============================================================================
// Package constants
// =============================================================================

/// Default base URL for the npm registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// The all-in-one package that re-exports every component
pub const MAIN_PACKAGE: &str = "@heroui/react";

/// Scope shared by the component packages and their ancillary libraries
pub const PACKAGE_PREFIX: &str = "@heroui/";

/// Current version recorded for a peer dependency that is not installed
pub const MISSING_VERSION: &str = "Missing";

/// Runtime package required when components are installed individually
pub const SYSTEM_PACKAGE: &str = "@heroui/system";

/// Theme package required when components are installed individually
pub const THEME_PACKAGE: &str = "@heroui/theme";

pub const FRAMER_MOTION: &str = "framer-motion";

pub const TAILWINDCSS: &str = "tailwindcss";

/// Tool configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub cache: CacheConfig,
    pub registry: RegistryConfig,
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Entry lifetime in milliseconds
    pub ttl: i64,
    /// Treat every entry as expired
    pub disabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: CACHE_TTL_MS,
            disabled: false,
        }
    }
}

/// Registry configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    pub url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REGISTRY_URL.to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Returns the path to the data directory for heroui-upgrade.
/// Uses $XDG_CACHE_HOME/heroui-upgrade if XDG_CACHE_HOME is set,
/// otherwise falls back to ~/.cache/heroui-upgrade,
/// or ./heroui-upgrade if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_CACHE_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the version cache file.
pub fn cache_path() -> PathBuf {
    data_dir().join("cache.json")
}

/// Returns the path to the optional configuration file.
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

/// Returns the directory log files are written to.
pub fn log_dir() -> PathBuf {
    data_dir()
}

fn data_dir_with_env(xdg_cache_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_cache_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".cache")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("heroui-upgrade")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<Config>(json!({
            "cache": {
                "disabled": true
            }
        }))
        .unwrap();

        assert!(result.cache.disabled);
        assert_eq!(result.cache.ttl, CACHE_TTL_MS);
        assert_eq!(result.registry, RegistryConfig::default());
    }

    #[test]
    fn config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<Config>(json!({
            "cache": {
                "ttl": 5000,
                "disabled": false
            },
            "registry": {
                "url": "http://localhost:4873"
            }
        }))
        .unwrap();

        assert_eq!(
            result,
            Config {
                cache: CacheConfig {
                    ttl: 5000,
                    disabled: false,
                },
                registry: RegistryConfig {
                    url: "http://localhost:4873".to_string(),
                },
            }
        );
    }

    #[test]
    fn load_returns_defaults_when_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::load(&dir.path().join("config.json")).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn data_dir_with_env_uses_xdg_cache_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-cache".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-cache/heroui-upgrade"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_cache() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.cache/heroui-upgrade"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./heroui-upgrade"));
    }
}
