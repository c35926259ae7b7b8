//! Bootstrap configuration loading
//!
//! Every setting resolves with the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: the service logs a warning and starts
//! with defaults. A TOML file that exists but does not parse is an error.

use crate::params::RecommendParams;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the TOML config file
pub const ENV_CONFIG: &str = "SONANCE_CONFIG";
/// Environment variable naming the data folder
pub const ENV_DATA_DIR: &str = "SONANCE_DATA_DIR";
/// Environment variable naming the vector file
pub const ENV_FEATURES_PATH: &str = "SONANCE_FEATURES_PATH";
/// Environment variable naming the metadata file
pub const ENV_META_PATH: &str = "SONANCE_META_PATH";
/// Environment variable naming the HTTP port
pub const ENV_PORT: &str = "SONANCE_PORT";

/// Default vector file name inside the data folder
pub const DEFAULT_FEATURES_FILE: &str = "features.json";
/// Default metadata file name inside the data folder
pub const DEFAULT_META_FILE: &str = "meta.json";
/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5790;
/// Default bind address
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; absent fields fall through to env/defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the vector and metadata files
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Explicit vector file path (overrides `data_dir`)
    #[serde(default)]
    pub features_path: Option<PathBuf>,

    /// Explicit metadata file path (overrides `data_dir`)
    #[serde(default)]
    pub meta_path: Option<PathBuf>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// HTTP bind address
    #[serde(default)]
    pub bind: Option<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Pipeline tuning overrides
    #[serde(default)]
    pub recommend: RecommendParams,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Command-line configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub features_path: Option<PathBuf>,
    pub meta_path: Option<PathBuf>,
    pub port: Option<u16>,
    pub bind: Option<String>,
}

/// Locations of the two persisted input files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub features: PathBuf,
    pub meta: PathBuf,
}

impl StorePaths {
    /// Default file names inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            features: data_dir.join(DEFAULT_FEATURES_FILE),
            meta: data_dir.join(DEFAULT_META_FILE),
        }
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
    pub store: StorePaths,
    pub port: u16,
    pub bind: String,
    pub logging: LoggingConfig,
    pub recommend: RecommendParams,
}

impl ServiceConfig {
    /// Resolve configuration from CLI overrides, environment, TOML and defaults
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let toml_path = overrides
            .config_path
            .clone()
            .or_else(|| env_path(ENV_CONFIG))
            .or_else(default_config_path);

        let toml_config = match toml_path {
            Some(path) => load_toml_config(&path)?.unwrap_or_default(),
            None => {
                warn!("No config file found, using built-in defaults");
                TomlConfig::default()
            }
        };

        Self::from_sources(overrides, toml_config)
    }

    /// Merge already-loaded sources; environment is read here
    pub fn from_sources(overrides: ConfigOverrides, toml_config: TomlConfig) -> Result<Self> {
        let data_dir = overrides
            .data_dir
            .or_else(|| env_path(ENV_DATA_DIR))
            .or(toml_config.data_dir)
            .unwrap_or_else(get_default_data_dir);

        let defaults = StorePaths::in_dir(&data_dir);
        let store = StorePaths {
            features: overrides
                .features_path
                .or_else(|| env_path(ENV_FEATURES_PATH))
                .or(toml_config.features_path)
                .unwrap_or(defaults.features),
            meta: overrides
                .meta_path
                .or_else(|| env_path(ENV_META_PATH))
                .or(toml_config.meta_path)
                .unwrap_or(defaults.meta),
        };

        let port = match overrides.port {
            Some(port) => port,
            None => match std::env::var(ENV_PORT) {
                Ok(raw) => raw.trim().parse::<u16>().map_err(|e| {
                    Error::Config(format!("{}: invalid port '{}': {}", ENV_PORT, raw, e))
                })?,
                Err(_) => toml_config.port.unwrap_or(DEFAULT_PORT),
            },
        };

        let bind = overrides
            .bind
            .or(toml_config.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        toml_config.recommend.validate()?;

        Ok(Self {
            data_dir,
            store,
            port,
            bind,
            logging: toml_config.logging,
            recommend: toml_config.recommend,
        })
    }
}

/// Read and parse a TOML config file
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        warn!("Config file {} not found, using defaults", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    info!("Loaded TOML configuration from {}", path.display());
    Ok(Some(config))
}

/// Platform config file location, if one exists
///
/// Tries `<config_dir>/sonance/config.toml`, then `/etc/sonance/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("sonance").join("config.toml"));
    if let Some(path) = user_config.filter(|p| p.exists()) {
        return Some(path);
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/sonance/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default data folder
pub fn get_default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("sonance"))
        .unwrap_or_else(|| PathBuf::from("./sonance_data"))
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}
