//! Configuration management
//!
//! Settings are resolved in this order:
//! 1. Environment variables (`OUBLI_DATA_DIR`, `OUBLI_DB_PATH`, `OUBLI_CORE_MEMORY_PATH`)
//! 2. The `oubli.toml` config file
//! 3. Defaults under `~/.oubli`
//!
//! `${VAR_NAME}` inside the config file is expanded from the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::Error;

/// Config file looked up in the current directory by [`Config::load`]
pub const CONFIG_FILE: &str = "oubli.toml";

const DATA_DIR_NAME: &str = ".oubli";
const DB_FILE_NAME: &str = "memories.db";
const CORE_MEMORY_FILE_NAME: &str = "core_memory.md";

/// Main configuration for oubli
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the database and core memory
    pub data_dir: PathBuf,

    /// Memory store configuration
    pub memory: MemoryConfig,

    /// Core memory configuration
    pub core_memory: CoreMemoryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Path to SQLite database file
    pub db_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreMemoryConfig {
    /// Path to the core memory markdown file
    pub path: PathBuf,
}

impl Config {
    /// Build a configuration with every file under `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            memory: MemoryConfig {
                db_path: data_dir.join(DB_FILE_NAME),
            },
            core_memory: CoreMemoryConfig {
                path: data_dir.join(CORE_MEMORY_FILE_NAME),
            },
            data_dir,
        }
    }

    /// Load configuration from the default locations
    ///
    /// Uses `./oubli.toml` when present, otherwise environment variables
    /// and defaults only.
    pub fn load() -> crate::Result<Self> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }
        Self::from_env()
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let expanded_content = expand_env_vars(&toml_content);

        let mut toml_config: TomlConfig = toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        toml_config.apply_overrides(|key| std::env::var(key).ok());
        Self::from_toml_config(toml_config)
    }

    /// Load configuration from environment variables and defaults
    pub fn from_env() -> crate::Result<Self> {
        let mut toml_config = TomlConfig::default();
        toml_config.apply_overrides(|key| std::env::var(key).ok());
        Self::from_toml_config(toml_config)
    }

    /// Resolve optional settings into concrete paths
    ///
    /// File paths not set explicitly are derived from the data directory.
    fn from_toml_config(toml: TomlConfig) -> crate::Result<Self> {
        let data_dir = match toml.data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        let mut config = Self::with_data_dir(data_dir);
        if let Some(db_path) = toml.memory.and_then(|m| m.db_path) {
            config.memory.db_path = db_path;
        }
        if let Some(path) = toml.core_memory.and_then(|c| c.path) {
            config.core_memory.path = path;
        }
        Ok(config)
    }
}

/// `~/.oubli`
fn default_data_dir() -> crate::Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(DATA_DIR_NAME))
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))
}

/// Replace `${VAR_NAME}` with the value of the environment variable
///
/// Unset variables expand to an empty string.
fn expand_env_vars(value: &str) -> String {
    let mut result = String::new();
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut var_name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_name.push(c);
            }

            if let Ok(env_value) = std::env::var(&var_name) {
                result.push_str(&env_value);
            }
        } else {
            result.push(c);
        }
    }

    result
}

// ============================================================================
// TOML file structures
// ============================================================================

#[derive(Debug, Deserialize, Default)]
struct TomlConfig {
    data_dir: Option<PathBuf>,
    memory: Option<TomlMemoryConfig>,
    core_memory: Option<TomlCoreMemoryConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlMemoryConfig {
    #[serde(default)]
    db_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlCoreMemoryConfig {
    #[serde(default)]
    path: Option<PathBuf>,
}

impl TomlConfig {
    /// Apply environment overrides, reading variables through `lookup`
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(dir) = non_empty("OUBLI_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(path) = non_empty("OUBLI_DB_PATH") {
            self.memory.get_or_insert_with(Default::default).db_path = Some(PathBuf::from(path));
        }
        if let Some(path) = non_empty("OUBLI_CORE_MEMORY_PATH") {
            self.core_memory.get_or_insert_with(Default::default).path = Some(PathBuf::from(path));
        }
    }
}
