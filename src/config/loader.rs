//! Configuration loader for hedgehog-native
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::default_config;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,

    #[serde(default = "default_memory")]
    pub memory: MemoryConfig,

    #[serde(default = "default_output")]
    pub output: OutputConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_with_target")]
    pub with_target: bool,
}

/// Memory read configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_read_size")]
    pub default_read_size: usize,
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
    #[serde(default = "default_bytes_per_row")]
    pub bytes_per_row: usize,
}

impl MemoryConfig {
    /// Size for a read request: the default when none is given, clamped to
    /// `1..=max_read_size`
    pub fn read_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_read_size)
            .clamp(1, self.max_read_size.max(1))
    }
}

/// How command results are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration, falling back to defaults only when the file is missing
    pub fn load_if_exists(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }
}

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "hedgehog.toml";

/// Loads configuration from the default location
pub fn load_config() -> Result<Config, ConfigError> {
    ConfigLoader::new(DEFAULT_CONFIG_FILE).load_if_exists()
}

// Default functions for serde
fn default_logging() -> LoggingConfig {
    let defaults = default_config();
    LoggingConfig {
        level: defaults.logging.level,
        with_target: defaults.logging.with_target,
    }
}

fn default_memory() -> MemoryConfig {
    let defaults = default_config();
    MemoryConfig {
        default_read_size: defaults.memory.default_read_size,
        max_read_size: defaults.memory.max_read_size,
        bytes_per_row: defaults.memory.bytes_per_row,
    }
}

fn default_output() -> OutputConfig {
    OutputConfig {
        format: default_format(),
    }
}

// Individual field defaults
fn default_log_level() -> String {
    default_config().logging.level
}

fn default_with_target() -> bool {
    default_config().logging.with_target
}

fn default_read_size() -> usize {
    default_config().memory.default_read_size
}

fn default_max_read_size() -> usize {
    default_config().memory.max_read_size
}

fn default_bytes_per_row() -> usize {
    default_config().memory.bytes_per_row
}

fn default_format() -> OutputFormat {
    match default_config().output.format.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Text,
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            logging: default_logging(),
            memory: default_memory(),
            output: default_output(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.memory.max_read_size, 256);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_load_missing_file() {
        let loader = ConfigLoader::new("nonexistent.toml");
        let result = loader.load();
        assert!(matches!(result.unwrap_err(), ConfigError::FileNotFound(_)));

        let config = loader.load_if_exists().unwrap();
        assert_eq!(config.memory.default_read_size, 64);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "[memory\nmax_read_size = ").unwrap();

        let loader = ConfigLoader::new(&config_path);
        assert!(matches!(
            loader.load_if_exists().unwrap_err(),
            ConfigError::TomlParse(_)
        ));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("hedgehog.toml");
        fs::write(
            &config_path,
            "[output]\nformat = \"json\"\n\n[memory]\nbytes_per_row = 16\n",
        )
        .unwrap();

        let loaded = ConfigLoader::new(&config_path).load_if_exists().unwrap();
        assert_eq!(loaded.output.format, OutputFormat::Json);
        assert_eq!(loaded.memory.bytes_per_row, 16);
        assert_eq!(loaded.memory.max_read_size, 256);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
            [memory]
            max_read_size = 4096

            [output]
            format = "json"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.memory.max_read_size, 4096);
        assert_eq!(config.output.format, OutputFormat::Json);
        // Check defaults are applied
        assert_eq!(config.memory.default_read_size, 64);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_read_size_clamping() {
        let memory = Config::default().memory;
        assert_eq!(memory.read_size(None), 64);
        assert_eq!(memory.read_size(Some(0)), 1);
        assert_eq!(memory.read_size(Some(100)), 100);
        assert_eq!(memory.read_size(Some(10_000)), 256);
    }
}
