//! Configuration validator for hedgehog-native
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{Config, ConfigError, LoggingConfig, MemoryConfig};

/// Accepted log levels
pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Widest hex dump row
pub const MAX_BYTES_PER_ROW: usize = 64;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_logging(&config.logging)?;
        Self::validate_memory(&config.memory)?;
        Ok(())
    }

    /// Validates memory configuration
    fn validate_memory(memory: &MemoryConfig) -> Result<(), ConfigError> {
        if memory.max_read_size == 0 {
            return Err(ConfigError::Invalid(
                "Maximum read size must be greater than 0".to_string(),
            ));
        }

        if memory.default_read_size == 0 {
            return Err(ConfigError::Invalid(
                "Default read size must be greater than 0".to_string(),
            ));
        }

        if memory.default_read_size > memory.max_read_size {
            return Err(ConfigError::Invalid(format!(
                "Default read size {} exceeds maximum read size {}",
                memory.default_read_size, memory.max_read_size
            )));
        }

        if memory.bytes_per_row == 0 || memory.bytes_per_row > MAX_BYTES_PER_ROW {
            return Err(ConfigError::Invalid(format!(
                "Bytes per row must be between 1 and {}",
                MAX_BYTES_PER_ROW
            )));
        }

        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, LOG_LEVELS
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
