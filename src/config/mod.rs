//! Configuration module for hedgehog-native
//!
//! Provides configuration loading, validation, and default settings
//! for the command-line front end.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults};
pub use loader::{load_config, ConfigLoader, DEFAULT_CONFIG_FILE};
pub use validator::{validate_config, ConfigValidator};

// Re-export the main configuration structure
pub use loader::{Config, LoggingConfig, MemoryConfig, OutputConfig, OutputFormat};

// Configuration-related error type
pub use loader::ConfigError;

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;
