//! Default configuration values for hedgehog-native

use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub logging: LoggingDefaults,
    pub memory: MemoryDefaults,
    pub output: OutputDefaults,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
    pub with_target: bool,
}

/// Default memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDefaults {
    pub default_read_size: usize,
    pub max_read_size: usize,
    pub bytes_per_row: usize,
}

/// Default output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputDefaults {
    pub format: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        logging: LoggingDefaults {
            level: "warn".to_string(),
            with_target: false,
        },
        memory: MemoryDefaults {
            default_read_size: 64,
            max_read_size: 256,
            bytes_per_row: 8,
        },
        output: OutputDefaults {
            format: "text".to_string(),
        },
    }
}
