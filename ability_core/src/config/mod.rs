//! Configuration loading from TOML files

mod abilities;
mod buffs;

pub use abilities::{default_abilities, load_ability_definitions, parse_ability_definitions};
pub use buffs::{default_buffs, load_buff_catalog, parse_buff_catalog};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_toml(&content)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::AbilityDefinition;

    #[test]
    fn test_missing_file_is_io_error() {
        let result: Result<AbilityDefinition, _> = load_toml(Path::new("/nonexistent/abilities.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let result: Result<AbilityDefinition, _> = parse_toml("name = ");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
