//! Ability definition loading

use super::ConfigError;
use crate::ability::AbilityDefinition;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Container for ability definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitiesConfig {
    #[serde(rename = "abilities")]
    pub abilities: Vec<AbilityDefinition>,
}

/// Load ability definitions from a TOML file, keyed by name
pub fn load_ability_definitions(
    path: &Path,
) -> Result<HashMap<String, AbilityDefinition>, ConfigError> {
    let config: AbilitiesConfig = super::load_toml(path)?;
    index_by_name(config)
}

/// Load ability definitions from a TOML string, keyed by name
pub fn parse_ability_definitions(
    content: &str,
) -> Result<HashMap<String, AbilityDefinition>, ConfigError> {
    let config: AbilitiesConfig = super::parse_toml(content)?;
    index_by_name(config)
}

fn index_by_name(config: AbilitiesConfig) -> Result<HashMap<String, AbilityDefinition>, ConfigError> {
    let mut map = HashMap::new();
    for ability in config.abilities {
        ability.validate()?;
        if map.contains_key(&ability.name) {
            return Err(ConfigError::ValidationError(format!(
                "ability '{}' is defined more than once",
                ability.name
            )));
        }
        map.insert(ability.name.clone(), ability);
    }
    Ok(map)
}

/// Get default ability definitions
pub fn default_abilities() -> HashMap<String, AbilityDefinition> {
    let toml = include_str!("../../config/abilities.toml");
    parse_ability_definitions(toml).unwrap_or_else(|err| {
        tracing::error!(error = %err, "bundled ability config is invalid, using fallback");
        let mut map = HashMap::new();
        let fallback = AbilityDefinition::basic_projectile();
        map.insert(fallback.name.clone(), fallback);
        map
    })
}
