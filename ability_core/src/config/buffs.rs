//! Buff catalog loading

use super::ConfigError;
use crate::buff::Buff;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Container for buff templates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuffsConfig {
    #[serde(rename = "buffs")]
    pub buffs: Vec<Buff>,
}

/// Load buff templates from a TOML file, keyed by title
pub fn load_buff_catalog(path: &Path) -> Result<HashMap<String, Buff>, ConfigError> {
    let config: BuffsConfig = super::load_toml(path)?;
    index_by_title(config)
}

/// Load buff templates from a TOML string, keyed by title
pub fn parse_buff_catalog(content: &str) -> Result<HashMap<String, Buff>, ConfigError> {
    let config: BuffsConfig = super::parse_toml(content)?;
    index_by_title(config)
}

fn index_by_title(config: BuffsConfig) -> Result<HashMap<String, Buff>, ConfigError> {
    let mut map = HashMap::new();
    for buff in config.buffs {
        if buff.flags.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "buff '{}' targets no attribute",
                buff.title
            )));
        }
        if buff.max_stacks == 0 {
            return Err(ConfigError::ValidationError(format!(
                "buff '{}' has max_stacks = 0",
                buff.title
            )));
        }
        map.insert(buff.title.clone(), buff);
    }
    Ok(map)
}

/// Get the bundled buff catalog
pub fn default_buffs() -> HashMap<String, Buff> {
    let toml = include_str!("../../config/buffs.toml");
    parse_buff_catalog(toml).unwrap_or_else(|err| {
        tracing::error!(error = %err, "bundled buff config is invalid");
        HashMap::new()
    })
}
