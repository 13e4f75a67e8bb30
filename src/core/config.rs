//! Engine configuration with documented constants
//!
//! Every tunable number the rules rely on lives here. The config is passed
//! into sessions explicitly; there is no process-wide instance.

use crate::core::error::Result;
use crate::core::types::CHECK_DIE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the combat resolution engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Natural face that counts as a critical hit
    ///
    /// Criticals drive Lethal Hits and Sustained Hits. Must lie on the d6,
    /// otherwise no roll can ever be critical.
    pub critical_face: u32,

    /// Upper bound for the Sustained Hits X value a caller may set
    pub max_sustained: u32,

    /// How many free-form tray rolls are kept in history (newest first)
    pub tray_history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            critical_face: 6,
            max_sustained: 6,
            tray_history_limit: 100,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load config from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(1..=CHECK_DIE).contains(&self.critical_face) {
            return Err(format!(
                "critical_face ({}) must be within 1..={}",
                self.critical_face, CHECK_DIE
            ));
        }

        Ok(())
    }
}
