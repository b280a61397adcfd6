//! JSON configuration for hull construction

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Hull builder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullConfig {
    /// Multiplier applied to `f64::EPSILON * extent` to get the tolerance
    pub tolerance_scale: f64,
    /// Re-triage stops scanning new faces once a point is this many
    /// tolerances outside one of them
    pub early_accept_factor: f64,
    /// Log progress (1 = summary, 2 = every insertion, 0 = no output)
    pub verbosity: usize,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            tolerance_scale: 3.0,
            early_accept_factor: 1000.0,
            verbosity: 0,
        }
    }
}

impl HullConfig {
    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
