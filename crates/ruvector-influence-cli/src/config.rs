//! Configuration file handling.
//!
//! A configuration file is JSON with two optional sections:
//!
//! ```json
//! {
//!   "influence": { "epsilon": 0.1, "seed": 42 },
//!   "loader": { "weighting": "weighted-cascade" }
//! }
//! ```
//!
//! Missing fields take their library defaults; command-line flags override
//! whatever the file sets.

use std::path::PathBuf;

use anyhow::{Context, Result};
use ruvector_influence::io::EdgeListOptions;
use ruvector_influence::InfluenceConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed-selection parameters
    pub influence: InfluenceConfig,
    /// Edge-list loader options
    pub loader: EdgeListOptions,
}

impl Config {
    /// Load from `path`, or defaults when no path is given
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.influence.validate()?;
        Ok(config)
    }
}
