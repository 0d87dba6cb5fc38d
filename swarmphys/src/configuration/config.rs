//! Configuration types for loading swarm scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable description of a
//! simulation run. A scenario consists of:
//!
//! - [`FrameConfig`]    – size of the visible frame
//! - [`EngineConfig`]   – flat engine options, handed to the engine as strings
//! - [`NodeConfig`]     – initial state for each person and file
//! - [`EdgeConfig`]     – person-file links
//! - [`ScenarioConfig`] – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! frame:
//!   width: 640
//!   height: 480
//!
//! engine:
//!   engine: decay            # or "orbit"
//!   edgeMultiplier: 1.0
//!   calculationRandomizer: 0.01
//!   nodesMultiplier: 1.0
//!   speedMultiplier: 1.0
//!   drag: 0.5
//!   seed: 42
//!
//! frames: 300
//!
//! persons:
//!   - name: alice
//!     x: [100, 100]          # optional, random when absent
//! files:
//!   - name: src/main.rs      # placed at the frame center when x is absent
//!     change: 12
//! edges:
//!   - from: alice
//!     to: src/main.rs
//!     weight: 12
//!     len: 25
//! ```

use std::collections::HashMap;

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::ConfigError;

/// Visible frame size
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct FrameConfig {
    pub width: f32,
    pub height: f32,
}

/// Engine options as written in the scenario file
/// Values may be YAML numbers, strings or booleans; the engine parses them itself
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(transparent)]
pub struct EngineConfig {
    pub options: HashMap<String, Value>,
}

impl EngineConfig {
    /// Flatten to the `name -> string` map the engine is set up from
    /// Empty values, lists and maps are rejected
    pub fn to_options(&self) -> Result<HashMap<String, String>, ConfigError> {
        self.options
            .iter()
            .map(|(k, v)| Ok((k.clone(), scalar_to_string(k, v)?)))
            .collect()
    }
}

fn scalar_to_string(option: &str, value: &Value) -> Result<String, ConfigError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => {
            Err(ConfigError::NotScalar {
                option: option.to_string(),
            })
        }
    }
}

/// Initial state of one person or file
#[derive(Deserialize, Debug, Clone)]
pub struct NodeConfig {
    pub name: String,
    pub x: Option<Vec<f32>>, // position, engine start location when absent
    pub v: Option<Vec<f32>>, // velocity, engine start velocity when absent
    pub m: Option<f32>, // mass
    pub max_speed: Option<f32>,
    pub life: Option<u32>,
    pub change: Option<i32>, // size of the latest change on this node
}

/// One person-file link
#[derive(Deserialize, Debug, Clone)]
pub struct EdgeConfig {
    pub from: String, // person name
    pub to: String, // file name
    pub weight: i32,
    pub len: Option<f32>,
    pub life: Option<u32>,
}

fn default_frames() -> u32 {
    100
}

/// Top-level scenario configuration loaded from YAML
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub frame: FrameConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default = "default_frames")]
    pub frames: u32, // frames to run when the CLI does not override it
    #[serde(default)]
    pub persons: Vec<NodeConfig>,
    #[serde(default)]
    pub files: Vec<NodeConfig>,
    #[serde(default)]
    pub edges: Vec<EdgeConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_and_strings_become_option_strings() {
        let cfg = ScenarioConfig::from_yaml(
            "frame: {width: 10, height: 20}\nengine:\n  drag: 0.25\n  engine: orbit\n  seed: 3\n",
        )
        .unwrap();
        let opts = cfg.engine.to_options().unwrap();
        assert_eq!(opts["drag"], "0.25");
        assert_eq!(opts["engine"], "orbit");
        assert_eq!(opts["seed"], "3");
        assert_eq!(cfg.frames, 100);
        assert!(cfg.persons.is_empty());
    }

    #[test]
    fn non_scalar_option_is_rejected() {
        let cfg = ScenarioConfig::from_yaml(
            "frame: {width: 10, height: 20}\nengine:\n  drag: [0.1, 0.2]\n",
        )
        .unwrap();
        let err = cfg.engine.to_options().unwrap_err();
        assert!(matches!(err, ConfigError::NotScalar { option } if option == "drag"));
    }
}
