//! Error types for the physics core and its scenario driver.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// Engine configuration could not be turned into parameters
/// Always fatal: no frame may run with a bad configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("option `{option}` has invalid number `{value}`")]
    InvalidNumber {
        option: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("option `{option}` must be finite, got `{value}`")]
    NotFinite { option: &'static str, value: String },

    #[error("option `{option}` must be {requirement}, got {value}")]
    OutOfRange {
        option: &'static str,
        requirement: &'static str,
        value: f32,
    },

    #[error("option `seed` has invalid value `{value}`")]
    InvalidSeed {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("option `{option}` must be a number or string")]
    NotScalar { option: String },

    #[error("unknown physics engine `{0}` (expected `orbit` or `decay`)")]
    UnknownVariant(String),
}

/// A scenario description could not be built into a runnable simulation
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("duplicate node name `{0}`")]
    DuplicateNode(String),

    #[error("edge refers to unknown node `{0}`")]
    UnknownNode(String),

    #[error("edge `{from}` -> `{to}` must link a person to a file")]
    EdgeKinds { from: String, to: String },

    #[error("frame size {width}x{height} must be positive and finite")]
    BadFrame { width: f32, height: f32 },

    #[error("`{name}`: {field} must be finite")]
    NotFinite { name: String, field: &'static str },

    #[error("node `{name}`: {field} must have exactly 2 components, got {len}")]
    BadVector {
        name: String,
        field: &'static str,
        len: usize,
    },
}
