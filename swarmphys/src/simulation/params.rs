//! Numerical parameters of the force model
//!
//! `Parameters` holds the runtime multipliers read from the flat
//! `name -> string` option map the driver hands to the engine:
//! - `edgeMultiplier`, `nodesMultiplier`: strength of edge and repulsion forces
//! - `calculationRandomizer`: range of the random push given to coincident nodes
//! - `speedMultiplier`: force to velocity conversion
//! - `drag`: velocity kept per frame under the hard-cap policy
//! - `seed`: optional RNG seed for reproducible runs

use std::collections::HashMap;

use log::debug;

use crate::error::ConfigError;

pub const EDGE_MULTIPLIER: &str = "edgeMultiplier";
pub const CALCULATION_RANDOMIZER: &str = "calculationRandomizer";
pub const NODES_MULTIPLIER: &str = "nodesMultiplier";
pub const SPEED_MULTIPLIER: &str = "speedMultiplier";
pub const DRAG: &str = "drag";
pub const SEED: &str = "seed";
pub const ENGINE: &str = "engine";

const KNOWN_OPTIONS: [&str; 7] = [
    EDGE_MULTIPLIER,
    CALCULATION_RANDOMIZER,
    NODES_MULTIPLIER,
    SPEED_MULTIPLIER,
    DRAG,
    SEED,
    ENGINE,
];

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub edge_multiplier: f32,
    pub calculation_randomizer: f32,
    pub nodes_multiplier: f32,
    pub speed_multiplier: f32,
    pub drag: f32,
    pub seed: Option<u64>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            edge_multiplier: 1.0,
            calculation_randomizer: 0.01,
            nodes_multiplier: 1.0,
            speed_multiplier: 1.0,
            drag: 0.5,
            seed: None,
        }
    }
}

impl Parameters {
    /// Read parameters from the option map, falling back to defaults for
    /// missing keys. Any present value that does not parse is an error.
    pub fn from_options(options: &HashMap<String, String>) -> Result<Self, ConfigError> {
        for key in options.keys() {
            if !KNOWN_OPTIONS.iter().any(|known| known == key) {
                debug!(option = key.as_str(); "Ignoring unknown physics option");
            }
        }

        let defaults = Self::default();
        let calculation_randomizer =
            read_f32(options, CALCULATION_RANDOMIZER, defaults.calculation_randomizer)?;
        if calculation_randomizer <= 0.0 {
            return Err(ConfigError::OutOfRange {
                option: CALCULATION_RANDOMIZER,
                requirement: "greater than 0",
                value: calculation_randomizer,
            });
        }

        let seed = match options.get(SEED) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|source| {
                ConfigError::InvalidSeed {
                    value: raw.clone(),
                    source,
                }
            })?),
            None => None,
        };

        Ok(Self {
            edge_multiplier: read_f32(options, EDGE_MULTIPLIER, defaults.edge_multiplier)?,
            calculation_randomizer,
            nodes_multiplier: read_f32(options, NODES_MULTIPLIER, defaults.nodes_multiplier)?,
            speed_multiplier: read_f32(options, SPEED_MULTIPLIER, defaults.speed_multiplier)?,
            drag: read_f32(options, DRAG, defaults.drag)?,
            seed,
        })
    }
}

fn read_f32(
    options: &HashMap<String, String>,
    option: &'static str,
    default: f32,
) -> Result<f32, ConfigError> {
    let Some(raw) = options.get(option) else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<f32>()
        .map_err(|source| ConfigError::InvalidNumber {
            option,
            value: raw.clone(),
            source,
        })?;
    if !value.is_finite() {
        return Err(ConfigError::NotFinite {
            option,
            value: raw.clone(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_options_give_defaults() {
        let p = Parameters::from_options(&HashMap::new()).unwrap();
        assert_eq!(p, Parameters::default());
    }

    #[test]
    fn values_are_trimmed_and_parsed() {
        let p = Parameters::from_options(&opts(&[(DRAG, " 0.25 "), (SEED, "7")])).unwrap();
        assert_eq!(p.drag, 0.25);
        assert_eq!(p.seed, Some(7));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = Parameters::from_options(&opts(&[(EDGE_MULTIPLIER, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { option: EDGE_MULTIPLIER, .. }));
    }

    #[test]
    fn nan_is_rejected() {
        let err = Parameters::from_options(&opts(&[(NODES_MULTIPLIER, "NaN")])).unwrap_err();
        assert!(matches!(err, ConfigError::NotFinite { .. }));
    }

    #[test]
    fn non_positive_randomizer_is_rejected() {
        let err = Parameters::from_options(&opts(&[(CALCULATION_RANDOMIZER, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
    }
}
