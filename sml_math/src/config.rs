//! Configuration for the lane parity checker.
//!
//! Loaded from JSON strings (file IO is left to the caller); every field
//! has a default so a partial document is fine.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    /// `magnitude` must be finite and non-negative to bound the samples.
    InvalidMagnitude(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "invalid config json: {e}"),
            ConfigError::InvalidMagnitude(m) => {
                write!(f, "magnitude must be finite and >= 0, got {m}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::InvalidMagnitude(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParityConfig {
    /// RNG seed. A failing run replays exactly with the same seed.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Random lane blocks drawn per operation and element type.
    #[serde(default = "default_samples")]
    pub samples: u32,
    /// Inputs are drawn uniformly from `[-magnitude, magnitude]`.
    #[serde(default = "default_magnitude")]
    pub magnitude: f64,
    /// Where the runner writes its JSON report.
    #[serde(default = "default_report_path")]
    pub report_path: String,
}

fn default_seed() -> u64 {
    0x5EED_CAFE
}

fn default_samples() -> u32 {
    10_000
}

fn default_magnitude() -> f64 {
    1.0e3
}

fn default_report_path() -> String {
    "parity-report.json".to_string()
}

impl Default for ParityConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            samples: default_samples(),
            magnitude: default_magnitude(),
            report_path: default_report_path(),
        }
    }
}

impl ParityConfig {
    /// Parses config from JSON and validates it.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.magnitude.is_finite() || self.magnitude < 0.0 {
            return Err(ConfigError::InvalidMagnitude(self.magnitude));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg = ParityConfig::from_json_str(r#"{ "samples": 12 }"#).unwrap();
        assert_eq!(cfg.samples, 12);
        assert_eq!(cfg.seed, ParityConfig::default().seed);
        assert_eq!(cfg.report_path, "parity-report.json");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            ParityConfig::from_json_str("{ samples: }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn rejects_unusable_magnitude() {
        assert!(matches!(
            ParityConfig::from_json_str(r#"{ "magnitude": -1.0 }"#),
            Err(ConfigError::InvalidMagnitude(m)) if m == -1.0
        ));
        for m in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let cfg = ParityConfig {
                magnitude: m,
                ..ParityConfig::default()
            };
            assert!(cfg.validate().is_err(), "magnitude {m} accepted");
        }
        let zero = ParityConfig {
            magnitude: 0.0,
            ..ParityConfig::default()
        };
        assert!(zero.validate().is_ok());
    }
}
