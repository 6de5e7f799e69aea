//! # Store Configuration
//!
//! Runtime configuration, loaded from environment variables with fallback
//! to defaults.
//!
//! ## Environment Variables
//! - `STOCKMATE_TOLERANCE_PERCENT`: tolerance band in percent (default `2`)
//! - `STOCKMATE_DISPLAY_DECIMALS`: decimals for report weights (default `3`)

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use stockmate_core::validation::validate_tolerance_fraction;
use stockmate_core::{ToleranceFraction, ValidationError, DISPLAY_DECIMALS};

pub const TOLERANCE_PERCENT_VAR: &str = "STOCKMATE_TOLERANCE_PERCENT";
pub const DISPLAY_DECIMALS_VAR: &str = "STOCKMATE_DISPLAY_DECIMALS";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),
}

/// Store configuration.
///
/// ## Example
/// ```rust
/// use stockmate_core::ToleranceFraction;
/// use stockmate_store::StoreConfig;
///
/// let config = StoreConfig::default()
///     .tolerance(ToleranceFraction::from_percentage(3.0))
///     .display_decimals(2);
/// assert_eq!(config.display_decimals, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Acceptable deviation around the expected weight.
    /// Default: 2%
    pub tolerance: ToleranceFraction,

    /// Decimal places for weights in reports.
    /// Default: 3
    pub display_decimals: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            tolerance: ToleranceFraction::default(),
            display_decimals: DISPLAY_DECIMALS,
        }
    }
}

impl StoreConfig {
    /// Sets the tolerance band.
    pub fn tolerance(mut self, tolerance: ToleranceFraction) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the report decimals.
    pub fn display_decimals(mut self, decimals: usize) -> Self {
        self.display_decimals = decimals;
        self
    }

    /// Checks the values a caller may have set by hand.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_tolerance_fraction(self.tolerance.fraction())?;
        Ok(())
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Unset keys keep their defaults; set but malformed keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = StoreConfig::default();

        if let Some(raw) = lookup(TOLERANCE_PERCENT_VAR) {
            let pct: f64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: TOLERANCE_PERCENT_VAR.to_string(),
                value: raw.clone(),
            })?;
            config.tolerance = ToleranceFraction::from_percentage(pct);
        }

        if let Some(raw) = lookup(DISPLAY_DECIMALS_VAR) {
            config.display_decimals =
                raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: DISPLAY_DECIMALS_VAR.to_string(),
                    value: raw.clone(),
                })?;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert!((config.tolerance.fraction() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_percent_override() {
        let config = StoreConfig::from_lookup(lookup(&[
            (TOLERANCE_PERCENT_VAR, " 5 "),
            (DISPLAY_DECIMALS_VAR, "2"),
        ]))
        .unwrap();
        assert!((config.tolerance.fraction() - 0.05).abs() < 1e-12);
        assert_eq!(config.display_decimals, 2);
    }

    #[test]
    fn test_malformed_value() {
        let err = StoreConfig::from_lookup(lookup(&[(TOLERANCE_PERCENT_VAR, "two")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_out_of_range_tolerance() {
        let err = StoreConfig::from_lookup(lookup(&[(TOLERANCE_PERCENT_VAR, "150")])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
