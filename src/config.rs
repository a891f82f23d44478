//! Tunable thresholds for the standard rule pipeline and the booking loop.

use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, AllocationResult};
use crate::models::Building;

/// Weight thresholds used by the standard rules.
///
/// All comparisons are strict: a dog at exactly the threshold is not affected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Dogs above this weight are kept out of `heavy_excluded_building`.
    pub heavy_weight_lbs: f64,
    /// Building heavy dogs are kept out of.
    pub heavy_excluded_building: Building,
    /// Dogs above this weight need tall housing.
    pub giant_weight_lbs: f64,
    /// Dogs above this weight cannot use the stacked 4×4 enclosures.
    pub small_run_max_lbs: f64,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            heavy_weight_lbs: 100.0,
            heavy_excluded_building: Building::E,
            giant_weight_lbs: 130.0,
            small_run_max_lbs: 15.0,
        }
    }
}

impl AllocatorConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> AllocationResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AllocationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects negative or non-finite thresholds and a giant threshold
    /// below the heavy one.
    pub fn validate(&self) -> AllocationResult<()> {
        let thresholds = [
            ("heavy_weight_lbs", self.heavy_weight_lbs),
            ("giant_weight_lbs", self.giant_weight_lbs),
            ("small_run_max_lbs", self.small_run_max_lbs),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(AllocationError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.giant_weight_lbs < self.heavy_weight_lbs {
            return Err(AllocationError::Config(format!(
                "giant_weight_lbs ({}) is below heavy_weight_lbs ({})",
                self.giant_weight_lbs, self.heavy_weight_lbs
            )));
        }
        Ok(())
    }
}

/// Retry budget for the booking loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Allocation + reservation attempts before a lost race is reported.
    pub max_attempts: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

impl BookingConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> AllocationResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AllocationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AllocationResult<()> {
        if self.max_attempts == 0 {
            return Err(AllocationError::Config(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Sets the attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}
