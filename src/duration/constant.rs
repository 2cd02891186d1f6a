use crate::errors::ConfigError;

use super::DurationCalculator;

/// Gives every word the same duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantDuration {
    value: f64,
}

impl ConstantDuration {
    pub fn new(value: f64) -> Result<Self, ConfigError> {
        if !(value.is_finite() && value > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "value",
                reason: format!("duration must be a positive number, got {}", value),
            });
        }
        Ok(Self { value })
    }
}

impl Default for ConstantDuration {
    fn default() -> Self {
        Self { value: 1.0 }
    }
}

impl DurationCalculator for ConstantDuration {
    fn calculate_duration(&self, _word: &str) -> f64 {
        self.value
    }
}
