/*!
 * Per-word display durations for timed playback.
 *
 * - `ConstantDuration`: the same unit value for every word
 * - `FrequencyDuration`: rarer words stay on screen longer
 */

use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::DurationConfig;
use crate::errors::ConfigError;

pub mod constant;
pub mod frequency;

pub use constant::ConstantDuration;
pub use frequency::{FrequencyDuration, FrequencyLookup, FrequencyTable};

/// Assigns a positive display duration to a word
pub trait DurationCalculator: Send + Sync + Debug {
    fn calculate_duration(&self, word: &str) -> f64;
}

/// Build a duration strategy from its configuration
pub fn build_calculator(config: &DurationConfig) -> Result<Arc<dyn DurationCalculator>, ConfigError> {
    let calculator: Arc<dyn DurationCalculator> = match config {
        DurationConfig::Default { value } => Arc::new(ConstantDuration::new(*value)?),
        DurationConfig::Frequency {
            language,
            min_duration,
            max_duration,
            base_frequency,
            frequency_list,
        } => {
            let table = FrequencyTable::load(language, frequency_list)?;
            Arc::new(FrequencyDuration::new(
                language,
                *min_duration,
                *max_duration,
                *base_frequency,
                Arc::new(table),
            )?)
        }
    };
    Ok(calculator)
}
