use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};

use crate::errors::ConfigError;
use crate::language_utils::LanguageTag;
use crate::transformation::tokenizer::is_word_char;

use super::DurationCalculator;

/// Source of normalized word frequencies
pub trait FrequencyLookup: Send + Sync + Debug {
    /// Frequency of `word` in `language`, in `[0, 1]`; unknown words give 0
    fn lookup_frequency(&self, word: &str, language: &str) -> f64;
}

/// In-memory frequency list for one language
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    language: String,
    frequencies: HashMap<String, f64>,
}

impl FrequencyTable {
    /// Build from already normalized frequencies
    pub fn from_frequencies<I, S>(language: &str, entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let language = LanguageTag::parse(language)?.primary;
        let frequencies = entries
            .into_iter()
            .map(|(word, frequency)| (word.as_ref().to_lowercase(), frequency))
            .collect();
        Ok(Self { language, frequencies })
    }

    /// Build from raw occurrence counts, normalized by their sum
    pub fn from_counts<I, S>(language: &str, counts: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut merged: HashMap<String, u64> = HashMap::new();
        for (word, count) in counts {
            *merged.entry(word.as_ref().to_lowercase()).or_default() += count;
        }
        let total: u64 = merged.values().sum();
        if total == 0 {
            return Self::from_frequencies(language, std::iter::empty::<(String, f64)>());
        }
        Self::from_frequencies(
            language,
            merged
                .into_iter()
                .map(|(word, count)| (word, count as f64 / total as f64)),
        )
    }

    /// Parse a word list: one `word count` pair per line, `#` starts a comment
    pub fn parse(language: &str, content: &str) -> Result<Self, ConfigError> {
        let mut counts = Vec::new();
        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (Some(word), Some(count), None) = (fields.next(), fields.next(), fields.next()) else {
                return Err(ConfigError::LoadFailed {
                    what: "frequency list".to_string(),
                    reason: format!("line {}: expected 'word count', got '{}'", number + 1, line),
                });
            };
            let count: u64 = count.parse().map_err(|_| ConfigError::LoadFailed {
                what: "frequency list".to_string(),
                reason: format!("line {}: invalid count '{}'", number + 1, count),
            })?;
            counts.push((word.to_string(), count));
        }
        Self::from_counts(language, counts)
    }

    /// Load a word list file for `language`
    pub fn load(language: &str, path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            what: format!("frequency list {:?}", path),
            reason: e.to_string(),
        })?;
        let table = Self::parse(language, &content)?;
        info!("Loaded {} word frequencies for '{}' from {:?}", table.len(), table.language, path);
        Ok(table)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

impl FrequencyLookup for FrequencyTable {
    fn lookup_frequency(&self, word: &str, language: &str) -> f64 {
        let matches_language = LanguageTag::parse(language)
            .map(|tag| tag.primary == self.language)
            .unwrap_or(false);
        if !matches_language {
            return 0.0;
        }
        self.frequencies.get(word).copied().unwrap_or(0.0)
    }
}

/// Longer display for rarer words:
/// `min + (max - min) / (1 + frequency / base_frequency)`, clamped
#[derive(Debug, Clone)]
pub struct FrequencyDuration {
    language: String,
    min_duration: f64,
    max_duration: f64,
    base_frequency: f64,
    lookup: Arc<dyn FrequencyLookup>,
}

impl FrequencyDuration {
    pub fn new(
        language: &str,
        min_duration: f64,
        max_duration: f64,
        base_frequency: f64,
        lookup: Arc<dyn FrequencyLookup>,
    ) -> Result<Self, ConfigError> {
        let language = LanguageTag::parse(language)?.primary;
        for (field, value) in [
            ("min_duration", min_duration),
            ("max_duration", max_duration),
            ("base_frequency", base_frequency),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }
        if max_duration < min_duration {
            return Err(ConfigError::InvalidValue {
                field: "max_duration",
                reason: format!("{} is below min_duration {}", max_duration, min_duration),
            });
        }
        Ok(Self {
            language,
            min_duration,
            max_duration,
            base_frequency,
            lookup,
        })
    }

    pub fn min_duration(&self) -> f64 {
        self.min_duration
    }

    pub fn max_duration(&self) -> f64 {
        self.max_duration
    }
}

impl DurationCalculator for FrequencyDuration {
    fn calculate_duration(&self, word: &str) -> f64 {
        let cleaned: String = word.to_lowercase().chars().filter(|&c| is_word_char(c)).collect();
        let frequency = self.lookup.lookup_frequency(&cleaned, &self.language);
        if frequency <= 0.0 {
            debug!("No frequency for '{}', using maximum duration", cleaned);
            return self.max_duration;
        }
        let normalized = frequency / self.base_frequency;
        let duration = self.min_duration + (self.max_duration - self.min_duration) / (1.0 + normalized);
        duration.clamp(self.min_duration, self.max_duration)
    }
}
