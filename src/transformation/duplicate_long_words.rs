use async_trait::async_trait;

use crate::errors::{ConfigError, TransformError};

use super::tokenizer::tokenize;
use super::Transformation;

// @module: Emphasis by repetition of long tokens

/// Repeats every token `ceil(len / max_syllable_group_length)` times
#[derive(Debug, Clone)]
pub struct DuplicateLongWords {
    max_group_length: usize,
}

impl DuplicateLongWords {
    pub fn new(max_group_length: usize) -> Result<Self, ConfigError> {
        if max_group_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_syllable_group_length",
                reason: "must be a positive integer".to_string(),
            });
        }
        Ok(Self { max_group_length })
    }

    pub fn max_group_length(&self) -> usize {
        self.max_group_length
    }

    /// Number of copies emitted for a token, at least one
    pub fn repetitions(&self, token: &str) -> usize {
        token.chars().count().div_ceil(self.max_group_length).max(1)
    }

    // @returns: All tokens, whitespace runs included, repeated and joined by single spaces
    pub fn duplicate_text(&self, text: &str) -> String {
        tokenize(text)
            .into_iter()
            .flat_map(|token| std::iter::repeat_n(token.text, self.repetitions(token.text)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl Transformation for DuplicateLongWords {
    fn name(&self) -> &'static str {
        "duplicate-long-words"
    }

    async fn transform(&self, text: &str) -> Result<String, TransformError> {
        Ok(self.duplicate_text(text))
    }
}
