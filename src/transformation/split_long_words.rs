/*!
 * Balanced syllable splitter.
 *
 * Inserts a separator inside words whose length exceeds
 * `max_syllable_group_length`, choosing the fewest syllable groups that fit
 * the bound and, among those, the most even split.
 */

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{ConfigError, TransformError};
use crate::language_utils::LanguageTag;
use crate::syllables::{resolve_syllabifier, Syllabifier};

use super::tokenizer::{split_affixes, tokenize};
use super::Transformation;

/// Splits long words into balanced syllable groups
#[derive(Debug, Clone)]
pub struct SplitLongWords {
    max_group_length: usize,
    separator: String,
    language: LanguageTag,
    syllabifier: Arc<dyn Syllabifier>,
}

impl SplitLongWords {
    /// Build a splitter using the bundled dictionary for `lang`
    pub fn new(max_group_length: usize, separator: &str, lang: &str) -> Result<Self, ConfigError> {
        let language = LanguageTag::parse(lang)?;
        let syllabifier = resolve_syllabifier(&language);
        Self::with_syllabifier(max_group_length, separator, language, syllabifier)
    }

    /// Build a splitter around an explicit syllabifier
    pub fn with_syllabifier(
        max_group_length: usize,
        separator: &str,
        language: LanguageTag,
        syllabifier: Arc<dyn Syllabifier>,
    ) -> Result<Self, ConfigError> {
        if max_group_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_syllable_group_length",
                reason: "must be a positive integer".to_string(),
            });
        }
        if separator.is_empty() {
            return Err(ConfigError::InvalidSeparator {
                field: "separator",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(Self {
            max_group_length,
            separator: separator.to_string(),
            language,
            syllabifier,
        })
    }

    pub fn max_group_length(&self) -> usize {
        self.max_group_length
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn language(&self) -> &LanguageTag {
        &self.language
    }

    /// Rewrite the whole text, leaving whitespace untouched
    pub fn split_text(&self, text: &str) -> String {
        tokenize(text)
            .into_iter()
            .map(|token| {
                if token.is_word() {
                    self.split_word(token.text)
                } else {
                    token.text.to_string()
                }
            })
            .collect()
    }

    /// Rewrite a single word token, keeping its punctuation in place
    pub fn split_word(&self, token: &str) -> String {
        let Some(affixed) = split_affixes(token) else {
            return token.to_string();
        };
        if affixed.core.chars().count() <= self.max_group_length {
            return token.to_string();
        }

        let syllables = self.syllabifier.syllables(affixed.core);
        if syllables.concat() != affixed.core {
            // A syllabifier that does not reproduce the word cannot be trusted
            return token.to_string();
        }

        let groups = group_syllables(&syllables, self.max_group_length);
        format!(
            "{}{}{}",
            affixed.leading,
            groups.join(&self.separator),
            affixed.trailing
        )
    }
}

#[async_trait]
impl Transformation for SplitLongWords {
    fn name(&self) -> &'static str {
        "split-long-words"
    }

    async fn transform(&self, text: &str) -> Result<String, TransformError> {
        Ok(self.split_text(text))
    }
}

/// Partition syllables into the fewest contiguous groups whose longest
/// member fits `max_length`.
///
/// A group made of one syllable is measured as `min(len, max_length)`: a
/// syllable longer than the bound cannot be reduced and is accepted as-is.
/// Among partitions with the same number of groups the smallest maximum
/// wins; remaining ties prefer boundaries closer to the end of the word.
pub fn group_syllables<S: AsRef<str>>(syllables: &[S], max_length: usize) -> Vec<String> {
    let n = syllables.len();
    if n == 0 {
        return Vec::new();
    }

    let lengths: Vec<usize> = syllables.iter().map(|s| s.as_ref().chars().count()).collect();
    let total: usize = lengths.iter().sum();
    if n == 1 || total <= max_length {
        return vec![syllables.iter().map(|s| s.as_ref()).collect()];
    }

    let mut prefix = vec![0usize; n + 1];
    for (i, len) in lengths.iter().enumerate() {
        prefix[i + 1] = prefix[i] + len;
    }
    let cost = |start: usize, end: usize| -> usize {
        if end - start == 1 {
            lengths[start].min(max_length)
        } else {
            prefix[end] - prefix[start]
        }
    };

    // suffix[i][g]: smallest achievable maximum for syllables[i..] in g groups
    let mut suffix = vec![vec![usize::MAX; n + 1]; n + 1];
    suffix[n][0] = 0;
    for start in (0..n).rev() {
        for groups in 1..=(n - start) {
            let mut best = usize::MAX;
            for end in (start + 1)..=(n - groups + 1) {
                let rest = suffix[end][groups - 1];
                if rest == usize::MAX {
                    continue;
                }
                best = best.min(cost(start, end).max(rest));
            }
            suffix[start][groups] = best;
        }
    }

    let group_count = (2..=n)
        .find(|&k| suffix[0][k] <= max_length)
        .unwrap_or(n);
    let optimum = suffix[0][group_count];

    let mut boundaries = Vec::with_capacity(group_count + 1);
    boundaries.push(0);
    let mut start = 0;
    for remaining in (1..group_count).rev() {
        let end = ((start + 1)..=(n - remaining))
            .rev()
            .find(|&end| cost(start, end) <= optimum && suffix[end][remaining] <= optimum)
            .unwrap_or(start + 1);
        boundaries.push(end);
        start = end;
    }
    boundaries.push(n);

    boundaries
        .windows(2)
        .map(|w| syllables[w[0]..w[1]].iter().map(|s| s.as_ref()).collect())
        .collect()
}
