/*!
 * Centered word-window renderer.
 *
 * Emits one line per word. Each line is exactly `sequence_length`
 * characters wide and shows the current word near its middle, flanked by as
 * many whole neighbouring words as fit in half the width on each side. The
 * padding character defaults to the blank braille cell (U+2800), which keeps
 * the line width constant on refreshable braille displays without raising
 * any dots.
 */

use async_trait::async_trait;

use crate::errors::{ConfigError, TransformError};

use super::Transformation;

/// Blank braille pattern used as padding and word separator
pub const BRAILLE_BLANK: char = '\u{2800}';

/// Renders a moving window of words centered on each word in turn
#[derive(Debug, Clone)]
pub struct JoinWordsMovingCenter {
    sequence_length: usize,
    word_separator: char,
}

impl JoinWordsMovingCenter {
    /// `word_separator` must be exactly one character, it is also the padding
    pub fn new(sequence_length: usize, word_separator: &str) -> Result<Self, ConfigError> {
        if sequence_length < 3 {
            return Err(ConfigError::InvalidValue {
                field: "sequence_length",
                reason: format!("must be at least 3, got {}", sequence_length),
            });
        }
        let mut chars = word_separator.chars();
        let separator = match (chars.next(), chars.next()) {
            (Some(ch), None) => ch,
            _ => {
                return Err(ConfigError::InvalidSeparator {
                    field: "word_separator",
                    reason: format!(
                        "must be exactly one character, got {:?}",
                        word_separator
                    ),
                })
            }
        };
        Ok(Self {
            sequence_length,
            word_separator: separator,
        })
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    pub fn word_separator(&self) -> char {
        self.word_separator
    }

    /// Render one fixed-width line per word.
    ///
    /// Fails when a word is too wide to be shown with a separator on each
    /// side. Panics if a rendered line does not have the configured width,
    /// which can only mean the window arithmetic is broken.
    pub fn render_lines<S: AsRef<str>>(&self, words: &[S]) -> Result<Vec<String>, TransformError> {
        let lengths: Vec<usize> = words.iter().map(|w| w.as_ref().chars().count()).collect();
        let mut lines = Vec::with_capacity(words.len());

        for (index, word) in words.iter().enumerate() {
            let word = word.as_ref();
            let word_length = lengths[index];
            if word_length + 2 > self.sequence_length {
                return Err(TransformError::WordExceedsLine {
                    word: word.to_string(),
                    length: word_length,
                    sequence_length: self.sequence_length,
                });
            }
            let half = word_length.div_ceil(2);

            let (left_count, left_padding) =
                self.fit_context(half, (0..index).rev().map(|i| lengths[i]));
            let (right_count, right_padding) =
                self.fit_context(half, (index + 1..words.len()).map(|i| lengths[i]));

            let mut parts: Vec<String> = Vec::with_capacity(left_count + right_count + 3);
            parts.push(self.padding(left_padding));
            // Left context runs outward from the current word
            parts.extend(
                words[index - left_count..index]
                    .iter()
                    .rev()
                    .map(|w| w.as_ref().to_string()),
            );
            parts.push(word.to_string());
            parts.extend(
                words[index + 1..index + 1 + right_count]
                    .iter()
                    .map(|w| w.as_ref().to_string()),
            );
            parts.push(self.padding(right_padding));

            let content = parts.join(self.word_separator.to_string().as_str());
            let line = self.right_justify(content);
            assert_eq!(
                line.chars().count(),
                self.sequence_length,
                "rendered line for word {} has the wrong width",
                index
            );
            lines.push(line);
        }

        Ok(lines)
    }

    /// Greedily accept neighbours, nearest first, while they fit in half a
    /// line; returns how many were taken and the padding left on that side
    fn fit_context(&self, half: usize, neighbours: impl Iterator<Item = usize>) -> (usize, usize) {
        let mut taken = 0;
        let mut used = 0;
        for length in neighbours {
            if self.remaining(half, taken, used) < length as isize {
                break;
            }
            taken += 1;
            used += length;
        }
        let padding = (self.remaining(half, taken, used) + 1).max(0) as usize;
        (taken, padding)
    }

    /// Characters still free on one side: half the line minus the reserved
    /// half-word, the accepted words, their separators and an edge separator
    fn remaining(&self, half: usize, taken: usize, used: usize) -> isize {
        (self.sequence_length / 2) as isize - (half + used + taken + 2) as isize
    }

    fn padding(&self, width: usize) -> String {
        std::iter::repeat_n(self.word_separator, width).collect()
    }

    fn right_justify(&self, content: String) -> String {
        let width = content.chars().count();
        if width >= self.sequence_length {
            return content;
        }
        let mut line = self.padding(self.sequence_length - width);
        line.push_str(&content);
        line
    }
}

impl Default for JoinWordsMovingCenter {
    fn default() -> Self {
        Self {
            sequence_length: 30,
            word_separator: BRAILLE_BLANK,
        }
    }
}

#[async_trait]
impl Transformation for JoinWordsMovingCenter {
    fn name(&self) -> &'static str {
        "join-words-moving-center"
    }

    async fn transform(&self, text: &str) -> Result<String, TransformError> {
        let words: Vec<&str> = text.split_whitespace().collect();
        Ok(self.render_lines(&words)?.join("\n"))
    }
}
