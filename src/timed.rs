use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::duration::DurationCalculator;
use crate::file_utils::FileManager;

// @module: Word/duration streams for timed playback

/// One word of a timed stream and how long it stays on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDurationPair {
    pub word: String,
    pub duration: f64,
}

/// Aggregate figures of a timed stream
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimedSummary {
    pub word_count: usize,
    pub total_duration: f64,
}

impl TimedSummary {
    pub fn from_pairs(pairs: &[WordDurationPair]) -> Self {
        Self {
            word_count: pairs.len(),
            total_duration: pairs.iter().map(|p| p.duration).sum(),
        }
    }
}

impl std::fmt::Display for TimedSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} words, {:.2}s total", self.word_count, self.total_duration)
    }
}

/// Pair every whitespace-separated word of `text` with its duration
pub fn word_durations(text: &str, calculator: &dyn DurationCalculator) -> Vec<WordDurationPair> {
    text.split_whitespace()
        .map(|word| WordDurationPair {
            word: word.to_string(),
            duration: calculator.calculate_duration(word),
        })
        .collect()
}

/// Serialize pairs as JSON lines
pub fn encode_timed_stream(pairs: &[WordDurationPair]) -> Result<String> {
    let lines = pairs
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to serialize word durations")?;
    Ok(lines.join("\n"))
}

/// Write pairs to `path` as JSON lines, creating parent directories
pub fn write_timed_stream<P: AsRef<Path>>(path: P, pairs: &[WordDurationPair]) -> Result<TimedSummary> {
    let path = path.as_ref();
    FileManager::write_to_file(path, &encode_timed_stream(pairs)?)?;
    let summary = TimedSummary::from_pairs(pairs);
    info!("Wrote timed output to {:?}: {}", path, summary);
    Ok(summary)
}

/// Read a JSON-lines stream back; blank lines are skipped
pub fn read_timed_stream<P: AsRef<Path>>(path: P) -> Result<Vec<WordDurationPair>> {
    let path = path.as_ref();
    let content = FileManager::read_to_string(path)?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Invalid timed record at {:?} line {}", path, number + 1))
        })
        .collect()
}
