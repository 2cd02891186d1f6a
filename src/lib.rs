/*!
 * # readscan - OCR and reading-aid text transformations
 *
 * A Rust library that turns photographed book pages into text and reshapes
 * that text for assisted reading.
 *
 * ## Features
 *
 * - Text recognition of page images with Google Cloud Vision
 * - Balanced syllable splitting of long words (hyphenation patterns)
 * - Repetition of long tokens
 * - Fixed-width lines centered on each word, for rapid serial reading
 * - LLM cleanup of OCR noise (OpenAI, Anthropic)
 * - Word/duration streams with constant or frequency-weighted timing
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `input`: Image discovery
 * - `ocr`: Text recognition and bounded-concurrency extraction
 * - `transformation`: Text-to-text stages and the chain that runs them
 * - `syllables`: Hyphenation-based syllabification
 * - `duration`: Per-word display duration strategies
 * - `timed`: Word/duration streams
 * - `output`: Result sinks
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::openai`: OpenAI API client
 *   - `providers::anthropic`: Anthropic API client
 * - `file_utils`: File system operations
 * - `language_utils`: Language tag utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod duration;
pub mod errors;
pub mod file_utils;
pub mod input;
pub mod language_utils;
pub mod ocr;
pub mod output;
pub mod providers;
pub mod syllables;
pub mod timed;
pub mod transformation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use duration::{ConstantDuration, DurationCalculator, FrequencyDuration, FrequencyTable};
pub use errors::{AppError, ConfigError, OcrError, ProviderError, TransformError};
pub use language_utils::LanguageTag;
pub use transformation::{
    CancellationFlag, DuplicateLongWords, JoinWordsMovingCenter, SplitLongWords, Transformation,
    TransformationChain,
};
