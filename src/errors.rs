/*!
 * Error types for the readscan application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with LLM provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The API answered but carried no text
    #[error("Provider returned empty content: {0}")]
    EmptyContent(String),
}

/// Errors raised while turning configuration into runtime objects
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A numeric setting is outside its allowed range
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Name of the offending setting
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// A separator that cannot be used for its purpose
    #[error("Invalid separator for '{field}': {reason}")]
    InvalidSeparator {
        /// Name of the offending setting
        field: &'static str,
        /// Why the separator was rejected
        reason: String,
    },

    /// A language tag that is not a known ISO 639 code
    #[error("Unknown language tag: {0}")]
    UnknownLanguage(String),

    /// A required credential is empty
    #[error("Missing API key for {0}")]
    MissingApiKey(String),

    /// The configured input location cannot be used
    #[error("Invalid input path: {0}")]
    InvalidInput(String),

    /// A referenced resource could not be loaded
    #[error("Failed to load {what}: {reason}")]
    LoadFailed {
        /// Resource description
        what: String,
        /// Underlying failure
        reason: String,
    },
}

/// Errors that can occur during text recognition
#[derive(Error, Debug)]
pub enum OcrError {
    /// Reading the image from disk failed
    #[error("Failed to read image {path}: {reason}")]
    ImageRead {
        /// Image location
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// The HTTP call to the recognition service failed
    #[error("Recognition request failed: {0}")]
    RequestFailed(String),

    /// The recognition service reported an error
    #[error("Vision API error: {0}")]
    Api(String),

    /// The response could not be decoded
    #[error("Failed to parse recognition response: {0}")]
    ParseError(String),
}

/// Errors that can occur while applying a transformation stage
#[derive(Error, Debug)]
pub enum TransformError {
    /// Error from a network-backed stage
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The chain was cancelled between two stages
    #[error("Transformation cancelled before stage {stage}")]
    Cancelled {
        /// Index of the stage that did not start
        stage: usize,
    },

    /// A word is wider than a rendered line can hold
    #[error("Word '{word}' ({length} characters) does not fit in a line of {sequence_length}")]
    WordExceedsLine {
        /// The offending word
        word: String,
        /// Its length in characters
        length: usize,
        /// Configured line width
        sequence_length: usize,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from text recognition
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Error from a transformation
    #[error("Transformation error: {0}")]
    Transform(#[from] TransformError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
