/*!
 * Text recognition of page images.
 *
 * - `vision`: Google Cloud Vision `TEXT_DETECTION` client
 * - `extractor`: bounded-concurrency recognition of many images
 *
 * Recognizers implement `TextRecognizer`, so the extractor can be driven by
 * any backend (tests use an in-memory one).
 */

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::OcrError;

pub mod extractor;
pub mod vision;

pub use extractor::TextExtractor;
pub use vision::GoogleVision;

/// Recognizes the text printed on an image
#[async_trait]
pub trait TextRecognizer: Send + Sync + Debug {
    async fn recognize(&self, image: &Path) -> Result<String, OcrError>;
}

/// A page image to recognise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFile {
    pub path: PathBuf,
}

impl ImageFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Text file next to the image, same stem
    pub fn output_path(&self) -> PathBuf {
        self.path.with_extension("txt")
    }
}

/// Outcome of recognising one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    pub image_file: ImageFile,
    pub extracted_text: String,
    pub success: bool,
    #[serde(default)]
    pub error_message: String,
}

impl OcrResult {
    pub fn succeeded(image_file: ImageFile, extracted_text: String) -> Self {
        Self {
            image_file,
            extracted_text,
            success: true,
            error_message: String::new(),
        }
    }

    pub fn failed(image_file: ImageFile, error_message: String) -> Self {
        Self {
            image_file,
            extracted_text: String::new(),
            success: false,
            error_message,
        }
    }
}

/// Successful texts joined by newlines, in order
pub fn combine_successful(results: &[OcrResult]) -> String {
    results
        .iter()
        .filter(|r| r.success)
        .map(|r| r.extracted_text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
