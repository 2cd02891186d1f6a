/*!
 * In-memory text recognizer for pipeline tests
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use readscan::errors::OcrError;
use readscan::ocr::TextRecognizer;

/// Answers with a fixed text per image stem; unknown stems fail
#[derive(Debug, Default)]
pub struct MockRecognizer {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the text recognised for images named `<stem>.*`
    pub fn with_page(mut self, stem: &str, text: &str) -> Self {
        self.pages.insert(stem.to_string(), text.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecognizer for MockRecognizer {
    async fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let stem = image
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        self.pages
            .get(&stem)
            .cloned()
            .ok_or_else(|| OcrError::Api(format!("Unreadable page {}", stem)))
    }
}
