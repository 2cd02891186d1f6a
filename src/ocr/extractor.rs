use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, warn};
use tokio::sync::Semaphore;

use crate::errors::{ConfigError, OcrError};

use super::{ImageFile, OcrResult, TextRecognizer};

/// Recognizes many images with bounded concurrency
#[derive(Debug, Clone)]
pub struct TextExtractor {
    recognizer: Arc<dyn TextRecognizer>,
    n_tasks: usize,
    return_exceptions: bool,
}

impl TextExtractor {
    /// `n_tasks` bounds how many images are recognized at once
    pub fn new(
        recognizer: Arc<dyn TextRecognizer>,
        n_tasks: usize,
        return_exceptions: bool,
    ) -> Result<Self, ConfigError> {
        if n_tasks == 0 {
            return Err(ConfigError::InvalidValue {
                field: "n_tasks",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(Self {
            recognizer,
            n_tasks,
            return_exceptions,
        })
    }

    /// Recognize every image, results in input order.
    ///
    /// With `return_exceptions` a failed image becomes an unsuccessful
    /// `OcrResult`; otherwise the first failure aborts the whole run.
    pub async fn extract_from_images(
        &self,
        images: &[ImageFile],
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<Vec<OcrResult>, OcrError> {
        let semaphore = Arc::new(Semaphore::new(self.n_tasks));
        let total = images.len();
        let processed = Arc::new(AtomicUsize::new(0));

        // Permits bound how many images are recognized at once
        let mut pending: FuturesUnordered<_> = images
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, image)| {
                let recognizer = self.recognizer.clone();
                let semaphore = semaphore.clone();
                let processed = processed.clone();
                let progress_callback = progress_callback.clone();

                async move {
                    let result = match semaphore.acquire().await {
                        Ok(_permit) => recognizer.recognize(&image.path).await,
                        Err(e) => Err(OcrError::RequestFailed(format!("Extraction stopped: {}", e))),
                    };
                    let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total);
                    (index, image, result)
                }
            })
            .collect();

        let mut results: Vec<(usize, OcrResult)> = Vec::with_capacity(total);
        while let Some((index, image, result)) = pending.next().await {
            match result {
                Ok(text) => {
                    debug!("Recognized {} characters from {:?}", text.chars().count(), image.path);
                    results.push((index, OcrResult::succeeded(image, text)));
                }
                Err(e) if self.return_exceptions => {
                    warn!("Failed to recognize {:?}: {}", image.path, e);
                    results.push((index, OcrResult::failed(image, e.to_string())));
                }
                Err(e) => return Err(e),
            }
        }

        // Restore input order
        results.sort_by_key(|(index, _)| *index);
        Ok(results.into_iter().map(|(_, result)| result).collect())
    }
}
