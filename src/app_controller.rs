use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::ConfigError;
use crate::input::DirectoryInput;
use crate::ocr::{GoogleVision, OcrResult, TextExtractor, TextRecognizer};
use crate::output::Output;
use crate::transformation::{CancellationFlag, TransformationChain};

// @module: Application controller for the OCR pipeline

/// Runs discovery, recognition, transformation and output in order
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: OCR backend
    recognizer: Arc<dyn TextRecognizer>,
    // @field: Stops the top-level chains between stages
    cancel: CancellationFlag,
}

impl Controller {
    // @method: Create a controller recognising with Google Vision
    pub fn with_config(config: Config) -> Result<Self> {
        if config.vision.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey("Google Vision".to_string()).into());
        }
        let recognizer = GoogleVision::new(
            config.vision.api_key.clone(),
            config.vision.endpoint.clone(),
            Some(Duration::from_secs(config.vision.timeout_secs)),
        );
        Ok(Self::with_recognizer(config, Arc::new(recognizer)))
    }

    // @method: Create a controller with a custom OCR backend
    pub fn with_recognizer(config: Config, recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self {
            config,
            recognizer,
            cancel: CancellationFlag::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Flag that cancels the run between transformation stages
    pub fn cancellation_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Run the whole pipeline and return the transformed OCR results
    pub async fn run(&self) -> Result<Vec<OcrResult>> {
        let start_time = std::time::Instant::now();

        let input = DirectoryInput::from_config(&self.config.input)?;
        let chain = TransformationChain::from_configs(&self.config.transformations)
            .context("Failed to build transformations")?;
        let outputs = self
            .config
            .outputs
            .iter()
            .map(Output::from_config)
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to build outputs")?;

        let extractor = TextExtractor::new(
            self.recognizer.clone(),
            self.config.extractor.n_tasks,
            self.config.extractor.return_exceptions,
        )
        .context("Invalid extractor settings")?;

        let images = input.get_images()?;
        if images.is_empty() {
            warn!("No images found in {:?}", input.input_directory());
            return Ok(Vec::new());
        }

        let progress_bar = ProgressBar::new(images.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Recognizing");

        let pb = progress_bar.clone();
        let mut results = extractor
            .extract_from_images(&images, move |current, _total| pb.set_position(current as u64))
            .await
            .context("Text extraction failed")?;
        progress_bar.finish_with_message("Recognized");

        let failed = results.iter().filter(|r| !r.success).count();
        if failed > 0 {
            warn!("{} of {} image(s) could not be recognized", failed, results.len());
        }

        if !chain.is_empty() {
            for result in results.iter_mut().filter(|r| r.success) {
                result.extracted_text = chain
                    .apply_cancellable(&result.extracted_text, &self.cancel)
                    .await
                    .with_context(|| format!("Transformations failed for {:?}", result.image_file.path))?;
            }
        }

        for output in &outputs {
            output.save_results(&results).await?;
        }

        info!(
            "Processed {} image(s) in {:.1}s",
            results.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(results)
    }
}
