use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use crate::app_config::OutputConfig;
use crate::duration::{build_calculator, DurationCalculator};
use crate::errors::ConfigError;
use crate::file_utils::FileManager;
use crate::ocr::{combine_successful, OcrResult};
use crate::timed::{read_timed_stream, word_durations, write_timed_stream, TimedSummary};
use crate::transformation::TransformationChain;

// @module: Result sinks

/// Where and how results are saved
#[derive(Debug, Clone)]
pub enum OutputTarget {
    // @output: Successful texts joined by newlines into one file
    Combined { output_file: PathBuf },
    // @output: `<image stem>.txt` per successful image
    Separate { output_directory: PathBuf },
    // @output: JSON lines of word/duration pairs
    Timed {
        path: PathBuf,
        calculator: Arc<dyn DurationCalculator>,
        reload: bool,
    },
}

/// A sink together with the stages applied right before saving
#[derive(Debug, Clone)]
pub struct Output {
    target: OutputTarget,
    chain: TransformationChain,
}

impl Output {
    pub fn new(target: OutputTarget, chain: TransformationChain) -> Self {
        Self { target, chain }
    }

    pub fn from_config(config: &OutputConfig) -> Result<Self, ConfigError> {
        let chain = TransformationChain::from_configs(config.transformations())?;
        let target = match config {
            OutputConfig::Combined { output_file, .. } => OutputTarget::Combined {
                output_file: output_file.clone(),
            },
            OutputConfig::Separate { output_directory, .. } => OutputTarget::Separate {
                output_directory: output_directory.clone(),
            },
            OutputConfig::Timed {
                path,
                duration_calculator,
                reload,
                ..
            } => OutputTarget::Timed {
                path: path.clone(),
                calculator: build_calculator(duration_calculator)?,
                reload: *reload,
            },
        };
        Ok(Self::new(target, chain))
    }

    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    /// Apply this output's stages and save. Failed OCR results are skipped.
    pub async fn save_results(&self, results: &[OcrResult]) -> Result<()> {
        match &self.target {
            OutputTarget::Combined { output_file } => {
                let text = self.chain.apply(&combine_successful(results)).await?;
                FileManager::write_to_file(output_file, &text)?;
                info!("Saved combined output to {:?}", output_file);
            }
            OutputTarget::Separate { output_directory } => {
                FileManager::ensure_dir(output_directory)?;
                let mut written = 0;
                for result in results.iter().filter(|r| r.success) {
                    let file_name = result
                        .image_file
                        .output_path()
                        .file_name()
                        .map(|name| name.to_os_string())
                        .with_context(|| format!("Image path has no file name: {:?}", result.image_file.path))?;
                    let text = self.chain.apply(&result.extracted_text).await?;
                    FileManager::write_to_file(output_directory.join(file_name), &text)?;
                    written += 1;
                }
                info!("Saved {} separate output file(s) to {:?}", written, output_directory);
            }
            OutputTarget::Timed { path, calculator, reload } => {
                if !*reload && FileManager::file_exists(path) {
                    let summary = TimedSummary::from_pairs(&read_timed_stream(path)?);
                    info!("Keeping existing timed output {:?}: {}", path, summary);
                    return Ok(());
                }
                let text = self.chain.apply(&combine_successful(results)).await?;
                write_timed_stream(path, &word_durations(&text, calculator.as_ref()))?;
            }
        }
        Ok(())
    }
}
