/*!
 * Text transformation pipeline.
 *
 * Every stage implements `Transformation`: a stateless text-to-text rewrite
 * configured once at construction. A `TransformationChain` runs stages
 * strictly in order, each stage's output feeding the next one.
 *
 * - `split_long_words`: balanced syllable splitting under a length bound
 * - `duplicate_long_words`: repetition of long tokens
 * - `moving_center`: fixed-width lines centered on each word
 * - `llm_cleanup`: network-backed OCR cleanup
 * - `tokenizer`: whitespace-preserving lexer shared by the word stages
 */

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::app_config::TransformationConfig;
use crate::errors::{ConfigError, TransformError};

pub mod duplicate_long_words;
pub mod llm_cleanup;
pub mod moving_center;
pub mod split_long_words;
pub mod tokenizer;

pub use duplicate_long_words::DuplicateLongWords;
pub use llm_cleanup::LlmCleanup;
pub use moving_center::JoinWordsMovingCenter;
pub use split_long_words::SplitLongWords;

/// A configured text rewriting stage
#[async_trait]
pub trait Transformation: Send + Sync + Debug {
    /// Type discriminator of the stage, as used in configuration
    fn name(&self) -> &'static str;

    /// Rewrite `text`; never mutates the stage
    async fn transform(&self, text: &str) -> Result<String, TransformError>;
}

/// Build a stage from its configuration
pub fn build_transformation(config: &TransformationConfig) -> Result<Arc<dyn Transformation>, ConfigError> {
    let stage: Arc<dyn Transformation> = match config {
        TransformationConfig::SplitLongWords {
            max_syllable_group_length,
            separator,
            lang,
        } => Arc::new(SplitLongWords::new(*max_syllable_group_length, separator, lang)?),
        TransformationConfig::DuplicateLongWords {
            max_syllable_group_length,
        } => Arc::new(DuplicateLongWords::new(*max_syllable_group_length)?),
        TransformationConfig::JoinWordsMovingCenter {
            sequence_length,
            word_separator,
        } => Arc::new(JoinWordsMovingCenter::new(*sequence_length, word_separator)?),
        TransformationConfig::LlmCleanup {
            llm_provider,
            system_prompt,
        } => Arc::new(LlmCleanup::new(llm_provider.build()?, system_prompt.clone())),
    };
    Ok(stage)
}

/// Cooperative cancellation signal, checked between chain stages
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Ordered list of stages applied one after another
#[derive(Debug, Clone, Default)]
pub struct TransformationChain {
    stages: Vec<Arc<dyn Transformation>>,
}

impl TransformationChain {
    pub fn new(stages: Vec<Arc<dyn Transformation>>) -> Self {
        Self { stages }
    }

    /// Build every configured stage, failing on the first invalid one
    pub fn from_configs(configs: &[TransformationConfig]) -> Result<Self, ConfigError> {
        let stages = configs
            .iter()
            .map(build_transformation)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(stages))
    }

    /// Append a stage
    pub fn with_stage(mut self, stage: Arc<dyn Transformation>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Names of the stages in application order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Apply all stages in order; an empty chain returns the input
    pub async fn apply(&self, text: &str) -> Result<String, TransformError> {
        self.run(text, None).await
    }

    /// Apply all stages, stopping before the next stage once `cancel` is set.
    /// Partial output is discarded.
    pub async fn apply_cancellable(
        &self,
        text: &str,
        cancel: &CancellationFlag,
    ) -> Result<String, TransformError> {
        self.run(text, Some(cancel)).await
    }

    async fn run(&self, text: &str, cancel: Option<&CancellationFlag>) -> Result<String, TransformError> {
        let mut current = text.to_string();
        for (index, stage) in self.stages.iter().enumerate() {
            if cancel.is_some_and(|flag| flag.is_cancelled()) {
                debug!("Chain cancelled before stage {} ({})", index + 1, stage.name());
                return Err(TransformError::Cancelled { stage: index });
            }
            debug!(
                "Applying transformation {}/{}: {}",
                index + 1,
                self.stages.len(),
                stage.name()
            );
            current = stage.transform(&current).await?;
        }
        Ok(current)
    }
}
