use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ConfigError;
use crate::providers::anthropic::Anthropic;
use crate::providers::openai::OpenAI;
use crate::providers::LlmProvider;
use crate::transformation::llm_cleanup::DEFAULT_SYSTEM_PROMPT;
use crate::transformation::TransformationChain;

/// Application configuration module
/// This module handles loading, validating and saving the pipeline
/// configuration: where images come from, how they are recognised, which
/// transformations run and where the results go.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Image source
    #[serde(default)]
    pub input: InputConfig,

    /// Text recognition service
    #[serde(default)]
    pub vision: VisionConfig,

    /// Concurrency of text recognition
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Stages applied to every recognised text before outputs
    #[serde(default)]
    pub transformations: Vec<TransformationConfig>,

    /// Result sinks, each with its own stages
    #[serde(default)]
    pub outputs: Vec<OutputConfig>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Where page images are read from
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)]
pub enum InputConfig {
    // @input: Flat directory of images
    Directory {
        input_directory: PathBuf,

        #[serde(default = "default_supported_extensions")]
        supported_extensions: Vec<String>,
    },
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::Directory {
            input_directory: PathBuf::from("input"),
            supported_extensions: default_supported_extensions(),
        }
    }
}

/// Google Cloud Vision settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct VisionConfig {
    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL
    #[serde(default = "default_vision_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_vision_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Text extraction settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Maximum number of images recognised at once
    #[serde(default = "default_n_tasks")]
    pub n_tasks: usize,

    /// Keep going when an image fails, recording the failure
    #[serde(default)]
    pub return_exceptions: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            n_tasks: default_n_tasks(),
            return_exceptions: false,
        }
    }
}

/// A configured transformation stage
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)]
pub enum TransformationConfig {
    // @stage: Balanced syllable splitting of long words
    SplitLongWords {
        #[serde(default = "default_split_group_length")]
        max_syllable_group_length: usize,

        #[serde(default = "default_split_separator")]
        separator: String,

        #[serde(default = "default_split_lang")]
        lang: String,
    },
    // @stage: Repetition of long tokens
    DuplicateLongWords {
        #[serde(default = "default_duplicate_group_length")]
        max_syllable_group_length: usize,
    },
    // @stage: Fixed-width lines centered on each word
    JoinWordsMovingCenter {
        #[serde(default = "default_sequence_length")]
        sequence_length: usize,

        #[serde(default = "default_word_separator")]
        word_separator: String,
    },
    // @stage: LLM cleanup of OCR noise
    LlmCleanup {
        llm_provider: LlmProviderConfig,

        #[serde(default = "default_system_prompt")]
        system_prompt: String,
    },
}

/// LLM backend of the cleanup stage
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)]
pub enum LlmProviderConfig {
    #[serde(rename = "openai")]
    OpenAI {
        /// API key for the service
        api_key: String,

        /// Model name
        #[serde(default = "default_openai_model")]
        model: String,

        /// Service endpoint URL (optional, for OpenAI-compatible servers)
        #[serde(default = "String::new")]
        endpoint: String,

        /// Request timeout in seconds; no timeout when absent
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
    Anthropic {
        /// API key for the service
        api_key: String,

        /// Model name
        #[serde(default = "default_anthropic_model")]
        model: String,

        /// Service endpoint URL (optional)
        #[serde(default = "String::new")]
        endpoint: String,

        /// Maximum tokens generated per request
        #[serde(default = "default_anthropic_max_tokens")]
        max_tokens: u32,

        /// Request timeout in seconds; no timeout when absent
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

impl LlmProviderConfig {
    // @returns: Lowercase provider identifier
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::OpenAI { .. } => "openai",
            Self::Anthropic { .. } => "anthropic",
        }
    }

    /// Build the HTTP client for this provider
    pub fn build(&self) -> Result<Arc<dyn LlmProvider>, ConfigError> {
        let provider: Arc<dyn LlmProvider> = match self {
            Self::OpenAI {
                api_key,
                model,
                endpoint,
                timeout_secs,
            } => {
                require_api_key(api_key, self.provider_name())?;
                Arc::new(OpenAI::new(
                    api_key.as_str(),
                    endpoint.as_str(),
                    model.as_str(),
                    timeout_secs.map(Duration::from_secs),
                ))
            }
            Self::Anthropic {
                api_key,
                model,
                endpoint,
                max_tokens,
                timeout_secs,
            } => {
                require_api_key(api_key, self.provider_name())?;
                if *max_tokens == 0 {
                    return Err(ConfigError::InvalidValue {
                        field: "max_tokens",
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Arc::new(Anthropic::new(
                    api_key.as_str(),
                    endpoint.as_str(),
                    model.as_str(),
                    *max_tokens,
                    timeout_secs.map(Duration::from_secs),
                ))
            }
        };
        Ok(provider)
    }
}

fn require_api_key(api_key: &str, provider: &str) -> Result<(), ConfigError> {
    if api_key.trim().is_empty() {
        return Err(ConfigError::MissingApiKey(provider.to_string()));
    }
    Ok(())
}

/// Per-word duration strategy of a timed output
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)]
pub enum DurationConfig {
    // @strategy: Same duration for every word
    Default {
        #[serde(default = "default_constant_duration")]
        value: f64,
    },
    // @strategy: Rarer words last longer
    Frequency {
        #[serde(default = "default_frequency_language")]
        language: String,

        #[serde(default = "default_min_duration")]
        min_duration: f64,

        #[serde(default = "default_max_duration")]
        max_duration: f64,

        #[serde(default = "default_base_frequency")]
        base_frequency: f64,

        /// Word list with `word count` lines
        frequency_list: PathBuf,
    },
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self::Default {
            value: default_constant_duration(),
        }
    }
}

/// A result sink
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)]
pub enum OutputConfig {
    // @output: All texts in one file
    Combined {
        output_file: PathBuf,

        #[serde(default)]
        transformations: Vec<TransformationConfig>,
    },
    // @output: One text file per image
    Separate {
        output_directory: PathBuf,

        #[serde(default)]
        transformations: Vec<TransformationConfig>,
    },
    // @output: Word/duration stream as JSON lines
    Timed {
        path: PathBuf,

        #[serde(default)]
        duration_calculator: DurationConfig,

        #[serde(default = "default_true")]
        reload: bool,

        #[serde(default)]
        transformations: Vec<TransformationConfig>,
    },
}

impl OutputConfig {
    // @returns: Stages owned by this output
    pub fn transformations(&self) -> &[TransformationConfig] {
        match self {
            Self::Combined { transformations, .. }
            | Self::Separate { transformations, .. }
            | Self::Timed { transformations, .. } => transformations,
        }
    }

    // @returns: Output type discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Combined { .. } => "combined",
            Self::Separate { .. } => "separate",
            Self::Timed { .. } => "timed",
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_supported_extensions() -> Vec<String> {
    [".jpg", ".jpeg", ".png", ".bmp", ".tiff", ".tif", ".webp"]
        .iter()
        .map(|e| e.to_string())
        .collect()
}

fn default_vision_endpoint() -> String {
    "https://vision.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_n_tasks() -> usize {
    12
}

fn default_split_group_length() -> usize {
    10
}

fn default_split_separator() -> String {
    " ".to_string()
}

fn default_split_lang() -> String {
    "pl_PL".to_string()
}

fn default_duplicate_group_length() -> usize {
    9
}

fn default_sequence_length() -> usize {
    30
}

fn default_word_separator() -> String {
    "\u{2800}".to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_openai_model() -> String {
    "gpt-5-nano".to_string()
}

fn default_anthropic_model() -> String {
    "claude-haiku-4-5".to_string()
}

fn default_anthropic_max_tokens() -> u32 {
    64000
}

fn default_constant_duration() -> f64 {
    1.0
}

fn default_frequency_language() -> String {
    "pl".to_string()
}

fn default_min_duration() -> f64 {
    0.5
}

fn default_max_duration() -> f64 {
    2.0
}

fn default_base_frequency() -> f64 {
    1e-5
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Read a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json).with_context(|| format!("Failed to write config to file: {:?}", path))
    }

    /// Validate the configuration by constructing every stage it names
    pub fn validate(&self) -> Result<()> {
        if self.extractor.n_tasks == 0 {
            return Err(anyhow!("extractor.n_tasks must be greater than zero"));
        }

        TransformationChain::from_configs(&self.transformations)
            .context("Invalid top-level transformations")?;

        for (index, output) in self.outputs.iter().enumerate() {
            TransformationChain::from_configs(output.transformations())
                .with_context(|| format!("Invalid transformations of output {} ({})", index + 1, output.kind()))?;
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            input: InputConfig::default(),
            vision: VisionConfig::default(),
            extractor: ExtractorConfig::default(),
            transformations: Vec::new(),
            outputs: vec![OutputConfig::Combined {
                output_file: PathBuf::from("output/combined.txt"),
                transformations: Vec::new(),
            }],
            log_level: LogLevel::default(),
        }
    }
}
