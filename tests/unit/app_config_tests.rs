/*!
 * Tests for application configuration functionality
 */

#![allow(non_snake_case)]

use std::path::PathBuf;

use readscan::app_config::{
    Config, DurationConfig, InputConfig, LlmProviderConfig, LogLevel, OutputConfig, TransformationConfig,
};
use readscan::TransformationChain;

use crate::common::{create_temp_dir, create_test_file};

const FULL_CONFIG: &str = r#"{
    "input": {
        "type": "directory",
        "input_directory": "scans",
        "supported_extensions": [".png", ".jpg"]
    },
    "vision": { "api_key": "vision-key" },
    "extractor": { "n_tasks": 4, "return_exceptions": true },
    "transformations": [
        {
            "type": "llm-cleanup",
            "llm_provider": { "type": "anthropic", "api_key": "sk-ant", "timeout_secs": 120 }
        }
    ],
    "outputs": [
        { "type": "combined", "output_file": "out/book.txt" },
        {
            "type": "separate",
            "output_directory": "out/pages",
            "transformations": [{ "type": "split-long-words", "separator": "-" }]
        },
        {
            "type": "timed",
            "path": "out/words.jsonl",
            "reload": false,
            "duration_calculator": { "type": "frequency", "frequency_list": "pl.txt" },
            "transformations": [
                { "type": "duplicate-long-words" },
                { "type": "join-words-moving-center", "sequence_length": 40 }
            ]
        }
    ],
    "log_level": "debug"
}"#;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(
        config.input,
        InputConfig::Directory {
            input_directory: PathBuf::from("input"),
            supported_extensions: [".jpg", ".jpeg", ".png", ".bmp", ".tiff", ".tif", ".webp"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    );
    assert_eq!(config.extractor.n_tasks, 12);
    assert!(!config.extractor.return_exceptions);
    assert_eq!(config.vision.endpoint, "https://vision.googleapis.com");
    assert!(config.transformations.is_empty());
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_full_config_withEverySection_shouldParse() {
    let config: Config = serde_json::from_str(FULL_CONFIG).unwrap();

    assert_eq!(config.extractor.n_tasks, 4);
    assert!(config.extractor.return_exceptions);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.vision.timeout_secs, 60);

    match &config.transformations[0] {
        TransformationConfig::LlmCleanup {
            llm_provider:
                LlmProviderConfig::Anthropic {
                    model,
                    max_tokens,
                    timeout_secs,
                    ..
                },
            ..
        } => {
            assert_eq!(model, "claude-haiku-4-5");
            assert_eq!(*max_tokens, 64000);
            assert_eq!(*timeout_secs, Some(120));
        }
        other => panic!("unexpected stage {:?}", other),
    }

    assert_eq!(config.outputs.len(), 3);
    assert_eq!(config.outputs[0].kind(), "combined");
    assert_eq!(
        config.outputs[1].transformations(),
        &[TransformationConfig::SplitLongWords {
            max_syllable_group_length: 10,
            separator: "-".to_string(),
            lang: "pl_PL".to_string(),
        }]
    );
    match &config.outputs[2] {
        OutputConfig::Timed {
            reload,
            duration_calculator,
            transformations,
            ..
        } => {
            assert!(!reload);
            assert_eq!(
                duration_calculator,
                &DurationConfig::Frequency {
                    language: "pl".to_string(),
                    min_duration: 0.5,
                    max_duration: 2.0,
                    base_frequency: 1e-5,
                    frequency_list: PathBuf::from("pl.txt"),
                }
            );
            let chain = TransformationChain::from_configs(transformations).unwrap();
            assert_eq!(chain.stage_names(), vec!["duplicate-long-words", "join-words-moving-center"]);
        }
        other => panic!("unexpected output {:?}", other),
    }

    assert!(config.validate().is_ok());
}

#[test]
fn test_config_withUnknownField_shouldBeRejected() {
    let result: Result<Config, _> = serde_json::from_str(r#"{ "outputs": [], "source_language": "en" }"#);
    assert!(result.is_err());

    let result: Result<Config, _> =
        serde_json::from_str(r#"{ "outputs": [{ "type": "combined", "output_file": "a.txt", "append": true }] }"#);
    assert!(result.is_err());
}

#[test]
fn test_config_validation_withInvalidStages_shouldFail() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.transformations.push(TransformationConfig::SplitLongWords {
        max_syllable_group_length: 0,
        separator: " ".to_string(),
        lang: "pl_PL".to_string(),
    });
    assert!(config.validate().is_err());

    config.transformations.clear();
    config.transformations.push(TransformationConfig::LlmCleanup {
        llm_provider: LlmProviderConfig::OpenAI {
            api_key: String::new(),
            model: "gpt-5-nano".to_string(),
            endpoint: String::new(),
            timeout_secs: None,
        },
        system_prompt: "Clean it".to_string(),
    });
    assert!(config.validate().is_err());

    config.transformations.clear();
    config.extractor.n_tasks = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_save_and_load_withTempFile_shouldKeepValues() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(dir.path(), "conf.json", FULL_CONFIG).unwrap();
    let config = Config::load(&path).unwrap();

    let copy = dir.path().join("copy.json");
    config.save(&copy).unwrap();
    let reloaded = Config::load(&copy).unwrap();
    assert_eq!(reloaded.outputs, config.outputs);
    assert_eq!(reloaded.transformations, config.transformations);
    assert_eq!(reloaded.input, config.input);
}

#[test]
fn test_config_load_withMissingFile_shouldFail() {
    assert!(Config::load("/nonexistent/conf.json").is_err());
}
