/*!
 * End-to-end pipeline tests with an in-memory recognizer
 */

#![allow(non_snake_case)]

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use readscan::app_config::{Config, DurationConfig, InputConfig, OutputConfig, TransformationConfig};
use readscan::timed::read_timed_stream;
use readscan::Controller;

use crate::common::mock_recognizer::MockRecognizer;
use crate::common::{create_temp_dir, init_logging};

/// Write a dummy image whose modification time lies `age_secs` in the past
fn scan(dir: &Path, name: &str, age_secs: u64) {
    let path = dir.join(name);
    fs::write(&path, b"not really an image").unwrap();
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(age_secs))
        .unwrap();
}

fn config_for(root: &Path, outputs: Vec<OutputConfig>) -> Config {
    Config {
        input: InputConfig::Directory {
            input_directory: root.join("scans"),
            supported_extensions: vec![".png".to_string(), ".jpg".to_string()],
        },
        outputs,
        ..Config::default()
    }
}

fn pages() -> MockRecognizer {
    MockRecognizer::new()
        .with_page("p1", "Ala ma kota")
        .with_page("p2", "i psa")
        .with_page("p3", "koniec")
}

fn prepare_scans(root: &Path) {
    let scans = root.join("scans");
    fs::create_dir_all(&scans).unwrap();
    scan(&scans, "p1.png", 300);
    scan(&scans, "p2.jpg", 200);
    scan(&scans, "p3.png", 100);
    scan(&scans, "notes.txt", 50);
}

#[tokio::test]
async fn test_run_withAllOutputKinds_shouldWriteEveryOutput() {
    init_logging();
    let dir = create_temp_dir().unwrap();
    prepare_scans(dir.path());
    let combined = dir.path().join("out").join("book.txt");
    let pages_dir = dir.path().join("out").join("pages");
    let timed = dir.path().join("out").join("words.jsonl");

    let config = config_for(
        dir.path(),
        vec![
            OutputConfig::Combined {
                output_file: combined.clone(),
                transformations: Vec::new(),
            },
            OutputConfig::Separate {
                output_directory: pages_dir.clone(),
                transformations: vec![TransformationConfig::DuplicateLongWords {
                    max_syllable_group_length: 3,
                }],
            },
            OutputConfig::Timed {
                path: timed.clone(),
                duration_calculator: DurationConfig::Default { value: 0.5 },
                reload: true,
                transformations: Vec::new(),
            },
        ],
    );
    let recognizer = Arc::new(pages());
    let controller = Controller::with_recognizer(config, recognizer.clone());

    let results = controller.run().await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(recognizer.calls(), 3);

    assert_eq!(fs::read_to_string(&combined).unwrap(), "Ala ma kota\ni psa\nkoniec");
    assert_eq!(
        fs::read_to_string(pages_dir.join("p2.txt")).unwrap(),
        "i   psa"
    );
    assert_eq!(
        fs::read_to_string(pages_dir.join("p3.txt")).unwrap(),
        "koniec koniec"
    );

    let pairs = read_timed_stream(&timed).unwrap();
    assert_eq!(pairs.len(), 6);
    assert_eq!(pairs[0].word, "Ala");
    assert_eq!(pairs[5].word, "koniec");
    assert!(pairs.iter().all(|p| p.duration == 0.5));
}

#[tokio::test]
async fn test_run_withTopLevelStages_shouldTransformBeforeOutputs() {
    let dir = create_temp_dir().unwrap();
    prepare_scans(dir.path());
    let combined = dir.path().join("book.txt");

    let mut config = config_for(
        dir.path(),
        vec![OutputConfig::Combined {
            output_file: combined.clone(),
            transformations: vec![TransformationConfig::JoinWordsMovingCenter {
                sequence_length: 20,
                word_separator: "_".to_string(),
            }],
        }],
    );
    config.transformations = vec![TransformationConfig::DuplicateLongWords {
        max_syllable_group_length: 5,
    }];
    let controller = Controller::with_recognizer(config, Arc::new(pages()));

    let results = controller.run().await.unwrap();
    assert_eq!(results[2].extracted_text, "koniec koniec");

    let rendered = fs::read_to_string(&combined).unwrap();
    let lines: Vec<&str> = rendered.split('\n').collect();
    // Ala, ma, kota, i, psa, koniec, koniec
    assert_eq!(lines.len(), 7);
    assert!(lines.iter().all(|line| line.chars().count() == 20));
}

#[tokio::test]
async fn test_run_withEmptyDirectory_shouldReturnNothingAndSkipOutputs() {
    let dir = create_temp_dir().unwrap();
    fs::create_dir_all(dir.path().join("scans")).unwrap();
    let combined = dir.path().join("book.txt");
    let config = config_for(
        dir.path(),
        vec![OutputConfig::Combined {
            output_file: combined.clone(),
            transformations: Vec::new(),
        }],
    );
    let recognizer = Arc::new(pages());
    let controller = Controller::with_recognizer(config, recognizer.clone());

    assert!(controller.run().await.unwrap().is_empty());
    assert_eq!(recognizer.calls(), 0);
    assert!(!combined.exists());
}

#[tokio::test]
async fn test_run_withUnreadablePage_shouldFailUnlessExceptionsAreReturned() {
    let dir = create_temp_dir().unwrap();
    prepare_scans(dir.path());
    scan(&dir.path().join("scans"), "smudge.png", 10);
    let combined = dir.path().join("book.txt");
    let outputs = vec![OutputConfig::Combined {
        output_file: combined.clone(),
        transformations: Vec::new(),
    }];

    let strict = Controller::with_recognizer(config_for(dir.path(), outputs.clone()), Arc::new(pages()));
    assert!(strict.run().await.is_err());
    assert!(!combined.exists());

    let mut config = config_for(dir.path(), outputs);
    config.extractor.return_exceptions = true;
    let lenient = Controller::with_recognizer(config, Arc::new(pages()));
    let results = lenient.run().await.unwrap();
    assert_eq!(results.len(), 4);
    assert!(!results[3].success);
    assert!(results[3].error_message.contains("smudge"));
    assert_eq!(fs::read_to_string(&combined).unwrap(), "Ala ma kota\ni psa\nkoniec");
}

#[tokio::test]
async fn test_run_withCancelledFlag_shouldAbortTopLevelStages() {
    let dir = create_temp_dir().unwrap();
    prepare_scans(dir.path());
    let mut config = config_for(dir.path(), Vec::new());
    config.transformations = vec![TransformationConfig::DuplicateLongWords {
        max_syllable_group_length: 5,
    }];
    let controller = Controller::with_recognizer(config, Arc::new(pages()));
    controller.cancellation_flag().cancel();
    assert!(controller.run().await.is_err());
}

#[tokio::test]
async fn test_run_withMissingInputDirectory_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let controller = Controller::with_recognizer(config_for(dir.path(), Vec::new()), Arc::new(pages()));
    assert!(controller.run().await.is_err());
}

#[tokio::test]
async fn test_run_withZeroTasks_shouldFailBeforeRecognition() {
    let dir = create_temp_dir().unwrap();
    prepare_scans(dir.path());
    let mut config = config_for(dir.path(), Vec::new());
    config.extractor.n_tasks = 0;
    let recognizer = Arc::new(pages());
    let controller = Controller::with_recognizer(config, recognizer.clone());

    let error = controller.run().await.unwrap_err();
    assert!(format!("{:#}", error).contains("n_tasks"));
    assert_eq!(recognizer.calls(), 0);
}
