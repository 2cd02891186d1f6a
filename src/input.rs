use std::path::{Path, PathBuf};

use anyhow::Result;
use log::info;

use crate::app_config::InputConfig;
use crate::errors::ConfigError;
use crate::file_utils::FileManager;
use crate::ocr::ImageFile;

// @module: Image discovery

/// Flat directory of page images
#[derive(Debug, Clone)]
pub struct DirectoryInput {
    input_directory: PathBuf,
    supported_extensions: Vec<String>,
}

impl DirectoryInput {
    /// Checks that `input_directory` exists and is a directory
    pub fn new(input_directory: impl Into<PathBuf>, supported_extensions: Vec<String>) -> Result<Self, ConfigError> {
        let input_directory = input_directory.into();
        if !input_directory.exists() {
            return Err(ConfigError::InvalidInput(format!(
                "Input directory does not exist: {}",
                input_directory.display()
            )));
        }
        if !FileManager::dir_exists(&input_directory) {
            return Err(ConfigError::InvalidInput(format!(
                "Input path is not a directory: {}",
                input_directory.display()
            )));
        }
        Ok(Self {
            input_directory,
            supported_extensions,
        })
    }

    pub fn from_config(config: &InputConfig) -> Result<Self, ConfigError> {
        match config {
            InputConfig::Directory {
                input_directory,
                supported_extensions,
            } => Self::new(input_directory.clone(), supported_extensions.clone()),
        }
    }

    pub fn input_directory(&self) -> &Path {
        &self.input_directory
    }

    /// Supported images, oldest first
    pub fn get_images(&self) -> Result<Vec<ImageFile>> {
        let images: Vec<ImageFile> =
            FileManager::find_files_by_extension(&self.input_directory, &self.supported_extensions)?
                .into_iter()
                .map(ImageFile::new)
                .collect();
        info!("Found {} image(s) in {:?}", images.len(), self.input_directory);
        Ok(images)
    }
}
