use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::OcrError;

use super::TextRecognizer;

/// Google Cloud Vision client
#[derive(Debug, Clone)]
pub struct GoogleVision {
    client: Client,
    api_key: String,
    endpoint: String,
}

/// Annotate request body
#[derive(Debug, Serialize)]
pub struct AnnotateRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
pub struct AnnotateImageRequest {
    pub image: ImageContent,
    pub features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
pub struct ImageContent {
    /// Base64 encoded image bytes
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: String,
}

/// Annotate response body
#[derive(Debug, Deserialize, Default)]
pub struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
    #[serde(default)]
    pub error: Option<Status>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    #[serde(default)]
    pub text_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    pub error: Option<Status>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EntityAnnotation {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl AnnotateRequest {
    /// Text detection of a single image
    pub fn text_detection(image_bytes: &[u8]) -> Self {
        Self {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: BASE64.encode(image_bytes),
                },
                features: vec![Feature {
                    feature_type: "TEXT_DETECTION".to_string(),
                }],
            }],
        }
    }
}

impl AnnotateResponse {
    /// First annotation's description; an empty string when nothing was found
    pub fn into_text(self) -> Result<String, OcrError> {
        if let Some(status) = self.error.filter(|s| !s.message.is_empty()) {
            return Err(OcrError::Api(status.message));
        }
        let Some(response) = self.responses.into_iter().next() else {
            return Ok(String::new());
        };
        if let Some(status) = response.error.filter(|s| !s.message.is_empty()) {
            return Err(OcrError::Api(status.message));
        }
        Ok(response
            .text_annotations
            .into_iter()
            .next()
            .and_then(|a| a.description)
            .unwrap_or_default())
    }
}

impl GoogleVision {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            client: builder.build().unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn api_url(&self) -> Result<Url, OcrError> {
        let endpoint = if self.endpoint.is_empty() {
            "https://vision.googleapis.com"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        let mut url = Url::parse(&format!("{}/v1/images:annotate", endpoint))
            .map_err(|e| OcrError::RequestFailed(format!("Invalid Vision endpoint '{}': {}", endpoint, e)))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Send an annotate request
    pub async fn annotate(&self, request: &AnnotateRequest) -> Result<AnnotateResponse, OcrError> {
        let response = self
            .client
            .post(self.api_url()?)
            .json(request)
            .send()
            .await
            .map_err(|e| OcrError::RequestFailed(format!("Failed to send request to Vision API: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OcrError::RequestFailed(format!("Failed to read Vision API response: {}", e)))?;

        let parsed = serde_json::from_str::<AnnotateResponse>(&body);
        if !status.is_success() {
            // Error bodies usually carry a status message
            return match parsed {
                Ok(AnnotateResponse { error: Some(error), .. }) if !error.message.is_empty() => {
                    Err(OcrError::Api(error.message))
                }
                _ => Err(OcrError::Api(format!("HTTP {}: {}", status.as_u16(), body))),
            };
        }
        parsed.map_err(|e| OcrError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl TextRecognizer for GoogleVision {
    async fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        let bytes = tokio::fs::read(image).await.map_err(|e| OcrError::ImageRead {
            path: image.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!("Recognizing {:?} ({} bytes)", image, bytes.len());
        self.annotate(&AnnotateRequest::text_detection(&bytes)).await?.into_text()
    }
}
