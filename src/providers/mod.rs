/*!
 * Provider implementations for the LLM cleanup stage.
 *
 * This module contains client implementations for the supported LLM APIs:
 * - OpenAI: chat completions API (and compatible servers)
 * - Anthropic: messages API
 * - Mock: scripted provider used by tests
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

pub mod anthropic;
pub mod mock;
pub mod openai;

/// A single chat message sent to a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.role == "system"
    }
}

/// Common trait for all LLM providers
///
/// The cleanup stage only needs one capability: send a conversation and get
/// the model's text back. Failures are returned as-is; retry policy, if any,
/// belongs to the implementation.
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Short provider identifier used in logs
    fn name(&self) -> &str;

    /// Complete a conversation and return the generated text
    async fn clean(&self, messages: &[Message]) -> Result<String, ProviderError>;
}
