use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::errors::TransformError;
use crate::providers::{LlmProvider, Message};

use super::Transformation;

/// Default system prompt: OCR cleanup of Polish book pages
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a text cleanup assistant. Your task is to:
1. Fix OCR mistakes and typos
2. Remove page numbers
3. Remove chapter titles and headers
4. Remove footers and repeated elements
5. Preserve the actual content and maintain proper paragraph structure
6. Fix formatting issues
7. Keep original context intact don't skip any parts

Return only the cleaned text without any explanations or metadata. You will be given text in polish

EXAMPLE:
    Before:
    Łatwość poznawcza
    A powtarzajare de
    przez szata graficzna
    utorowana idea
    dobry nastrój
    5. Łatwość poznawcza
    uczucie prawdziwości
    ATWOŚC
    uczucie przyjemności
    uczucie larwości
    83
    na wiele
    Za kandym razem, kiedy to sobie uświadamiasz - a może nawet wte.
    kiedy sobie nie uświadamiasz - w twoim mózgu dokonują się
    operacie mające utrzymywać i aktualizować odpowiedzi
    wanych pytan: Czy dzieje się coś nowego? Czy coś mi grozi? Czy
    wko w porzadku? Czy nie trzeba zwrócić uwagi na coś innego?

    After:
    Za każdym razem, kiedy to sobie uświadamiasz - a może nawet wtedy
    kiedy sobie nie uświadamiasz - w twoim mózgu dokonują się
    operacie mające utrzymywać i aktualizować odpowiedzi
    ważnych pytań: Czy dzieje się coś nowego? Czy coś mi grozi? Czy
    wszystko w porządku? Czy nie trzeba zwrócić uwagi na coś innego?

Don't include example in response
"#;

/// Sends the text through an LLM with a cleanup prompt
#[derive(Debug, Clone)]
pub struct LlmCleanup {
    provider: Arc<dyn LlmProvider>,
    system_prompt: String,
}

impl LlmCleanup {
    pub fn new(provider: Arc<dyn LlmProvider>, system_prompt: impl Into<String>) -> Self {
        Self {
            provider,
            system_prompt: system_prompt.into(),
        }
    }

    /// Cleanup stage with the default prompt
    pub fn with_default_prompt(provider: Arc<dyn LlmProvider>) -> Self {
        Self::new(provider, DEFAULT_SYSTEM_PROMPT)
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

#[async_trait]
impl Transformation for LlmCleanup {
    fn name(&self) -> &'static str {
        "llm-cleanup"
    }

    async fn transform(&self, text: &str) -> Result<String, TransformError> {
        let messages = [Message::system(&self.system_prompt), Message::user(text)];
        let cleaned = self.provider.clean(&messages).await?;
        debug!(
            "Cleaned data of length {} to {} characters using {}",
            text.chars().count(),
            cleaned.chars().count(),
            self.provider.name()
        );
        Ok(cleaned)
    }
}
