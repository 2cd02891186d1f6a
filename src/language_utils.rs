use isolang::Language;

use crate::errors::ConfigError;

/// Language utilities for locale tag handling
///
/// Stage configuration carries tags such as `pl`, `pl_PL` or `en-US`. This
/// module splits them into the ISO 639-1 primary language and an optional
/// region, validating the primary part against the ISO tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTag {
    /// ISO 639-1 code, lowercase
    pub primary: String,
    /// Region subtag, uppercase
    pub region: Option<String>,
}

impl LanguageTag {
    /// Parse a tag like `pl`, `pl_PL`, `en-us` or `pol`
    pub fn parse(tag: &str) -> Result<Self, ConfigError> {
        let trimmed = tag.trim();
        let mut parts = trimmed.split(['_', '-']);
        let primary = parts.next().unwrap_or_default().to_lowercase();
        let region = parts
            .next()
            .filter(|r| !r.is_empty())
            .map(|r| r.to_uppercase());

        let primary = normalize_to_part1(&primary)
            .ok_or_else(|| ConfigError::UnknownLanguage(tag.to_string()))?;

        Ok(Self { primary, region })
    }

    /// English name of the primary language
    pub fn name(&self) -> &'static str {
        Language::from_639_1(&self.primary)
            .map(|l| l.to_name())
            .unwrap_or("Unknown")
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}_{}", self.primary, region),
            None => write!(f, "{}", self.primary),
        }
    }
}

/// Normalize an ISO 639-1 or ISO 639-3 code to ISO 639-1 when one exists
fn normalize_to_part1(code: &str) -> Option<String> {
    match code.len() {
        2 => Language::from_639_1(code).map(|_| code.to_string()),
        3 => Language::from_639_3(code)
            .and_then(|lang| lang.to_639_1())
            .map(|c| c.to_string()),
        _ => None,
    }
}
