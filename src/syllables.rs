/*!
 * Syllable decomposition for the long-word splitter.
 *
 * A `Syllabifier` turns one word into its syllables. The concatenation of the
 * returned parts always reproduces the input word exactly, case included.
 * Dictionaries are resolved once, when a stage is built: a language without
 * hyphenation patterns falls back to `WholeWordSyllabifier`.
 */

use std::fmt::Debug;
use std::sync::Arc;

use hyphenation::{Hyphenator, Language, Load, Standard};
use log::warn;

use crate::language_utils::LanguageTag;

/// Decomposes a word into syllables
pub trait Syllabifier: Send + Sync + Debug {
    /// Split `word` into syllables whose concatenation equals `word`
    fn syllables(&self, word: &str) -> Vec<String>;
}

/// Treats every word as a single syllable
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeWordSyllabifier;

impl Syllabifier for WholeWordSyllabifier {
    fn syllables(&self, word: &str) -> Vec<String> {
        vec![word.to_string()]
    }
}

/// Liang-pattern syllabifier backed by the embedded `hyphenation` dictionaries
pub struct PatternSyllabifier {
    dictionary: Standard,
    language: Language,
}

impl Debug for PatternSyllabifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternSyllabifier")
            .field("language", &self.language)
            .finish()
    }
}

impl PatternSyllabifier {
    /// Load the dictionary for a language tag, if one is bundled
    pub fn for_tag(tag: &LanguageTag) -> Option<Self> {
        let language = dictionary_language(tag)?;
        match Standard::from_embedded(language) {
            Ok(dictionary) => Some(Self { dictionary, language }),
            Err(e) => {
                warn!("Failed to load hyphenation patterns for {}: {}", tag, e);
                None
            }
        }
    }
}

impl Syllabifier for PatternSyllabifier {
    fn syllables(&self, word: &str) -> Vec<String> {
        if word.is_empty() {
            return vec![String::new()];
        }

        // Patterns are lowercase; break positions are mapped back by character index
        let lowered = word.to_lowercase();
        let original: Vec<char> = word.chars().collect();
        if lowered.chars().count() != original.len() {
            return vec![word.to_string()];
        }

        let hyphenated = self.dictionary.hyphenate(&lowered);
        let mut char_breaks: Vec<usize> = hyphenated
            .breaks
            .iter()
            .filter(|&&byte| lowered.is_char_boundary(byte))
            .map(|&byte| lowered[..byte].chars().count())
            .filter(|&index| index > 0 && index < original.len())
            .collect();
        char_breaks.sort_unstable();
        char_breaks.dedup();

        let mut parts = Vec::with_capacity(char_breaks.len() + 1);
        let mut start = 0;
        for end in char_breaks.into_iter().chain(std::iter::once(original.len())) {
            parts.push(original[start..end].iter().collect());
            start = end;
        }
        parts
    }
}

/// Resolve the syllabifier for a tag once; unsupported languages degrade to
/// whole-word syllables
pub fn resolve_syllabifier(tag: &LanguageTag) -> Arc<dyn Syllabifier> {
    match PatternSyllabifier::for_tag(tag) {
        Some(syllabifier) => Arc::new(syllabifier),
        None => {
            warn!(
                "No syllable dictionary for language '{}', long words will not be split",
                tag
            );
            Arc::new(WholeWordSyllabifier)
        }
    }
}

fn dictionary_language(tag: &LanguageTag) -> Option<Language> {
    let language = match tag.primary.as_str() {
        "pl" => Language::Polish,
        "en" => match tag.region.as_deref() {
            Some("GB") => Language::EnglishGB,
            _ => Language::EnglishUS,
        },
        "de" => Language::German1996,
        "fr" => Language::French,
        "es" => Language::Spanish,
        "it" => Language::Italian,
        "pt" => Language::Portuguese,
        "nl" => Language::Dutch,
        "cs" => Language::Czech,
        "sk" => Language::Slovak,
        "ru" => Language::Russian,
        "uk" => Language::Ukrainian,
        _ => return None,
    };
    Some(language)
}
