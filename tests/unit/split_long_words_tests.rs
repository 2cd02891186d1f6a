/*!
 * Tests for balanced syllable splitting
 */

#![allow(non_snake_case)]

use std::sync::Arc;

use readscan::transformation::split_long_words::group_syllables;
use readscan::transformation::tokenizer::split_affixes;
use readscan::syllables::Syllabifier;
use readscan::{LanguageTag, SplitLongWords, Transformation};

use crate::common::{VowelSyllabifier, SAMPLE_TEXT};

fn splitter(max: usize, separator: &str) -> SplitLongWords {
    SplitLongWords::with_syllabifier(
        max,
        separator,
        LanguageTag::parse("pl_PL").unwrap(),
        Arc::new(VowelSyllabifier),
    )
    .unwrap()
}

/// Cost of one group: a lone syllable counts at most `max`
fn group_cost(group: &[&str], max: usize) -> usize {
    let length: usize = group.iter().map(|s| s.chars().count()).sum();
    if group.len() == 1 { length.min(max) } else { length }
}

/// Recover which syllables went into each returned group
fn regroup<'a>(syllables: &[&'a str], groups: &[String]) -> Vec<Vec<&'a str>> {
    let mut remaining = syllables.iter();
    groups
        .iter()
        .map(|group| {
            let mut members = Vec::new();
            let mut joined = String::new();
            while joined.len() < group.len() {
                let syllable = remaining.next().unwrap();
                joined.push_str(syllable);
                members.push(*syllable);
            }
            assert_eq!(&joined, group);
            members
        })
        .collect()
}

/// Every way to cut `syllables` into contiguous groups
fn all_partitions<'a>(syllables: &[&'a str]) -> Vec<Vec<Vec<&'a str>>> {
    let n = syllables.len();
    (0..1u32 << (n - 1))
        .map(|mask| {
            let mut groups = vec![vec![syllables[0]]];
            for (i, syllable) in syllables.iter().enumerate().skip(1) {
                if mask & (1 << (i - 1)) != 0 {
                    groups.push(Vec::new());
                }
                groups.last_mut().unwrap().push(*syllable);
            }
            groups
        })
        .collect()
}

#[test]
fn test_group_syllables_withAnyInput_shouldUseFewestGroupsAndSmallestMaximum() {
    let cases: Vec<(Vec<&str>, usize)> = vec![
        (vec!["prze", "ciw", "sta", "wi", "ła"], 5),
        (vec!["nie", "do", "ścig", "nio", "ny"], 6),
        (vec!["aaaa", "bbb", "cccc"], 7),
        (vec!["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"], 5),
        (vec!["abc", "def", "ghi", "jkl", "mno", "pqr"], 10),
        (vec!["strzelb", "ko", "wy"], 4),
        (vec!["kon", "stan", "ty", "no", "po", "li", "tań", "czy", "ko", "wia", "necz", "ka"], 10),
    ];

    for (syllables, max) in cases {
        let partitions = all_partitions(&syllables);
        let feasible_groups = partitions
            .iter()
            .filter(|p| p.len() >= 2 && p.iter().all(|g| group_cost(g, max) <= max))
            .map(|p| p.len())
            .min()
            .unwrap_or(syllables.len());
        let best_maximum = partitions
            .iter()
            .filter(|p| p.len() == feasible_groups)
            .map(|p| p.iter().map(|g| group_cost(g, max)).max().unwrap())
            .min()
            .unwrap();

        let total: usize = syllables.iter().map(|s| s.chars().count()).sum();
        let result = group_syllables(&syllables, max);
        assert_eq!(result.concat(), syllables.concat());
        if total <= max {
            assert_eq!(result.len(), 1);
            continue;
        }
        assert_eq!(result.len(), feasible_groups, "group count for {:?}", syllables);
        let result_maximum = regroup(&syllables, &result)
            .iter()
            .map(|g| group_cost(g, max))
            .max()
            .unwrap();
        assert_eq!(result_maximum, best_maximum, "{:?} is not balanced for max {}", result, max);
    }
}

#[test]
fn test_group_syllables_withTie_shouldPreferLaterBoundary() {
    assert_eq!(
        group_syllables(&["aaaa", "bbb", "cccc"], 7),
        vec!["aaaabbb".to_string(), "cccc".to_string()]
    );
}

#[test]
fn test_group_syllables_withSingleOrEmpty_shouldKeepInput() {
    assert_eq!(group_syllables(&["słowo"], 2), vec!["słowo".to_string()]);
    assert_eq!(group_syllables(&["a", "bc", "def"], 10), vec!["abcdef".to_string()]);
    assert!(group_syllables::<&str>(&[], 5).is_empty());
}

#[test]
fn test_split_text_withSampleText_shouldPreserveContent() {
    let result = splitter(6, "|").split_text(SAMPLE_TEXT);
    assert_ne!(result, SAMPLE_TEXT);
    assert_eq!(result.replace('|', ""), SAMPLE_TEXT);
}

#[test]
fn test_split_word_withSampleWords_shouldRespectBoundUnlessSingleSyllable() {
    let max = 6;
    let splitter = splitter(max, "|");
    for token in SAMPLE_TEXT.split_whitespace() {
        let Some(affixed) = split_affixes(token) else {
            continue;
        };
        let result = splitter.split_word(token);
        let middle = &result[affixed.leading.len()..result.len() - affixed.trailing.len()];
        for piece in middle.split('|') {
            if piece.chars().count() > max {
                assert_eq!(
                    VowelSyllabifier.syllables(piece).len(),
                    1,
                    "piece {:?} of {:?} exceeds {}",
                    piece,
                    token,
                    max
                );
            }
        }
    }
}

#[test]
fn test_split_text_withSpaceSeparator_shouldBeIdempotent() {
    for max in [4, 6, 10] {
        let splitter = splitter(max, " ");
        let once = splitter.split_text(SAMPLE_TEXT);
        let twice = splitter.split_text(&once);
        assert_eq!(once, twice, "not idempotent for max {}", max);
    }
}

#[test]
fn test_split_text_withShortWordsAndWhitespace_shouldReturnInput() {
    let splitter = splitter(10, "-");
    assert_eq!(splitter.split_text("To jest krótki tekst"), "To jest krótki tekst");
    assert_eq!(splitter.split_text("  krótkie   słowa  "), "  krótkie   słowa  ");
    assert_eq!(splitter.split_text(""), "");
}

#[test]
fn test_split_word_withPunctuation_shouldKeepAffixesInPlace() {
    let splitter = splitter(5, "-");
    let result = splitter.split_word("(prawdopodobnie)!");
    assert!(result.starts_with('('));
    assert!(result.ends_with(")!"));
    assert!(result.contains('-'));
    assert_eq!(result.replace('-', ""), "(prawdopodobnie)!");
}

#[test]
fn test_split_word_withCustomSeparator_shouldUseIt() {
    let splitter = splitter(5, "·");
    assert!(splitter.split_word("prawdopodobnie").contains('·'));
}

#[test]
fn test_new_withInvalidSettings_shouldFail() {
    assert!(SplitLongWords::new(0, " ", "pl_PL").is_err());
    assert!(SplitLongWords::new(10, "", "pl_PL").is_err());
    assert!(SplitLongWords::new(10, " ", "xx_YY").is_err());
}

#[tokio::test]
async fn test_transform_withPolishDictionary_shouldSplitVeryLongWords() {
    let splitter = SplitLongWords::new(8, "-", "pl_PL").unwrap();
    let text = "konstantynopolitańczykowianeczka";
    let result = splitter.transform(text).await.unwrap();
    assert!(result.contains('-'));
    assert!(result.chars().count() > text.chars().count());
    assert_eq!(result.replace('-', ""), text);
}

#[tokio::test]
async fn test_transform_withPolishDictionaryAndOverlongSyllable_shouldKeepSyllableWhole() {
    let splitter = SplitLongWords::new(5, " ", "pl_PL").unwrap();
    assert_eq!(
        splitter.transform("chrząszczowy?").await.unwrap(),
        "chrząsz czowy?"
    );
}

#[tokio::test]
async fn test_transform_withPolishDictionary_shouldPreserveContent() {
    let splitter = SplitLongWords::new(8, "|", "pl").unwrap();
    let result = splitter.transform(SAMPLE_TEXT).await.unwrap();
    assert_eq!(result.replace('|', ""), SAMPLE_TEXT);
    assert!(splitter.transform("przeszukiwanie").await.unwrap().contains('|'));
}

#[tokio::test]
async fn test_transform_withUnsupportedLanguage_shouldLeaveWordsWhole() {
    crate::common::init_logging();
    let splitter = SplitLongWords::new(4, "-", "ja").unwrap();
    assert_eq!(splitter.transform("niepodległość").await.unwrap(), "niepodległość");
}
