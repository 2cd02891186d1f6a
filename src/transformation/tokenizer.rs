/*!
 * Whitespace-preserving lexer shared by the word-level stages.
 *
 * `tokenize` yields a strict alternation of word runs and whitespace runs;
 * concatenating the token texts reproduces the source exactly.
 * `split_affixes` separates leading and trailing punctuation from a word so
 * that stages can rewrite the inner word and reattach the rest unchanged.
 */

/// Kind of a lexed token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Maximal run of non-whitespace characters
    Word,
    /// Maximal run of whitespace characters
    Whitespace,
}

/// A token borrowed from the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl Token<'_> {
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

/// Split text into alternating word and whitespace runs
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<TokenKind> = None;

    for (index, ch) in text.char_indices() {
        let kind = if ch.is_whitespace() {
            TokenKind::Whitespace
        } else {
            TokenKind::Word
        };
        match current {
            Some(previous) if previous != kind => {
                tokens.push(Token {
                    kind: previous,
                    text: &text[start..index],
                });
                start = index;
                current = Some(kind);
            }
            None => current = Some(kind),
            _ => {}
        }
    }

    if let Some(kind) = current {
        tokens.push(Token {
            kind,
            text: &text[start..],
        });
    }
    tokens
}

/// Characters that belong to a word: letters, digits and underscore
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// A word token with its surrounding punctuation separated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affixed<'a> {
    pub leading: &'a str,
    pub core: &'a str,
    pub trailing: &'a str,
}

/// Separate leading and trailing punctuation from a word token.
///
/// Returns `None` when the token contains no word characters at all.
/// Punctuation inside the word (e.g. `re-enter`) keeps the whole token as
/// the core.
pub fn split_affixes(token: &str) -> Option<Affixed<'_>> {
    let core_start = token.find(is_word_char)?;
    let core_end = token
        .char_indices()
        .rev()
        .find(|&(_, ch)| is_word_char(ch))
        .map(|(index, ch)| index + ch.len_utf8())?;

    let core = &token[core_start..core_end];
    if core.chars().all(is_word_char) {
        Some(Affixed {
            leading: &token[..core_start],
            core,
            trailing: &token[core_end..],
        })
    } else {
        Some(Affixed {
            leading: "",
            core: token,
            trailing: "",
        })
    }
}
