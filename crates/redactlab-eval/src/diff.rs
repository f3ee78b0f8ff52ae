//! Token-level alignment of two texts.
//!
//! Both texts are split into lossless token streams (words, whitespace
//! runs, single punctuation marks, other symbol runs) and aligned with a
//! full longest-common-subsequence table.

use serde::{Deserialize, Serialize};

/// Alignment classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiffKind {
    /// Token present in both texts.
    Match,
    /// Token only in the actual text.
    MismatchActual,
    /// Token only in the expected text.
    MismatchExpected,
}

/// A token and its alignment classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffChunk {
    pub value: String,
    pub kind: DiffKind,
}

impl DiffChunk {
    fn new(value: &str, kind: DiffKind) -> Self {
        Self {
            value: value.to_string(),
            kind,
        }
    }
}

/// Per-side chunk sequences produced by [`align_tokens`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    #[serde(rename = "actualChunks")]
    pub actual: Vec<DiffChunk>,
    #[serde(rename = "expectedChunks")]
    pub expected: Vec<DiffChunk>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Space,
    Punct,
    Other,
}

fn classify(c: char) -> CharClass {
    match c {
        '.' | ',' | '!' | '?' | ';' | ':' => CharClass::Punct,
        '\n' => CharClass::Other,
        c if c.is_whitespace() => CharClass::Space,
        c if c.is_alphanumeric() || c == '_' => CharClass::Word,
        _ => CharClass::Other,
    }
}

/// Split text into tokens. Concatenating the tokens yields the input.
///
/// Runs of non-newline whitespace, word characters, and other symbols each
/// form one token; each of `. , ! ? ; :` is a token on its own.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<CharClass> = None;

    for (idx, c) in text.char_indices() {
        let class = classify(c);
        let boundary = match current {
            None => false,
            Some(prev) => prev != class || class == CharClass::Punct,
        };
        if boundary {
            tokens.push(&text[start..idx]);
            start = idx;
        }
        current = Some(class);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }

    tokens
}

/// Align the token streams of `actual` and `expected`.
///
/// Backtracking prefers consuming the expected side on ties, so equal-cost
/// alternatives always attribute the mismatch to `expected` first.
pub fn align_tokens(actual: &str, expected: &str) -> Alignment {
    let a = tokenize(actual);
    let b = tokenize(expected);
    let m = a.len();
    let n = b.len();

    let mut dp = vec![vec![0usize; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut alignment = Alignment::default();
    let (mut i, mut j) = (m, n);

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && a[i - 1] == b[j - 1] {
            alignment.actual.push(DiffChunk::new(a[i - 1], DiffKind::Match));
            alignment.expected.push(DiffChunk::new(b[j - 1], DiffKind::Match));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || dp[i][j - 1] >= dp[i - 1][j]) {
            alignment
                .expected
                .push(DiffChunk::new(b[j - 1], DiffKind::MismatchExpected));
            j -= 1;
        } else {
            alignment
                .actual
                .push(DiffChunk::new(a[i - 1], DiffKind::MismatchActual));
            i -= 1;
        }
    }

    alignment.actual.reverse();
    alignment.expected.reverse();
    alignment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(chunks: &[DiffChunk]) -> Vec<(&str, DiffKind)> {
        chunks.iter().map(|c| (c.value.as_str(), c.kind)).collect()
    }

    #[test]
    fn test_tokenize_splits_delimiters() {
        assert_eq!(
            tokenize("Hello, world!  How\nare you?"),
            vec!["Hello", ",", " ", "world", "!", "  ", "How", "\n", "are", " ", "you", "?"]
        );
        assert_eq!(tokenize("[EMAIL_ADDRESS]"), vec!["[", "EMAIL_ADDRESS", "]"]);
        assert_eq!(tokenize("a--b..."), vec!["a", "--", "b", ".", ".", "."]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_is_lossless() {
        let text = "Call (555) 123-4567, ok?\n\tThanks:  Zoë";
        assert_eq!(tokenize(text).concat(), text);
    }

    #[test]
    fn test_one_word_changed() {
        let alignment = align_tokens("the cat sat", "the dog sat");
        use DiffKind::*;
        assert_eq!(
            values(&alignment.actual),
            vec![("the", Match), (" ", Match), ("cat", MismatchActual), (" ", Match), ("sat", Match)]
        );
        assert_eq!(
            values(&alignment.expected),
            vec![("the", Match), (" ", Match), ("dog", MismatchExpected), (" ", Match), ("sat", Match)]
        );
    }

    #[test]
    fn test_ties_consume_expected_first() {
        // "a" and "b" both give an LCS of length one; the expected side is
        // consumed first, so "b" is the token that matches.
        let alignment = align_tokens("a b", "b a");
        use DiffKind::*;
        assert_eq!(
            values(&alignment.actual),
            vec![("a", MismatchActual), (" ", MismatchActual), ("b", Match)]
        );
        assert_eq!(
            values(&alignment.expected),
            vec![("b", Match), (" ", MismatchExpected), ("a", MismatchExpected)]
        );
    }

    #[test]
    fn test_identical_inputs_only_match() {
        let text = "Contact [EMAIL_ADDRESS] or call [PHONE_NUMBER].";
        let alignment = align_tokens(text, text);
        assert!(alignment.actual.iter().all(|c| c.kind == DiffKind::Match));
        assert!(alignment.expected.iter().all(|c| c.kind == DiffKind::Match));

        let rebuilt: String = alignment.actual.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(rebuilt, text);
        assert_eq!(alignment.actual, alignment.expected);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(align_tokens("", ""), Alignment::default());

        let alignment = align_tokens("", "a b");
        assert!(alignment.actual.is_empty());
        assert_eq!(alignment.expected.len(), 3);
        assert!(alignment
            .expected
            .iter()
            .all(|c| c.kind == DiffKind::MismatchExpected));

        let alignment = align_tokens("a b", "");
        assert!(alignment.expected.is_empty());
        assert!(alignment.actual.iter().all(|c| c.kind == DiffKind::MismatchActual));
    }

    #[test]
    fn test_each_side_reconstructs_its_text() {
        let actual = "Mail [EMAIL_ADDRESS] at 10:30.";
        let expected = "Mail [EMAIL_ADDRESS] at [DATE_TIME].";
        let alignment = align_tokens(actual, expected);

        let a: String = alignment.actual.iter().map(|c| c.value.as_str()).collect();
        let e: String = alignment.expected.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(a, actual);
        assert_eq!(e, expected);
    }

    #[test]
    fn test_chunk_serialization() {
        let alignment = align_tokens("a", "b");
        let json = serde_json::to_value(&alignment).unwrap();
        assert_eq!(json["actualChunks"][0]["kind"], "MISMATCH_ACTUAL");
        assert_eq!(json["expectedChunks"][0]["kind"], "MISMATCH_EXPECTED");
    }
}
