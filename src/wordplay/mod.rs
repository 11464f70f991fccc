//! The string functions behind the composite kinds, plus the little helpers every stage of
//! evaluation shares.
//!
//! Each base function takes a `budget`: the answer length. Nothing longer than that can be
//! part of an answer, so nothing longer is ever produced.

mod anagram;
mod insertion;
mod reversal;
mod substring;

pub use anagram::{anagrams, arrangements};
pub use insertion::insertions;
pub use reversal::reversal;
pub use substring::substrings;

use crate::kind::Op;
use crate::lexicon::Lexicon;

/// The wildcard in a checked-letter pattern.
pub const WILDCARD: char = '.';

/// Reduce a phrase to the letters it contributes to an answer: lowercase ASCII letters and
/// digits, with spaces, underscores and punctuation dropped.
pub fn normalize(phrase: &str) -> String {
    phrase
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// Whether `word` agrees with `pattern` letter for letter, as far as `word` goes. The empty
/// pattern accepts everything, and a word longer than a non-empty pattern never matches.
pub fn matches_pattern(word: &str, pattern: &str) -> bool {
    if pattern.is_empty() {
        return true;
    }
    if word.chars().count() > pattern.chars().count() {
        return false;
    }
    word.chars()
        .zip(pattern.chars())
        .all(|(w, p)| p == WILDCARD || w == p)
}

/// Apply the base function `op` to one combination of operands. Returns nothing if the
/// number of operands is wrong for `op`.
pub fn apply(op: Op, operands: &[String], budget: usize, lexicon: &Lexicon) -> Vec<String> {
    match (op, operands) {
        (Op::Anagram, [word]) => anagrams(word, budget, lexicon),
        (Op::Substring, [word]) => substrings(word, budget, lexicon),
        (Op::Reversal, [word]) => reversal(word, budget),
        (Op::Insertion, [left, right]) => insertions(left, right, budget),
        _ => Vec::new(),
    }
}

#[test]
fn test_normalize() {
    assert_eq!(normalize("Up_set"), "upset");
    assert_eq!(normalize("in the end!"), "intheend");
    assert_eq!(normalize("R2-D2"), "r2d2");
    assert_eq!(normalize(""), "");
}

#[test]
fn test_matches_pattern() {
    assert!(matches_pattern("abc", "a.c"));
    assert!(!matches_pattern("abd", "a.c"));
    assert!(matches_pattern("anything", ""));
    assert!(matches_pattern("", "a.c"));
    assert!(matches_pattern("a", "a.c"));
    assert!(!matches_pattern("b", "a.c"));
    assert!(!matches_pattern("abcd", "a.c"));
}

#[test]
fn test_apply_arity() {
    let lexicon = Lexicon::from_words(["tip", "pit"]);
    let word = "tip".to_owned();

    assert_eq!(apply(Op::Reversal, &[word.clone()], 3, &lexicon), ["pit"]);
    assert_eq!(apply(Op::Anagram, &[word.clone()], 3, &lexicon), ["pit"]);
    assert!(apply(Op::Reversal, &[], 3, &lexicon).is_empty());
    assert!(apply(Op::Insertion, &[word.clone()], 3, &lexicon).is_empty());
    assert!(apply(Op::Anagram, &[word.clone(), word], 6, &lexicon).is_empty());
}
