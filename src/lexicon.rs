//! The dictionary of legal answers, with the indices the evaluator prunes against.

use crate::error::LoadError;
use crate::wordplay::matches_pattern;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::ops::Bound;
use std::path::Path;

/// Longest letter sequence indexed for plausibility checks, unless told otherwise.
pub const DEFAULT_NGRAM_ORDER: usize = 4;

/// A word list, keyed by the letters of each entry.
///
/// Multi-word entries like `"ice cream"` are stored as `"icecream"` and remember how they
/// were split, so they can be told apart from single words when the clue gives an
/// enumeration like `(3,5)`.
#[derive(Debug, Clone)]
pub struct Lexicon {
    /// letters -> every segmentation seen for them
    words: BTreeMap<String, Vec<Vec<usize>>>,
    by_length: HashMap<usize, BTreeSet<String>>,
    /// Every substring of length `1..=ngram_order` of every word.
    ngrams: HashSet<String>,
    ngram_order: usize,
}

impl Lexicon {
    pub fn new(ngram_order: usize) -> Lexicon {
        Lexicon {
            words: BTreeMap::new(),
            by_length: HashMap::new(),
            ngrams: HashSet::new(),
            ngram_order,
        }
    }

    pub fn from_words(words: impl IntoIterator<Item = impl AsRef<str>>) -> Lexicon {
        let mut lexicon = Lexicon::new(DEFAULT_NGRAM_ORDER);
        for word in words {
            lexicon.insert(word.as_ref());
        }
        lexicon
    }

    /// Load a word list with one entry per line. Blank lines and lines starting with `#`
    /// are skipped.
    pub fn word_list_file(
        path: impl AsRef<Path>,
        ngram_order: usize,
    ) -> Result<Lexicon, LoadError> {
        let path = path.as_ref();
        let word_list = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        let mut lexicon = Lexicon::new(ngram_order);
        for line in word_list.lines().map(|s| s.trim()) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            lexicon.insert(line);
        }
        Ok(lexicon)
    }

    /// Add an entry. Words are split on spaces, underscores and hyphens, and apostrophes are
    /// dropped. Returns false (and adds nothing) if anything else non-alphanumeric is left.
    pub fn insert(&mut self, entry: &str) -> bool {
        let mut letters = String::new();
        let mut segmentation = Vec::new();
        for part in entry.split([' ', '_', '-']) {
            let part = part.replace(['\'', '\u{2019}'], "").to_lowercase();
            if part.is_empty() {
                continue;
            }
            if !part.chars().all(|ch| ch.is_ascii_alphanumeric()) {
                return false;
            }
            segmentation.push(part.len());
            letters.push_str(&part);
        }
        if letters.is_empty() {
            return false;
        }

        for start in 0..letters.len() {
            for end in start + 1..=(start + self.ngram_order).min(letters.len()) {
                self.ngrams.insert(letters[start..end].to_owned());
            }
        }
        self.by_length
            .entry(letters.len())
            .or_default()
            .insert(letters.clone());
        let segmentations = self.words.entry(letters).or_default();
        if !segmentations.contains(&segmentation) {
            segmentations.push(segmentation);
        }
        true
    }

    /// The number of distinct entries, by letters.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn ngram_order(&self) -> usize {
        self.ngram_order
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Whether some word of exactly `length` letters starts with `prefix`.
    pub fn is_plausible_prefix(&self, prefix: &str, length: usize) -> bool {
        let Some(words) = self.by_length.get(&length) else {
            return false;
        };
        words
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .next()
            .is_some_and(|word| word.starts_with(prefix))
    }

    /// Whether the last few letters of `partial` occur together in some word. Checked after
    /// each letter is added, this amounts to [`Lexicon::is_plausible_fragment`].
    pub fn extends_plausibly(&self, partial: &str) -> bool {
        if self.ngram_order == 0 {
            return true;
        }
        let start = partial
            .char_indices()
            .rev()
            .nth(self.ngram_order - 1)
            .map_or(0, |(i, _)| i);
        let window = &partial[start..];
        window.is_empty() || self.ngrams.contains(window)
    }

    /// Whether every run of letters in `fragment`, up to the n-gram order, occurs in some
    /// word. A fragment that fails this can't appear as-is in any answer.
    pub fn is_plausible_fragment(&self, fragment: &str) -> bool {
        let chars = fragment.chars().collect::<Vec<_>>();
        if self.ngram_order == 0 || chars.is_empty() {
            return true;
        }
        let width = self.ngram_order.min(chars.len());
        chars
            .windows(width)
            .all(|window| self.ngrams.contains(&window.iter().collect::<String>()))
    }

    /// Entries whose word lengths are exactly `lengths` and whose letters match `pattern`,
    /// alphabetically.
    pub fn matching(&self, lengths: &[usize], pattern: &str) -> Vec<&str> {
        let total = lengths.iter().sum::<usize>();
        let Some(words) = self.by_length.get(&total) else {
            return Vec::new();
        };
        words
            .iter()
            .filter(|word| matches_pattern(word, pattern))
            .filter(|word| {
                self.words
                    .get(word.as_str())
                    .is_some_and(|segmentations| segmentations.iter().any(|s| s == lengths))
            })
            .map(|word| word.as_str())
            .collect()
    }
}

#[test]
fn test_lexicon_lookup() {
    let lexicon =
        Lexicon::from_words(["Bare", "bear", "beard", "ice cream", "o'clock", "café"]);

    assert_eq!(lexicon.len(), 5);
    assert!(lexicon.contains("bare"));
    assert!(lexicon.contains("icecream"));
    assert!(lexicon.contains("oclock"));
    assert!(!lexicon.contains("caf"));
    assert!(!lexicon.contains("Bare"));

    assert!(lexicon.is_plausible_prefix("", 4));
    assert!(lexicon.is_plausible_prefix("b", 4));
    assert!(lexicon.is_plausible_prefix("bea", 4));
    assert!(lexicon.is_plausible_prefix("beard", 5));
    assert!(!lexicon.is_plausible_prefix("bec", 4));
    assert!(!lexicon.is_plausible_prefix("bear", 3));
    assert!(!lexicon.is_plausible_prefix("b", 6));
}

#[test]
fn test_lexicon_ngrams() {
    let mut lexicon = Lexicon::new(2);
    lexicon.insert("stasis");

    assert!(lexicon.extends_plausibly(""));
    assert!(lexicon.extends_plausibly("s"));
    assert!(lexicon.extends_plausibly("xst"));
    assert!(!lexicon.extends_plausibly("stt"));
    assert!(lexicon.is_plausible_fragment("tasis"));
    assert!(lexicon.is_plausible_fragment(""));
    assert!(!lexicon.is_plausible_fragment("tass"));
    assert!(!lexicon.is_plausible_fragment("x"));
}

#[test]
fn test_lexicon_matching() {
    let lexicon = Lexicon::from_words(["apple", "abide", "ankle", "angle", "bride", "ab ide"]);

    assert_eq!(lexicon.matching(&[5], "a...e"), ["abide", "angle", "ankle", "apple"]);
    assert_eq!(lexicon.matching(&[5], "an..e"), ["angle", "ankle"]);
    assert_eq!(lexicon.matching(&[2, 3], "a...e"), ["abide"]);
    assert_eq!(
        lexicon.matching(&[5], ""),
        ["abide", "angle", "ankle", "apple", "bride"]
    );
    assert!(lexicon.matching(&[6], "").is_empty());
}

#[test]
fn test_word_list_file() {
    let path =
        std::env::temp_dir().join(format!("clueomatic-words-{}.txt", std::process::id()));
    fs::write(&path, "# words\nstasis\n\n  Bare  \nice-cream\n").unwrap();
    let lexicon = Lexicon::word_list_file(&path, DEFAULT_NGRAM_ORDER).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(lexicon.len(), 3);
    assert!(lexicon.contains("bare"));
    assert_eq!(lexicon.matching(&[3, 5], ""), ["icecream"]);

    let missing = Lexicon::word_list_file(&path, DEFAULT_NGRAM_ORDER);
    assert!(matches!(missing, Err(LoadError::Io { .. })));
}
