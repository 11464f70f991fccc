//! Synonyms (and abbreviations, which are used the same way), plus how related two words
//! are.

use crate::error::LoadError;
use crate::wordplay::normalize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// How closely an answer matches a definition, between 0 (unrelated, or unknown) and 1.
pub trait Relatedness: Send + Sync {
    fn similarity(&self, word: &str, definition: &str) -> f64;
}

impl<F: Fn(&str, &str) -> f64 + Send + Sync> Relatedness for F {
    fn similarity(&self, word: &str, definition: &str) -> f64 {
        self(word, definition)
    }
}

/// A map from words and phrases to the things they can stand for.
///
/// Keys are lowercase, with multi-word phrases joined by `_` (`"at_first"`). Entries are
/// kept as written; the evaluator reduces them to letters.
#[derive(Debug, Clone, Default)]
pub struct Thesaurus {
    synonyms: HashMap<String, Vec<String>>,
}

fn key(phrase: &str) -> String {
    phrase.trim().to_lowercase().replace([' ', '-'], "_")
}

impl Thesaurus {
    pub fn new() -> Thesaurus {
        Thesaurus::default()
    }

    /// Load a JSON object mapping each word to a list of synonyms:
    /// `{"spin": ["twirl", "english"], ...}`.
    pub fn json_file(path: impl AsRef<Path>) -> Result<Thesaurus, LoadError> {
        let mut thesaurus = Thesaurus::new();
        thesaurus.merge_json_file(path)?;
        Ok(thesaurus)
    }

    /// Add the entries from another file in the same format as [`Thesaurus::json_file`].
    /// This is how abbreviations (`"sailor": ["ab", "tar"]`) get in.
    pub fn merge_json_file(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        let entries: HashMap<String, Vec<String>> =
            serde_json::from_str(&text).map_err(|source| LoadError::Json {
                path: path.to_owned(),
                source,
            })?;
        for (word, synonyms) in entries {
            for synonym in synonyms {
                self.insert(&word, &synonym);
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, word: &str, synonym: &str) {
        let synonym = synonym.trim().to_lowercase();
        if synonym.is_empty() {
            return;
        }
        let synonyms = self.synonyms.entry(key(word)).or_default();
        if !synonyms.contains(&synonym) {
            synonyms.push(synonym);
        }
    }

    /// What `phrase` can stand for, in the order they were added. Spaces and underscores in
    /// `phrase` are interchangeable.
    pub fn synonyms(&self, phrase: &str) -> &[String] {
        self.synonyms
            .get(&key(phrase))
            .map(|synonyms| synonyms.as_slice())
            .unwrap_or(&[])
    }

    /// The number of words with at least one synonym.
    pub fn len(&self) -> usize {
        self.synonyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }

    fn neighborhood(&self, word: &str) -> HashSet<String> {
        let mut neighborhood = self
            .synonyms(word)
            .iter()
            .map(|synonym| normalize(synonym))
            .collect::<HashSet<_>>();
        neighborhood.insert(normalize(word));
        neighborhood
    }
}

/// 1 for the same word or direct synonyms (either way round). Otherwise, the fraction of
/// their combined synonyms the two words share.
impl Relatedness for Thesaurus {
    fn similarity(&self, word: &str, definition: &str) -> f64 {
        let (word_letters, definition_letters) = (normalize(word), normalize(definition));
        if word_letters.is_empty() || definition_letters.is_empty() {
            return 0.0;
        }
        if word_letters == definition_letters {
            return 1.0;
        }
        let is_synonym = |of: &str, letters: &str| {
            self.synonyms(of)
                .iter()
                .any(|synonym| normalize(synonym) == letters)
        };
        if is_synonym(definition, &word_letters) || is_synonym(word, &definition_letters) {
            return 1.0;
        }

        let word_neighbors = self.neighborhood(word);
        let definition_neighbors = self.neighborhood(definition);
        let shared = word_neighbors.intersection(&definition_neighbors).count();
        let total = word_neighbors.union(&definition_neighbors).count();
        if total == 0 {
            0.0
        } else {
            shared as f64 / total as f64
        }
    }
}

#[test]
fn test_thesaurus_synonyms() {
    let mut thesaurus = Thesaurus::new();
    thesaurus.insert("naked", "bare");
    thesaurus.insert("naked", "nude");
    thesaurus.insert("naked", "Bare");
    thesaurus.insert("at first", "initially");

    assert_eq!(thesaurus.synonyms("naked"), ["bare", "nude"]);
    assert_eq!(thesaurus.synonyms("Naked "), ["bare", "nude"]);
    assert_eq!(thesaurus.synonyms("at_first"), ["initially"]);
    assert_eq!(thesaurus.synonyms("at-first"), ["initially"]);
    assert!(thesaurus.synonyms("clothed").is_empty());
    assert_eq!(thesaurus.len(), 2);
}

#[test]
fn test_thesaurus_similarity() {
    let mut thesaurus = Thesaurus::new();
    thesaurus.insert("naked", "bare");
    thesaurus.insert("naked", "nude");
    thesaurus.insert("exposed", "bare");
    thesaurus.insert("exposed", "open");

    assert_eq!(thesaurus.similarity("bare", "naked"), 1.0);
    assert_eq!(thesaurus.similarity("naked", "bare"), 1.0);
    assert_eq!(thesaurus.similarity("Naked", "naked"), 1.0);
    assert_eq!(thesaurus.similarity("bear", "naked"), 0.0);
    assert_eq!(thesaurus.similarity("", "naked"), 0.0);

    // {naked, bare, nude} and {exposed, bare, open} share one of five.
    let score = thesaurus.similarity("exposed", "naked");
    assert!((score - 0.2).abs() < 1e-9, "{}", score);

    let constant = |_: &str, _: &str| 0.5;
    assert_eq!(constant.similarity("a", "b"), 0.5);
}

#[test]
fn test_thesaurus_json_file() {
    let dir = std::env::temp_dir();
    let synonyms = dir.join(format!("clueomatic-syn-{}.json", std::process::id()));
    let abbreviations = dir.join(format!("clueomatic-abbr-{}.json", std::process::id()));
    fs::write(&synonyms, r#"{"spin": ["twirl", "english"]}"#).unwrap();
    fs::write(&abbreviations, r#"{"sailor": ["ab", "tar"], "spin": ["twirl"]}"#).unwrap();

    let mut thesaurus = Thesaurus::json_file(&synonyms).unwrap();
    thesaurus.merge_json_file(&abbreviations).unwrap();
    assert_eq!(thesaurus.synonyms("spin"), ["twirl", "english"]);
    assert_eq!(thesaurus.synonyms("sailor"), ["ab", "tar"]);

    fs::write(&abbreviations, "[1, 2").unwrap();
    let bad = thesaurus.merge_json_file(&abbreviations);
    assert!(matches!(bad, Err(LoadError::Json { .. })));

    fs::remove_file(&synonyms).unwrap();
    fs::remove_file(&abbreviations).unwrap();
    assert!(matches!(
        Thesaurus::json_file(&synonyms),
        Err(LoadError::Io { .. })
    ));
}
