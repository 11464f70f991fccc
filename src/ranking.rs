//! Merging answers from every reading of a clue into one ranked list.

use crate::clue::{Clue, RoleAssignment};
use crate::lexicon::Lexicon;
use crate::thesaurus::Relatedness;
use crate::wordplay::{normalize, WILDCARD};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// How an answer was arrived at.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Derivation {
    /// Spelled out by this reading of the clue.
    Wordplay(Arc<RoleAssignment>),
    /// No wordplay worked; it just fits the checked letters, and was scored against a guess
    /// at the definition.
    Pattern { definition: String },
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Derivation::Wordplay(assignment) => write!(f, "{}", assignment),
            Derivation::Pattern { definition } => {
                write!(f, "fits the pattern; definition: {}", definition)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAnswer {
    pub answer: String,
    /// The best score of any derivation.
    pub score: f64,
    pub derivations: Vec<Derivation>,
}

/************************
 *     Ranking          *
 ************************/

/// Answers collected so far, one entry per distinct answer.
#[derive(Debug, Default)]
pub struct Ranking {
    /// answer -> index into `answers`
    index: HashMap<String, usize>,
    /// In the order first found.
    answers: Vec<RankedAnswer>,
}

impl Ranking {
    pub fn new() -> Ranking {
        Ranking::default()
    }

    /// Record `answer`. If it was already found, keep the higher score and add the
    /// derivation if it's new.
    pub fn add(&mut self, answer: String, score: f64, derivation: Derivation) {
        if let Some(&i) = self.index.get(&answer) {
            let entry = &mut self.answers[i];
            entry.score = entry.score.max(score);
            if !entry.derivations.contains(&derivation) {
                entry.derivations.push(derivation);
            }
            return;
        }
        self.index.insert(answer.clone(), self.answers.len());
        self.answers.push(RankedAnswer {
            answer,
            score,
            derivations: vec![derivation],
        });
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Best first. Equal scores stay in the order they were found.
    pub fn into_sorted(self) -> Vec<RankedAnswer> {
        let mut answers = self.answers;
        answers.sort_by(|a, b| b.score.total_cmp(&a.score));
        answers
    }
}

/// Whether `answer` is just one of the clue's own words: a phrase of `phrasing`, the start
/// of one, or one of `tokens`.
pub fn is_echo(answer: &str, phrasing: &[String], tokens: &[String]) -> bool {
    phrasing
        .iter()
        .any(|phrase| normalize(phrase).starts_with(answer))
        || tokens.iter().any(|token| normalize(token) == answer)
}

/// Every word that fits `clue`'s enumeration and checked letters, scored against whichever
/// end of the clue it matches better. Only used when wordplay finds nothing, and only if
/// at least one letter is checked.
pub fn pattern_fallback(
    clue: &Clue,
    lexicon: &Lexicon,
    relatedness: &dyn Relatedness,
) -> Ranking {
    let mut ranking = Ranking::new();
    if !clue.pattern.chars().any(|ch| ch != WILDCARD) {
        return ranking;
    }

    let mut ends = Vec::new();
    ends.extend(clue.tokens.first());
    ends.extend(clue.tokens.last().filter(|_| clue.tokens.len() > 1));

    for word in lexicon.matching(&clue.lengths, &clue.pattern) {
        let mut best: Option<(f64, &String)> = None;
        for &end in &ends {
            let score = relatedness.similarity(word, end);
            let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, end));
            }
        }
        let (score, definition) = best.map_or((0.0, String::new()), |(score, end)| {
            (score, end.to_string())
        });
        ranking.add(word.to_owned(), score, Derivation::Pattern { definition });
    }
    ranking
}

/************************
 *     Solutions        *
 ************************/

/// The ranked answers to one clue.
#[derive(Debug, Clone, Serialize)]
pub struct Solutions {
    pub answers: Vec<RankedAnswer>,
    /// Copied from the clue, for checking.
    pub known_answer: Option<String>,
}

impl Solutions {
    pub fn best(&self) -> Option<&RankedAnswer> {
        self.answers.first()
    }

    /// 1-based position of `answer` in the ranking.
    pub fn rank_of(&self, answer: &str) -> Option<usize> {
        let answer = normalize(answer);
        self.answers
            .iter()
            .position(|ranked| ranked.answer == answer)
            .map(|i| i + 1)
    }

    pub fn known_rank(&self) -> Option<usize> {
        self.known_answer
            .as_deref()
            .and_then(|answer| self.rank_of(answer))
    }
}

impl fmt::Display for Solutions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.answers.is_empty() {
            return writeln!(f, "No answers");
        }
        for (i, ranked) in self.answers.iter().enumerate() {
            writeln!(f, "{:3}. {} {:.3}", i + 1, ranked.answer, ranked.score)?;
        }
        Ok(())
    }
}

#[cfg(test)]
fn wordplay(roles: &str, length: usize) -> Derivation {
    Derivation::Wordplay(Arc::new(RoleAssignment::parse(roles, length, "").unwrap()))
}

#[test]
fn test_ranking_merge() {
    let mut ranking = Ranking::new();
    let long = "initially:sub_r babies:lit are:lit naked:d";
    let short = "babies:sub_r are:lit naked:d";
    ranking.add("bare".to_owned(), 0.3, wordplay(long, 4));
    ranking.add("bear".to_owned(), 0.5, wordplay(short, 4));
    ranking.add("bare".to_owned(), 0.7, wordplay(short, 4));
    ranking.add("bare".to_owned(), 0.1, wordplay(short, 4));
    assert_eq!(ranking.len(), 2);

    let answers = ranking.into_sorted();
    assert_eq!(answers[0].answer, "bare");
    assert_eq!(answers[0].score, 0.7);
    assert_eq!(answers[0].derivations.len(), 2);
    assert_eq!(answers[1].answer, "bear");
}

#[test]
fn test_ranking_ties_keep_search_order() {
    let mut ranking = Ranking::new();
    for word in ["one", "two", "six", "ten"] {
        let score = if word == "six" { 0.9 } else { 0.5 };
        let definition = Derivation::Pattern {
            definition: "number".to_owned(),
        };
        ranking.add(word.to_owned(), score, definition);
    }
    let order = ranking
        .into_sorted()
        .into_iter()
        .map(|ranked| ranked.answer)
        .collect::<Vec<_>>();
    assert_eq!(order, ["six", "one", "two", "ten"]);
}

#[test]
fn test_is_echo() {
    let phrasing = ["spin".to_owned(), "broken_shingle".to_owned()];
    let tokens = ["spin", "broken", "shingle"].map(|s| s.to_owned());
    assert!(is_echo("spin", &phrasing, &tokens));
    assert!(is_echo("broke", &phrasing, &tokens));
    assert!(is_echo("shingle", &phrasing, &tokens));
    assert!(!is_echo("english", &phrasing, &tokens));
    assert!(!is_echo("single", &phrasing, &tokens));
}

#[test]
fn test_pattern_fallback() {
    let lexicon = Lexicon::from_words(["apple", "abide", "angle", "bride", "ample"]);
    let clue = Clue::parse("zzz qqq (5)|a...e").unwrap();
    let similarity = |word: &str, definition: &str| match (word, definition) {
        ("angle", "qqq") => 0.8,
        ("angle", "zzz") => 0.2,
        _ => 0.0,
    };

    let answers = pattern_fallback(&clue, &lexicon, &similarity).into_sorted();
    let words = answers
        .iter()
        .map(|ranked| ranked.answer.as_str())
        .collect::<Vec<_>>();
    assert_eq!(words, ["angle", "abide", "ample", "apple"]);
    assert_eq!(answers[0].score, 0.8);
    assert_eq!(
        answers[0].derivations,
        [Derivation::Pattern {
            definition: "qqq".to_owned()
        }]
    );
    assert_eq!(
        answers[1].derivations,
        [Derivation::Pattern {
            definition: "zzz".to_owned()
        }]
    );

    let unchecked = Clue::parse("zzz qqq (5)|.....").unwrap();
    assert!(pattern_fallback(&unchecked, &lexicon, &similarity).is_empty());
    let no_pattern = Clue::parse("zzz qqq (5)").unwrap();
    assert!(pattern_fallback(&no_pattern, &lexicon, &similarity).is_empty());
}

#[test]
fn test_solutions() {
    let solutions = Solutions {
        answers: vec![
            RankedAnswer {
                answer: "english".to_owned(),
                score: 0.9,
                derivations: Vec::new(),
            },
            RankedAnswer {
                answer: "shingle".to_owned(),
                score: 0.1,
                derivations: Vec::new(),
            },
        ],
        known_answer: Some("shingle".to_owned()),
    };
    let best = solutions.best().map(|best| best.answer.as_str());
    assert_eq!(best, Some("english"));
    assert_eq!(solutions.rank_of("English"), Some(1));
    assert_eq!(solutions.known_rank(), Some(2));
    assert_eq!(solutions.rank_of("spin"), None);
    assert_eq!(
        solutions.to_string(),
        "  1. english 0.900\n  2. shingle 0.100\n"
    );
}
