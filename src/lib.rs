//! Some crossword clues need a flash of inspiration.
//!
//! For the cryptic ones, there's clue-o-matic.
//!
//! A cryptic clue is a definition at one end, and wordplay spelling out the same answer in
//! the rest: `initially babies are naked (4)` is "naked" (BARE), defined, and spelled as the
//! first letter of "babies" followed by "are". Clue-o-matic finds answers by trying every way
//! of reading a clue like that:
//!
//! - Split the clue into phrases, every way possible.
//! - Give each phrase a role (a [`Kind`]): definition, literal, synonym, first letter, part of
//!   an anagram, and so on. Only role sequences that make grammatical sense for a cryptic
//!   clue are tried (see [`grammar`]).
//! - Work out what letters each reading spells ([`evaluate()`]), keeping the real words of the
//!   right length.
//! - Rank the words by how well they match the definition.
//!
//! Clue-o-matic can be used either as an application (see `clueomatic --help`), or as a
//! library. As a library, you need a word list and a thesaurus:
//!
//! ```
//! use clueomatic::{Lexicon, Solver, Thesaurus};
//!
//! let lexicon = Lexicon::from_words(["bare", "bear", "babe", "sari"]);
//! let mut thesaurus = Thesaurus::new();
//! thesaurus.insert("naked", "bare");
//! thesaurus.insert("naked", "nude");
//!
//! let solver = Solver::new(&lexicon, &thesaurus);
//! let solutions = solver.solve_text("initially babies are naked (4)").unwrap();
//!
//! let best = solutions.best().unwrap();
//! assert_eq!(best.answer, "bare");
//! assert_eq!(best.score, 1.0);
//! ```
//!
//! Each answer remembers how it was found:
//!
//! ```text
//! BARE (1.000)
//!     [sub_r: initially] [lit: babies] [lit: are] [d: naked] (4)
//!     ...
//! ```
//!
//! Real word lists and thesauri are big. Load them from files with
//! [`Lexicon::word_list_file`] and [`Thesaurus::json_file`].

mod clue;
mod error;
mod evaluate;
mod kind;
mod lexicon;
mod ranking;
mod thesaurus;

pub mod grammar;
pub mod report;
pub mod search;
pub mod wordplay;

pub use clue::{Clue, Role, RoleAssignment};
pub use error::{ClueError, Error, LoadError};
pub use evaluate::{evaluate, Context, Memo, Scored};
pub use kind::{Kind, Op, Operands};
pub use lexicon::{Lexicon, DEFAULT_NGRAM_ORDER};
pub use ranking::{is_echo, pattern_fallback, Derivation, RankedAnswer, Ranking, Solutions};
pub use thesaurus::{Relatedness, Thesaurus};

use dashmap::DashMap;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/************************
 *     Solver           *
 ************************/

pub struct Solver<'a> {
    lexicon: &'a Lexicon,
    thesaurus: &'a Thesaurus,
    relatedness: &'a dyn Relatedness,
    cancel: Option<&'a AtomicBool>,
    /// phrase count -> valid skeletons
    skeletons: DashMap<usize, Arc<Vec<Vec<Kind>>>>,
    config: Config,
}

impl<'a> Solver<'a> {
    /// A solver that scores answers with the thesaurus's own idea of relatedness.
    pub fn new(lexicon: &'a Lexicon, thesaurus: &'a Thesaurus) -> Solver<'a> {
        Solver {
            lexicon,
            thesaurus,
            relatedness: thesaurus,
            cancel: None,
            skeletons: DashMap::new(),
            config: Config::default(),
        }
    }

    /// Score answers against definitions with `relatedness` instead.
    pub fn with_relatedness(mut self, relatedness: &'a dyn Relatedness) -> Solver<'a> {
        self.relatedness = relatedness;
        self
    }

    /// Stop searching, and return what's been found so far, once `flag` is set. It's checked
    /// between role assignments.
    pub fn with_cancel_flag(mut self, flag: &'a AtomicBool) -> Solver<'a> {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&mut self) -> &mut Config {
        &mut self.config
    }

    fn context(&self) -> Context<'a> {
        Context {
            lexicon: self.lexicon,
            thesaurus: self.thesaurus,
            relatedness: self.relatedness,
        }
    }

    fn skeletons(&self, phrase_count: usize) -> Arc<Vec<Vec<Kind>>> {
        if let Some(hit) = self.skeletons.get(&phrase_count) {
            return Arc::clone(hit.value());
        }
        let skeletons = Arc::new(grammar::skeletons(phrase_count));
        self.skeletons.insert(phrase_count, Arc::clone(&skeletons));
        skeletons
    }

    fn is_cancelled(&self, start_time: Instant) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
            || self
                .config
                .timeout
                .is_some_and(|timeout| start_time.elapsed() >= timeout)
    }

    pub fn solve_text(&self, text: &str) -> Result<Solutions, ClueError> {
        Ok(self.solve(&Clue::parse(text)?))
    }

    /// Every answer any reading of `clue` spells, best first. If there are none and some
    /// letters of the answer are known, every word that fits them.
    pub fn solve(&self, clue: &Clue) -> Solutions {
        let start_time = Instant::now();
        let context = self.context();
        let memo = Memo::new();
        let length = clue.length();
        let mut ranking = Ranking::new();

        let phrasings = clue.phrasings(self.config.max_phrase_words, self.config.max_phrases);
        for phrasing in phrasings {
            if self.is_cancelled(start_time) {
                warn!(%clue, "search stopped early");
                break;
            }

            let skeletons = self.skeletons(phrasing.len());
            if self.config.log_phrasings {
                info!(phrases = ?phrasing, skeletons = skeletons.len(), "phrasing");
            }

            let found = skeletons
                .par_iter()
                .filter_map(|kinds| {
                    if self.is_cancelled(start_time) {
                        return None;
                    }
                    let assignment =
                        RoleAssignment::from_parts(&phrasing, kinds, length, &clue.pattern);
                    let answers = evaluate(&assignment, context, &memo);
                    if answers.is_empty() {
                        None
                    } else {
                        Some((Arc::new(assignment), answers))
                    }
                })
                .collect::<Vec<_>>();

            for (assignment, answers) in found {
                for Scored { answer, score } in answers {
                    if is_echo(&answer, &phrasing, &clue.tokens) {
                        continue;
                    }
                    if self.config.log_assignments {
                        info!(%assignment, answer = answer.as_str(), score, "found");
                    }
                    ranking.add(answer, score, Derivation::Wordplay(Arc::clone(&assignment)));
                }
            }
            if self.config.log_elapsed {
                info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "elapsed");
            }
        }
        debug!(answers = ranking.len(), memo = memo.len(), "wordplay done");

        if ranking.is_empty() {
            ranking = pattern_fallback(clue, self.lexicon, self.relatedness);
            if !ranking.is_empty() {
                debug!(answers = ranking.len(), "no wordplay; matched the pattern instead");
            }
        }
        if self.config.log_elapsed {
            info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "total time");
        }

        Solutions {
            answers: ranking.into_sorted(),
            known_answer: clue.known_answer.clone(),
        }
    }

    /// The answers one particular reading of a clue spells, best first.
    pub fn solve_assignment(&self, assignment: &RoleAssignment) -> Solutions {
        let answers = evaluate(assignment, self.context(), &Memo::new());
        let assignment = Arc::new(assignment.clone());
        let mut ranking = Ranking::new();
        for Scored { answer, score } in answers {
            ranking.add(answer, score, Derivation::Wordplay(Arc::clone(&assignment)));
        }
        Solutions {
            answers: ranking.into_sorted(),
            known_answer: None,
        }
    }
}

/************************
 *     Config           *
 ************************/

// When running `main`, this is loaded from command line args.
// See `Config` in `main.rs`.
/// Configuration options. Set these using `Solver.config()`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log each phrasing of the clue as it's tried
    pub log_phrasings: bool,
    /// Log each role assignment that spells an answer
    pub log_assignments: bool,
    /// Log how long each phrasing took
    pub log_elapsed: bool,
    /// The most words to group into one phrase
    pub max_phrase_words: usize,
    /// Skip phrasings with more phrases than this. The number of role assignments grows
    /// roughly eightfold with each phrase.
    pub max_phrases: usize,
    /// Give up searching after this long, returning what's been found so far
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            log_phrasings: false,
            log_assignments: false,
            log_elapsed: false,
            max_phrase_words: 3,
            max_phrases: 6,
            timeout: None,
        }
    }
}

#[cfg(test)]
fn test_tables() -> (Lexicon, Thesaurus) {
    let lexicon = Lexicon::from_words([
        "bare", "bear", "babe", "are", "english", "shingle", "single", "tingles", "spin",
        "apple", "abide", "angle", "ankle",
    ]);
    let mut thesaurus = Thesaurus::new();
    thesaurus.insert("naked", "bare");
    thesaurus.insert("spin", "english");
    thesaurus.insert("spin", "twirl");
    (lexicon, thesaurus)
}

#[test]
fn test_solve_bare() {
    let (lexicon, thesaurus) = test_tables();
    let solver = Solver::new(&lexicon, &thesaurus);
    let solutions = solver.solve_text("initially babies are naked (4)").unwrap();

    let rank = solutions.rank_of("bare").unwrap();
    assert!(rank <= 3, "{}", solutions);
    assert_eq!(solutions.answers[rank - 1].score, 1.0);
    let derivations = &solutions.answers[rank - 1].derivations;
    let expected = RoleAssignment::parse("initially:sub_r babies:lit are:lit naked:d", 4, "")
        .unwrap();
    assert!(derivations.contains(&Derivation::Wordplay(Arc::new(expected))));

    // Never one of the clue's own words.
    assert_eq!(solutions.rank_of("are"), None);
}

#[test]
fn test_solve_english() {
    let (lexicon, thesaurus) = test_tables();
    let solver = Solver::new(&lexicon, &thesaurus);
    let solutions = solver
        .solve_text("spin broken shingle (7)|e......|english")
        .unwrap();

    assert_eq!(solutions.known_rank(), Some(1), "{}", solutions);
    let best = &solutions.answers[0];
    assert_eq!(best.score, 1.0);
    let anagram = RoleAssignment::parse("spin:d broken:ana_r shingle:lit", 7, "e......")
        .unwrap();
    assert!(best.derivations.contains(&Derivation::Wordplay(Arc::new(anagram))));
    assert!(solutions.answers.iter().all(|ranked| ranked.answer.starts_with('e')));
}

#[test]
fn test_solve_fallback() {
    let (lexicon, thesaurus) = test_tables();
    let solver = Solver::new(&lexicon, &thesaurus);

    let solutions = solver.solve_text("zzz qqq (5)|a...e").unwrap();
    let mut words = solutions
        .answers
        .iter()
        .map(|ranked| ranked.answer.as_str())
        .collect::<Vec<_>>();
    words.sort();
    assert_eq!(words, ["abide", "angle", "ankle", "apple"]);

    // No checked letters, no fallback.
    let solutions = solver.solve_text("zzz qqq (5)").unwrap();
    assert!(solutions.answers.is_empty());
}

#[test]
fn test_solve_cancelled() {
    let (lexicon, thesaurus) = test_tables();
    let cancel = AtomicBool::new(true);
    let solver = Solver::new(&lexicon, &thesaurus).with_cancel_flag(&cancel);
    let solutions = solver.solve_text("initially babies are naked (4)").unwrap();
    assert!(solutions.answers.is_empty());

    let mut solver = Solver::new(&lexicon, &thesaurus);
    solver.config().timeout = Some(Duration::ZERO);
    let solutions = solver.solve_text("initially babies are naked (4)").unwrap();
    assert!(solutions.answers.is_empty());
}

#[test]
fn test_solve_assignment_and_relatedness() {
    let (lexicon, thesaurus) = test_tables();
    let always = |_: &str, _: &str| 0.25;
    let solver = Solver::new(&lexicon, &thesaurus).with_relatedness(&always);

    let assignment =
        RoleAssignment::parse("initially:sub_r babies:lit are:lit naked:d", 4, "").unwrap();
    let solutions = solver.solve_assignment(&assignment);
    assert_eq!(solutions.answers.len(), 1);
    assert_eq!(solutions.answers[0].answer, "bare");
    assert_eq!(solutions.answers[0].score, 0.25);

    assert_eq!(
        solver.solve_text("no length here").map(|_| ()),
        Err(ClueError::MissingLength)
    );
}
