//! Turning one role assignment into the answers it spells.
//!
//! Every position gets a set of candidate fragments. Leaves get theirs from their own
//! phrase; composites apply their base function to every combination of their operands'
//! candidates. Then the fragments of the positions nobody used as an operand are concatenated
//! left to right, pruning as we go, and whatever real words of the right length come out are
//! scored against the definition.

use crate::clue::{Role, RoleAssignment};
use crate::kind::{Kind, Op, Operands};
use crate::lexicon::Lexicon;
use crate::search::TreeSearch;
use crate::thesaurus::{Relatedness, Thesaurus};
use crate::wordplay::{self, matches_pattern, normalize};
use bitvec::{bitvec, vec::BitVec};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// The read-only lookup tables evaluation consults.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub lexicon: &'a Lexicon,
    pub thesaurus: &'a Thesaurus,
    pub relatedness: &'a dyn Relatedness,
}

/// An answer and how well it matches the definition, in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scored {
    pub answer: String,
    pub score: f64,
}

/************************
 *     Memo             *
 ************************/

/// Base function results, shared by every assignment evaluated while solving one clue.
/// Entries are never invalidated; make a new `Memo` for each clue.
#[derive(Debug, Default)]
pub struct Memo {
    composites: DashMap<(Op, usize, Vec<String>), Arc<Vec<String>>>,
    /// sorted letters -> plausible arrangements
    arrangements: DashMap<String, Arc<Vec<String>>>,
}

impl Memo {
    pub fn new() -> Memo {
        Memo::default()
    }

    /// [`wordplay::apply`], remembered.
    pub fn apply(
        &self,
        op: Op,
        budget: usize,
        operands: &[String],
        lexicon: &Lexicon,
    ) -> Arc<Vec<String>> {
        let key = (op, budget, operands.to_vec());
        if let Some(hit) = self.composites.get(&key) {
            return Arc::clone(hit.value());
        }
        let result = Arc::new(match (op, operands) {
            (Op::Anagram, [word]) if word.len() <= budget => self
                .cached_arrangements(word, lexicon)
                .iter()
                .filter(|arrangement| *arrangement != word)
                .cloned()
                .collect(),
            _ => wordplay::apply(op, operands, budget, lexicon),
        });
        self.composites.insert(key, Arc::clone(&result));
        result
    }

    fn cached_arrangements(&self, word: &str, lexicon: &Lexicon) -> Arc<Vec<String>> {
        let mut letters = word.chars().collect::<Vec<_>>();
        letters.sort_unstable();
        let letters = letters.into_iter().collect::<String>();
        if let Some(hit) = self.arrangements.get(&letters) {
            return Arc::clone(hit.value());
        }
        let result = Arc::new(wordplay::arrangements(&letters, lexicon));
        self.arrangements.insert(letters, Arc::clone(&result));
        result
    }

    /// The number of remembered base function calls.
    pub fn len(&self) -> usize {
        self.composites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.composites.is_empty()
    }
}

/************************
 *     Evaluation       *
 ************************/

/// Every answer `assignment` spells, with its score against the definition, in
/// alphabetical order. A dead end (some position with no candidates, an operand outside the
/// clue, operands that depend on each other) gives nothing.
pub fn evaluate(assignment: &RoleAssignment, context: Context, memo: &Memo) -> Vec<Scored> {
    match spell(assignment, context, memo) {
        Some(answers) => answers,
        None => {
            tracing::trace!(%assignment, "dead end");
            Vec::new()
        }
    }
}

fn spell(assignment: &RoleAssignment, context: Context, memo: &Memo) -> Option<Vec<Scored>> {
    let lexicon = context.lexicon;
    let target = assignment.length;
    let pattern = assignment.pattern.as_str();

    let definition = assignment.definition()?;
    let definition_index = assignment.definition_index()?;
    let roles = assignment
        .roles
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != definition_index)
        .map(|(_, role)| role)
        .collect::<Vec<_>>();
    let kinds = roles.iter().map(|role| role.kind).collect::<Vec<_>>();
    let n = roles.len();

    // Who reads from whom. Positions read by a composite don't appear in the answer
    // themselves.
    let mut operands = vec![None; n];
    let mut consumed: BitVec = bitvec![0; n];
    for (i, slot) in operands.iter_mut().enumerate() {
        if !kinds[i].is_composite() {
            continue;
        }
        if let Some(ops) = Operands::resolve(&kinds, i) {
            let indices = ops.indices(i, n)?;
            for j in &indices {
                consumed.set(*j, true);
            }
            *slot = Some((ops.op, indices));
        }
    }

    // Resolve until every position has candidates. A pass that resolves nothing means the
    // remaining composites are waiting on each other.
    let mut candidates: Vec<Option<Vec<String>>> = vec![None; n];
    while candidates.iter().any(|set| set.is_none()) {
        let mut progress = false;
        for i in 0..n {
            if candidates[i].is_some() {
                continue;
            }
            let resolved = match &operands[i] {
                None if kinds[i].is_leaf() => leaf(roles[i], target, context)?,
                None => return None,
                Some((op, indices)) => {
                    let Some(sets) = indices
                        .iter()
                        .map(|j| candidates[*j].as_deref())
                        .collect::<Option<Vec<_>>>()
                    else {
                        continue;
                    };
                    // Only fragments that appear as-is in the answer need to look like
                    // part of a word. Operands get rearranged on the way.
                    let verbatim = !consumed[i];
                    composite(*op, &sets, target, verbatim, lexicon, memo)?
                }
            };
            candidates[i] = Some(resolved);
            progress = true;
        }
        if !progress {
            return None;
        }
    }
    let candidates = candidates.into_iter().collect::<Option<Vec<_>>>()?;

    let spelled = TreeSearch::new(candidates.iter().map(|set| set.as_slice()))
        .gate(|i| !consumed[i])
        .accept(|partial: &String| {
            partial.len() <= target
                && lexicon.is_plausible_prefix(partial, target)
                && matches_pattern(partial, pattern)
        })
        .run(String::new());

    let answers = spelled
        .into_iter()
        .filter(|answer| answer.len() == target && lexicon.contains(answer))
        .collect::<BTreeSet<_>>();
    Some(
        answers
            .into_iter()
            .map(|answer| {
                let score = context.relatedness.similarity(&answer, definition);
                let score = if score.is_nan() {
                    0.0
                } else {
                    score.clamp(0.0, 1.0)
                };
                Scored { answer, score }
            })
            .collect(),
    )
}

/// Candidates for a leaf, from its phrase alone. `None` if there are none.
fn leaf(role: &Role, target: usize, context: Context) -> Option<Vec<String>> {
    let letters = normalize(&role.phrase);
    match role.kind {
        Kind::Literal => Some(vec![letters]),
        Kind::Null => Some(vec![String::new()]),
        Kind::FirstLetter => letters.chars().next().map(|ch| vec![ch.to_string()]),
        Kind::Synonym => {
            let mut synonyms = Vec::new();
            for synonym in context.thesaurus.synonyms(&role.phrase) {
                let synonym = normalize(synonym);
                if !synonym.is_empty() && synonym.len() <= target && !synonyms.contains(&synonym)
                {
                    synonyms.push(synonym);
                }
            }
            if synonyms.is_empty() {
                synonyms.push(letters);
            }
            Some(synonyms)
        }
        // Only one definition, and it was taken out.
        _ => None,
    }
}

/// Candidates for a composite: `op` applied to every combination of its operands'
/// candidates, keeping what fits in the answer. If the result goes into the answer
/// `verbatim`, it must also look like part of a word. `None` if nothing (or only the empty
/// string) survives.
fn composite(
    op: Op,
    operand_sets: &[&[String]],
    target: usize,
    verbatim: bool,
    lexicon: &Lexicon,
    memo: &Memo,
) -> Option<Vec<String>> {
    let mut found = BTreeSet::new();
    for combination in TreeSearch::new(operand_sets.iter().copied()).run(Vec::new()) {
        for result in memo.apply(op, target, &combination, lexicon).iter() {
            if result.len() <= target && (!verbatim || lexicon.is_plausible_fragment(result)) {
                found.insert(result.clone());
            }
        }
    }
    if found.iter().all(|result| result.is_empty()) {
        return None;
    }
    Some(found.into_iter().collect())
}

#[cfg(test)]
fn test_context<'a>(lexicon: &'a Lexicon, thesaurus: &'a Thesaurus) -> Context<'a> {
    Context {
        lexicon,
        thesaurus,
        relatedness: thesaurus,
    }
}

#[test]
fn test_evaluate_worked_clues() {
    let lexicon = Lexicon::from_words(["total", "tonal", "stasis", "bare", "bear"]);
    let mut thesaurus = Thesaurus::new();
    thesaurus.insert("count", "total");
    thesaurus.insert("siblings", "sis");
    thesaurus.insert("balance", "stasis");
    let context = test_context(&lexicon, &thesaurus);
    let memo = Memo::new();

    let roles = "tenor:first and:null alto:lit upset:ana_l count:d";
    let total = RoleAssignment::parse(roles, 5, "").unwrap();
    assert_eq!(
        evaluate(&total, context, &memo),
        [Scored {
            answer: "total".to_owned(),
            score: 1.0
        }]
    );

    let roles = "sat:lit up:rev_l interrupting:ins siblings:syn balance:d";
    let stasis = RoleAssignment::parse(roles, 6, "").unwrap();
    assert_eq!(
        evaluate(&stasis, context, &memo),
        [Scored {
            answer: "stasis".to_owned(),
            score: 1.0
        }]
    );

    let roles = "initially:sub_r babies:lit are:lit naked:d";
    let bare = RoleAssignment::parse(roles, 4, "").unwrap();
    let answers = evaluate(&bare, context, &memo);
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].answer, "bare");
    assert_eq!(answers[0].score, 0.0);

    assert!(!memo.is_empty());
}

#[test]
fn test_evaluate_pattern_and_determinism() {
    let lexicon = Lexicon::from_words(["stasis"]);
    let mut thesaurus = Thesaurus::new();
    thesaurus.insert("siblings", "sis");
    let context = test_context(&lexicon, &thesaurus);

    let roles = "sat:lit up:rev_l interrupting:ins siblings:syn balance:d";
    let matching = RoleAssignment::parse(roles, 6, "s..s..").unwrap();
    let clashing = RoleAssignment::parse(roles, 6, "t.....").unwrap();

    let first = evaluate(&matching, context, &Memo::new());
    let second = evaluate(&matching, context, &Memo::new());
    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
    assert!(evaluate(&clashing, context, &Memo::new()).is_empty());

    // Wrong length.
    let short = RoleAssignment::parse(roles, 5, "").unwrap();
    assert!(evaluate(&short, context, &Memo::new()).is_empty());
}

#[test]
fn test_evaluate_chained_insertion() {
    let lexicon = Lexicon::from_words(["cat", "act"]);
    let mut thesaurus = Thesaurus::new();
    thesaurus.insert("feline", "cat");
    let context = test_context(&lexicon, &thesaurus);

    // The head of "cow" goes into "at", not "cow" itself.
    let roles = "head:sub_r cow:lit in:ins at:lit feline:d";
    let assignment = RoleAssignment::parse(roles, 3, "").unwrap();
    let answers = evaluate(&assignment, context, &Memo::new());
    let words = answers.iter().map(|s| s.answer.as_str()).collect::<Vec<_>>();
    assert_eq!(words, ["act", "cat"]);
    assert_eq!(answers[1].score, 1.0);
    assert_eq!(answers[0].score, 0.0);
}

#[test]
fn test_evaluate_dead_ends() {
    let lexicon = Lexicon::from_words(["ab", "ba"]);
    let thesaurus = Thesaurus::new();
    let context = test_context(&lexicon, &thesaurus);
    let phrases = ["a", "x", "y", "b", "def"].map(|s| s.to_owned());

    // Two insertions reading from each other.
    let kinds = [
        Kind::Literal,
        Kind::Insertion,
        Kind::Insertion,
        Kind::Literal,
        Kind::Definition,
    ];
    let cycle = RoleAssignment::from_parts(&phrases, &kinds, 2, "");
    assert!(evaluate(&cycle, context, &Memo::new()).is_empty());

    // An operand past the end of the clue.
    let kinds = [Kind::Literal, Kind::AnagramRight, Kind::Definition];
    let open = RoleAssignment::from_parts(&phrases[2..], &kinds, 2, "");
    assert!(evaluate(&open, context, &Memo::new()).is_empty());

    // No definition.
    let kinds = [Kind::Literal, Kind::Literal];
    let undefined = RoleAssignment::from_parts(&phrases[..2], &kinds, 2, "");
    assert!(evaluate(&undefined, context, &Memo::new()).is_empty());

    // First letter of nothing.
    let phrases = ["a".to_owned(), "!".to_owned(), "def".to_owned()];
    let kinds = [Kind::Literal, Kind::FirstLetter, Kind::Definition];
    let empty = RoleAssignment::from_parts(&phrases, &kinds, 2, "");
    assert!(evaluate(&empty, context, &Memo::new()).is_empty());
}

#[test]
fn test_evaluate_insertion_into_composite() {
    let lexicon = Lexicon::from_words(["cat"]);
    let mut thesaurus = Thesaurus::new();
    thesaurus.insert("feline", "cat");
    let context = test_context(&lexicon, &thesaurus);

    // "tc" reversed is "ct", which no word contains, but "a" splits it.
    let roles = "tc:lit back:rev_l in:ins a:lit feline:d";
    let assignment = RoleAssignment::parse(roles, 3, "").unwrap();
    assert_eq!(
        evaluate(&assignment, context, &Memo::new()),
        [Scored {
            answer: "cat".to_owned(),
            score: 1.0
        }]
    );

    // The ending of "fact" around "a".
    let roles = "a:lit in:ins fact:lit ending:sub_l feline:d";
    let assignment = RoleAssignment::parse(roles, 3, "").unwrap();
    let words = evaluate(&assignment, context, &Memo::new())
        .into_iter()
        .map(|scored| scored.answer)
        .collect::<Vec<_>>();
    assert_eq!(words, ["cat"]);
}
