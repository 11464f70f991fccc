//! Which sequences of [`Kind`]s make sense as the skeleton of a clue.
//!
//! A skeleton needs exactly one definition, at one end of the clue, and every composite kind
//! needs a neighbor on the side it reads its operand from. A few neighborings are ruled out
//! because two composites would fight over the same operand, or because a composite would
//! read from a `null`.
//!
//! Every rule but the definition placement and the two open ends only looks at the last
//! kind and the two before it, so skeletons are checked as they're built.

use crate::kind::Kind;
use crate::search::TreeSearch;

/// Whether the last kind of `prefix` may follow the ones before it.
fn last_is_admissible(prefix: &[Kind]) -> bool {
    let n = prefix.len();
    let Some(&last) = prefix.last() else {
        return true;
    };
    if n == 1 {
        return !last.takes_left();
    }

    let prev = prefix[n - 2];
    let earlier = &prefix[..n - 1];

    // Composites competing for one operand.
    if prev.is_right() && last.takes_left() {
        return false;
    }
    if prev == Kind::Insertion && last.is_right() {
        return false;
    }
    if n >= 3 && prefix[n - 3].is_right() && last.is_left() {
        return false;
    }

    // Nothing may read from a null.
    if prev.is_right() && last == Kind::Null {
        return false;
    }
    if prev == Kind::Null && last.is_left() {
        return false;
    }

    // The definition is at one end, alone, and never an operand.
    if prev == Kind::Definition && (n > 2 || last.takes_left()) {
        return false;
    }
    if last == Kind::Definition && earlier.contains(&Kind::Definition) {
        return false;
    }

    if last.is_anagram() && earlier.iter().any(|k| k.is_anagram()) {
        return false;
    }

    true
}

/// Whether `kinds` could still be extended into a valid skeleton, as far as the rules that
/// only look backwards can tell.
pub fn is_valid_prefix(kinds: &[Kind]) -> bool {
    (1..=kinds.len()).all(|n| last_is_admissible(&kinds[..n]))
}

/// Whether `kinds` is a complete, valid skeleton.
pub fn is_valid(kinds: &[Kind]) -> bool {
    let (Some(&first), Some(&last)) = (kinds.first(), kinds.last()) else {
        return false;
    };
    if !is_valid_prefix(kinds) || last.takes_right() {
        return false;
    }

    let definitions = kinds.iter().filter(|k| **k == Kind::Definition).count();
    if definitions != 1 || (first == Kind::Definition) == (last == Kind::Definition) {
        return false;
    }
    if last == Kind::Definition && kinds[kinds.len() - 2].takes_right() {
        return false;
    }
    true
}

/// Every valid skeleton for `n` phrases, in [`Kind::ALL`] order, earlier positions varying
/// slowest.
pub fn skeletons(n: usize) -> Vec<Vec<Kind>> {
    let alphabet: &[Kind] = &Kind::ALL;
    TreeSearch::new(vec![alphabet; n])
        .accept(|prefix: &Vec<Kind>| last_is_admissible(prefix))
        .run(Vec::new())
        .into_iter()
        .filter(|kinds| is_valid(kinds))
        .collect()
}

#[cfg(test)]
fn all_sequences(n: usize) -> Vec<Vec<Kind>> {
    let mut sequences = vec![Vec::new()];
    for _ in 0..n {
        sequences = sequences
            .into_iter()
            .flat_map(|seq| {
                Kind::ALL.into_iter().map(move |kind| {
                    let mut seq = seq.clone();
                    seq.push(kind);
                    seq
                })
            })
            .collect();
    }
    sequences
}

#[test]
fn test_grammar_examples() {
    use Kind::*;

    assert!(is_valid(&[Literal, Definition]));
    assert!(is_valid(&[Definition, Synonym]));
    assert!(is_valid(&[FirstLetter, Null, Literal, AnagramLeft, Definition]));
    assert!(is_valid(&[Literal, ReversalLeft, Insertion, Synonym, Definition]));
    assert!(is_valid(&[Synonym, AnagramRight, Literal, Definition]));

    // Definition placement.
    assert!(!is_valid(&[Definition]));
    assert!(!is_valid(&[Literal, Synonym]));
    assert!(!is_valid(&[Literal, Definition, Literal]));
    assert!(!is_valid(&[Definition, Literal, Definition]));

    // Open ends.
    assert!(!is_valid(&[AnagramLeft, Literal, Definition]));
    assert!(!is_valid(&[Definition, Literal, ReversalRight]));
    assert!(!is_valid(&[Definition, AnagramLeft]));
    assert!(!is_valid(&[Definition, Insertion, Literal]));
    assert!(!is_valid(&[Literal, AnagramRight, Definition]));
    assert!(!is_valid(&[Literal, Insertion, Definition]));

    // Competing composites.
    assert!(!is_valid(&[ReversalRight, AnagramLeft, Literal, Definition]));
    assert!(!is_valid(&[SubstringRight, Insertion, Literal, Definition]));
    assert!(!is_valid(&[Literal, Insertion, ReversalRight, Literal, Definition]));
    assert!(!is_valid(&[SubstringRight, Literal, ReversalLeft, Definition]));

    // Nulls are never operands.
    assert!(!is_valid(&[ReversalRight, Null, Literal, Definition]));
    assert!(!is_valid(&[Literal, Null, AnagramLeft, Definition]));

    // One anagram at most.
    assert!(!is_valid(&[Literal, AnagramLeft, Literal, AnagramLeft, Definition]));

    assert!(is_valid_prefix(&[Literal, Insertion]));
    assert!(!is_valid_prefix(&[Insertion]));
}

#[test]
fn test_skeletons_match_brute_force() {
    for n in 0..=3 {
        let brute_force = all_sequences(n)
            .into_iter()
            .filter(|kinds| is_valid(kinds))
            .collect::<Vec<_>>();
        assert_eq!(skeletons(n), brute_force);
    }
    assert!(skeletons(0).is_empty());
    assert!(skeletons(1).is_empty());
    assert!(skeletons(2).contains(&vec![Kind::Literal, Kind::Definition]));
}

#[test]
fn test_skeleton_properties() {
    for n in 1..=6 {
        for kinds in skeletons(n) {
            let definitions = kinds
                .iter()
                .enumerate()
                .filter(|(_, k)| **k == Kind::Definition)
                .map(|(i, _)| i)
                .collect::<Vec<_>>();
            assert_eq!(definitions.len(), 1, "{:?}", kinds);
            assert!(definitions[0] == 0 || definitions[0] == n - 1, "{:?}", kinds);

            for pair in kinds.windows(2) {
                assert!(!(pair[0].is_right() && pair[1].takes_left()), "{:?}", kinds);
            }
            assert!(kinds.iter().filter(|k| k.is_anagram()).count() <= 1);
        }
    }
}
