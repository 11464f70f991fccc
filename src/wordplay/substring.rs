use crate::lexicon::Lexicon;
use std::collections::BTreeSet;

/// The proper substrings of `word` that wordplay can pick out, no longer than `budget`:
///
/// - for each length, the prefix and the suffix;
/// - for lengths of the same parity as the word, the middle of that length, and (when both
///   are even) the two ends of half that length each, joined;
/// - any window that is itself a dictionary word.
pub fn substrings(word: &str, budget: usize, lexicon: &Lexicon) -> Vec<String> {
    let chars = word.chars().collect::<Vec<_>>();
    let n = chars.len();
    let slice = |start: usize, end: usize| chars[start..end].iter().collect::<String>();

    let mut found = BTreeSet::new();
    for l in 1..=budget.min(n.saturating_sub(1)) {
        found.insert(slice(0, l));
        found.insert(slice(n - l, n));

        let half = l / 2;
        if n % 2 == 0 && l % 2 == 0 {
            found.insert(slice(0, half) + &slice(n - half, n));
            found.insert(slice(n / 2 - half, n / 2 + half));
        }
        if n % 2 == 1 && l % 2 == 1 {
            found.insert(slice(n / 2 - half, n / 2 + half + 1));
        }

        for start in 0..=n - l {
            let window = slice(start, start + l);
            if lexicon.contains(&window) {
                found.insert(window);
            }
        }
    }
    found.into_iter().collect()
}

#[test]
fn test_substrings() {
    let lexicon = Lexicon::from_words(["den", "arde"]);

    let found = substrings("gardens", 3, &lexicon);
    for expected in ["g", "ga", "gar", "s", "ns", "ens", "d", "rde", "den"] {
        assert!(found.contains(&expected.to_owned()), "{}", expected);
    }
    assert!(!found.contains(&"ard".to_owned()));
    assert!(found.iter().all(|s| s.len() <= 3));

    let found = substrings("tiger", 4, &lexicon);
    assert!(found.contains(&"tige".to_owned()));
    assert!(found.contains(&"ige".to_owned()));

    // Even length word: the joined ends and the middle.
    let found = substrings("bottle", 4, &lexicon);
    for expected in ["bole", "ottl", "bo", "le", "tt"] {
        assert!(found.contains(&expected.to_owned()), "{}", expected);
    }
    assert!(!found.contains(&"bottle".to_owned()));

    assert!(substrings("a", 5, &lexicon).is_empty());
    assert!(substrings("", 5, &lexicon).is_empty());
}
