use crate::lexicon::Lexicon;

/// Every rearrangement of the letters of `letters` that could occur inside a dictionary word,
/// in alphabetical order. Includes `letters` itself if it qualifies.
///
/// Arrangements are grown one letter at a time. A partial arrangement is dropped as soon as
/// its trailing n-gram occurs in no dictionary word, which is what keeps long anagrams
/// tractable.
pub fn arrangements(letters: &str, lexicon: &Lexicon) -> Vec<String> {
    let mut remaining = letters.chars().collect::<Vec<_>>();
    if remaining.is_empty() {
        return Vec::new();
    }
    remaining.sort_unstable();

    let mut active = vec![(String::new(), remaining)];
    for _ in 0..letters.chars().count() {
        let mut next = Vec::new();
        for (partial, remaining) in &active {
            for (i, letter) in remaining.iter().enumerate() {
                // Each distinct letter once per step, so each arrangement comes out once.
                if i > 0 && remaining[i - 1] == *letter {
                    continue;
                }
                let mut extended = partial.clone();
                extended.push(*letter);
                if !lexicon.extends_plausibly(&extended) {
                    continue;
                }
                let mut rest = remaining.clone();
                rest.remove(i);
                next.push((extended, rest));
            }
        }
        if next.is_empty() {
            return Vec::new();
        }
        active = next;
    }
    active.into_iter().map(|(word, _)| word).collect()
}

/// The anagrams of `word`: its plausible [`arrangements`], other than `word` itself. Nothing
/// is enumerated for a word longer than `budget`.
pub fn anagrams(word: &str, budget: usize, lexicon: &Lexicon) -> Vec<String> {
    if word.chars().count() > budget {
        return Vec::new();
    }
    arrangements(word, lexicon)
        .into_iter()
        .filter(|arrangement| arrangement != word)
        .collect()
}

#[test]
fn test_anagrams() {
    let lexicon = Lexicon::from_words(["cat", "act", "tac", "taco", "coat"]);

    let cat = anagrams("cat", 10, &lexicon);
    assert!(!cat.contains(&"cat".to_owned()));
    assert!(cat.contains(&"act".to_owned()));
    assert!(cat.contains(&"tac".to_owned()));
    // "tca" starts with an n-gram no word contains.
    assert!(!cat.contains(&"tca".to_owned()));

    assert!(anagrams("cat", 2, &lexicon).is_empty());
    assert!(anagrams("", 5, &lexicon).is_empty());
    assert_eq!(anagrams("xyz", 5, &lexicon), Vec::<String>::new());

    // Repeated letters give each arrangement once.
    let lexicon = Lexicon::from_words(["noon"]);
    assert_eq!(arrangements("noon", &lexicon), ["noon"]);
    assert!(anagrams("noon", 4, &lexicon).is_empty());
}

#[test]
fn test_arrangements_are_sorted() {
    let lexicon = Lexicon::from_words(["stop", "pots", "tops", "spot", "post", "opts"]);
    let found = arrangements("stop", &lexicon);
    let mut sorted = found.clone();
    sorted.sort();
    assert_eq!(found, sorted);
    for word in ["stop", "pots", "tops", "spot", "post", "opts"] {
        assert!(found.contains(&word.to_owned()), "{}", word);
    }
}
