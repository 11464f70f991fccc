use std::collections::BTreeSet;

/// Every way of splicing one operand into the other, in either direction, if the result
/// fits in `budget`. If either operand is empty the other one passes through unchanged.
pub fn insertions(left: &str, right: &str, budget: usize) -> Vec<String> {
    if left.chars().count() + right.chars().count() > budget {
        return Vec::new();
    }
    if left.is_empty() || right.is_empty() {
        return vec![format!("{}{}", left, right)];
    }

    let mut found = BTreeSet::new();
    for (inner, outer) in [(left, right), (right, left)] {
        for (j, _) in outer.char_indices() {
            found.insert(format!("{}{}{}", &outer[..j], inner, &outer[j..]));
        }
    }
    found.into_iter().collect()
}

#[test]
fn test_insertions() {
    assert_eq!(insertions("a", "bc", 3), ["abc", "bac", "bca"]);
    assert!(insertions("a", "bc", 2).is_empty());
    assert_eq!(insertions("", "bc", 5), ["bc"]);
    assert_eq!(insertions("ab", "", 5), ["ab"]);

    let found = insertions("tas", "sis", 6);
    assert!(found.contains(&"stasis".to_owned()));
    assert!(found.contains(&"tsisas".to_owned()));
    assert_eq!(found.len(), 6);
}
