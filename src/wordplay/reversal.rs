/// `word` backwards, unless it's longer than `budget`.
pub fn reversal(word: &str, budget: usize) -> Vec<String> {
    if word.chars().count() > budget {
        return Vec::new();
    }
    vec![word.chars().rev().collect()]
}

#[test]
fn test_reversal() {
    assert_eq!(reversal("stressed", 8), ["desserts"]);
    assert_eq!(reversal("", 8), [""]);
    assert!(reversal("stressed", 7).is_empty());

    for word in ["", "a", "up", "level", "drawer"] {
        let back = reversal(word, 10).concat();
        assert_eq!(reversal(&back, 10), [word]);
    }
}
