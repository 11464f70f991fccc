//! A general tool for figuring out all the ways to combine a bunch of lists.
//!
//! Say the alphabets are `[["a", "b"], ["c", "d"]]`. Then searching from `""` gives
//! `["ac", "ad", "bc", "bd"]`. The interesting part is that every partial combination is
//! checked as soon as it's built, so a branch that can't work out is cut off before any of
//! its extensions get made.

/// How to extend a partial combination by one more item, when no custom combination
/// function is given.
pub trait Append<T> {
    fn append(&self, item: &T) -> Self;
}

impl<T: Clone> Append<T> for Vec<T> {
    fn append(&self, item: &T) -> Vec<T> {
        let mut extended = Vec::with_capacity(self.len() + 1);
        extended.extend_from_slice(self);
        extended.push(item.clone());
        extended
    }
}

impl Append<String> for String {
    fn append(&self, item: &String) -> String {
        let mut extended = String::with_capacity(self.len() + item.len());
        extended.push_str(self);
        extended.push_str(item);
        extended
    }
}

/// Prune-as-you-build search over one alphabet per step.
///
/// - `gate(i)` says whether step `i` branches at all. Skipped steps leave every partial
///   combination as it was.
/// - `combine(partial, item)` builds the extended combination (default: [`Append`]).
/// - `accept(candidate)` is checked on every combination as it's built; rejected ones are
///   dropped along with everything they would have grown into.
///
/// Results come out in alphabet order, earlier steps varying slowest, so the same input
/// always gives the same output.
pub struct TreeSearch<'a, T, S> {
    alphabets: Vec<&'a [T]>,
    gate: Option<Box<dyn Fn(usize) -> bool + 'a>>,
    combine: Box<dyn Fn(&S, &T) -> S + 'a>,
    accept: Option<Box<dyn Fn(&S) -> bool + 'a>>,
}

impl<'a, T: 'a, S: Append<T> + 'a> TreeSearch<'a, T, S> {
    pub fn new(alphabets: impl IntoIterator<Item = &'a [T]>) -> TreeSearch<'a, T, S> {
        TreeSearch::with_combine(alphabets, |partial: &S, item: &T| partial.append(item))
    }
}

impl<'a, T: 'a, S: 'a> TreeSearch<'a, T, S> {
    /// Use this instead of `new` if extending a combination isn't just appending to it.
    pub fn with_combine(
        alphabets: impl IntoIterator<Item = &'a [T]>,
        combine: impl Fn(&S, &T) -> S + 'a,
    ) -> TreeSearch<'a, T, S> {
        TreeSearch {
            alphabets: alphabets.into_iter().collect(),
            gate: None,
            combine: Box::new(combine),
            accept: None,
        }
    }

    pub fn gate(mut self, gate: impl Fn(usize) -> bool + 'a) -> TreeSearch<'a, T, S> {
        self.gate = Some(Box::new(gate));
        self
    }

    pub fn accept(mut self, accept: impl Fn(&S) -> bool + 'a) -> TreeSearch<'a, T, S> {
        self.accept = Some(Box::new(accept));
        self
    }

    pub fn run(&self, start: S) -> Vec<S> {
        let mut active = vec![start];
        for (i, alphabet) in self.alphabets.iter().enumerate() {
            if let Some(gate) = &self.gate {
                if !gate(i) {
                    continue;
                }
            }
            let mut next = Vec::new();
            for partial in &active {
                for item in alphabet.iter() {
                    let candidate = (self.combine)(partial, item);
                    if self.accept.as_ref().map_or(true, |accept| accept(&candidate)) {
                        next.push(candidate);
                    }
                }
            }
            if next.is_empty() {
                return next;
            }
            active = next;
        }
        active
    }
}

#[test]
fn test_tree_search() {
    let first = ["a".to_owned(), "b".to_owned()];
    let second = ["c".to_owned(), "d".to_owned()];

    let all = TreeSearch::new([&first[..], &second[..]]).run(String::new());
    assert_eq!(all, ["ac", "ad", "bc", "bd"]);

    let pruned = TreeSearch::new([&first[..], &second[..]])
        .accept(|s: &String| !s.starts_with('b'))
        .run(String::new());
    assert_eq!(pruned, ["ac", "ad"]);

    let gated = TreeSearch::new([&first[..], &second[..]])
        .gate(|i| i != 0)
        .run(String::new());
    assert_eq!(gated, ["c", "d"]);

    let nothing = TreeSearch::new([&first[..], &second[..]])
        .accept(|s: &String| s.len() < 2)
        .run(String::new());
    assert!(nothing.is_empty());
}

#[test]
fn test_tree_search_vecs() {
    let bits = [false, true];
    let all = TreeSearch::new([&bits[..], &bits[..]]).run(Vec::new());
    assert_eq!(
        all,
        vec![
            vec![false, false],
            vec![false, true],
            vec![true, false],
            vec![true, true]
        ]
    );

    // No steps: the start is the only combination.
    let empty: Vec<&[bool]> = Vec::new();
    assert_eq!(TreeSearch::new(empty).run(vec![true]), vec![vec![true]]);

    let counted = TreeSearch::with_combine([&bits[..], &bits[..]], |n: &u32, bit: &bool| {
        n * 2 + *bit as u32
    })
    .run(0);
    assert_eq!(counted, [0, 1, 2, 3]);
}
