//! Clue text, and the structured form the evaluator works on.

use crate::error::ClueError;
use crate::grammar;
use crate::kind::Kind;
use crate::search::TreeSearch;
use crate::wordplay::{normalize, WILDCARD};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;
use std::str::FromStr;
use std::sync::LazyLock;

/// Text, then the last parenthesized group, then whatever follows it.
static CLUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?s)(?P<text>.*)\((?P<lengths>[^()]*)\)(?P<rest>[^()]*)$").unwrap()
});

/************************
 *     Clue             *
 ************************/

/// A clue as written: `spin broken shingle (7)|e......|english`.
///
/// After the text comes the enumeration (`(7)`, `(3,4)` or `(3-4)`), then optionally a
/// pattern of checked letters with `.` for unknowns, then optionally the answer. The answer
/// is for measuring accuracy and is never looked at while solving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clue {
    pub tokens: Vec<String>,
    pub lengths: Vec<usize>,
    pub pattern: String,
    pub known_answer: Option<String>,
}

impl Clue {
    pub fn parse(text: &str) -> Result<Clue, ClueError> {
        let captures = CLUE_RE.captures(text).ok_or(ClueError::MissingLength)?;
        let lengths = parse_lengths(&captures["lengths"])?;
        let total = lengths.iter().sum::<usize>();

        let rest = captures["rest"].trim();
        let rest = rest.strip_prefix('|').unwrap_or(rest);
        let mut parts = rest.splitn(2, '|');
        let pattern = parse_pattern(parts.next().unwrap_or(""), total)?;
        let known_answer = parts.next().map(normalize).filter(|ans| !ans.is_empty());

        Ok(Clue {
            tokens: tokenize(&captures["text"]),
            lengths,
            pattern,
            known_answer,
        })
    }

    /// The total number of letters in the answer.
    pub fn length(&self) -> usize {
        self.lengths.iter().sum()
    }

    /// Every way of grouping adjacent tokens into at most `max_phrases` phrases of at most
    /// `max_words` tokens each. Grouped tokens are joined with `_`. The finest grouping (one
    /// token per phrase) comes first.
    pub fn phrasings(&self, max_words: usize, max_phrases: usize) -> Vec<Vec<String>> {
        let Some((first, rest)) = self.tokens.split_first() else {
            return Vec::new();
        };
        let max_words = max_words.max(1);

        // One choice per gap between tokens: false splits, true joins.
        let gaps = [false, true];
        let joinings = TreeSearch::new(vec![&gaps[..]; rest.len()])
            .accept(|joins: &Vec<bool>| {
                let run = joins.iter().rev().take_while(|join| **join).count();
                let splits = joins.iter().filter(|join| !**join).count();
                run < max_words && splits < max_phrases
            })
            .run(Vec::new());

        joinings
            .into_iter()
            .map(|joins| {
                let mut phrases = Vec::new();
                let mut phrase = first.clone();
                for (token, join) in rest.iter().zip(joins) {
                    if join {
                        phrase.push('_');
                    } else {
                        phrases.push(mem::take(&mut phrase));
                    }
                    phrase.push_str(token);
                }
                phrases.push(phrase);
                phrases
            })
            .collect()
    }
}

impl FromStr for Clue {
    type Err = ClueError;

    fn from_str(s: &str) -> Result<Clue, ClueError> {
        Clue::parse(s)
    }
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lengths = self
            .lengths
            .iter()
            .map(|len| len.to_string())
            .collect::<Vec<_>>();
        write!(f, "{} ({})", self.tokens.join(" "), lengths.join(","))?;
        if !self.pattern.is_empty() {
            write!(f, "|{}", self.pattern)?;
        }
        Ok(())
    }
}

fn parse_lengths(lengths: &str) -> Result<Vec<usize>, ClueError> {
    lengths
        .split([',', '-'])
        .map(|len| match len.trim().parse::<usize>() {
            Ok(len) if len > 0 => Ok(len),
            _ => Err(ClueError::BadLength(lengths.trim().to_owned())),
        })
        .collect()
}

fn parse_pattern(pattern: &str, total: usize) -> Result<String, ClueError> {
    let pattern = pattern
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-')
        .map(|ch| ch.to_ascii_lowercase())
        .collect::<String>();
    if let Some(bad) = pattern
        .chars()
        .find(|ch| *ch != WILDCARD && !ch.is_ascii_alphanumeric())
    {
        return Err(ClueError::BadPattern(bad));
    }
    let found = pattern.chars().count();
    if found != 0 && found != total {
        return Err(ClueError::PatternLength {
            expected: total,
            found,
        });
    }
    Ok(pattern)
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .filter_map(|ch| match ch {
            '-' => Some('_'),
            ch if ch.is_whitespace() => Some(' '),
            ch if ch.is_ascii_alphanumeric() || ch == '_' => Some(ch),
            _ => None,
        })
        .collect::<String>()
        .split_whitespace()
        .filter(|token| !token.chars().all(|ch| ch == '_'))
        .map(|token| token.to_owned())
        .collect()
}

/************************
 *     Role assignment  *
 ************************/

/// One phrase of a clue and the part it plays.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    pub phrase: String,
    pub kind: Kind,
}

/// A clue broken into phrases with a [`Kind`] for each, plus the answer constraints. This is
/// one candidate reading of a clue, ready for evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub roles: Vec<Role>,
    pub length: usize,
    /// Checked letters with `.` for unknowns, or empty.
    pub pattern: String,
}

impl RoleAssignment {
    /// Fails if the kinds don't form a valid clue structure, or if the length or pattern
    /// are malformed.
    pub fn new(
        roles: Vec<Role>,
        length: usize,
        pattern: impl Into<String>,
    ) -> Result<RoleAssignment, ClueError> {
        if length == 0 {
            return Err(ClueError::BadLength(length.to_string()));
        }
        let pattern: String = pattern.into();
        let assignment = RoleAssignment {
            roles,
            length,
            pattern: parse_pattern(&pattern, length)?,
        };
        if !grammar::is_valid(&assignment.kinds()) {
            let codes = assignment
                .roles
                .iter()
                .map(|role| role.kind.code())
                .collect::<Vec<_>>();
            return Err(ClueError::InvalidStructure(codes.join(" ")));
        }
        Ok(assignment)
    }

    /// Pair up phrases with kinds, without checking the structure.
    pub fn from_parts(
        phrases: &[String],
        kinds: &[Kind],
        length: usize,
        pattern: &str,
    ) -> RoleAssignment {
        let roles = phrases
            .iter()
            .zip(kinds)
            .map(|(phrase, kind)| Role {
                phrase: phrase.clone(),
                kind: *kind,
            })
            .collect();
        RoleAssignment {
            roles,
            length,
            pattern: pattern.to_owned(),
        }
    }

    /// Parse roles written as `phrase:kind`, separated by spaces, like
    /// `"sat:lit up:rev_l interrupting:ins siblings:syn balance:d"`. Use `_` to put spaces in
    /// a phrase.
    pub fn parse(
        roles: &str,
        length: usize,
        pattern: impl Into<String>,
    ) -> Result<RoleAssignment, ClueError> {
        let roles = roles
            .split_whitespace()
            .map(|item| {
                let (phrase, kind) = item
                    .rsplit_once(':')
                    .filter(|(phrase, _)| !phrase.is_empty())
                    .ok_or_else(|| ClueError::BadRole(item.to_owned()))?;
                Ok(Role {
                    phrase: phrase.to_lowercase(),
                    kind: kind.parse()?,
                })
            })
            .collect::<Result<Vec<_>, ClueError>>()?;
        RoleAssignment::new(roles, length, pattern)
    }

    pub fn kinds(&self) -> Vec<Kind> {
        self.roles.iter().map(|role| role.kind).collect()
    }

    pub fn definition_index(&self) -> Option<usize> {
        self.roles
            .iter()
            .position(|role| role.kind == Kind::Definition)
    }

    pub fn definition(&self) -> Option<&str> {
        self.definition_index()
            .map(|i| self.roles[i].phrase.as_str())
    }
}

impl fmt::Display for RoleAssignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for role in &self.roles {
            write!(f, "[{}: {}] ", role.kind.code(), role.phrase)?;
        }
        write!(f, "({})", self.length)?;
        if !self.pattern.is_empty() {
            write!(f, "|{}", self.pattern)?;
        }
        Ok(())
    }
}

#[test]
fn test_parse_clue() {
    let clue = Clue::parse("Spin broken shingle (7)|e......").unwrap();
    assert_eq!(clue.tokens, ["spin", "broken", "shingle"]);
    assert_eq!(clue.lengths, [7]);
    assert_eq!(clue.pattern, "e......");
    assert_eq!(clue.known_answer, None);

    let clue: Clue = "Initially, babies are naked (4)".parse().unwrap();
    assert_eq!(clue.tokens, ["initially", "babies", "are", "naked"]);
    assert_eq!(clue.pattern, "");
    assert_eq!(clue.to_string(), "initially babies are naked (4)");

    let clue = Clue::parse("Not needed (in the end) somehow (8) n....... | needless").unwrap();
    assert_eq!(clue.tokens, ["not", "needed", "in", "the", "end", "somehow"]);
    assert_eq!(clue.pattern, "n.......");
    assert_eq!(clue.known_answer.as_deref(), Some("needless"));

    let clue = Clue::parse("Half-hearted ice cream (3-5)|||").unwrap();
    assert_eq!(clue.tokens, ["half_hearted", "ice", "cream"]);
    assert_eq!(clue.lengths, [3, 5]);
    assert_eq!(clue.length(), 8);

    let clue = Clue::parse("It's - a test (2,1)|.. .|it's a").unwrap();
    assert_eq!(clue.tokens, ["its", "a", "test"]);
    assert_eq!(clue.pattern, "...");
    assert_eq!(clue.known_answer.as_deref(), Some("itsa"));

    let clue = Clue::parse("(5)").unwrap();
    assert!(clue.tokens.is_empty());
    assert!(clue.phrasings(3, 6).is_empty());
}

#[test]
fn test_parse_clue_errors() {
    assert_eq!(Clue::parse("no length"), Err(ClueError::MissingLength));
    assert_eq!(
        Clue::parse("bad (x)"),
        Err(ClueError::BadLength("x".to_owned()))
    );
    assert_eq!(
        Clue::parse("bad (0)"),
        Err(ClueError::BadLength("0".to_owned()))
    );
    assert_eq!(
        Clue::parse("bad ()"),
        Err(ClueError::BadLength("".to_owned()))
    );
    assert_eq!(Clue::parse("bad (3)|a?c"), Err(ClueError::BadPattern('?')));
    assert_eq!(
        Clue::parse("bad (3)|a.c."),
        Err(ClueError::PatternLength {
            expected: 3,
            found: 4
        })
    );
}

#[test]
fn test_phrasings() {
    let clue = Clue::parse("a b c (3)").unwrap();
    assert_eq!(
        clue.phrasings(3, 6),
        vec![
            vec!["a", "b", "c"],
            vec!["a", "b_c"],
            vec!["a_b", "c"],
            vec!["a_b_c"],
        ]
    );
    assert_eq!(
        clue.phrasings(2, 6),
        vec![vec!["a", "b", "c"], vec!["a", "b_c"], vec!["a_b", "c"]]
    );
    assert_eq!(clue.phrasings(1, 6), vec![vec!["a", "b", "c"]]);
    assert_eq!(clue.phrasings(0, 6), clue.phrasings(1, 6));

    // Too many phrases.
    assert_eq!(
        clue.phrasings(3, 2),
        vec![vec!["a", "b_c"], vec!["a_b", "c"], vec!["a_b_c"]]
    );
    assert_eq!(clue.phrasings(1, 2), Vec::<Vec<String>>::new());

    let clue = Clue::parse("one (3)").unwrap();
    assert_eq!(clue.phrasings(3, 6), vec![vec!["one"]]);
    assert_eq!(clue.phrasings(3, 1), vec![vec!["one"]]);

    // Long clues, few phrases.
    let clue = Clue::parse(&format!("{} (5)", ["w"; 24].join(" "))).unwrap();
    let phrasings = clue.phrasings(3, 2);
    assert_eq!(phrasings.len(), 0);
    let clue = Clue::parse("a b c d e f g h (5)").unwrap();
    assert!(clue.phrasings(8, 2).iter().all(|phrasing| phrasing.len() <= 2));
    assert_eq!(clue.phrasings(8, 2).len(), 8);
}

#[test]
fn test_role_assignment() {
    let roles = "sat:lit up:REV_L interrupting:ins siblings:syn balance:d";
    let assignment = RoleAssignment::parse(roles, 6, "").unwrap();
    assert_eq!(
        assignment.kinds(),
        [
            Kind::Literal,
            Kind::ReversalLeft,
            Kind::Insertion,
            Kind::Synonym,
            Kind::Definition
        ]
    );
    assert_eq!(assignment.definition_index(), Some(4));
    assert_eq!(assignment.definition(), Some("balance"));
    assert_eq!(
        assignment.to_string(),
        "[lit: sat] [rev_l: up] [ins: interrupting] [syn: siblings] [d: balance] (6)"
    );

    let with_pattern = RoleAssignment::parse("at_first:d bare:lit", 4, "b...").unwrap();
    assert_eq!(with_pattern.roles[0].phrase, "at_first");
    assert_eq!(with_pattern.to_string(), "[d: at_first] [lit: bare] (4)|b...");

    assert_eq!(
        RoleAssignment::parse("sat:lit up:rev_r", 3, ""),
        Err(ClueError::InvalidStructure("lit rev_r".to_owned()))
    );
    assert_eq!(
        RoleAssignment::parse("sat lit:d", 3, ""),
        Err(ClueError::BadRole("sat".to_owned()))
    );
    assert_eq!(
        RoleAssignment::parse("sat:lat up:d", 3, ""),
        Err(ClueError::UnknownKind("lat".to_owned()))
    );

    let roles = "sat:lit up:rev_l interrupting:ins siblings:syn balance:d";
    assert_eq!(
        RoleAssignment::parse(roles, 6, "s.."),
        Err(ClueError::PatternLength {
            expected: 6,
            found: 3
        })
    );
    assert_eq!(
        RoleAssignment::parse(roles, 6, "s?.s.."),
        Err(ClueError::BadPattern('?'))
    );
    assert_eq!(
        RoleAssignment::parse(roles, 0, ""),
        Err(ClueError::BadLength("0".to_owned()))
    );
    let spaced = RoleAssignment::parse(roles, 6, "S.. S..").unwrap();
    assert_eq!(spaced.pattern, "s..s..");

    let phrases = ["x".to_owned(), "y".to_owned()];
    let unchecked = RoleAssignment::from_parts(&phrases, &[Kind::Null, Kind::Null], 1, "");
    assert_eq!(unchecked.definition_index(), None);
}
