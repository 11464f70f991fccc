use crate::error::ClueError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The wordplay role a phrase plays in a clue.
///
/// `_left` kinds take their operand from the position immediately to their left, `_right`
/// kinds from the position immediately to their right, and `Insertion` from both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    AnagramLeft,
    AnagramRight,
    SubstringLeft,
    SubstringRight,
    Insertion,
    ReversalLeft,
    ReversalRight,
    Literal,
    Definition,
    Synonym,
    FirstLetter,
    Null,
}

/// The string function behind a composite kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    Anagram,
    Substring,
    Insertion,
    Reversal,
}

impl Kind {
    /// Every kind, in the order the role-sequence generator tries them.
    pub const ALL: [Kind; 12] = [
        Kind::AnagramLeft,
        Kind::AnagramRight,
        Kind::SubstringLeft,
        Kind::SubstringRight,
        Kind::Insertion,
        Kind::ReversalLeft,
        Kind::ReversalRight,
        Kind::Literal,
        Kind::Definition,
        Kind::Synonym,
        Kind::FirstLetter,
        Kind::Null,
    ];

    pub fn op(self) -> Option<Op> {
        use Kind::*;

        match self {
            AnagramLeft | AnagramRight => Some(Op::Anagram),
            SubstringLeft | SubstringRight => Some(Op::Substring),
            Insertion => Some(Op::Insertion),
            ReversalLeft | ReversalRight => Some(Op::Reversal),
            Literal | Definition | Synonym | FirstLetter | Null => None,
        }
    }

    /// Resolved from its own phrase alone.
    pub fn is_leaf(self) -> bool {
        self.op().is_none()
    }

    pub fn is_composite(self) -> bool {
        self.op().is_some()
    }

    /// One of the `_left` kinds.
    pub fn is_left(self) -> bool {
        matches!(
            self,
            Kind::AnagramLeft | Kind::SubstringLeft | Kind::ReversalLeft
        )
    }

    /// One of the `_right` kinds.
    pub fn is_right(self) -> bool {
        matches!(
            self,
            Kind::AnagramRight | Kind::SubstringRight | Kind::ReversalRight
        )
    }

    /// Needs a neighbor on its left.
    pub fn takes_left(self) -> bool {
        self.is_left() || self == Kind::Insertion
    }

    /// Needs a neighbor on its right.
    pub fn takes_right(self) -> bool {
        self.is_right() || self == Kind::Insertion
    }

    pub fn is_anagram(self) -> bool {
        self.op() == Some(Op::Anagram)
    }

    /// The short code used on the command line and in derivations.
    pub fn code(self) -> &'static str {
        use Kind::*;

        match self {
            AnagramLeft => "ana_l",
            AnagramRight => "ana_r",
            SubstringLeft => "sub_l",
            SubstringRight => "sub_r",
            Insertion => "ins",
            ReversalLeft => "rev_l",
            ReversalRight => "rev_r",
            Literal => "lit",
            Definition => "d",
            Synonym => "syn",
            FirstLetter => "first",
            Null => "null",
        }
    }

    pub fn name(self) -> &'static str {
        use Kind::*;

        match self {
            AnagramLeft => "anagram_left",
            AnagramRight => "anagram_right",
            SubstringLeft => "substring_left",
            SubstringRight => "substring_right",
            Insertion => "insertion",
            ReversalLeft => "reversal_left",
            ReversalRight => "reversal_right",
            Literal => "literal",
            Definition => "definition",
            Synonym => "synonym",
            FirstLetter => "first_letter",
            Null => "null",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Kind {
    type Err = ClueError;

    /// Accepts either the short code (`ana_l`) or the full name (`anagram_left`).
    fn from_str(s: &str) -> Result<Kind, ClueError> {
        let s = s.trim().to_lowercase();
        Kind::ALL
            .into_iter()
            .find(|kind| kind.code() == s || kind.name() == s)
            .ok_or(ClueError::UnknownKind(s))
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Op::Anagram => "anagram",
            Op::Substring => "substring",
            Op::Insertion => "insertion",
            Op::Reversal => "reversal",
        };
        write!(f, "{}", name)
    }
}

/************************
 *     Operands         *
 ************************/

/// Which neighbors feed a composite position, as offsets relative to it, in the order the
/// base function takes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operands {
    pub op: Op,
    pub offsets: Vec<isize>,
}

impl Operands {
    /// The operands of position `i` in `kinds`, or `None` if that position is a leaf.
    ///
    /// An insertion reaches past its immediate neighbor when that neighbor is itself the
    /// operand of a composite pointing away from the insertion: `[sub_r, lit, ins, ..]`
    /// inserts the *substring*, not the raw literal.
    pub fn resolve(kinds: &[Kind], i: usize) -> Option<Operands> {
        let kind = *kinds.get(i)?;
        let op = kind.op()?;
        let offsets = if kind == Kind::Insertion {
            let left = if i >= 2 && kinds[i - 2].is_right() {
                -2
            } else {
                -1
            };
            let right = if kinds.get(i + 2).is_some_and(|k| k.is_left()) {
                2
            } else {
                1
            };
            vec![left, right]
        } else if kind.is_left() {
            vec![-1]
        } else {
            vec![1]
        };
        Some(Operands { op, offsets })
    }

    /// Absolute operand indices for position `i` in a sequence of `len` positions, or
    /// `None` if any of them falls outside the sequence.
    pub fn indices(&self, i: usize, len: usize) -> Option<Vec<usize>> {
        self.offsets
            .iter()
            .map(|offset| {
                i.checked_add_signed(*offset)
                    .filter(|index| *index < len && *index != i)
            })
            .collect()
    }
}

#[test]
fn test_kind_codes() {
    for kind in Kind::ALL {
        assert_eq!(kind.code().parse::<Kind>().unwrap(), kind);
        assert_eq!(kind.name().parse::<Kind>().unwrap(), kind);
        assert_eq!(kind.is_leaf(), !kind.is_composite());
    }
    assert_eq!(" D ".parse::<Kind>().unwrap(), Kind::Definition);
    assert!("anagram".parse::<Kind>().is_err());
    assert!(Kind::Insertion.takes_left() && Kind::Insertion.takes_right());
    assert!(!Kind::Insertion.is_left() && !Kind::Insertion.is_right());
}

#[test]
fn test_operand_offsets() {
    use Kind::*;

    let offsets = |kinds: &[Kind], i| Operands::resolve(kinds, i).map(|ops| ops.offsets);

    assert_eq!(offsets(&[Literal, AnagramLeft], 1), Some(vec![-1]));
    assert_eq!(offsets(&[SubstringRight, Literal], 0), Some(vec![1]));
    assert_eq!(offsets(&[Literal, ReversalLeft], 0), None);
    assert_eq!(offsets(&[Literal, Insertion, Synonym], 1), Some(vec![-1, 1]));

    // Chaining through the result of a neighboring composite.
    assert_eq!(
        offsets(&[SubstringRight, Literal, Insertion, Literal], 2),
        Some(vec![-2, 1])
    );
    assert_eq!(
        offsets(&[Literal, Insertion, Literal, ReversalLeft], 1),
        Some(vec![-1, 2])
    );

    let ops = Operands::resolve(&[Literal, Insertion, Literal], 1).unwrap();
    assert_eq!(ops.op, Op::Insertion);
    assert_eq!(ops.indices(1, 3), Some(vec![0, 2]));
    assert_eq!(ops.indices(0, 3), None);
    assert_eq!(ops.indices(2, 3), None);
}
