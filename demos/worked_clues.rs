//! Solve a handful of classic clues against a tiny in-memory word list and thesaurus.
//!
//! Run with `cargo run --example worked-clues`.

use clueomatic::report::{terminal_width, AnswerGrid, Explanation};
use clueomatic::{Error, Lexicon, RoleAssignment, Solver, Thesaurus};

const WORDS: &[&str] = &[
    "bare", "bear", "babe", "english", "shingle", "single", "tingles", "stasis", "total",
    "tonal", "cat", "act", "needless", "lessened",
];

const SYNONYMS: &[(&str, &str)] = &[
    ("naked", "bare"),
    ("naked", "nude"),
    ("spin", "english"),
    ("spin", "twirl"),
    ("count", "total"),
    ("count", "tally"),
    ("siblings", "sis"),
    ("balance", "stasis"),
    ("balance", "poise"),
    ("feline", "cat"),
];

const CLUES: &[&str] = &[
    "Initially babies are naked (4)|....|bare",
    "Spin broken shingle (7)|e......|english",
    "Tenor and alto upset count (5)|t....|total",
];

fn main() -> Result<(), Error> {
    let lexicon = Lexicon::from_words(WORDS);
    let mut thesaurus = Thesaurus::new();
    for (word, synonym) in SYNONYMS {
        thesaurus.insert(word, synonym);
    }
    let solver = Solver::new(&lexicon, &thesaurus);

    for clue in CLUES {
        let solutions = solver.solve_text(clue)?;
        println!("{}", clue);
        print!("{}", AnswerGrid::new(&solutions.answers, terminal_width()));
        print!(
            "{}",
            Explanation {
                answers: &solutions.answers,
                count: 1,
            }
        );
        println!();
    }

    // One reading, spelled out by hand.
    let roles = "sat:lit up:rev_l interrupting:ins siblings:syn balance:d";
    let assignment = RoleAssignment::parse(roles, 6, "")?;
    let solutions = solver.solve_assignment(&assignment);
    println!("{}", assignment);
    print!("{}", solutions);
    Ok(())
}
