//! Showing ranked answers in a terminal.

use crate::ranking::RankedAnswer;
use std::fmt;

const CELL_PADDING: usize = 4;

/// Terminal width to lay out for when the real one is unknown.
pub const DEFAULT_WIDTH: usize = 90;

/// The terminal width, or [`DEFAULT_WIDTH`] if we're not in one.
pub fn terminal_width() -> usize {
    termsize::get()
        .map(|size| size.cols as usize)
        .filter(|cols| *cols > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Ranked answers, side by side, as many to a row as fit in `width`.
pub struct AnswerGrid<'a> {
    pub answers: &'a [RankedAnswer],
    pub width: usize,
}

impl<'a> AnswerGrid<'a> {
    pub fn new(answers: &'a [RankedAnswer], width: usize) -> AnswerGrid<'a> {
        AnswerGrid { answers, width }
    }
}

impl fmt::Display for AnswerGrid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.answers.is_empty() {
            return writeln!(f, "No answers");
        }
        let mut text_box = TextBox::new(self.width);
        for (i, ranked) in self.answers.iter().enumerate() {
            let rank = format!("{}.", i + 1);
            text_box.append(&format!(
                "{:<4}{}\n{:<4}{:.3}",
                rank,
                ranked.answer.to_uppercase(),
                "",
                ranked.score
            ));
        }
        for line in text_box.finish() {
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

/// The first few answers, each with the readings of the clue that produced it.
pub struct Explanation<'a> {
    pub answers: &'a [RankedAnswer],
    pub count: usize,
}

impl fmt::Display for Explanation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for ranked in self.answers.iter().take(self.count) {
            writeln!(f, "{} ({:.3})", ranked.answer.to_uppercase(), ranked.score)?;
            for derivation in &ranked.derivations {
                writeln!(f, "    {}", derivation)?;
            }
        }
        Ok(())
    }
}

/// Lays out blocks of text left to right, starting a new row of blocks when the next one
/// wouldn't fit.
struct TextBox {
    max_width: usize,
    completed_lines: Vec<String>,
    cur_width: usize,
    cur_lines: Vec<String>,
}

impl TextBox {
    fn new(max_width: usize) -> TextBox {
        TextBox {
            max_width,
            completed_lines: Vec::new(),
            cur_width: 0,
            cur_lines: Vec::new(),
        }
    }

    fn print_line(&mut self, row: usize, col: usize, text: &str) {
        while row >= self.cur_lines.len() {
            self.cur_lines.push(String::new());
        }
        let line = &mut self.cur_lines[row];
        let len = line.chars().count();
        if col > len {
            line.push_str(&" ".repeat(col - len));
        }
        line.push_str(text);
    }

    fn append(&mut self, block: &str) {
        let block_width = block
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            + CELL_PADDING;

        if self.cur_width != 0 && self.cur_width + block_width > self.max_width {
            // Doesn't fit. Start a new row.
            self.completed_lines.append(&mut self.cur_lines);
            self.cur_width = 0;
        }
        let col = self.cur_width;
        for (row, line) in block.lines().enumerate() {
            self.print_line(row, col, line);
        }
        self.cur_width += block_width;
    }

    fn finish(mut self) -> Vec<String> {
        self.completed_lines.append(&mut self.cur_lines);
        self.completed_lines
    }
}

#[test]
fn test_text_box() {
    let mut text_box = TextBox::new(13);
    text_box.append("ab\ncd");
    text_box.append("efg");
    text_box.append("hi\nj");
    assert_eq!(text_box.finish(), ["ab    efg", "cd", "hi", "j"]);
}

#[test]
fn test_answer_grid() {
    let answers = ["english", "shingle", "tingles"]
        .iter()
        .enumerate()
        .map(|(i, word)| RankedAnswer {
            answer: word.to_string(),
            score: 1.0 - i as f64 / 4.0,
            derivations: Vec::new(),
        })
        .collect::<Vec<_>>();

    let grid = AnswerGrid::new(&answers, 30).to_string();
    assert_eq!(
        grid,
        "1.  ENGLISH    2.  SHINGLE\n    1.000          0.750\n3.  TINGLES\n    0.500\n"
    );
    assert_eq!(AnswerGrid::new(&[], 30).to_string(), "No answers\n");
}
