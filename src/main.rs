//! The `clueomatic` command: solve cryptic clues from the command line.

use argh::FromArgs;
use clueomatic::report::{terminal_width, AnswerGrid, Explanation};
use clueomatic::{Clue, Error, Lexicon, RoleAssignment, Solutions, Solver, Thesaurus};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/************************
 *     Config           *
 ************************/

#[derive(FromArgs)]
/// Solve cryptic crossword clues.
///
/// A clue is written as its text, then its enumeration, then optionally the checked letters
/// and the answer: `"spin broken shingle (7)|e......|english"`. With no clue, clues are read
/// from stdin, one per line.
struct Config {
    /// the clue to solve
    #[argh(positional)]
    clue: Option<String>,

    /// word list, one word or phrase per line
    #[argh(option, short = 'w', long = "words")]
    words: PathBuf,

    /// thesaurus, as a JSON object mapping words to lists of synonyms
    #[argh(option, short = 't', long = "thesaurus")]
    thesaurus: Option<PathBuf>,

    /// abbreviations, in the same format as the thesaurus
    #[argh(option, long = "abbreviations")]
    abbreviations: Option<PathBuf>,

    /// solve one reading of the clue, given as "phrase:kind phrase:kind ...". Only the
    /// clue's enumeration and checked letters are used.
    #[argh(option, long = "roles")]
    roles: Option<String>,

    /// how many answers to show (default 20)
    #[argh(option, long = "limit", default = "20")]
    limit: usize,

    /// how many answers to show the derivations of (default 3)
    #[argh(option, long = "explain", default = "3")]
    explain: usize,

    /// print answers as JSON, one line per clue
    #[argh(switch, long = "json")]
    json: bool,

    /// the most words in one phrase (default 3)
    #[argh(option, long = "max-phrase-words")]
    max_phrase_words: Option<usize>,

    /// skip readings with more phrases than this (default 6)
    #[argh(option, long = "max-phrases")]
    max_phrases: Option<usize>,

    /// length of the letter sequences used to prune impossible fragments (default 4)
    #[argh(option, long = "ngram-order", default = "clueomatic::DEFAULT_NGRAM_ORDER")]
    ngram_order: usize,

    /// give up on a clue after this many milliseconds
    #[argh(option, long = "timeout-ms")]
    timeout_ms: Option<u64>,

    /// number of worker threads (default: one per core)
    #[argh(option, long = "threads")]
    threads: Option<usize>,

    /// don't log anything besides the answers
    #[argh(switch, short = 'q', long = "quiet")]
    quiet: bool,

    /// log each phrasing of the clue as it's tried
    #[argh(switch, long = "log-phrasings")]
    log_phrasings: bool,

    /// log each reading of the clue that spells an answer
    #[argh(switch, long = "log-assignments")]
    log_assignments: bool,

    /// log how long each step took
    #[argh(switch, long = "log-elapsed")]
    log_elapsed: bool,
}

fn main() {
    let config = argh::from_env::<Config>();

    let default_level = if config.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(config) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run(config: Config) -> Result<(), Error> {
    if let Some(threads) = config.threads {
        if let Err(err) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            warn!(%err, "couldn't size the thread pool");
        }
    }

    let start_time = Instant::now();
    let lexicon = Lexicon::word_list_file(&config.words, config.ngram_order)?;
    let mut thesaurus = match &config.thesaurus {
        Some(path) => Thesaurus::json_file(path)?,
        None => Thesaurus::new(),
    };
    if let Some(path) = &config.abbreviations {
        thesaurus.merge_json_file(path)?;
    }
    info!(
        words = lexicon.len(),
        synonyms = thesaurus.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "loaded"
    );

    let mut solver = Solver::new(&lexicon, &thesaurus);
    let solver_config = solver.config();
    solver_config.log_phrasings = config.log_phrasings;
    solver_config.log_assignments = config.log_assignments;
    solver_config.log_elapsed = config.log_elapsed;
    solver_config.timeout = config.timeout_ms.map(Duration::from_millis);
    if let Some(max_phrase_words) = config.max_phrase_words {
        solver_config.max_phrase_words = max_phrase_words;
    }
    if let Some(max_phrases) = config.max_phrases {
        solver_config.max_phrases = max_phrases;
    }

    match &config.clue {
        Some(text) => {
            let clue = Clue::parse(text)?;
            let solutions = match &config.roles {
                Some(roles) => {
                    let assignment = RoleAssignment::parse(roles, clue.length(), &clue.pattern)?;
                    solver.solve_assignment(&assignment)
                }
                None => solver.solve(&clue),
            };
            print_solutions(&config, &clue, solutions)?;
        }
        None => solve_batch(&config, &solver)?,
    }
    Ok(())
}

/// Solve each line of stdin, then report how often the known answer came first.
fn solve_batch(config: &Config, solver: &Solver) -> Result<(), Error> {
    let mut attempted = 0;
    let mut correct = 0;
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let clue = match Clue::parse(line) {
            Ok(clue) => clue,
            Err(err) => {
                warn!(line, %err, "skipping clue");
                continue;
            }
        };
        let solutions = solver.solve(&clue);
        if clue.known_answer.is_some() {
            attempted += 1;
            if solutions.known_rank() == Some(1) {
                correct += 1;
            }
        }
        print_solutions(config, &clue, solutions)?;
    }
    if attempted > 0 {
        info!(
            correct,
            attempted,
            accuracy = correct as f64 / attempted as f64,
            "top answer was right"
        );
    }
    Ok(())
}

fn print_solutions(config: &Config, clue: &Clue, mut solutions: Solutions) -> Result<(), Error> {
    let known_rank = solutions.known_rank();
    solutions.answers.truncate(config.limit);

    if config.json {
        println!("{}", serde_json::to_string(&solutions)?);
        return Ok(());
    }

    println!("{}", clue);
    print!("{}", AnswerGrid::new(&solutions.answers, terminal_width()));
    if config.explain > 0 && !solutions.answers.is_empty() {
        println!();
        print!(
            "{}",
            Explanation {
                answers: &solutions.answers,
                count: config.explain,
            }
        );
    }
    if let Some(answer) = &clue.known_answer {
        match known_rank {
            Some(rank) => println!("{} is answer #{}", answer.to_uppercase(), rank),
            None => println!("{} was not found", answer.to_uppercase()),
        }
    }
    println!();
    Ok(())
}
