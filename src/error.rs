use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A clue, or a role assignment, that can't be searched at all.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClueError {
    #[error("missing answer length; end the clue with e.g. (7) or (3,4)")]
    MissingLength,
    #[error("bad answer length '{0}'")]
    BadLength(String),
    #[error("bad character '{0}' in pattern; use letters and '.'")]
    BadPattern(char),
    #[error("pattern has {found} letters but the answer has {expected}")]
    PatternLength { expected: usize, found: usize },
    #[error("unknown kind '{0}'")]
    UnknownKind(String),
    #[error("bad role '{0}'; expected phrase:kind")]
    BadRole(String),
    #[error("no valid clue structure has kinds [{0}]")]
    InvalidStructure(String),
}

/// Failure to load a lookup table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Clue(#[from] ClueError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ClueError::PatternLength {
            expected: 7,
            found: 6
        }
        .to_string(),
        "pattern has 6 letters but the answer has 7"
    );
    let err: Error = ClueError::UnknownKind("anag".to_owned()).into();
    assert_eq!(err.to_string(), "unknown kind 'anag'");
}
