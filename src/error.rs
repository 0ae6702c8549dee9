use std::path::PathBuf;

use thiserror::Error;

/// Rejected run settings. Raised before the roster is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("number of teams must be an integer >= 2 (got {0})")]
    TooFewTeams(usize),

    #[error("number of teams must be at most {max} (got {0})", max = crate::MAX_TEAMS)]
    TooManyTeams(usize),

    #[error("number of teams must be an integer >= 2 (got {0:?})")]
    InvalidTeamCount(String),

    #[error("seed must be a valid integer (got {0:?})")]
    InvalidSeed(String),
}

/// A last-active value that could not be turned into a date-time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp is empty")]
    Empty,

    #[error("malformed timestamp {value:?} (expected YYYY-MM-DD[ HH:MM[:SS]])")]
    Invalid {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("row {row}: expected at least {expected} columns, found {found}")]
    ShortRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: column {column:?} has invalid number {value:?}")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: invalid last active timestamp {value:?}: {source}")]
    InvalidTimestamp {
        row: usize,
        value: String,
        #[source]
        source: TimestampError,
    },

    #[error("row {row}: duplicate player id {id}")]
    DuplicatePlayer { row: usize, id: u64 },
}

#[derive(Debug, Error)]
pub enum SortError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    /// The draft produced an assignment that breaks its own guarantees.
    #[error("internal draft fault: {0}")]
    Invariant(String),
}
