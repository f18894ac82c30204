use chrono::NaiveDate;
use thiserror::Error;

/// A match row that cannot become a `MatchRecord`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("winner and loser are the same player: {0}")]
    SamePlayer(String),
    #[error("missing {0} name")]
    MissingPlayer(&'static str),
    #[error("invalid match date: {0:?}")]
    InvalidDate(String),
    #[error("unknown surface: {0:?}")]
    UnknownSurface(String),
    #[error("unsupported best-of value: {0}")]
    InvalidBestOf(u8),
}

/// Match batch the Elo engine cannot apply
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderingError {
    #[error("match {index} dated {current} comes after a match dated {previous}")]
    OutOfOrder {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },
    /// Recency weights of a second batch would be anchored differently
    /// from the first unless the reference date is fixed
    #[error("ratings already include matches up to {latest}; set rating.as_of to add more")]
    UnanchoredFollowUp { latest: NaiveDate },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("bracket of {players} slots is not supported (supported sizes: {supported:?})")]
    InvalidBracketSize {
        players: usize,
        supported: Vec<usize>,
    },
    #[error("trial count must be positive")]
    NoTrials,
    #[error("bracket has no players, only byes")]
    EmptyBracket,
    #[error("player {0:?} appears more than once in the bracket")]
    DuplicatePlayer(String),
}

/// Add context to file read errors
pub fn read_context(path: &std::path::Path) -> String {
    format!("Failed to read match file: {}", path.display())
}

/// Add context to CSV row errors
pub fn row_context(path: &std::path::Path, line: u64) -> String {
    format!("Failed to parse row {} of {}", line, path.display())
}
