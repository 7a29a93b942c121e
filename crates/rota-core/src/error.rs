use thiserror::Error;

use crate::types::RosterKind;

#[derive(Debug, Error)]
pub enum RotaError {
    #[error("{}", .0.count_message())]
    InvalidCount(RosterKind),

    #[error("cannot rotate: expected 6 students and 6 areas, found {students} students and {areas} areas")]
    RosterSize { students: usize, areas: usize },

    #[error("store unavailable: connection lock poisoned")]
    StoreUnavailable,

    #[error("rotation gate poisoned: an earlier rotation panicked")]
    RotationGatePoisoned,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid last-update timestamp: {0}")]
    InvalidTimestamp(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, RotaError>;
