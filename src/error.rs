use thiserror::Error;

use crate::types::Gender;

/// Rejected engine call. The session is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineupError {
    #[error("game has not been started")]
    NotStarted,

    #[error("game is already in progress")]
    AlreadyStarted,

    #[error("no players tagged {0:?} on the roster")]
    EmptyPartition(Gender),

    #[error("no point to undo")]
    NothingToUndo,

    #[error("no player ids left")]
    IdsExhausted,

    #[error("point or score counter is at its limit")]
    CounterLimit,

    #[error("player name is blank")]
    BlankName,

    #[error("unknown player id: {0}")]
    UnknownPlayer(u64),

    #[error("unknown gender tag: {0:?}")]
    UnknownGender(String),

    #[error("unknown ratio split: {0:?}")]
    UnknownSplit(String),

    #[error("unknown team: {0:?}")]
    UnknownTeam(String),

    #[error("invalid field config: majority {majority_count} of {field_size}")]
    InvalidConfig {
        field_size: usize,
        majority_count: usize,
    },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("Unsupported record version: found {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Storage backend error: {0}")]
    Backend(String),
}
