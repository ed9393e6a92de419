//! Control-plane error taxonomy: rejected writes and malformed queries.
//! These never touch voice state — a rejected write leaves the row
//! unchanged, per the error handling design's clamp-and-accept preference.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("row {0} out of range (0..{1})")]
    RowOutOfRange(usize, usize),

    #[error("column {0} is read-only")]
    ReadOnly(String),

    #[error("value for column {0} could not be parsed: {1}")]
    BadValue(String, String),

    #[error("malformed request: {0}")]
    Malformed(String),
}

pub type ControlResult<T> = Result<T, ControlError>;
