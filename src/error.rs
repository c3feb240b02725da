//! Error types for the control engine.
//!
//! Compilation errors (§7's `ParseError`/`SemanticError`/`StateError`/
//! `ResourceError` taxonomy) are returned to the caller and halt
//! compilation of the offending clause only. Runtime faults inside
//! `evaluate` never surface as `ControlError` — they degrade the offending
//! premise to `false` per the original source's behavior.

use std::fmt;

/// Error code from the host's shared enumeration (§6), for embedders that
/// only understand the integer codes EPANET/SWMM hosts pass around.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Rule = 201,
    Number = 202,
    Keyword = 203,
    Name = 204,
    DateTime = 205,
    Items = 206,
    Memory = 207,
}

/// Errors raised while compiling rule text into a [`crate::types::Rule`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum ControlError {
    #[error("rule {rule_id}: unknown keyword {token:?}")]
    BadKeyword { rule_id: String, token: String },

    #[error("rule {rule_id}: unrecognized name {token:?}")]
    BadName { rule_id: String, token: String },

    #[error("rule {rule_id}: malformed number {token:?}")]
    BadNumber { rule_id: String, token: String },

    #[error("rule {rule_id}: malformed date/time {token:?}")]
    BadDateTime { rule_id: String, token: String },

    #[error("rule {rule_id}: too few tokens in clause {clause:?}")]
    TooFewItems { rule_id: String, clause: String },

    #[error("rule {rule_id}: malformed rule ({reason})")]
    BadRule { rule_id: String, reason: String },

    #[error("rule {rule_id}: clause {keyword:?} invalid in state {state:?}")]
    BadState {
        rule_id: String,
        keyword: String,
        state: String,
    },

    #[error("rule {rule_id}: action target mismatch ({reason})")]
    BadAction { rule_id: String, reason: String },

    #[error("out of memory compiling rule {rule_id}")]
    OutOfMemory { rule_id: String },
}

impl ControlError {
    /// Maps this error onto the host's shared integer error code (§6).
    pub fn code(&self) -> ErrorCode {
        match self {
            ControlError::BadKeyword { .. } => ErrorCode::Keyword,
            ControlError::BadName { .. } => ErrorCode::Name,
            ControlError::BadNumber { .. } => ErrorCode::Number,
            ControlError::BadDateTime { .. } => ErrorCode::DateTime,
            ControlError::TooFewItems { .. } => ErrorCode::Items,
            ControlError::BadRule { .. } => ErrorCode::Rule,
            ControlError::BadState { .. } => ErrorCode::Rule,
            ControlError::BadAction { .. } => ErrorCode::Rule,
            ControlError::OutOfMemory { .. } => ErrorCode::Memory,
        }
    }

    /// The rule id the error was raised against.
    pub fn rule_id(&self) -> &str {
        match self {
            ControlError::BadKeyword { rule_id, .. }
            | ControlError::BadName { rule_id, .. }
            | ControlError::BadNumber { rule_id, .. }
            | ControlError::BadDateTime { rule_id, .. }
            | ControlError::TooFewItems { rule_id, .. }
            | ControlError::BadRule { rule_id, .. }
            | ControlError::BadState { rule_id, .. }
            | ControlError::BadAction { rule_id, .. }
            | ControlError::OutOfMemory { rule_id } => rule_id,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ERR_{:?}", self)
    }
}

/// Result type for the control engine's compilation APIs.
pub type Result<T> = std::result::Result<T, ControlError>;
