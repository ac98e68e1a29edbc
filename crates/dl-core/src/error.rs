use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which phase of the pipeline produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Script text rejected by the format pre-check.
    Format,
    /// A single row could not be turned into a record.
    RowParse,
    /// The cursor points at an address missing from the graph.
    Resolution,
    /// A record reached dispatch with a tag or payload no handler accepts.
    Dispatch,
    /// A speaker or visual variant lookup missed.
    CollaboratorMiss,
    /// The engine was asked to do something its current phase forbids.
    State,
    /// Configuration values are inconsistent.
    Config,
    /// Host-side I/O.
    Io,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct DialogueError {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    pub address: Option<i32>,
}

impl DialogueError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            address: None,
        }
    }

    pub fn at_address(
        kind: ErrorKind,
        code: impl Into<String>,
        message: impl Into<String>,
        address: i32,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            address: Some(address),
        }
    }

    pub fn format(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Format, code, message)
    }

    pub fn resolution(code: impl Into<String>, message: impl Into<String>, address: i32) -> Self {
        Self::at_address(ErrorKind::Resolution, code, message, address)
    }

    pub fn dispatch(code: impl Into<String>, message: impl Into<String>, address: i32) -> Self {
        Self::at_address(ErrorKind::Dispatch, code, message, address)
    }

    pub fn state(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::State, code, message)
    }

    pub fn config(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, code, message)
    }

    pub fn io(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, code, message)
    }
}
