//! Core error types for GUS RS
//!
//! The query layer is deliberately fail-soft: filter misuse produces a
//! structured [`FilterError`] value that callers may recover from (or drop
//! with a logged diagnostic) instead of aborting a builder chain. Render
//! calls surface [`QueryError`] for that call only, leaving builder state
//! untouched.

use thiserror::Error;

/// Top-level error type for GUS operations
#[derive(Error, Debug)]
pub enum GusError {
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Standard Result type for GUS operations
pub type GusResult<T> = Result<T, GusError>;

/// Non-fatal diagnostics produced by the filter constructors
///
/// These are usage errors, never panics: a caller that wants the source's
/// log-and-continue behavior converts them with the lenient adapter in
/// `gus-queries`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("{operation}: missing required argument `{argument}`")]
    MissingArgument {
        operation: &'static str,
        argument: &'static str,
    },

    #[error("{operation}: at least 2 operands needed, {given} provided")]
    TooFewOperands {
        operation: &'static str,
        given: usize,
    },
}

/// Usage errors reported by a single render call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("field list must not be empty")]
    EmptyFields,

    #[error("duplicate field `{0}` in field list")]
    DuplicateField(String),

    #[error("LIMIT must be a positive integer, got {0}")]
    InvalidLimit(u32),

    #[error("relationship resolution exceeded {0} nested levels")]
    ResolveDepthExceeded(usize),

    #[error("no relationship configured for `{0}`")]
    NoRelation(&'static str),
}

/// Errors crossing the session/execution boundary
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("session expired")]
    SessionExpired,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed row: {0}")]
    MalformedRow(String),
}

/// Result type for the session/execution boundary
pub type ClientResult<T> = Result<T, ClientError>;
