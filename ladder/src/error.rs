//! Unified error types for the ladder core
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic and repository errors
//! - `AppError`: Application layer errors (wraps domain errors and boundary parsing)
//!
//! The pure pairing and rating computations never return either of these.

use thiserror::Error;

/// Domain layer errors - business rule violations and repository failures
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Application layer errors - used by service callers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl AppError {
    /// True when retrying the same call may succeed (e.g. a lost rating write race)
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Domain(DomainError::Conflict(_)))
    }
}

/// Parse error for result strings entered at the UI boundary
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown match outcome: {0}")]
    UnknownOutcome(String),

    #[error("Unknown tournament result: {0}")]
    UnknownResult(String),
}

impl From<ParseError> for AppError {
    fn from(e: ParseError) -> Self {
        AppError::Parse(e.to_string())
    }
}
