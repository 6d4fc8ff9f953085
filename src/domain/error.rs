//! Domain Errors
//!
//! Shared error type of every layer above the domain.

use serde::{Deserialize, Serialize};

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomainError {
    NotFound(String),
    InvalidInput(String),
    Internal(String),
    /// Local cache / database failure
    Storage(String),
    /// Network, HTTP status or decoding failure
    Transport(String),
    /// Backend answered with a non-success code
    Rejected { code: i32, msg: String },
}

impl DomainError {
    /// Failures worth retrying as-is (the request may never have arrived)
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Transport(_))
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
            DomainError::Storage(msg) => write!(f, "Storage error: {}", msg),
            DomainError::Transport(msg) => write!(f, "Transport error: {}", msg),
            DomainError::Rejected { code, msg } => write!(f, "Rejected ({}): {}", code, msg),
        }
    }
}

impl std::error::Error for DomainError {}
