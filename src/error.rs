//! Error types for the authorization core

use thiserror::Error;

/// Authorization errors
///
/// The core degrades on almost every bad input (unknown roles, unknown
/// targets, unparseable patterns) instead of failing; the variants here cover
/// the few calls that validate their arguments.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthError>;
