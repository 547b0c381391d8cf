use thiserror::Error;

/// Error for ActorId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActorIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for login and session validation.
///
/// Variants fall into three classes the transport layer maps to status
/// codes without parsing message text: caller errors (`UnknownEmail`,
/// `PasswordMismatch`, `InvalidEmail`), unauthenticated outcomes
/// (`SessionNotFound`, `SessionExpired`), and internal failures (the rest).
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Caller errors
    #[error("No identity registered for email: {0}")]
    UnknownEmail(String),

    #[error("Password does not match")]
    PasswordMismatch,

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    // Unauthenticated outcomes; both carry the same user-facing message
    #[error("Session expired or invalid")]
    SessionNotFound,

    #[error("Session expired or invalid")]
    SessionExpired,

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(#[from] credentials::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] credentials::TokenError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Unknown(err.to_string())
    }
}
