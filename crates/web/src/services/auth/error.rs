//! Authentication error types.

use thiserror::Error;

/// Errors that can occur when checking the admin password.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The submitted password does not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No admin password is configured, so nothing can match.
    #[error("admin password not configured")]
    NotConfigured,
}
