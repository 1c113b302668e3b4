//! CLI command implementations.

pub mod fetch;
pub mod password;
pub mod stores;

use foodomo_deals_web::config::ConfigError;
use foodomo_deals_web::directory::DirectoryError;
use foodomo_deals_web::upstream::UpstreamError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Store directory could not be loaded.
    #[error("Store directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Upstream client could not be built.
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Argument is not a valid store id.
    #[error("Invalid store id: {0}")]
    InvalidStoreId(#[from] foodomo_deals_core::StoreIdError),

    /// Store is not listed in the directory.
    #[error("Store not found: {0}")]
    StoreNotFound(String),

    /// Password did not pass the gate.
    #[error("Password rejected: {0}")]
    PasswordRejected(#[from] foodomo_deals_web::services::auth::AuthError),
}
