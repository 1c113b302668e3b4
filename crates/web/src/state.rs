//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use secrecy::ExposeSecret;

use crate::config::DealsConfig;
use crate::directory::{DirectoryError, StoreDirectory};
use crate::inventory::{InventoryFetcher, InventoryService};
use crate::services::auth::AuthGate;
use crate::upstream::UpstreamError;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("store directory: {0}")]
    Directory(#[from] DirectoryError),
    #[error("upstream client: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("COOKIE_SECRET cannot be used as a signing key")]
    CookieKey,
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DealsConfig,
    directory: StoreDirectory,
    inventory: InventoryService,
    auth: AuthGate,
    cookie_key: Key,
}

impl AppState {
    /// Create the application state, loading the store directory from
    /// `config.store_directory_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be loaded or the upstream
    /// client cannot be built.
    pub fn new(config: DealsConfig) -> Result<Self, StateError> {
        let directory = StoreDirectory::load(&config.store_directory_path)?;
        Self::with_directory(config, directory)
    }

    /// Create the application state around an already loaded directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream client cannot be built or the cookie
    /// secret is unusable.
    pub fn with_directory(
        config: DealsConfig,
        directory: StoreDirectory,
    ) -> Result<Self, StateError> {
        let fetcher = InventoryFetcher::new(&config.upstream)?;
        let inventory = InventoryService::new(fetcher, config.dedupe_window);
        let auth = AuthGate::new(config.admin_password.clone());
        let cookie_key = match &config.cookie_secret {
            Some(secret) => Key::try_from(secret.expose_secret().as_bytes())
                .map_err(|_| StateError::CookieKey)?,
            None => Key::generate(),
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                directory,
                inventory,
                auth,
                cookie_key,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &DealsConfig {
        &self.inner.config
    }

    /// Get a reference to the store directory.
    #[must_use]
    pub fn directory(&self) -> &StoreDirectory {
        &self.inner.directory
    }

    /// Get a reference to the inventory service.
    #[must_use]
    pub fn inventory(&self) -> &InventoryService {
        &self.inner.inventory
    }

    /// Get a reference to the admin password gate.
    #[must_use]
    pub fn auth(&self) -> &AuthGate {
        &self.inner.auth
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.inner.cookie_key.clone()
    }
}
