//! Check a password against the configured admin gate.
//!
//! # Usage
//!
//! ```bash
//! deals-cli check-password 'candidate'
//! ```
//!
//! Exits 0 when the web app would accept the password, 1 otherwise.

use foodomo_deals_web::config::DealsConfig;
use foodomo_deals_web::services::auth::AuthGate;

use super::CommandError;

/// Verify `password` the way `POST /api/auth` does.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the password is rejected.
pub fn check(password: &str) -> Result<(), CommandError> {
    let config = DealsConfig::from_env()?;

    if let Some(reason) = config.admin_password_warning() {
        tracing::warn!("ADMIN_PASSWORD looks weak: {reason}");
    }

    AuthGate::new(config.admin_password).verify(password)?;
    tracing::info!("Password accepted");
    Ok(())
}
