//! Admin authentication service.
//!
//! A single shared password, compared by exact string equality against
//! `ADMIN_PASSWORD`. There are no accounts, no hashing and no tokens; a
//! successful check only sets a signed flag cookie in the caller's browser.

mod error;

pub use error::AuthError;

use secrecy::{ExposeSecret, SecretString};

/// Gate in front of the admin selection page.
#[derive(Clone)]
pub struct AuthGate {
    password: Option<SecretString>,
}

impl AuthGate {
    /// Create a gate for the configured password (`None` rejects everything).
    #[must_use]
    pub const fn new(password: Option<SecretString>) -> Self {
        Self { password }
    }

    /// Whether a password is configured at all.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.password.is_some()
    }

    /// Check a submitted password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotConfigured` when no password is set and
    /// `AuthError::InvalidCredentials` when the submission differs.
    pub fn verify(&self, submitted: &str) -> Result<(), AuthError> {
        let expected = self.password.as_ref().ok_or(AuthError::NotConfigured)?;

        if expected.expose_secret() == submitted {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(password: &str) -> AuthGate {
        AuthGate::new(Some(SecretString::from(password)))
    }

    #[test]
    fn test_exact_match_passes() {
        assert_eq!(gate("secret").verify("secret"), Ok(()));
    }

    #[test]
    fn test_mismatch_fails() {
        assert_eq!(
            gate("secret").verify("wrong"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            gate("secret").verify("Secret"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            gate("secret").verify("secret "),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_unconfigured_rejects_everything() {
        let gate = AuthGate::new(None);
        assert!(!gate.is_configured());
        assert_eq!(gate.verify(""), Err(AuthError::NotConfigured));
        assert_eq!(gate.verify("secret"), Err(AuthError::NotConfigured));
    }

    #[test]
    fn test_debug_hides_password() {
        let output = format!("{:?}", gate("hunter2"));
        assert!(!output.contains("hunter2"));
    }
}
