//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Admin
//! - `ADMIN_PASSWORD` - Shared secret for the admin selection page. When unset,
//!   every login attempt is rejected.
//! - `COOKIE_SECRET` - Key (at least 64 bytes) signing the admin and selection
//!   cookies. When unset, a random key is generated at startup and existing
//!   cookies stop verifying after a restart.
//!
//! ## Optional
//! - `DEALS_HOST` - Bind address (default: 127.0.0.1)
//! - `DEALS_PORT` - Listen port (default: 3000)
//! - `DEALS_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `DEALS_STATIC_DIR` - Static asset directory (default: crates/web/static)
//! - `STORE_DIRECTORY_PATH` - Store directory JSON (default: crates/web/static/stores.json)
//! - `UPSTREAM_BASE_URL` - Storefront goods endpoint
//! - `UPSTREAM_STORE_IDS` - Comma-separated store ids to poll, in order
//! - `UPSTREAM_TIMEOUT_MS` - Per-request timeout (default: 10000)
//! - `UPSTREAM_DELAY_MS` - Pause between successive store requests (default: 300)
//! - `INVENTORY_DEDUPE_SECS` - Window in which repeat fetches share one result (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use foodomo_deals_core::StoreId;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Storefront goods endpoint.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://opennow.foodomo.com/app/wxapp.php";

/// Stores polled when `UPSTREAM_STORE_IDS` is not set.
pub const DEFAULT_STORE_IDS: &str = "2661,2558,2728,3240,3254";

/// Minimum `COOKIE_SECRET` length in bytes.
pub const MIN_COOKIE_SECRET_BYTES: usize = 64;

const MIN_PASSWORD_LENGTH: usize = 12;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "admin",
    "123456",
    "qwerty",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct DealsConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL (https enables secure cookies)
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Store directory JSON file
    pub store_directory_path: PathBuf,
    /// Admin page shared secret
    pub admin_password: Option<SecretString>,
    /// Browser cookie signing key material
    pub cookie_secret: Option<SecretString>,
    /// Storefront API settings
    pub upstream: UpstreamConfig,
    /// Repeat fetches inside this window share one result (zero disables)
    pub dedupe_window: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Storefront API polling configuration.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Goods endpoint the query template is appended to
    pub base_url: String,
    /// Stores polled on every pass, in order
    pub store_ids: Vec<StoreId>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Pause between successive store requests
    pub request_delay: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            store_ids: StoreId::parse_list(DEFAULT_STORE_IDS).unwrap_or_default(),
            timeout: Duration::from_secs(10),
            request_delay: Duration::from_millis(300),
        }
    }
}

impl DealsConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parse_or("DEALS_HOST", "127.0.0.1")?;
        let port = env.parse_or("DEALS_PORT", "3000")?;
        let base_url = env.get_or("DEALS_BASE_URL", "http://localhost:3000");
        let static_dir = PathBuf::from(env.get_or("DEALS_STATIC_DIR", "crates/web/static"));
        let store_directory_path = PathBuf::from(
            env.get_or("STORE_DIRECTORY_PATH", "crates/web/static/stores.json"),
        );
        let admin_password = env.get("ADMIN_PASSWORD").map(SecretString::from);
        let cookie_secret = env.get("COOKIE_SECRET");
        if let Some(secret) = cookie_secret
            .as_ref()
            .filter(|secret| secret.len() < MIN_COOKIE_SECRET_BYTES)
        {
            return Err(ConfigError::InvalidEnvVar(
                "COOKIE_SECRET".to_string(),
                format!(
                    "must be at least {MIN_COOKIE_SECRET_BYTES} bytes (got {})",
                    secret.len()
                ),
            ));
        }
        let cookie_secret = cookie_secret.map(SecretString::from);

        let store_ids = StoreId::parse_list(&env.get_or("UPSTREAM_STORE_IDS", DEFAULT_STORE_IDS))
            .map_err(|e| {
                ConfigError::InvalidEnvVar("UPSTREAM_STORE_IDS".to_string(), e.to_string())
            })?;
        let upstream = UpstreamConfig {
            base_url: env.get_or("UPSTREAM_BASE_URL", DEFAULT_UPSTREAM_BASE_URL),
            store_ids,
            timeout: Duration::from_millis(env.parse_or("UPSTREAM_TIMEOUT_MS", "10000")?),
            request_delay: Duration::from_millis(env.parse_or("UPSTREAM_DELAY_MS", "300")?),
        };
        let dedupe_window = Duration::from_secs(env.parse_or("INVENTORY_DEDUPE_SECS", "10")?);

        Ok(Self {
            host,
            port,
            base_url,
            static_dir,
            store_directory_path,
            admin_password,
            cookie_secret,
            upstream,
            dedupe_window,
            sentry_dsn: env.get("SENTRY_DSN"),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: env.parse_or("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Describe why the configured admin password looks weak, if it does.
    ///
    /// The gate accepts any configured value; this only feeds a startup warning.
    #[must_use]
    pub fn admin_password_warning(&self) -> Option<String> {
        self.admin_password
            .as_ref()
            .and_then(|secret| password_weakness(secret.expose_secret()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable, treating blank values as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_or(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Check a password against the placeholder blocklist, length and entropy.
fn password_weakness(password: &str) -> Option<String> {
    let lower = password.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Some(format!("appears to be a placeholder (contains '{pattern}')"));
    }

    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Some(format!(
            "shorter than {MIN_PASSWORD_LENGTH} characters (got {length})"
        ));
    }

    let entropy = shannon_entropy(password);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Some(format!(
            "entropy too low ({entropy:.2} bits/char, want >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
        ));
    }

    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<DealsConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        DealsConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.upstream.base_url, DEFAULT_UPSTREAM_BASE_URL);
        assert_eq!(config.upstream.timeout, Duration::from_secs(10));
        assert_eq!(config.upstream.request_delay, Duration::from_millis(300));
        assert_eq!(config.dedupe_window, Duration::from_secs(10));
        assert!(config.admin_password.is_none());
        assert!(config.cookie_secret.is_none());
        assert!(!config.secure_cookies());

        let ids: Vec<&str> = config.upstream.store_ids.iter().map(StoreId::as_str).collect();
        assert_eq!(ids, vec!["2661", "2558", "2728", "3240", "3254"]);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DEALS_PORT", "8080"),
            ("DEALS_BASE_URL", "https://deals.example"),
            ("UPSTREAM_STORE_IDS", "2558"),
            ("UPSTREAM_TIMEOUT_MS", "250"),
            ("UPSTREAM_DELAY_MS", "0"),
            ("INVENTORY_DEDUPE_SECS", "0"),
            ("ADMIN_PASSWORD", "secret"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert!(config.secure_cookies());
        assert_eq!(config.upstream.store_ids.len(), 1);
        assert_eq!(config.upstream.timeout, Duration::from_millis(250));
        assert_eq!(config.upstream.request_delay, Duration::ZERO);
        assert_eq!(config.dedupe_window, Duration::ZERO);
        assert_eq!(
            config.admin_password.as_ref().unwrap().expose_secret(),
            "secret"
        );
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_from(&[("DEALS_PORT", "  "), ("ADMIN_PASSWORD", "")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.admin_password.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("DEALS_PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "DEALS_PORT"));
    }

    #[test]
    fn test_cookie_secret_length() {
        let long = "k".repeat(MIN_COOKIE_SECRET_BYTES);
        let config = config_from(&[("COOKIE_SECRET", long.as_str())]).unwrap();
        assert_eq!(config.cookie_secret.unwrap().expose_secret(), long);

        let err = config_from(&[("COOKIE_SECRET", "too-short")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "COOKIE_SECRET"));
    }

    #[test]
    fn test_invalid_store_ids() {
        let err = config_from(&[("UPSTREAM_STORE_IDS", "2661,26 61")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "UPSTREAM_STORE_IDS"));
    }

    #[test]
    fn test_debug_redacts_admin_password() {
        let config = config_from(&[("ADMIN_PASSWORD", "hunter2-but-longer")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("hunter2-but-longer"));
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > 3.3);
    }

    #[test]
    fn test_password_weakness() {
        assert!(password_weakness("secret").unwrap().contains("placeholder"));
        assert!(password_weakness("k7#Qz").unwrap().contains("shorter"));
        assert!(password_weakness("aaaaaaaaaaaaaaaa").unwrap().contains("entropy"));
        assert!(password_weakness("aB3$xY9!mK2@nL5#").is_none());
    }

    #[test]
    fn test_admin_password_warning_only_when_set() {
        assert!(config_from(&[]).unwrap().admin_password_warning().is_none());
        assert!(
            config_from(&[("ADMIN_PASSWORD", "secret")])
                .unwrap()
                .admin_password_warning()
                .is_some()
        );
    }
}
