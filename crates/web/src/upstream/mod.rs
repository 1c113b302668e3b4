//! Storefront API client.
//!
//! # Architecture
//!
//! - One `GET` per store against the goods endpoint, with a fixed query
//!   template plus the store's `sid`
//! - `reqwest` client with a whole-request timeout
//! - The response body is read as text first for better diagnostics, then
//!   handed to [`goods::parse_goods`]
//!
//! Pacing between stores and failure isolation live in
//! [`crate::inventory`]; this module only knows how to ask about one store.

pub mod goods;

use std::sync::Arc;

use foodomo_deals_core::{Product, StoreId};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::UpstreamConfig;

/// Fixed query parameters sent with every goods request (before `sid`).
pub const QUERY_TEMPLATE: [(&str, &str); 19] = [
    ("i", "1"),
    ("m", "ht_wmps"),
    ("c", "entry"),
    ("do", "mobile"),
    ("lang", "zh-cn"),
    ("ctrl", "wmall"),
    ("ac", "store"),
    ("op", "goods"),
    ("ta", "list"),
    ("from", "vue"),
    ("u", "wap"),
    ("cid", "exp"),
    ("child_id", "expChild"),
    ("keyword", ""),
    ("type", "is_recommend"),
    ("value", ""),
    ("page", "1"),
    ("psize", "40"),
    ("newstype", "1"),
];

/// Errors that can occur when querying the storefront API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The configured base URL is not a valid URL.
    #[error("invalid upstream base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("upstream returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// Body was not JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the storefront goods endpoint.
#[derive(Clone)]
pub struct UpstreamClient {
    inner: Arc<UpstreamClientInner>,
}

struct UpstreamClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl UpstreamClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(&config.base_url)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(UpstreamClientInner { client, base_url }),
        })
    }

    /// Full goods URL for one store.
    #[must_use]
    pub fn goods_url(&self, store_id: &StoreId) -> Url {
        let mut url = self.inner.base_url.clone();
        url.query_pairs_mut()
            .extend_pairs(QUERY_TEMPLATE)
            .append_pair("sid", store_id.as_str());
        url
    }

    /// Fetch the listed products for one store.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or timeout, a non-2xx status,
    /// or a body that is not JSON.
    #[instrument(skip(self), fields(sid = %store_id))]
    pub async fn fetch_goods(&self, store_id: &StoreId) -> Result<Vec<Product>, UpstreamError> {
        let response = self
            .inner
            .client
            .get(self.goods_url(store_id))
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Storefront returned non-success status"
            );
            return Err(UpstreamError::Status(status));
        }

        goods::parse_goods(store_id, &body).map_err(|e| {
            tracing::debug!(
                error = %e,
                body = %body.chars().take(200).collect::<String>(),
                "Failed to parse storefront goods response"
            );
            UpstreamError::Parse(e)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client(base_url: &str) -> UpstreamClient {
        UpstreamClient::new(&UpstreamConfig {
            base_url: base_url.to_string(),
            store_ids: Vec::new(),
            timeout: Duration::from_secs(1),
            request_delay: Duration::ZERO,
        })
        .unwrap()
    }

    #[test]
    fn test_goods_url_carries_template_then_sid() {
        let url = client("https://opennow.foodomo.com/app/wxapp.php")
            .goods_url(&StoreId::parse("2661").unwrap());

        assert_eq!(url.path(), "/app/wxapp.php");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.len(), 20);
        assert_eq!(pairs[0], ("i".to_string(), "1".to_string()));
        assert_eq!(pairs[1], ("m".to_string(), "ht_wmps".to_string()));
        assert!(pairs.contains(&("keyword".to_string(), String::new())));
        assert!(pairs.contains(&("psize".to_string(), "40".to_string())));
        assert_eq!(pairs[19], ("sid".to_string(), "2661".to_string()));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = UpstreamClient::new(&UpstreamConfig {
            base_url: "not a url".to_string(),
            ..UpstreamConfig::default()
        });
        assert!(matches!(result, Err(UpstreamError::InvalidBaseUrl(_))));
    }
}
