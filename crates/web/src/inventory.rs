//! Inventory fetching and de-duplication.
//!
//! [`InventoryFetcher`] walks the configured stores one at a time, pausing
//! between requests so the storefront does not rate limit us. A store that
//! fails contributes nothing; the walk always completes.
//!
//! [`InventoryService`] sits in front of the fetcher. Page loads, polling and
//! the JSON endpoint all go through it, and any calls landing inside the
//! de-duplication window share one walk (`moka` coalesces concurrent
//! initializers for the same key).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use foodomo_deals_core::{FetchResult, StoreId};
use moka::future::Cache;
use tracing::instrument;

use crate::config::UpstreamConfig;
use crate::upstream::{UpstreamClient, UpstreamError};

/// Outcome of one walk over the configured stores.
#[derive(Debug, Clone)]
pub struct InventorySnapshot {
    /// Products and completion time.
    pub result: FetchResult,
    /// Number of stores queried.
    pub attempted: usize,
    /// Stores whose request failed, in walk order.
    pub failed: Vec<StoreId>,
}

impl InventorySnapshot {
    /// Whether every store failed, i.e. the storefront is unreachable.
    #[must_use]
    pub fn is_outage(&self) -> bool {
        self.attempted > 0 && self.failed.len() == self.attempted
    }
}

/// Sequential, paced scraper over a fixed list of stores.
#[derive(Clone)]
pub struct InventoryFetcher {
    client: UpstreamClient,
    store_ids: Arc<[StoreId]>,
    request_delay: Duration,
}

impl InventoryFetcher {
    /// Create a fetcher for the configured stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream client cannot be built.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: UpstreamClient::new(config)?,
            store_ids: config.store_ids.clone().into(),
            request_delay: config.request_delay,
        })
    }

    /// Stores queried on every walk, in order.
    #[must_use]
    pub fn store_ids(&self) -> &[StoreId] {
        &self.store_ids
    }

    /// Query every store in order and collect their products.
    ///
    /// Requests never overlap: each one (and the pause after it, if another
    /// store follows) completes before the next starts.
    #[instrument(skip(self), fields(stores = self.store_ids.len()))]
    pub async fn fetch_all(&self) -> InventorySnapshot {
        let mut products = Vec::new();
        let mut failed = Vec::new();

        for (index, store_id) in self.store_ids.iter().enumerate() {
            if index > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            match self.client.fetch_goods(store_id).await {
                Ok(goods) => {
                    tracing::debug!(sid = %store_id, count = goods.len(), "Fetched store goods");
                    products.extend(goods);
                }
                Err(e) => {
                    tracing::warn!(sid = %store_id, error = %e, "Store fetch failed, skipping");
                    failed.push(store_id.clone());
                }
            }
        }

        tracing::info!(
            products = products.len(),
            failed = failed.len(),
            "Inventory fetch complete"
        );

        InventorySnapshot {
            result: FetchResult::new(products, Utc::now()),
            attempted: self.store_ids.len(),
            failed,
        }
    }
}

/// Fetcher fronted by a short-lived shared result.
#[derive(Clone)]
pub struct InventoryService {
    fetcher: InventoryFetcher,
    cache: Option<Cache<(), Arc<InventorySnapshot>>>,
}

impl InventoryService {
    /// Wrap a fetcher. A zero `dedupe_window` disables sharing.
    #[must_use]
    pub fn new(fetcher: InventoryFetcher, dedupe_window: Duration) -> Self {
        let cache = (!dedupe_window.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(dedupe_window)
                .build()
        });

        Self { fetcher, cache }
    }

    /// Current inventory, fetched unless a recent walk can be reused.
    pub async fn snapshot(&self) -> Arc<InventorySnapshot> {
        match &self.cache {
            Some(cache) => {
                cache
                    .get_with((), async { Arc::new(self.fetcher.fetch_all().await) })
                    .await
            }
            None => Arc::new(self.fetcher.fetch_all().await),
        }
    }

    /// Drop any shared result and fetch again (manual refresh).
    pub async fn refresh(&self) -> Arc<InventorySnapshot> {
        if let Some(cache) = &self.cache {
            cache.invalidate(&()).await;
        }
        self.snapshot().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::Router;
    use axum::extract::{Query, State};
    use axum::routing::get;
    use serde_json::{Value, json};

    use super::*;

    #[derive(Clone, Default)]
    struct Stub {
        hits: Arc<AtomicUsize>,
    }

    /// Stub storefront: 2661 hangs, 2728 errors, 2558 lists two goods
    /// (plus one incomplete entry), anything else lists nothing.
    async fn goods(
        State(stub): State<Stub>,
        Query(params): Query<HashMap<String, String>>,
    ) -> (axum::http::StatusCode, String) {
        stub.hits.fetch_add(1, Ordering::SeqCst);
        let body = |goods: Value| json!({ "message": { "message": { "goods": goods } } }).to_string();

        match params.get("sid").map(String::as_str) {
            Some("2661") => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                (axum::http::StatusCode::OK, body(json!([])))
            }
            Some("2728") => (axum::http::StatusCode::BAD_GATEWAY, "upstream down".to_string()),
            Some("2558") => (
                axum::http::StatusCode::OK,
                body(json!([
                    { "title": "Tuna rice ball", "total": 3, "price": "29", "thumb": "https://img/1.jpg" },
                    { "title": "Milk tea", "total": 1, "price": 35, "thumb": "https://img/2.jpg" },
                    { "title": "No thumb", "total": 1, "price": 35 }
                ])),
            ),
            _ => (axum::http::StatusCode::OK, body(json!([]))),
        }
    }

    async fn spawn_stub() -> (String, Stub) {
        let stub = Stub::default();
        let app = Router::new()
            .route("/app/wxapp.php", get(goods))
            .with_state(stub.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/app/wxapp.php"), stub)
    }

    fn fetcher(base_url: &str, ids: &str) -> InventoryFetcher {
        InventoryFetcher::new(&UpstreamConfig {
            base_url: base_url.to_string(),
            store_ids: StoreId::parse_list(ids).unwrap(),
            timeout: Duration::from_millis(300),
            request_delay: Duration::ZERO,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_timeout_is_isolated_to_its_store() {
        let (url, _) = spawn_stub().await;
        let snapshot = fetcher(&url, "2661,2558").fetch_all().await;

        let titles: Vec<&str> = snapshot
            .result
            .products
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Tuna rice ball", "Milk tea"]);
        assert!(snapshot.result.products.iter().all(|p| p.store_id.as_str() == "2558"));
        assert_eq!(snapshot.failed, vec![StoreId::parse("2661").unwrap()]);
        assert!(!snapshot.is_outage());
    }

    #[tokio::test]
    async fn test_error_status_is_isolated() {
        let (url, _) = spawn_stub().await;
        let snapshot = fetcher(&url, "2728,2558,3240").fetch_all().await;

        assert_eq!(snapshot.result.products.len(), 2);
        assert_eq!(snapshot.failed.len(), 1);
        assert_eq!(snapshot.attempted, 3);
    }

    #[tokio::test]
    async fn test_all_empty_is_not_an_outage() {
        let (url, _) = spawn_stub().await;
        let snapshot = fetcher(&url, "3240,3254").fetch_all().await;

        assert!(snapshot.result.products.is_empty());
        assert!(snapshot.failed.is_empty());
        assert!(!snapshot.is_outage());
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_an_outage() {
        let snapshot = fetcher("http://127.0.0.1:9/app/wxapp.php", "2558,3240")
            .fetch_all()
            .await;

        assert!(snapshot.result.products.is_empty());
        assert!(snapshot.is_outage());
    }

    #[tokio::test]
    async fn test_repeat_fetch_is_identical_modulo_timestamp() {
        let (url, _) = spawn_stub().await;
        let fetcher = fetcher(&url, "2558,3240");

        let first = fetcher.fetch_all().await;
        let second = fetcher.fetch_all().await;
        assert_eq!(first.result.products, second.result.products);
    }

    #[tokio::test]
    async fn test_requests_are_paced() {
        let (url, _) = spawn_stub().await;
        let mut paced = fetcher(&url, "3240,3254,2558");
        paced.request_delay = Duration::from_millis(100);

        let started = std::time::Instant::now();
        paced.fetch_all().await;
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_service_shares_results_inside_window() {
        let (url, stub) = spawn_stub().await;
        let service = InventoryService::new(fetcher(&url, "2558"), Duration::from_secs(60));

        let (a, b) = tokio::join!(service.snapshot(), service.snapshot());
        let c = service.snapshot().await;
        assert_eq!(stub.hits.load(Ordering::SeqCst), 1);
        assert_eq!(a.result, b.result);
        assert_eq!(a.result, c.result);

        service.refresh().await;
        assert_eq!(stub.hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_service_without_window_always_fetches() {
        let (url, stub) = spawn_stub().await;
        let service = InventoryService::new(fetcher(&url, "2558"), Duration::ZERO);

        service.snapshot().await;
        service.snapshot().await;
        assert_eq!(stub.hits.load(Ordering::SeqCst), 2);
    }
}
