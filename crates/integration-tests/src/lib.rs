//! Integration test harness for Foodomo Deals.
//!
//! Each test starts two in-process servers on ephemeral ports:
//!
//! - a stub storefront answering the goods endpoint from canned data
//! - the real web application, configured to scrape the stub
//!
//! and talks to the application over HTTP with a cookie-keeping client, the
//! way a browser would.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use foodomo_deals_web::config::DealsConfig;
use foodomo_deals_web::state::AppState;
use serde_json::{Value, json};

/// Path of the stub goods endpoint.
const STUB_PATH: &str = "/app/wxapp.php";

/// Store directory shipped with the web crate.
pub const STORE_DIRECTORY: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../web/static/stores.json");

/// Static assets shipped with the web crate.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../web/static");

/// Cookie signing secret shared by every app a test starts.
const COOKIE_SECRET: &str =
    "integration-cookie-secret-0123456789abcdefghijklmnopqrstuvwxyzABCDEF";

/// Canned answer for one store.
#[derive(Debug, Clone)]
enum StubReply {
    Goods(Value),
    Status(StatusCode),
}

/// Stub storefront. Stores without a canned reply list no goods.
#[derive(Debug, Clone, Default)]
pub struct StubUpstream {
    replies: HashMap<String, StubReply>,
}

impl StubUpstream {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// List `goods` (raw upstream entries) for `sid`.
    #[must_use]
    pub fn with_goods(mut self, sid: &str, goods: Value) -> Self {
        self.replies.insert(sid.to_string(), StubReply::Goods(goods));
        self
    }

    /// Answer `status` for `sid`.
    #[must_use]
    pub fn failing(mut self, sid: &str, status: StatusCode) -> Self {
        self.replies.insert(sid.to_string(), StubReply::Status(status));
        self
    }

    /// Serve on an ephemeral port; returns the goods endpoint URL.
    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route(STUB_PATH, get(stub_goods))
            .with_state(Arc::new(self));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}{STUB_PATH}")
    }
}

async fn stub_goods(
    State(stub): State<Arc<StubUpstream>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let reply = params
        .get("sid")
        .and_then(|sid| stub.replies.get(sid))
        .cloned()
        .unwrap_or(StubReply::Goods(json!([])));

    match reply {
        StubReply::Goods(goods) => (
            StatusCode::OK,
            json!({ "message": { "errno": 0, "message": { "goods": goods } } }).to_string(),
        ),
        StubReply::Status(status) => (status, "stub failure".to_string()),
    }
}

/// A raw upstream goods entry.
#[must_use]
pub fn good(title: &str, total: i64, price: &str) -> Value {
    json!({
        "title": title,
        "total": total,
        "price": price,
        "thumb": format!("https://img.example.com/{total}.jpg"),
    })
}

/// Running application plus a browser-like client.
pub struct TestContext {
    pub base_url: String,
    pub client: reqwest::Client,
    env: HashMap<&'static str, String>,
}

impl TestContext {
    /// Start the app against `upstream_url` for `store_ids`.
    pub async fn start(upstream_url: &str, store_ids: &str, admin_password: Option<&str>) -> Self {
        let mut env: HashMap<&'static str, String> = HashMap::from([
            ("UPSTREAM_BASE_URL", upstream_url.to_string()),
            ("UPSTREAM_STORE_IDS", store_ids.to_string()),
            ("UPSTREAM_TIMEOUT_MS", "2000".to_string()),
            ("UPSTREAM_DELAY_MS", "0".to_string()),
            ("INVENTORY_DEDUPE_SECS", "0".to_string()),
            ("STORE_DIRECTORY_PATH", STORE_DIRECTORY.to_string()),
            ("DEALS_STATIC_DIR", STATIC_DIR.to_string()),
            ("COOKIE_SECRET", COOKIE_SECRET.to_string()),
        ]);
        if let Some(password) = admin_password {
            env.insert("ADMIN_PASSWORD", password.to_string());
        }

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self::serve(env, client).await
    }

    /// Start a fresh app with the same configuration, keeping this client and
    /// its cookies, as after a server restart.
    pub async fn restart(&self) -> Self {
        Self::serve(self.env.clone(), self.client.clone()).await
    }

    async fn serve(env: HashMap<&'static str, String>, client: reqwest::Client) -> Self {
        let config = DealsConfig::from_lookup(|key| env.get(key).cloned()).unwrap();
        let state = AppState::new(config).unwrap();
        let app = foodomo_deals_web::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            client,
            env,
        }
    }

    /// Full URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn get_text(&self, path: &str) -> String {
        self.get(path).await.text().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap()
    }
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
