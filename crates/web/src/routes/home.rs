//! Home page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use chrono::{DateTime, FixedOffset, NaiveTime, Offset, Utc};
use foodomo_deals_core::{DISCOUNT_WINDOWS, DiscountWindow, Product, Selection};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::aggregate::{StoreGroup, group_by_store};
use crate::directory::StoreDirectory;
use crate::filters;
use crate::inventory::InventorySnapshot;
use crate::middleware::CurrentSelection;
use crate::state::AppState;

/// Brand tag prefixed to upstream titles, dropped for display.
const BRAND_TAG: &str = "[i珍食]";

/// Display time zone (Asia/Taipei, no DST).
const TAIPEI_OFFSET_SECS: i32 = 8 * 60 * 60;

/// Seconds between automatic page reloads.
pub const AUTO_REFRESH_SECS: u64 = 60;

/// Shown when every store failed and there is nothing to list.
pub const OUTAGE_MESSAGE: &str = "Inventory service unreachable (retrying automatically)";

// =============================================================================
// View Types
// =============================================================================

/// Product display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub title: String,
    pub remaining_count: i64,
    pub price: String,
    pub thumbnail_url: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            title: display_title(&product.title),
            remaining_count: product.remaining_count,
            price: format_price(product.price),
            thumbnail_url: product.thumbnail_url.clone(),
        }
    }
}

/// One store's section of the page.
#[derive(Debug, Clone)]
pub struct StoreGroupView {
    pub name: String,
    pub address: String,
    pub map_url: String,
    pub products: Vec<ProductView>,
}

impl From<StoreGroup> for StoreGroupView {
    fn from(group: StoreGroup) -> Self {
        Self {
            products: group.products.iter().map(ProductView::from).collect(),
            name: group.name,
            address: group.address,
            map_url: group.map_url,
        }
    }
}

/// One discount window on the promotional panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowView {
    pub label: &'static str,
    pub time_range: String,
    pub active: bool,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Store sections; empty means the promotional panel is shown.
    pub groups: Vec<StoreGroupView>,
    /// Completion time of the fetch, Taipei time.
    pub updated_at: String,
    /// Short error shown above the promotional panel.
    pub error: Option<&'static str>,
    /// Discount windows for the promotional panel.
    pub windows: Vec<WindowView>,
    /// Number of stores this browser filters on (0 = all).
    pub selected_count: usize,
    /// Seconds between automatic reloads.
    pub refresh_secs: u64,
    /// Age in milliseconds after which regaining focus reloads the page.
    pub stale_after_ms: u128,
}

impl HomeTemplate {
    /// Build the page from a snapshot, filtered by the browser's selection.
    #[must_use]
    pub fn from_snapshot(
        snapshot: &InventorySnapshot,
        directory: &StoreDirectory,
        selection: &Selection,
        now: DateTime<Utc>,
    ) -> Self {
        let visible = snapshot
            .result
            .products
            .iter()
            .filter(|product| selection.admits(&product.store_id));

        let groups: Vec<StoreGroupView> = group_by_store(visible, directory)
            .into_iter()
            .map(StoreGroupView::from)
            .collect();

        let error = (groups.is_empty() && snapshot.is_outage()).then_some(OUTAGE_MESSAGE);

        Self {
            groups,
            updated_at: format_taipei(snapshot.result.updated_at),
            error,
            windows: window_views(now.with_timezone(&taipei_offset()).time()),
            selected_count: selection.len(),
            refresh_secs: AUTO_REFRESH_SECS,
            stale_after_ms: 0,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Strip the brand tag and surrounding whitespace from a title.
#[must_use]
pub fn display_title(title: &str) -> String {
    title.replacen(BRAND_TAG, "", 1).trim().to_string()
}

/// Format a price without trailing zeros: `$29`, `$59.5`.
#[must_use]
pub fn format_price(price: Decimal) -> String {
    format!("${}", price.normalize())
}

fn taipei_offset() -> FixedOffset {
    FixedOffset::east_opt(TAIPEI_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Format an instant as Taipei wall-clock time, `YYYY/MM/DD HH:MM:SS`.
#[must_use]
pub fn format_taipei(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&taipei_offset())
        .format("%Y/%m/%d %H:%M:%S")
        .to_string()
}

/// Both discount windows, marking the one containing `now`.
#[must_use]
pub fn window_views(now: NaiveTime) -> Vec<WindowView> {
    let active = DiscountWindow::active_at(now);

    DISCOUNT_WINDOWS
        .iter()
        .map(|window| WindowView {
            label: window.label,
            time_range: window.time_range(),
            active: active.is_some_and(|a| a == window),
        })
        .collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the home page.
#[instrument(skip(state, selection), fields(selected = selection.len()))]
pub async fn home(
    State(state): State<AppState>,
    CurrentSelection(selection): CurrentSelection,
) -> impl IntoResponse {
    let snapshot = state.inventory().snapshot().await;

    let mut page = HomeTemplate::from_snapshot(&snapshot, state.directory(), &selection, Utc::now());
    page.stale_after_ms = state.config().dedupe_window.as_millis();
    page
}

/// Force a new fetch, then show the home page.
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.inventory().refresh().await;
    tracing::info!(
        products = snapshot.result.products.len(),
        "Manual refresh"
    );
    Redirect::to("/")
}
