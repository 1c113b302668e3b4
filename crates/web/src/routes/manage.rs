//! Admin selection page.
//!
//! Password-gated page where a browser picks which stores the home page
//! shows. The admin flag and the selection live in signed browser cookies.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use foodomo_deals_core::{Selection, StoreId, StoreInfo};
use serde::Deserialize;
use tracing::instrument;

use crate::directory::StoreDirectory;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{
    RequireAdmin, clear_admin, is_admin, load_selection, save_selection, set_admin,
};
use crate::state::AppState;

/// Maximum number of search results listed.
pub const SEARCH_RESULT_LIMIT: usize = 100;

// =============================================================================
// Form and Query Types
// =============================================================================

/// Search query for the admin page.
#[derive(Debug, Default, Deserialize)]
pub struct ManageQuery {
    #[serde(default)]
    pub q: String,
}

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub password: String,
}

/// Toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub sid: String,
    #[serde(default)]
    pub q: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Store row on the admin page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRow {
    pub sid: String,
    pub name: String,
    pub address: String,
    pub selected: bool,
}

impl StoreRow {
    fn new(info: &StoreInfo, selection: &Selection) -> Self {
        Self {
            sid: info.store_id.to_string(),
            name: info.name.clone(),
            address: info.address.clone(),
            selected: selection.contains(&info.store_id),
        }
    }
}

/// Admin login prompt.
#[derive(Template, WebTemplate)]
#[template(path = "manage/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Admin selection page.
#[derive(Template, WebTemplate)]
#[template(path = "manage/index.html")]
pub struct ManageTemplate {
    /// Current search text.
    pub query: String,
    /// Selected stores, in selection order.
    pub selected: Vec<StoreRow>,
    /// Search results, capped at [`SEARCH_RESULT_LIMIT`].
    pub results: Vec<StoreRow>,
    /// Number of matches before capping.
    pub total_matches: usize,
}

impl ManageTemplate {
    /// Build the page for a search and selection.
    #[must_use]
    pub fn build(directory: &StoreDirectory, selection: &Selection, query: &str) -> Self {
        let selected = selection
            .iter()
            .map(|id| StoreRow::new(&directory.lookup(id), selection))
            .collect();

        let results = directory
            .search(query, SEARCH_RESULT_LIMIT)
            .into_iter()
            .map(|info| StoreRow::new(info, selection))
            .collect();

        Self {
            query: query.trim().to_string(),
            selected,
            results,
            total_matches: directory.count_matches(query),
        }
    }
}

/// Admin page URL preserving a search.
fn manage_url(query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        "/manage".to_string()
    } else {
        format!("/manage?q={}", urlencoding::encode(query))
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the login prompt, or the selection page once authenticated.
#[instrument(skip(state, jar))]
pub async fn index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<ManageQuery>,
) -> Response {
    if !is_admin(&jar) {
        return LoginTemplate { error: None }.into_response();
    }

    let selection = load_selection(&jar);
    ManageTemplate::build(state.directory(), &selection, &query.q).into_response()
}

/// Handle the login form.
#[instrument(skip(state, jar, form))]
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    if let Err(e) = state.auth().verify(&form.password) {
        tracing::info!(reason = %e, "Admin login rejected");
        let page = LoginTemplate {
            error: Some(AppError::from(e).public_message()),
        };
        return (StatusCode::UNAUTHORIZED, page).into_response();
    }

    add_breadcrumb("auth", "Admin login");
    let jar = set_admin(jar, state.config().secure_cookies());
    (jar, Redirect::to("/manage")).into_response()
}

/// Add or remove one store from this browser's selection.
///
/// # Errors
///
/// Returns 400 for a malformed store id, or 500 if the selection cannot be
/// encoded into its cookie.
#[instrument(skip(state, jar))]
pub async fn toggle(
    State(state): State<AppState>,
    RequireAdmin(jar): RequireAdmin,
    Form(form): Form<ToggleForm>,
) -> Result<(SignedCookieJar, Redirect)> {
    let store_id = StoreId::parse(form.sid.trim())
        .map_err(|e| AppError::BadRequest(format!("invalid store id: {e}")))?;

    let mut selection = load_selection(&jar);
    let selected = selection.toggle(&store_id);
    let jar = save_selection(jar, &selection, state.config().secure_cookies())
        .map_err(|e| AppError::Internal(format!("selection cookie: {e}")))?;

    tracing::info!(sid = %store_id, selected, total = selection.len(), "Selection changed");
    Ok((jar, Redirect::to(&manage_url(&form.q))))
}

/// Clear the admin flag. The selection stays.
#[instrument(skip(jar))]
pub async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, Redirect) {
    (clear_admin(jar), Redirect::to("/manage"))
}
