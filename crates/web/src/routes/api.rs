//! JSON API handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use foodomo_deals_core::FetchResult;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Body of `POST /api/auth`.
#[derive(Deserialize)]
pub struct AuthRequest {
    pub password: String,
}

impl std::fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthRequest")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful `POST /api/auth` response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
}

/// Current inventory as `{ products, updatedAt }`.
///
/// Always 200: failed stores simply contribute nothing.
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>) -> Json<FetchResult> {
    let snapshot = state.inventory().snapshot().await;
    Json(snapshot.result.clone())
}

/// Check the admin password.
///
/// # Errors
///
/// 400 for a body that is not `{"password": "..."}`, 401 for a wrong
/// password (or none configured).
#[instrument(skip(state, body))]
pub async fn auth(
    State(state): State<AppState>,
    body: std::result::Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>> {
    let Json(request) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    state.auth().verify(&request.password).inspect_err(|e| {
        tracing::info!(reason = %e, "Admin password rejected");
    })?;

    add_breadcrumb("auth", "Admin password accepted");
    Ok(Json(AuthResponse { success: true }))
}
