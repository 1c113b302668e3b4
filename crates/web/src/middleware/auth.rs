//! Admin extractors and browser state helpers.
//!
//! The admin flag and the store selection both live in signed cookies. A
//! cookie whose signature does not verify is treated as absent.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{SignedCookieJar, cookie::Key};
use foodomo_deals_core::Selection;

use super::cookies::{
    ADMIN_COOKIE, ADMIN_COOKIE_VALUE, SELECTION_COOKIE, removal_cookie, state_cookie,
};

/// Extractor that requires the admin flag.
///
/// Page requests without the flag are redirected to the login prompt.
pub struct RequireAdmin(pub SignedCookieJar);

/// Error returned when the admin flag is required but missing.
pub struct AdminRejection;

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        Redirect::to("/manage").into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(jar) = SignedCookieJar::<Key>::from_request_parts(parts, state).await;

        if is_admin(&jar) {
            Ok(Self(jar))
        } else {
            Err(AdminRejection)
        }
    }
}

/// Whether this browser has passed the admin gate.
#[must_use]
pub fn is_admin(jar: &SignedCookieJar) -> bool {
    jar.get(ADMIN_COOKIE)
        .is_some_and(|cookie| cookie.value() == ADMIN_COOKIE_VALUE)
}

/// Set the admin flag for this browser.
#[must_use]
pub fn set_admin(jar: SignedCookieJar, secure: bool) -> SignedCookieJar {
    jar.add(state_cookie(
        ADMIN_COOKIE,
        ADMIN_COOKIE_VALUE.to_string(),
        secure,
    ))
}

/// Clear the admin flag for this browser (logout).
///
/// The store selection is kept.
#[must_use]
pub fn clear_admin(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(removal_cookie(ADMIN_COOKIE))
}

/// Load this browser's store selection (empty when never set or unreadable).
#[must_use]
pub fn load_selection(jar: &SignedCookieJar) -> Selection {
    jar.get(SELECTION_COOKIE)
        .and_then(|cookie| {
            let json = urlencoding::decode(cookie.value()).ok()?;
            serde_json::from_str(&json).ok()
        })
        .unwrap_or_default()
}

/// Persist this browser's store selection. An empty selection removes the
/// cookie.
///
/// # Errors
///
/// Returns an error if the selection cannot be serialized.
pub fn save_selection(
    jar: SignedCookieJar,
    selection: &Selection,
    secure: bool,
) -> Result<SignedCookieJar, serde_json::Error> {
    if selection.is_empty() {
        return Ok(jar.remove(removal_cookie(SELECTION_COOKIE)));
    }

    let json = serde_json::to_string(selection)?;
    let value = urlencoding::encode(&json).into_owned();
    Ok(jar.add(state_cookie(SELECTION_COOKIE, value, secure)))
}

/// Extractor for the current browser's store selection.
pub struct CurrentSelection(pub Selection);

impl<S> FromRequestParts<S> for CurrentSelection
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(jar) = SignedCookieJar::<Key>::from_request_parts(parts, state).await;
        Ok(Self(load_selection(&jar)))
    }
}
