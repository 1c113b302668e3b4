//! Browser state cookies.
//!
//! The admin flag and the store selection are kept by the browser itself, in
//! cookies signed with the application key. Nothing per-browser is stored on
//! the server, so both survive restarts as long as `COOKIE_SECRET` is stable.

use axum_extra::extract::cookie::{Cookie, SameSite};

/// Cookie holding the admin flag.
pub const ADMIN_COOKIE: &str = "deals_admin";

/// Cookie holding the store selection (percent-encoded JSON array).
pub const SELECTION_COOKIE: &str = "deals_stores";

/// Value of the admin cookie once the gate has been passed.
pub const ADMIN_COOKIE_VALUE: &str = "1";

/// Build a browser state cookie. It lasts until logout or until the browser's
/// storage is cleared.
#[must_use]
pub fn state_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .permanent()
        .build()
}

/// Removal cookie matching the path of [`state_cookie`].
#[must_use]
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}
