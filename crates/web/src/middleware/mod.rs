//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing, span from [`make_request_span`])
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame options, etc.)
//!
//! Per-browser state is not a layer: handlers read and write signed cookies
//! through [`RequireAdmin`], [`CurrentSelection`] and the helpers in [`auth`].

pub mod auth;
pub mod cookies;
pub mod request_id;
pub mod security_headers;

pub use auth::{
    CurrentSelection, RequireAdmin, clear_admin, is_admin, load_selection, save_selection,
    set_admin,
};
pub use request_id::{make_request_span, request_id_middleware};
pub use security_headers::security_headers_middleware;
