//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Shared-password gate for the admin selection page

pub mod auth;
