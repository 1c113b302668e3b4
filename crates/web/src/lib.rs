//! Foodomo Deals web application library.
//!
//! Scrapes discounted goods for a fixed list of stores, groups them by store
//! and serves them as a page and a JSON endpoint, with a password-gated page
//! for picking which stores a browser shows.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod aggregate;
pub mod config;
pub mod directory;
pub mod error;
pub mod filters;
pub mod inventory;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod upstream;

pub use routes::app;
