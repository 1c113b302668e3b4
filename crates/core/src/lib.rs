//! Foodomo Deals Core - Shared domain types.
//!
//! This crate provides the types used across all Foodomo Deals components:
//! - `web` - Inventory page, admin selection page and JSON endpoints
//! - `cli` - Operator tooling (one-shot scrapes, directory lookups)
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no clocks. Callers pass the current time in where it matters.
//!
//! # Modules
//!
//! - [`types`] - Store identifiers, products, store directory entries,
//!   selections, fetch results and discount windows

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
