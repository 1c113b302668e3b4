//! Core types for Foodomo Deals.
//!
//! This module provides type-safe wrappers for the domain concepts shared by
//! the web application and the CLI.

pub mod discount;
pub mod fetch;
pub mod product;
pub mod selection;
pub mod store;
pub mod store_id;

pub use discount::{DISCOUNT_WINDOWS, DiscountWindow};
pub use fetch::FetchResult;
pub use product::Product;
pub use selection::Selection;
pub use store::StoreInfo;
pub use store_id::{StoreId, StoreIdError};
