//! Discounted product records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::StoreId;

/// A discounted product currently listed at one store.
///
/// Produced by the inventory fetcher from the storefront's goods list. Only
/// complete entries become a `Product`: every field here is guaranteed to be
/// present (non-empty title and thumbnail, non-zero price).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store the product was listed at.
    pub store_id: StoreId,
    /// Product title as listed upstream.
    pub title: String,
    /// Units left at the store.
    pub remaining_count: i64,
    /// Discounted price, serialized as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Product image URL.
    pub thumbnail_url: String,
}
