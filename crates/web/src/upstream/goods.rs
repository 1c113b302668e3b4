//! Goods list parsing.
//!
//! The storefront answers with a deeply nested envelope:
//!
//! ```json
//! { "message": { "message": { "goods": [ { "title": "...", "total": 3,
//!   "price": "45.00", "thumb": "https://..." } ] } } }
//! ```
//!
//! Numbers arrive either as JSON numbers or as numeric strings depending on
//! the store, so both are accepted. Incomplete entries are dropped: a missing,
//! null or empty field, or a numeric price of `0`. A string price is kept even
//! when it reads as zero (`"0.00"`).

use std::str::FromStr;

use foodomo_deals_core::{Product, StoreId};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use serde_json::Value;

/// JSON pointer to the goods array.
const GOODS_POINTER: &str = "/message/message/goods";

/// One goods entry as sent upstream; every field may be missing.
#[derive(Debug, Default, Deserialize)]
struct RawGood {
    #[serde(default)]
    title: Value,
    #[serde(default)]
    total: Value,
    #[serde(default)]
    price: Value,
    #[serde(default)]
    thumb: Value,
}

/// Parse a goods response body into products for `store_id`.
///
/// A missing or non-array goods list yields no products.
///
/// # Errors
///
/// Returns an error only if `body` is not JSON at all.
pub fn parse_goods(store_id: &StoreId, body: &str) -> Result<Vec<Product>, serde_json::Error> {
    let document: Value = serde_json::from_str(body)?;

    let Some(goods) = document.pointer(GOODS_POINTER).and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    Ok(goods
        .iter()
        .filter_map(|entry| RawGood::deserialize(entry).ok())
        .filter_map(|raw| raw.into_product(store_id))
        .collect())
}

impl RawGood {
    /// Convert to a product, or `None` if a required field is missing.
    fn into_product(self, store_id: &StoreId) -> Option<Product> {
        let title = non_empty_string(self.title)?;
        let remaining_count = integer(&self.total)?;
        let price = price(&self.price)?;
        let thumbnail_url = non_empty_string(self.thumb)?;

        Some(Product {
            store_id: store_id.clone(),
            title,
            remaining_count,
            price,
            thumbnail_url,
        })
    }
}

fn non_empty_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)] // whole numbers only
fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn price(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(Decimal::from_f64))
            .filter(|price| !price.is_zero()),
        Value::String(s) if !s.is_empty() => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}
