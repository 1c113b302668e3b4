//! Response envelope of the inventory endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Product;

/// All products found in one pass over the configured stores.
///
/// `updatedAt` is written as ISO-8601 UTC with millisecond precision
/// (`2026-10-19T11:00:00.000Z`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResult {
    /// Products from every store, in store order then upstream order.
    pub products: Vec<Product>,
    /// When the pass finished.
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

impl FetchResult {
    /// Create a result stamped with the given time.
    #[must_use]
    pub const fn new(products: Vec<Product>, updated_at: DateTime<Utc>) -> Self {
        Self {
            products,
            updated_at,
        }
    }
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
