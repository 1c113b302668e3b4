//! Grouping fetched products by store for display.

use foodomo_deals_core::Product;
use indexmap::IndexMap;

use crate::directory::StoreDirectory;

/// Base URL for map search links.
const MAP_SEARCH_BASE: &str = "https://www.google.com/maps/search/";

/// Products sold by one store, with the store's display details.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreGroup {
    /// Resolved display name (grouping key).
    pub name: String,
    /// Street address of the first store resolved to this name.
    pub address: String,
    /// Map search link for `address`.
    pub map_url: String,
    /// Products in fetch order.
    pub products: Vec<Product>,
}

/// Group products under their store's display name.
///
/// Groups appear in order of their first product; products keep fetch order
/// within a group. Identifiers missing from the directory resolve to a
/// per-identifier placeholder, so two unknown stores never share a group.
#[must_use]
pub fn group_by_store<'a, I>(products: I, directory: &StoreDirectory) -> Vec<StoreGroup>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut groups: IndexMap<String, StoreGroup> = IndexMap::new();

    for product in products {
        let info = directory.lookup(&product.store_id);
        groups
            .entry(info.name)
            .or_insert_with_key(|name| StoreGroup {
                name: name.clone(),
                map_url: map_search_url(&info.address),
                address: info.address,
                products: Vec::new(),
            })
            .products
            .push(product.clone());
    }

    groups.into_values().collect()
}

/// Map search link for an address.
#[must_use]
pub fn map_search_url(address: &str) -> String {
    format!("{MAP_SEARCH_BASE}{}", urlencoding::encode(address))
}
