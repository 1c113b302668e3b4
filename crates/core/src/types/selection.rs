//! The admin's chosen subset of stores.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::StoreId;

/// An ordered set of store identifiers chosen on the admin page.
///
/// Iteration follows insertion order. An empty selection means "no filter":
/// [`Selection::admits`] accepts every store until at least one is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(IndexSet<StoreId>);

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the store if absent, remove it if present.
    ///
    /// Returns `true` when the store is selected after the call.
    pub fn toggle(&mut self, store_id: &StoreId) -> bool {
        if self.0.shift_remove(store_id) {
            false
        } else {
            self.0.insert(store_id.clone());
            true
        }
    }

    /// Whether the store is explicitly selected.
    #[must_use]
    pub fn contains(&self, store_id: &StoreId) -> bool {
        self.0.contains(store_id)
    }

    /// Whether products from this store should be displayed.
    #[must_use]
    pub fn admits(&self, store_id: &StoreId) -> bool {
        self.0.is_empty() || self.0.contains(store_id)
    }

    /// Selected identifiers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &StoreId> {
        self.0.iter()
    }

    /// Number of selected stores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<StoreId> for Selection {
    fn from_iter<I: IntoIterator<Item = StoreId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
