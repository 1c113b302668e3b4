//! Store directory: identifier to display name and address.
//!
//! Loaded once at startup from the static `stores.json` asset, which is also
//! served to browsers unchanged at `/stores.json`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use foodomo_deals_core::{StoreId, StoreInfo};
use thiserror::Error;

/// Errors loading the store directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The directory file could not be read.
    #[error("failed to read store directory {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The directory file is not a JSON array of stores.
    #[error("invalid store directory: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable, cheaply cloneable store directory.
#[derive(Debug, Clone, Default)]
pub struct StoreDirectory {
    inner: Arc<DirectoryInner>,
}

#[derive(Debug, Default)]
struct DirectoryInner {
    entries: Vec<StoreInfo>,
    by_id: HashMap<StoreId, usize>,
}

impl StoreDirectory {
    /// Build a directory from entries, keeping file order.
    ///
    /// When an identifier appears more than once the first entry wins.
    #[must_use]
    pub fn new(entries: Vec<StoreInfo>) -> Self {
        let mut by_id = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            by_id.entry(entry.store_id.clone()).or_insert(index);
        }

        Self {
            inner: Arc::new(DirectoryInner { entries, by_id }),
        }
    }

    /// Parse a directory from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Parse` if the document is not an array of
    /// `{sid, name, addr}` objects with valid identifiers.
    pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
        let entries: Vec<StoreInfo> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    /// Load the directory file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let json = std::fs::read_to_string(path).map_err(|source| DirectoryError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let directory = Self::from_json(&json)?;

        tracing::info!(
            path = %path.display(),
            stores = directory.len(),
            "Store directory loaded"
        );
        Ok(directory)
    }

    /// Look up a store, if listed.
    #[must_use]
    pub fn get(&self, store_id: &StoreId) -> Option<&StoreInfo> {
        self.inner
            .by_id
            .get(store_id)
            .and_then(|&index| self.inner.entries.get(index))
    }

    /// Look up a store, falling back to a placeholder entry.
    #[must_use]
    pub fn lookup(&self, store_id: &StoreId) -> StoreInfo {
        self.get(store_id)
            .cloned()
            .unwrap_or_else(|| StoreInfo::placeholder(store_id))
    }

    /// Stores whose name or identifier contains `query`, ignoring case.
    ///
    /// A blank query matches every store. Results keep directory order and
    /// stop after `limit` matches.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<&StoreInfo> {
        let needle = query.trim().to_lowercase();

        self.inner
            .entries
            .iter()
            .filter(|store| needle.is_empty() || store.matches(&needle))
            .take(limit)
            .collect()
    }

    /// Number of stores matching `query` (uncapped).
    #[must_use]
    pub fn count_matches(&self, query: &str) -> usize {
        let needle = query.trim().to_lowercase();

        self.inner
            .entries
            .iter()
            .filter(|store| needle.is_empty() || store.matches(&needle))
            .count()
    }

    /// Number of stores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Whether the directory has no stores.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }
}
