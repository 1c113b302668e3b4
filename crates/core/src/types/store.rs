//! Store directory entries.

use serde::{Deserialize, Serialize};

use super::StoreId;

/// Display name and address for one store.
///
/// The wire format matches the static store directory file:
/// `{ "sid": "2661", "name": "...", "addr": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    /// Store identifier.
    #[serde(rename = "sid", alias = "storeId")]
    pub store_id: StoreId,
    /// Display name.
    pub name: String,
    /// Street address, used for the map link.
    #[serde(rename = "addr", alias = "address")]
    pub address: String,
}

impl StoreInfo {
    /// Address shown for stores missing from the directory.
    pub const UNKNOWN_ADDRESS: &'static str = "address unknown";

    /// Placeholder entry for an identifier missing from the directory.
    #[must_use]
    pub fn placeholder(store_id: &StoreId) -> Self {
        Self {
            store_id: store_id.clone(),
            name: format!("unknown store {store_id}"),
            address: Self::UNKNOWN_ADDRESS.to_string(),
        }
    }

    /// Case-insensitive substring match over name and identifier.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.store_id.as_str().to_lowercase().contains(needle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store(sid: &str, name: &str) -> StoreInfo {
        StoreInfo {
            store_id: StoreId::parse(sid).unwrap(),
            name: name.to_string(),
            address: "Taipei".to_string(),
        }
    }

    #[test]
    fn test_placeholder() {
        let info = StoreInfo::placeholder(&StoreId::parse("9999").unwrap());
        assert_eq!(info.name, "unknown store 9999");
        assert_eq!(info.address, "address unknown");
    }

    #[test]
    fn test_matches_name_case_insensitive() {
        let info = store("2661", "Zhongshan Branch");
        assert!(info.matches("zhongshan"));
        assert!(info.matches("branch"));
        assert!(!info.matches("xinyi"));
    }

    #[test]
    fn test_matches_identifier() {
        let info = store("2661", "Zhongshan Branch");
        assert!(info.matches("266"));
        assert!(!info.matches("2558"));
    }

    #[test]
    fn test_directory_file_format() {
        let json = r#"{"sid":"2558","name":"Xinyi","addr":"No. 7, Xinyi Rd."}"#;
        let info: StoreInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.store_id.as_str(), "2558");
        assert_eq!(info.address, "No. 7, Xinyi Rd.");

        let back = serde_json::to_value(&info).unwrap();
        assert_eq!(back["sid"], "2558");
        assert_eq!(back["addr"], "No. 7, Xinyi Rd.");
    }
}
