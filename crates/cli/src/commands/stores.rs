//! Store directory lookups.
//!
//! # Usage
//!
//! ```bash
//! deals-cli stores search 中山 --limit 20
//! deals-cli stores show 2661
//! ```

use foodomo_deals_core::{StoreId, StoreInfo};
use foodomo_deals_web::config::DealsConfig;
use foodomo_deals_web::directory::StoreDirectory;

use super::CommandError;

fn load_directory() -> Result<StoreDirectory, CommandError> {
    let config = DealsConfig::from_env()?;
    Ok(StoreDirectory::load(&config.store_directory_path)?)
}

fn format_row(store: &StoreInfo) -> String {
    format!("{}\t{}\t{}", store.store_id, store.name, store.address)
}

/// Print stores matching `query`, one tab-separated row each.
///
/// # Errors
///
/// Returns an error if the directory cannot be loaded.
pub fn search(query: &str, limit: usize) -> Result<(), CommandError> {
    let directory = load_directory()?;
    let hits = directory.search(query, limit);

    #[allow(clippy::print_stdout)]
    {
        for store in &hits {
            println!("{}", format_row(store));
        }
    }

    tracing::info!(
        shown = hits.len(),
        total = directory.count_matches(query),
        "Search complete"
    );
    Ok(())
}

/// Print one store as JSON.
///
/// # Errors
///
/// Returns an error if the id is malformed, the directory cannot be loaded
/// or the store is not listed.
pub fn show(sid: &str) -> Result<(), CommandError> {
    let store_id = StoreId::parse(sid)?;
    let directory = load_directory()?;
    let store = directory
        .get(&store_id)
        .ok_or_else(|| CommandError::StoreNotFound(store_id.to_string()))?;

    let json = serde_json::to_string_pretty(store)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }
    Ok(())
}
