//! One-shot inventory scrape.
//!
//! # Usage
//!
//! ```bash
//! deals-cli fetch --pretty
//! ```
//!
//! Walks the stores in `UPSTREAM_STORE_IDS` once, with the configured timeout
//! and pacing, and prints `{ products, updatedAt }` to stdout.

use foodomo_deals_web::config::DealsConfig;
use foodomo_deals_web::inventory::InventoryFetcher;

use super::CommandError;

/// Fetch every configured store once and print the result as JSON.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the output cannot be
/// serialized. Individual store failures are logged, not returned.
pub async fn run(pretty: bool) -> Result<(), CommandError> {
    let config = DealsConfig::from_env()?;
    let fetcher = InventoryFetcher::new(&config.upstream)?;

    tracing::info!(stores = fetcher.store_ids().len(), "Fetching inventory");
    let snapshot = fetcher.fetch_all().await;

    for store_id in &snapshot.failed {
        tracing::warn!(sid = %store_id, "Store failed");
    }

    let json = if pretty {
        serde_json::to_string_pretty(&snapshot.result)?
    } else {
        serde_json::to_string(&snapshot.result)?
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }
    Ok(())
}
