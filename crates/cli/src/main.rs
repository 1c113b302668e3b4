//! Foodomo Deals CLI - operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Scrape every configured store once and print JSON
//! deals-cli fetch --pretty
//!
//! # Search the store directory
//! deals-cli stores search 中山
//!
//! # Show one store
//! deals-cli stores show 2661
//!
//! # Check a password against ADMIN_PASSWORD
//! deals-cli check-password 'candidate'
//! ```
//!
//! Configuration comes from the same environment variables as the web app.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "deals-cli")]
#[command(author, version, about = "Foodomo Deals CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every configured store once and print the result as JSON
    Fetch {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Look up stores in the directory
    Stores {
        #[command(subcommand)]
        action: StoresAction,
    },
    /// Check a password against the configured admin password
    CheckPassword {
        /// Password to check
        password: String,
    },
}

#[derive(Subcommand)]
enum StoresAction {
    /// Search by name or store id (case-insensitive)
    Search {
        /// Search text; empty lists every store
        #[arg(default_value = "")]
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 100)]
        limit: usize,
    },
    /// Show one store
    Show {
        /// Store id
        sid: String,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Fetch { pretty } => commands::fetch::run(pretty).await?,
        Commands::Stores { action } => match action {
            StoresAction::Search { query, limit } => commands::stores::search(&query, limit)?,
            StoresAction::Show { sid } => commands::stores::show(&sid)?,
        },
        Commands::CheckPassword { password } => commands::password::check(&password)?,
    }
    Ok(())
}
