//! FitPlan CLI - catalog and order management tools.
//!
//! # Usage
//!
//! ```bash
//! # Show every plan with its price
//! fp-cli catalog
//!
//! # Show only diet plans
//! fp-cli catalog diet
//!
//! # Summarize orders saved in the local fallback store
//! fp-cli orders list --store data/orders.json
//!
//! # Dump them as JSON, e.g. to replay into the document store
//! fp-cli orders export > orders.json
//! ```
//!
//! # Commands
//!
//! - `catalog` - Print the plan catalog
//! - `orders list` - Summarize locally stored orders
//! - `orders export` - Write locally stored orders to stdout as JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fitplan_core::Category;

mod commands;

#[derive(Parser)]
#[command(name = "fp-cli")]
#[command(author, version, about = "FitPlan CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the plan catalog
    Catalog {
        /// Only show one category (`diet`, `workout`)
        category: Option<Category>,
    },
    /// Inspect orders saved in the local fallback store
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Summarize stored orders, one per line
    List {
        /// Path to the local order store
        #[arg(long, env = "ORDERS_LOCAL_PATH", default_value = "data/orders.json")]
        store: PathBuf,
    },
    /// Write stored orders to stdout as JSON
    Export {
        /// Path to the local order store
        #[arg(long, env = "ORDERS_LOCAL_PATH", default_value = "data/orders.json")]
        store: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so exports can be piped
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Commands::Catalog { category } => commands::catalog::print(&mut stdout, category)?,
        Commands::Orders { action } => match action {
            OrdersAction::List { store } => commands::orders::list(&mut stdout, &store).await?,
            OrdersAction::Export { store } => commands::orders::export(&mut stdout, &store).await?,
        },
    }
    Ok(())
}
