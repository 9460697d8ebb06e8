//! # Order List Tool
//!
//! Inspects and appends to the persisted order list from the command line.
//!
//! ## Usage
//! ```bash
//! # Print every recorded order as JSON
//! cargo run -p storefront-store --bin orders -- list
//!
//! # Only orders still being prepared
//! cargo run -p storefront-store --bin orders -- list --status "en proceso"
//!
//! # Append an order (an id is generated when the file has none)
//! cargo run -p storefront-store --bin orders -- record --file order.json
//!
//! # Total a saved cart in the configured currency (or --currency)
//! cargo run -p storefront-store --bin orders -- total --file cart.json --currency UYU
//!
//! # Check a checkout form; exits with status 1 when it is invalid
//! cargo run -p storefront-store --bin orders -- validate --file form.json
//!
//! # Use a different data directory
//! cargo run -p storefront-store --bin orders -- --data-dir ./data list
//! ```

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde_json::Value;
use storefront_core::{
    validate_cart_form, CartEntry, CartFormData, CartLine, Currency, OrderRecord, OrderStatus,
};
use storefront_store::{open_file_recorder, StoreConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Storefront order list tool
#[derive(Parser)]
#[command(name = "orders", version, about, long_about = None)]
struct Cli {
    /// Path to storefront.toml (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the order list, overriding configuration
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print recorded orders, oldest first
    List {
        /// Only show orders with this status (e.g. "Confirmado")
        #[arg(long)]
        status: Option<OrderStatus>,
    },

    /// Append an order read from a JSON file
    Record {
        /// Path to the order JSON
        #[arg(long)]
        file: PathBuf,
    },

    /// Total a cart read from a JSON file
    Total {
        /// Path to the cart JSON (a list of `{product, quantity}`)
        #[arg(long)]
        file: PathBuf,

        /// Currency to total in, overriding configuration
        #[arg(long)]
        currency: Option<Currency>,
    },

    /// Validate a checkout form read from a JSON file
    Validate {
        /// Path to the form JSON
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = StoreConfig::load(cli.config)?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }

    match cli.command {
        Commands::List { status } => {
            let recorder = open_file_recorder(&config);
            let orders: Vec<OrderRecord> = recorder
                .orders()
                .await?
                .into_iter()
                .filter(|order| status.map_or(true, |s| order.status == s))
                .collect();
            println!("{}", serde_json::to_string_pretty(&orders)?);
        }
        Commands::Record { file } => {
            let order = read_order(&file)?;
            let id = order.id.clone();

            let recorder = open_file_recorder(&config);
            let existing = recorder.find(&id).await?;
            if !existing.is_empty() {
                warn!(id = %id, count = existing.len(), "Order id already recorded");
            }

            recorder.record(order).await?;
            info!(id = %id, data_dir = ?config.data_dir(), "Recorded order");
            println!("{id}");
        }
        Commands::Total { file, currency } => {
            if let Some(currency) = currency {
                config.checkout.currency = currency;
            }

            let contents = std::fs::read_to_string(&file)?;
            let entries: Vec<CartEntry> = serde_json::from_str(&contents)?;
            let lines: Vec<CartLine<'_>> = entries.iter().map(CartEntry::line).collect();

            println!("{}", config.format_cart_total(&lines));
        }
        Commands::Validate { file } => {
            let contents = std::fs::read_to_string(&file)?;
            let form: CartFormData = serde_json::from_str(&contents)?;
            let result = validate_cart_form(&form);

            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.valid {
                process::exit(1);
            }
        }
    }

    Ok(())
}

/// Reads an order, generating an id when the file has none.
fn read_order(path: &Path) -> Result<OrderRecord, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let mut value: Value = serde_json::from_str(&contents)?;

    if let Some(fields) = value.as_object_mut() {
        let has_id = fields
            .get("id")
            .and_then(Value::as_str)
            .is_some_and(|id| !id.trim().is_empty());
        if !has_id {
            fields.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        }
    }

    Ok(serde_json::from_value(value)?)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
