//! Cart Widget CLI - The cart store driven from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add one unit of a product
//! cart add --id p1 --name Widget --price 9.99 --image /static/images/widget.svg
//!
//! # Change or clear a quantity
//! cart set-quantity p1 3
//! cart set-quantity p1 0
//!
//! # Inspect and check out
//! cart show
//! cart total
//! cart checkout
//! ```
//!
//! The cart is kept in `<storage-dir>/cart.json`, in the same JSON layout the
//! storefront keeps in its session.
//!
//! # Environment Variables
//!
//! - `CART_STORAGE_DIR` - Directory holding the cart file (default `.cart`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod storage;
mod terminal;

#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about = "Cart widget command line")]
struct Cli {
    /// Directory holding the cart file
    #[arg(long, env = "CART_STORAGE_DIR", default_value = ".cart", global = true)]
    storage_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        /// Unit price, e.g. 9.99
        #[arg(long)]
        price: String,
        /// Image URL
        #[arg(long)]
        image: String,
    },
    /// Remove a product line
    Remove { id: String },
    /// Set a line's quantity (zero or less removes it)
    SetQuantity {
        id: String,
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    /// Show the cart
    Show,
    /// Print the cart total
    Total,
    /// Check out and empty the cart
    Checkout,
}

fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never mix with the cart table
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cart_widget_cli=warn,cart_widget_core=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use commands::cart;

    let mut store = cart::open(&cli.storage_dir, io::stdout().lock())?;
    match cli.command {
        Commands::Add {
            id,
            name,
            price,
            image,
        } => cart::add(&mut store, &id, &name, &price, &image)?,
        Commands::Remove { id } => cart::remove(&mut store, &id)?,
        Commands::SetQuantity { id, quantity } => cart::set_quantity(&mut store, &id, &quantity)?,
        Commands::Show => cart::show(&mut store),
        Commands::Total => cart::total(&mut store),
        Commands::Checkout => cart::checkout(&mut store)?,
    }
    Ok(())
}
