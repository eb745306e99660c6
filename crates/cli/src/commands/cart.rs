//! Cart commands.
//!
//! Each command loads the cart from the storage directory, runs one store
//! operation, and exits. Mutations re-render the cart table and print any
//! notice the store raises.

use std::io::Write;
use std::path::Path;

use cart_widget_core::{CartError, CartStore, Product, ProductDataError};
use thiserror::Error;

use crate::storage::FileStorage;
use crate::terminal::TerminalHost;

/// A cart store persisted to files and drawn on a terminal.
pub type TerminalStore<W> = CartStore<FileStorage, TerminalHost<W>>;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The product arguments do not describe a product.
    #[error("Invalid product: {0}")]
    InvalidProduct(#[from] ProductDataError),

    /// The saved cart could not be read. Delete the file to start over.
    #[error("Cannot read cart in {dir}: {source}")]
    Load {
        dir: String,
        #[source]
        source: CartError,
    },

    /// A cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Open the cart stored in `dir`, drawing to `out`.
///
/// # Errors
///
/// Returns [`CommandError::Load`] if the saved cart is unreadable.
pub fn open<W: Write>(dir: &Path, out: W) -> Result<TerminalStore<W>, CommandError> {
    CartStore::load(FileStorage::new(dir), TerminalHost::new(out)).map_err(|source| {
        CommandError::Load {
            dir: dir.display().to_string(),
            source,
        }
    })
}

/// Add one unit of a product.
pub fn add<W: Write>(
    store: &mut TerminalStore<W>,
    id: &str,
    name: &str,
    price: &str,
    image: &str,
) -> Result<(), CommandError> {
    let product = Product::from_dataset(Some(id), Some(name), Some(price), Some(image))?;
    store.add(product)?;
    Ok(())
}

pub fn remove<W: Write>(store: &mut TerminalStore<W>, id: &str) -> Result<(), CommandError> {
    store.remove(id)?;
    Ok(())
}

/// Set a line's quantity from raw user input. Zero or less removes the line.
pub fn set_quantity<W: Write>(
    store: &mut TerminalStore<W>,
    id: &str,
    quantity: &str,
) -> Result<(), CommandError> {
    store.set_quantity_input(id, quantity)?;
    Ok(())
}

pub fn show<W: Write>(store: &mut TerminalStore<W>) {
    store.render();
}

pub fn total<W: Write>(store: &mut TerminalStore<W>) {
    let total = store.total();
    store.host_mut().say(format_args!("Total: ${total}"));
}

/// Simulated checkout. An empty cart only prints the notice.
pub fn checkout<W: Write>(store: &mut TerminalStore<W>) -> Result<(), CommandError> {
    match store.checkout() {
        Ok(total) => {
            tracing::info!(%total, "checkout complete");
            Ok(())
        }
        Err(CartError::EmptyCart) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
