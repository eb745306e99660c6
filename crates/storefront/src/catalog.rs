//! Product catalog shown on the home page.
//!
//! The catalog is a JSON array of products read once at startup:
//!
//! ```json
//! [
//!   {
//!     "id": "p1",
//!     "name": "Widget",
//!     "price": 9.99,
//!     "image": "/static/images/widget.svg",
//!     "description": "A very useful widget."
//!   }
//! ]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use cart_widget_core::{Price, ProductId};

/// Errors loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id in catalog: {0}")]
    DuplicateId(ProductId),
}

/// A product listed in the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    #[serde(default)]
    pub description: String,
}


/// All products offered by the storefront, in display order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from entries.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two entries share an id.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(&entry.id) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Parse a catalog from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the JSON is malformed or ids repeat.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(raw)?)
    }

    /// Load the catalog file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(products = catalog.len(), path = %path.display(), "catalog loaded");
        Ok(catalog)
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
