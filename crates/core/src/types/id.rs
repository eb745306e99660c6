//! Product identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a product, and the identity key of a cart line item.
///
/// Product ids come from the storefront markup (`data-id`) and are opaque
/// strings. Two line items with the same `ProductId` never coexist in a cart.
///
/// ```
/// use cart_widget_core::ProductId;
///
/// let id = ProductId::new("p1");
/// assert_eq!(id.as_str(), "p1");
/// assert_eq!(id, "p1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ProductId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProductId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_string() {
        let id = ProductId::new("p1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"p1\"");
        let back: ProductId = serde_json::from_str("\"p1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductId::from("sku-42").to_string(), "sku-42");
    }
}
