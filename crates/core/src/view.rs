//! Display projection of a cart.
//!
//! Hosts turn a [`Cart`] into a [`CartView`] and lay it out however they
//! like. Money is rounded to two decimals here and nowhere else.

use crate::types::{Cart, LineItem};

/// One rendered cart row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRowView {
    pub id: String,
    pub name: String,
    pub image: String,
    /// Unit price, e.g. "9.99".
    pub price: String,
    pub quantity: u32,
    /// Quantity the "-" control sets. Zero removes the line.
    pub decrement_to: u32,
    /// Quantity the "+" control sets.
    pub increment_to: u64,
    /// `price * quantity`, e.g. "19.98".
    pub subtotal: String,
}

impl From<&LineItem> for CartRowView {
    fn from(line: &LineItem) -> Self {
        let quantity = line.quantity.get();
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            image: line.image.clone(),
            price: line.price.to_string(),
            quantity,
            decrement_to: quantity - 1,
            increment_to: u64::from(quantity) + 1,
            subtotal: line.subtotal().to_string(),
        }
    }
}

/// The whole cart as displayed: rows plus grand total.
///
/// ```
/// use cart_widget_core::{Cart, CartView};
///
/// let view = CartView::from(&Cart::new());
/// assert!(view.is_empty());
/// assert_eq!(view.total, "0.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub rows: Vec<CartRowView>,
    /// Grand total, e.g. "19.98".
    pub total: String,
    /// Units across all rows, for the cart badge.
    pub item_count: u64,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            rows: cart.iter().map(CartRowView::from).collect(),
            total: cart.total().to_string(),
            item_count: cart.item_count(),
        }
    }
}
