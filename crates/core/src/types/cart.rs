//! The cart collection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{LineItem, Price, ProductId};

/// An ordered list of line items, in the order they were first added.
///
/// Serializes as a bare JSON array, which is the persisted storage format.
/// The [`CartStore`](crate::CartStore) keeps ids unique; use
/// [`Cart::has_unique_ids`] to check data that came from elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub(crate) fn push(&mut self, item: LineItem) {
        self.items.push(item);
    }

    /// Remove the line for `id`, returning it if it was present.
    pub(crate) fn remove(&mut self, id: &str) -> Option<LineItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Sum of `price * quantity` over all lines. Zero for an empty cart.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Like [`total`](Self::total), but `None` if a subtotal or the sum
    /// does not fit in a `Decimal`.
    #[must_use]
    pub fn checked_total(&self) -> Option<Price> {
        self.items.iter().try_fold(Price::ZERO, |acc, line| {
            acc.checked_add(line.price.checked_times(line.quantity.get())?)
        })
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Whether every line has a distinct id.
    #[must_use]
    pub fn has_unique_ids(&self) -> bool {
        let mut seen: HashSet<&ProductId> = HashSet::with_capacity(self.items.len());
        self.items.iter().all(|item| seen.insert(&item.id))
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
