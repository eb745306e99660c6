//! The cart store.
//!
//! [`CartStore`] owns the [`Cart`] for the lifetime of a page (or command) and
//! bundles two side effects into every mutation: the whole cart is written back
//! to its storage slot, and the host is asked to re-render.
//!
//! ```
//! use cart_widget_core::{CartStore, HeadlessHost, MemoryStorage, Product};
//!
//! let mut store = CartStore::load(MemoryStorage::default(), HeadlessHost).unwrap();
//! let widget =
//!     Product::from_dataset(Some("p1"), Some("Widget"), Some("9.99"), Some("w.png")).unwrap();
//! store.add(widget.clone()).unwrap();
//! store.add(widget).unwrap();
//!
//! assert_eq!(store.cart().len(), 1);
//! assert_eq!(store.total().to_string(), "19.98");
//! ```

use core::num::NonZeroU32;

use tracing::{debug, instrument, warn};

use crate::notice::{CartHost, Notice};
use crate::storage::{CART_STORAGE_KEY, KeyValueStorage, StorageError};
use crate::types::{Cart, LineItem, Price, Product};

/// Errors returned by cart operations.
#[derive(thiserror::Error, Debug)]
pub enum CartError {
    /// Checkout was attempted on an empty cart.
    #[error("cart is empty")]
    EmptyCart,
    /// A quantity input did not start with an integer.
    #[error("invalid quantity: {0:?}")]
    InvalidQuantity(String),
    /// The persisted cart could not be read back.
    #[error("stored cart is corrupt: {0}")]
    CorruptState(String),
    /// The change would make a line subtotal or the cart total too large to
    /// represent.
    #[error("cart total would overflow")]
    AmountOverflow,
    /// The cart could not be serialized for storage.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[source] serde_json::Error),
    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Owns the cart and keeps its storage slot and host view in sync.
#[derive(Debug)]
pub struct CartStore<S, H> {
    cart: Cart,
    storage: S,
    host: H,
}

impl<S: KeyValueStorage, H: CartHost> CartStore<S, H> {
    /// Load the cart persisted in `storage`, or start empty if the slot is unset.
    ///
    /// Loading does not render; call [`render`](Self::render) once the host
    /// is ready.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CorruptState`] if the slot holds something other
    /// than a valid cart (including duplicate product ids), and
    /// [`CartError::Storage`] if the slot cannot be read.
    pub fn load(storage: S, host: H) -> Result<Self, CartError> {
        let cart = match storage.get_item(CART_STORAGE_KEY)? {
            Some(raw) => decode_cart(&raw)?,
            None => Cart::new(),
        };
        debug!(lines = cart.len(), "cart loaded");
        Ok(Self {
            cart,
            storage,
            host,
        })
    }

    /// Start from an empty cart regardless of what `storage` holds.
    ///
    /// Nothing is written until the first mutation.
    pub const fn empty(storage: S, host: H) -> Self {
        Self {
            cart: Cart::new(),
            storage,
            host,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give back the storage and host.
    pub fn into_parts(self) -> (S, H) {
        (self.storage, self.host)
    }

    /// Ask the host to render the current cart.
    pub fn render(&mut self) {
        self.host.render(&self.cart);
    }

    /// Add one unit of `product`.
    ///
    /// An existing line with the same id gets its quantity bumped; otherwise a
    /// new line is appended. The host is notified with the product name.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AmountOverflow`] (leaving the cart untouched) if
    /// the new total would not fit, or another [`CartError`] if the cart
    /// cannot be persisted.
    #[instrument(skip(self, product), fields(id = %product.id))]
    pub fn add(&mut self, product: Product) -> Result<(), CartError> {
        let name = product.name.clone();
        self.cart = self.staged(|cart| match cart.get_mut(product.id.as_str()) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => cart.push(LineItem::single(product)),
        })?;
        self.commit()?;
        self.host.notify(Notice::ItemAdded { name });
        Ok(())
    }

    /// Remove the line for `id`. Unknown ids leave the cart unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: &str) -> Result<(), CartError> {
        if self.cart.remove(id).is_none() {
            debug!("no line to remove");
        }
        self.commit()
    }

    /// Set the quantity of the line for `id`.
    ///
    /// A quantity of zero or less removes the line. Quantities above
    /// `u32::MAX` are clamped. Unknown ids leave the cart unchanged, but the
    /// cart is still persisted and rendered.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AmountOverflow`] (leaving the cart untouched) if
    /// the new total would not fit, or another [`CartError`] if the cart
    /// cannot be persisted.
    #[instrument(skip(self))]
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> Result<(), CartError> {
        match NonZeroU32::new(clamp_quantity(quantity)) {
            Some(quantity) => {
                self.cart = self.staged(|cart| {
                    if let Some(line) = cart.get_mut(id) {
                        line.quantity = quantity;
                    }
                })?;
            }
            None => {
                self.cart.remove(id);
            }
        }
        self.commit()
    }

    /// Set a quantity from raw user input, such as a number field.
    ///
    /// The input is read with [`parse_quantity`] semantics: leading whitespace
    /// and an optional sign, then digits; anything after the digits is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] (and leaves the cart untouched)
    /// if the input does not start with an integer.
    pub fn set_quantity_input(&mut self, id: &str, raw: &str) -> Result<(), CartError> {
        let Some(quantity) = parse_quantity(raw) else {
            warn!(id, raw, "ignoring non-numeric quantity");
            return Err(CartError::InvalidQuantity(raw.to_owned()));
        };
        self.set_quantity(id, quantity)
    }

    /// Sum of `price * quantity` over the cart.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Check out: report the total and empty the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] (after notifying the host) if there is
    /// nothing to buy; the cart is left as it was. Returns other
    /// [`CartError`]s if the emptied cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn checkout(&mut self) -> Result<Price, CartError> {
        if self.cart.is_empty() {
            self.host.notify(Notice::CartEmpty);
            return Err(CartError::EmptyCart);
        }

        let total = self.cart.total();
        let bought = core::mem::take(&mut self.cart);
        if let Err(e) = self.commit() {
            self.cart = bought;
            return Err(e);
        }
        self.host.notify(Notice::CheckoutComplete { total });
        debug!(%total, "checkout complete");
        Ok(total)
    }

    /// Apply `edit` to a copy of the cart, keeping it only if its total fits.
    fn staged(&self, edit: impl FnOnce(&mut Cart)) -> Result<Cart, CartError> {
        let mut next = self.cart.clone();
        edit(&mut next);
        if next.checked_total().is_none() {
            warn!("rejecting change: cart total would overflow");
            return Err(CartError::AmountOverflow);
        }
        Ok(next)
    }

    fn commit(&mut self) -> Result<(), CartError> {
        let raw = serde_json::to_string(&self.cart).map_err(CartError::Serialize)?;
        self.storage.set_item(CART_STORAGE_KEY, raw)?;
        self.host.render(&self.cart);
        Ok(())
    }
}

fn decode_cart(raw: &str) -> Result<Cart, CartError> {
    let cart: Cart =
        serde_json::from_str(raw).map_err(|e| CartError::CorruptState(e.to_string()))?;
    if !cart.has_unique_ids() {
        return Err(CartError::CorruptState(
            "duplicate product ids".to_string(),
        ));
    }
    if cart.checked_total().is_none() {
        return Err(CartError::CorruptState(
            "cart total overflows".to_string(),
        ));
    }
    Ok(cart)
}

fn clamp_quantity(quantity: i64) -> u32 {
    if quantity <= 0 {
        0
    } else {
        u32::try_from(quantity).unwrap_or(u32::MAX)
    }
}

/// Read a leading integer the way number inputs are read in the browser.
///
/// Skips leading whitespace, accepts one optional `+`/`-`, then takes digits
/// up to the first non-digit. Returns `None` when no digit follows.
///
/// ```
/// use cart_widget_core::parse_quantity;
///
/// assert_eq!(parse_quantity("3"), Some(3));
/// assert_eq!(parse_quantity("  -2"), Some(-2));
/// assert_eq!(parse_quantity("4.9"), Some(4));
/// assert_eq!(parse_quantity("7 units"), Some(7));
/// assert_eq!(parse_quantity("abc"), None);
/// assert_eq!(parse_quantity(""), None);
/// ```
#[must_use]
pub fn parse_quantity(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let mut seen_digit = false;
    let mut value: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
    }

    seen_digit.then_some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;

    /// Host that records everything the store asks of it.
    #[derive(Debug, Default)]
    struct RecordingHost {
        renders: usize,
        notices: Vec<Notice>,
    }

    impl CartHost for RecordingHost {
        fn render(&mut self, _cart: &Cart) {
            self.renders += 1;
        }

        fn notify(&mut self, notice: Notice) {
            self.notices.push(notice);
        }
    }

    fn widget() -> Product {
        Product::from_dataset(Some("p1"), Some("Widget"), Some("9.99"), Some("w.png")).unwrap()
    }

    fn gadget() -> Product {
        Product::from_dataset(Some("p2"), Some("Gadget"), Some("5"), Some("g.png")).unwrap()
    }

    /// Priced at `Decimal::MAX`: one unit fits, two do not.
    fn vault() -> Product {
        Product::from_dataset(
            Some("max"),
            Some("Vault"),
            Some("79228162514264337593543950335"),
            Some("v.png"),
        )
        .unwrap()
    }

    fn store() -> CartStore<MemoryStorage, RecordingHost> {
        CartStore::load(MemoryStorage::default(), RecordingHost::default()).unwrap()
    }

    fn persisted(store: &CartStore<MemoryStorage, RecordingHost>) -> Cart {
        let raw = store.storage.get_item(CART_STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_add_same_id_twice_bumps_quantity() {
        let mut store = store();
        store.add(widget()).unwrap();
        store.add(widget()).unwrap();

        assert_eq!(store.cart().len(), 1);
        let line = store.cart().get("p1").unwrap();
        assert_eq!(line.quantity.get(), 2);
        assert_eq!(line.name, "Widget");
        assert_eq!(store.total().to_string(), "19.98");
        assert_eq!(persisted(&store), *store.cart());
    }

    #[test]
    fn test_add_notifies_and_renders() {
        let mut store = store();
        store.add(widget()).unwrap();

        assert_eq!(store.host().renders, 1);
        assert_eq!(
            store.host().notices,
            [Notice::ItemAdded {
                name: "Widget".to_string()
            }]
        );
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut store = store();
        store.add(gadget()).unwrap();
        store.add(widget()).unwrap();
        store.add(gadget()).unwrap();

        let ids: Vec<&str> = store.cart().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["p2", "p1"]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = store();
        store.add(widget()).unwrap();
        let before = store.cart().clone();

        store.remove("nope").unwrap();

        assert_eq!(*store.cart(), before);
        assert_eq!(store.host().renders, 2);
    }

    #[test]
    fn test_remove_drops_line() {
        let mut store = store();
        store.add(widget()).unwrap();
        store.add(gadget()).unwrap();
        store.remove("p1").unwrap();

        assert!(store.cart().get("p1").is_none());
        assert_eq!(persisted(&store).len(), 1);
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        let mut store = store();
        store.add(widget()).unwrap();
        store.add(gadget()).unwrap();

        store.set_quantity("p1", 0).unwrap();
        assert!(store.cart().get("p1").is_none());

        store.set_quantity("p2", -3).unwrap();
        assert!(store.cart().is_empty());
        assert!(persisted(&store).is_empty());
    }

    #[test]
    fn test_set_quantity_updates_line() {
        let mut store = store();
        store.add(widget()).unwrap();
        store.set_quantity("p1", 5).unwrap();

        assert_eq!(store.cart().get("p1").unwrap().quantity.get(), 5);
        assert_eq!(store.total().to_string(), "49.95");
    }

    #[test]
    fn test_set_quantity_unknown_id_still_persists() {
        let mut store = store();
        store.set_quantity("ghost", 4).unwrap();

        assert!(store.cart().is_empty());
        assert_eq!(store.host().renders, 1);
        assert!(persisted(&store).is_empty());
    }

    #[test]
    fn test_set_quantity_clamps_huge_values() {
        let mut store = store();
        store.add(widget()).unwrap();
        store.set_quantity("p1", i64::MAX).unwrap();
        assert_eq!(store.cart().get("p1").unwrap().quantity.get(), u32::MAX);
    }

    #[test]
    fn test_set_quantity_input() {
        let mut store = store();
        store.add(widget()).unwrap();

        store.set_quantity_input("p1", "3").unwrap();
        assert_eq!(store.cart().get("p1").unwrap().quantity.get(), 3);

        let renders = store.host().renders;
        let err = store.set_quantity_input("p1", "lots").unwrap_err();
        assert!(matches!(err, CartError::InvalidQuantity(_)));
        assert_eq!(store.cart().get("p1").unwrap().quantity.get(), 3);
        assert_eq!(store.host().renders, renders);

        store.set_quantity_input("p1", "0").unwrap();
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_total_empty_is_zero() {
        assert_eq!(store().total(), Price::ZERO);
    }

    #[test]
    fn test_total_sums_lines() {
        let mut store = store();
        store.add(widget()).unwrap();
        store.add(gadget()).unwrap();
        store.add(gadget()).unwrap();
        assert_eq!(store.total().to_string(), "19.99");
    }

    #[test]
    fn test_checkout_empty_cart() {
        let mut store = store();
        let err = store.checkout().unwrap_err();

        assert!(matches!(err, CartError::EmptyCart));
        assert!(store.cart().is_empty());
        assert_eq!(store.host().notices, [Notice::CartEmpty]);
        assert_eq!(store.host().renders, 0);
        assert!(store.storage.get_item(CART_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_checkout_reports_total_and_clears() {
        let mut store = store();
        store.add(widget()).unwrap();
        store.add(widget()).unwrap();
        let expected = store.total();

        let total = store.checkout().unwrap();

        assert_eq!(total, expected);
        assert!(store.cart().is_empty());
        assert!(persisted(&store).is_empty());
        assert_eq!(
            store.host().notices.last(),
            Some(&Notice::CheckoutComplete { total: expected })
        );
    }

    #[test]
    fn test_checkout_persist_failure_keeps_quiet() {
        struct ReadOnly(String);

        impl KeyValueStorage for ReadOnly {
            fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
                Ok(Some(self.0.clone()))
            }

            fn set_item(&mut self, _key: &str, _value: String) -> Result<(), StorageError> {
                Err(StorageError::Unavailable("read-only".to_string()))
            }
        }

        let raw = r#"[{"id":"p1","name":"Widget","price":9.99,"image":"w.png","quantity":1}]"#;
        let mut store = CartStore::load(ReadOnly(raw.to_string()), RecordingHost::default()).unwrap();

        let err = store.checkout().unwrap_err();

        assert!(matches!(err, CartError::Storage(_)));
        assert_eq!(store.cart().len(), 1);
        assert!(store.host().notices.is_empty());
        assert_eq!(store.host().renders, 0);
    }

    #[test]
    fn test_add_rejects_overflowing_total() {
        let mut store = store();
        store.add(vault()).unwrap();

        let err = store.add(vault()).unwrap_err();

        assert!(matches!(err, CartError::AmountOverflow));
        assert_eq!(store.cart().get("max").unwrap().quantity.get(), 1);
        assert_eq!(persisted(&store), *store.cart());
        assert_eq!(store.host().renders, 1);
        assert_eq!(store.host().notices.len(), 1);
        assert_eq!(store.total().amount(), rust_decimal::Decimal::MAX);

        let err = store.add(widget()).unwrap_err();
        assert!(matches!(err, CartError::AmountOverflow));
        assert_eq!(store.cart().len(), 1);
    }

    #[test]
    fn test_set_quantity_rejects_overflowing_total() {
        let mut store = store();
        store.add(vault()).unwrap();

        let err = store.set_quantity("max", 2).unwrap_err();
        assert!(matches!(err, CartError::AmountOverflow));
        assert_eq!(store.cart().get("max").unwrap().quantity.get(), 1);

        store.set_quantity("max", 0).unwrap();
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_load_overflowing_cart_is_corrupt() {
        let raw = r#"[{"id":"max","name":"Vault","price":40000000000000000000000000000,"image":"v.png","quantity":2}]"#;
        let storage = MemoryStorage::with_item(CART_STORAGE_KEY, raw);
        let err = CartStore::load(storage, RecordingHost::default()).unwrap_err();
        assert!(matches!(err, CartError::CorruptState(_)));
    }

    #[test]
    fn test_reload_round_trip() {
        let mut store = store();
        store.add(widget()).unwrap();
        store.add(gadget()).unwrap();
        store.add(widget()).unwrap();
        let cart = store.cart().clone();

        let (storage, _) = store.into_parts();
        let reloaded = CartStore::load(storage, RecordingHost::default()).unwrap();

        assert_eq!(*reloaded.cart(), cart);
    }

    #[test]
    fn test_load_reads_browser_format() {
        let raw = r#"[{"id":"p1","name":"Widget","price":9.99,"image":"w.png","quantity":2}]"#;
        let store = CartStore::load(
            MemoryStorage::with_item(CART_STORAGE_KEY, raw),
            RecordingHost::default(),
        )
        .unwrap();

        assert_eq!(store.total().to_string(), "19.98");
        assert_eq!(store.host().renders, 0);
    }

    #[test]
    fn test_load_corrupt_state() {
        let result = CartStore::load(
            MemoryStorage::with_item(CART_STORAGE_KEY, "{not json"),
            RecordingHost::default(),
        );
        assert!(matches!(result, Err(CartError::CorruptState(_))));
    }

    #[test]
    fn test_load_duplicate_ids_is_corrupt() {
        let raw = r#"[
            {"id":"p1","name":"Widget","price":1,"image":"w.png","quantity":1},
            {"id":"p1","name":"Widget","price":1,"image":"w.png","quantity":1}
        ]"#;
        let result = CartStore::load(
            MemoryStorage::with_item(CART_STORAGE_KEY, raw),
            RecordingHost::default(),
        );
        assert!(matches!(result, Err(CartError::CorruptState(_))));
    }

    #[test]
    fn test_parse_quantity_edge_cases() {
        assert_eq!(parse_quantity("+8"), Some(8));
        assert_eq!(parse_quantity("-"), None);
        assert_eq!(parse_quantity(" 0012"), Some(12));
        assert_eq!(parse_quantity("99999999999999999999999"), Some(i64::MAX));
    }
}
