//! User-facing notices and the host that displays them.

use core::fmt;

use crate::types::{Cart, Price};

/// A message the cart wants shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A product was added (or its quantity bumped).
    ItemAdded { name: String },
    /// Checkout was attempted with nothing in the cart.
    CartEmpty,
    /// Checkout went through for `total`.
    CheckoutComplete { total: Price },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ItemAdded { name } => write!(f, "{name} has been added to the cart!"),
            Self::CartEmpty => {
                f.write_str("Your cart is empty. Add some products before checking out.")
            }
            Self::CheckoutComplete { total } => {
                write!(f, "Total to pay: {}. Thank you for your purchase!", total.display())
            }
        }
    }
}

/// The page (or terminal) hosting the cart.
///
/// The store calls [`render`](CartHost::render) after every mutation so the
/// host can resync its view, and [`notify`](CartHost::notify) for messages.
pub trait CartHost {
    fn render(&mut self, cart: &Cart);
    fn notify(&mut self, notice: Notice);
}

/// A host that drops everything. Useful for batch jobs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessHost;

impl CartHost for HeadlessHost {
    fn render(&mut self, _cart: &Cart) {}

    fn notify(&mut self, notice: Notice) {
        tracing::debug!(%notice, "notice dropped by headless host");
    }
}

impl<H: CartHost + ?Sized> CartHost for &mut H {
    fn render(&mut self, cart: &Cart) {
        (**self).render(cart);
    }

    fn notify(&mut self, notice: Notice) {
        (**self).notify(notice);
    }
}
