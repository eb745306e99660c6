//! Terminal host: draws the cart as a table and prints notices.

use std::fmt::Display;
use std::io::{self, Write};

use cart_widget_core::{Cart, CartHost, CartView, Notice};

/// Writes cart views and notices to `out`.
#[derive(Debug)]
pub struct TerminalHost<W> {
    out: W,
}

impl<W: Write> TerminalHost<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print one line of free-form output.
    pub fn say(&mut self, line: impl Display) {
        if let Err(e) = writeln!(self.out, "{line}") {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }

    fn write_cart(&mut self, cart: &Cart) -> io::Result<()> {
        let view = CartView::from(cart);
        if view.is_empty() {
            writeln!(self.out, "Your cart is empty.")?;
        } else {
            writeln!(
                self.out,
                "{:<12} {:<24} {:>5} {:>10} {:>11}",
                "ID", "NAME", "QTY", "PRICE", "SUBTOTAL"
            )?;
            for row in &view.rows {
                writeln!(
                    self.out,
                    "{:<12} {:<24} {:>5} ${:>9} ${:>10}",
                    row.id, row.name, row.quantity, row.price, row.subtotal,
                )?;
            }
        }
        writeln!(self.out, "Total: ${}", view.total)?;
        self.out.flush()
    }
}

impl<W: Write> CartHost for TerminalHost<W> {
    fn render(&mut self, cart: &Cart) {
        if let Err(e) = self.write_cart(cart) {
            tracing::warn!(error = %e, "failed to render cart");
        }
    }

    fn notify(&mut self, notice: Notice) {
        self.say(notice);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cart_widget_core::{CartStore, MemoryStorage, Product};

    fn output(host: TerminalHost<Vec<u8>>) -> String {
        String::from_utf8(host.into_inner()).unwrap()
    }

    #[test]
    fn test_renders_empty_cart() {
        let mut host = TerminalHost::new(Vec::new());
        host.render(&Cart::new());
        assert_eq!(output(host), "Your cart is empty.\nTotal: $0.00\n");
    }

    #[test]
    fn test_renders_rows_and_notices() {
        let mut store =
            CartStore::load(MemoryStorage::default(), TerminalHost::new(Vec::new())).unwrap();
        let widget =
            Product::from_dataset(Some("p1"), Some("Widget"), Some("9.99"), Some("w.png"))
                .unwrap();
        store.add(widget).unwrap();

        let (_, host) = store.into_parts();
        let text = output(host);
        assert!(text.contains("Widget has been added to the cart!"));
        assert!(text.contains("p1           Widget"));
        assert!(text.ends_with("Widget has been added to the cart!\n"));
        assert!(text.contains("Total: $9.99\n"));
    }
}
