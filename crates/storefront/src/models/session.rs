//! Session-related types.
//!
//! The session is the storefront's browser-scoped key-value store: each
//! browser gets its own slots, held in memory for the life of the process.

/// Session keys.
pub mod keys {
    /// Key holding the JSON-serialized cart.
    pub const CART: &str = cart_widget_core::CART_STORAGE_KEY;

    /// Key for one-shot notices shown on the next page render.
    pub const NOTICES: &str = "notices";
}
