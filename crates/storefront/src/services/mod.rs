//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Cart store operations against the session slot
//! - `flash` - One-shot notices shown after a redirect

pub mod cart;
pub mod flash;
