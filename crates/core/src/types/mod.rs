//! Core types for the cart widget.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::Cart;
pub use id::ProductId;
pub use price::{Price, PriceError};
pub use product::{LineItem, Product, ProductDataError};
