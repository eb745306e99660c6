//! Cart Widget Core - cart store and shared types.
//!
//! This crate holds everything the storefront and the CLI share:
//! - [`types`] - Product ids, prices, line items and the cart collection
//! - [`store`] - The cart store: add, remove, set quantity, total, checkout
//! - [`storage`] - The key-value slot the cart persists into
//! - [`notice`] - Messages for the shopper and the host trait that shows them
//! - [`view`] - Display projection used by every renderer
//!
//! # Architecture
//!
//! The core crate does no I/O of its own. Hosts hand the store a
//! [`KeyValueStorage`] (session slot, file directory, memory) and a
//! [`CartHost`] (web page, terminal), and the store drives both.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod notice;
pub mod storage;
pub mod store;
pub mod types;
pub mod view;

pub use notice::{CartHost, HeadlessHost, Notice};
pub use storage::{CART_STORAGE_KEY, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{CartError, CartStore, parse_quantity};
pub use types::*;
pub use view::{CartRowView, CartView};
