//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (product grid)
//! GET  /health                 - Health check
//!
//! # Cart (form posts, redirect back)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add one unit (redirects to Referer)
//! POST /cart/update            - Set quantity (redirects to /cart)
//! POST /cart/remove            - Remove line (redirects to /cart)
//!
//! # Checkout
//! POST /checkout               - Simulated checkout (redirects to /cart)
//!
//! # Contact
//! GET  /contact                - Contact form
//! POST /contact                - Submit contact form
//!
//! # Anything else
//! *                            - 404
//! ```

pub mod cart;
pub mod contact;
pub mod home;
pub mod layout;

use axum::{
    Router,
    http::Uri,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
        .route("/contact", get(contact::show).post(contact::submit))
        .fallback(not_found)
}

/// Fallback for unknown paths.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
