//! Integration tests for the cart widget storefront.
//!
//! Each test starts the storefront router in-process on an ephemeral port
//! and drives it over HTTP with a cookie-keeping client, the way a browser
//! would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cart-widget-integration-tests
//! ```

use std::path::Path;

use reqwest::{Client, Response, StatusCode};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use cart_widget_storefront::catalog::Catalog;
use cart_widget_storefront::config::StorefrontConfig;
use cart_widget_storefront::state::AppState;

/// Catalog used by the tests.
pub const TEST_CATALOG: &str = r#"[
    {"id": "p1", "name": "Widget", "price": 9.99, "image": "/static/images/widget.svg"},
    {"id": "p2", "name": "Gadget", "price": 24.50, "image": "/static/images/gadget.svg"}
]"#;

const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/static");

/// A running storefront plus a client with its own cookie jar.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Start a storefront with [`TEST_CATALOG`].
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn new() -> Self {
        let catalog = Catalog::from_json(TEST_CATALOG).expect("Invalid test catalog");
        let state = AppState::new(StorefrontConfig::default(), catalog);
        let app = cart_widget_storefront::app(state, Path::new(STATIC_DIR));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                panic!("Test server failed: {e}");
            }
        });

        Self {
            client: new_client(),
            base_url: format!("http://{addr}"),
            server,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and return status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        read(self.client.get(self.url(path)).send().await).await
    }

    /// POST a form to `path`, following the redirect, and return the final
    /// status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> (StatusCode, String) {
        read(self.client.post(self.url(path)).form(form).send().await).await
    }

    /// Add one unit of a catalog product via its add-to-cart form.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the product is unknown.
    pub async fn add_to_cart(&self, id: &str) -> (StatusCode, String) {
        let (name, price, image) = match id {
            "p1" => ("Widget", "9.99", "/static/images/widget.svg"),
            "p2" => ("Gadget", "24.50", "/static/images/gadget.svg"),
            other => panic!("unknown test product {other}"),
        };
        self.post_form(
            "/cart/add",
            &[("id", id), ("name", name), ("price", price), ("image", image)],
        )
        .await
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// A client with its own cookie jar, i.e. a separate shopper.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

async fn read(result: reqwest::Result<Response>) -> (StatusCode, String) {
    let resp = result.expect("Request failed");
    let status = resp.status();
    let body = resp.text().await.expect("Failed to read response");
    (status, body)
}
