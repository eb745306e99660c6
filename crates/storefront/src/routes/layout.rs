//! Data every page layout needs: the cart badge and pending notices.

use axum::http::{HeaderMap, header::REFERER};
use tower_sessions::Session;
use url::Url;

use crate::error::Result;
use crate::services::{cart, flash};

/// Shared layout data rendered by `base.html`.
#[derive(Clone, Debug, Default)]
pub struct PageChrome {
    /// Notices to show once, oldest first.
    pub notices: Vec<String>,
    /// Units in the cart, shown on the view-cart button.
    pub cart_count: u64,
}

impl PageChrome {
    /// Gather layout data for the session, consuming pending notices.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(session: &Session) -> Result<Self> {
        let notices = flash::take(session).await?;
        let cart_count = cart::current(session).await?.item_count();
        Ok(Self {
            notices,
            cart_count,
        })
    }
}

/// Path to send the shopper back to after a form post.
///
/// Uses the path and query of the `Referer` header, never its host, and
/// falls back to `fallback`.
#[must_use]
pub fn back_path(headers: &HeaderMap, fallback: &str) -> String {
    headers
        .get(REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| Url::parse(referer).ok())
        .map_or_else(
            || fallback.to_string(),
            |url| match url.query() {
                Some(query) => format!("{}?{query}", url.path()),
                None => url.path().to_string(),
            },
        )
}
