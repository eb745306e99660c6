//! Cart operations against the session slot.
//!
//! Each request snapshots the session's cart slot into a [`MemoryStorage`],
//! runs one [`CartStore`] operation, and writes the slot back if the store
//! persisted anything. Notices raised by the store become flash messages.

use tower_sessions::Session;
use tracing::{debug, warn};

use cart_widget_core::{
    CART_STORAGE_KEY, Cart, CartError, CartHost, CartStore, MemoryStorage, Notice,
};

use crate::error::AppError;
use crate::models::session_keys;
use crate::services::flash;

/// Cart store bound to a request's session snapshot.
pub type SessionCartStore = CartStore<MemoryStorage, SessionHost>;

/// Host for a single request: records renders and collects notices.
#[derive(Debug, Default)]
pub struct SessionHost {
    renders: usize,
    notices: Vec<Notice>,
}

impl SessionHost {
    /// Whether the store persisted (and so re-rendered) during the request.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.renders > 0
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}

impl CartHost for SessionHost {
    fn render(&mut self, cart: &Cart) {
        self.renders += 1;
        debug!(lines = cart.len(), total = %cart.total(), "cart re-rendered");
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// Open the store for the session's cart.
///
/// A corrupt slot is logged and replaced by an empty cart on the next write.
///
/// # Errors
///
/// Returns [`AppError::Session`] if the session store fails.
pub async fn open(session: &Session) -> Result<SessionCartStore, AppError> {
    let storage = session
        .get::<String>(session_keys::CART)
        .await?
        .map_or_else(MemoryStorage::default, |raw| {
            MemoryStorage::with_item(CART_STORAGE_KEY, raw)
        });

    match CartStore::load(storage, SessionHost::default()) {
        Ok(store) => Ok(store),
        Err(CartError::CorruptState(reason)) => {
            warn!(%reason, "discarding corrupt cart from session");
            Ok(CartStore::empty(
                MemoryStorage::default(),
                SessionHost::default(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// Read the session's cart without changing it.
///
/// # Errors
///
/// Returns [`AppError::Session`] if the session store fails.
pub async fn current(session: &Session) -> Result<Cart, AppError> {
    Ok(open(session).await?.cart().clone())
}

/// Run one store operation and write the results back to the session.
///
/// # Errors
///
/// Returns the operation's [`CartError`] (as [`AppError::Cart`]) or a session
/// failure. On error nothing is written back.
pub async fn apply<T, F>(session: &Session, op: F) -> Result<T, AppError>
where
    F: FnOnce(&mut SessionCartStore) -> Result<T, CartError>,
{
    let mut store = open(session).await?;
    let result = op(&mut store)?;
    save(session, store).await?;
    Ok(result)
}

async fn save(session: &Session, store: SessionCartStore) -> Result<(), AppError> {
    let (mut storage, host) = store.into_parts();

    if host.is_dirty() {
        if let Some(raw) = storage.take_item(CART_STORAGE_KEY) {
            session.insert(session_keys::CART, raw).await?;
        }
    }

    flash::push(session, host.notices).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cart_widget_core::Product;
    use tower_sessions::MemoryStore;

    fn widget() -> Product {
        Product::from_dataset(Some("p1"), Some("Widget"), Some("9.99"), Some("w.png")).unwrap()
    }

    fn memory_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn test_session_host_tracks_renders_and_notices() {
        let mut store = CartStore::load(MemoryStorage::default(), SessionHost::default()).unwrap();
        assert!(!store.host().is_dirty());

        store.add(widget()).unwrap();

        assert!(store.host().is_dirty());
        assert_eq!(store.host().notices().len(), 1);
    }

    #[test]
    fn test_empty_checkout_leaves_host_clean() {
        let mut store = CartStore::load(MemoryStorage::default(), SessionHost::default()).unwrap();
        assert!(store.checkout().is_err());
        assert!(!store.host().is_dirty());
        assert_eq!(store.host().notices(), [Notice::CartEmpty]);
    }

    #[tokio::test]
    async fn test_corrupt_session_cart_starts_empty() {
        let session = memory_session();
        session.insert(session_keys::CART, "{not json").await.unwrap();

        let store = open(&session).await.unwrap();
        assert!(store.cart().is_empty());

        apply(&session, |store| store.add(widget())).await.unwrap();

        let raw: String = session.get(session_keys::CART).await.unwrap().unwrap();
        let cart: Cart = serde_json::from_str(&raw).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total().to_string(), "9.99");
        assert_eq!(
            flash::take(&session).await.unwrap(),
            ["Widget has been added to the cart!"]
        );
    }

    #[tokio::test]
    async fn test_failed_operation_writes_nothing() {
        let session = memory_session();

        let result = apply(&session, SessionCartStore::checkout).await;

        assert!(matches!(result, Err(AppError::Cart(CartError::EmptyCart))));
        assert_eq!(session.get::<String>(session_keys::CART).await.unwrap(), None);
        assert!(flash::take(&session).await.unwrap().is_empty());
    }
}
