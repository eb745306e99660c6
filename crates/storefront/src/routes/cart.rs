//! Cart route handlers.
//!
//! Every mutation is a plain form post that runs one cart store operation
//! against the session slot and redirects (post/redirect/get). Notices raised
//! by the store are shown on the page the shopper lands on.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, http::HeaderMap, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use cart_widget_core::{CartError, CartView, Product};

use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::layout::{PageChrome, back_path};
use crate::services::cart;

/// Add to cart form data.
///
/// Fields mirror the `data-*` attributes of the add-to-cart button. They are
/// optional here so that a button with missing data is reported, not rejected
/// by the extractor.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    /// Raw input value; read like a browser number field.
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageChrome,
    pub cart: CartView,
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<CartShowTemplate> {
    let page = PageChrome::load(&session).await?;
    let cart = CartView::from(&cart::current(&session).await?);
    Ok(CartShowTemplate { page, cart })
}

/// Add one unit of a product, then go back to the page the button was on.
#[instrument(skip(session, headers))]
pub async fn add(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let product = Product::from_dataset(
        form.id.as_deref(),
        form.name.as_deref(),
        form.price.as_deref(),
        form.image.as_deref(),
    )
    .map_err(|e| {
        tracing::error!(error = %e, "add-to-cart button is missing product data");
        AppError::BadRequest(e.to_string())
    })?;

    cart::apply(&session, |store| store.add(product)).await?;
    Ok(Redirect::to(&back_path(&headers, "/")))
}

/// Set a line's quantity. Zero or less removes the line.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Redirect> {
    cart::apply(&session, |store| {
        match store.set_quantity_input(&form.id, &form.quantity) {
            // The store already logged it; the page just shows the old quantity.
            Err(CartError::InvalidQuantity(_)) => Ok(()),
            other => other,
        }
    })
    .await?;
    Ok(Redirect::to("/cart"))
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    cart::apply(&session, |store| store.remove(&form.id)).await?;
    Ok(Redirect::to("/cart"))
}

/// Simulated checkout: report the total and empty the cart.
///
/// An empty cart is not an error here; the store's notice tells the shopper.
#[instrument(skip(session))]
pub async fn checkout(session: Session) -> Result<Redirect> {
    cart::apply(&session, |store| match store.checkout() {
        Ok(total) => {
            tracing::info!(%total, "checkout complete");
            Ok(())
        }
        Err(CartError::EmptyCart) => Ok(()),
        Err(e) => Err(e),
    })
    .await?;
    Ok(Redirect::to("/cart"))
}
