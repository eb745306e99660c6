//! Products and cart line items.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::{Price, PriceError, ProductId};

/// Errors raised when an add-to-cart trigger carries incomplete product data.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductDataError {
    /// A required attribute is absent or blank.
    #[error("add-to-cart trigger is missing `{0}`")]
    Missing(&'static str),
    /// The price attribute does not hold a valid price.
    #[error("add-to-cart trigger has an invalid price: {0}")]
    InvalidPrice(#[from] PriceError),
}

/// The product data an add-to-cart trigger supplies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image URI shown next to the line in the cart.
    pub image: String,
}

impl Product {
    /// Build a product from the raw attribute values of an add-to-cart button
    /// (`data-id`, `data-name`, `data-price`, `data-image`).
    ///
    /// Every attribute must be present and non-blank, and the price must parse.
    ///
    /// ```
    /// use cart_widget_core::{Product, ProductDataError};
    ///
    /// let p = Product::from_dataset(Some("p1"), Some("Widget"), Some("9.99"), Some("w.png")).unwrap();
    /// assert_eq!(p.price.to_string(), "9.99");
    ///
    /// let err = Product::from_dataset(Some("p1"), None, Some("9.99"), Some("w.png")).unwrap_err();
    /// assert_eq!(err, ProductDataError::Missing("name"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ProductDataError`] naming the first missing attribute, or the
    /// price parse failure.
    pub fn from_dataset(
        id: Option<&str>,
        name: Option<&str>,
        price: Option<&str>,
        image: Option<&str>,
    ) -> Result<Self, ProductDataError> {
        let id = required(id, "id")?;
        let name = required(name, "name")?;
        let price = required(price, "price")?;
        let image = required(image, "image")?;

        Ok(Self {
            id: ProductId::new(id),
            name: name.to_owned(),
            price: Price::parse(price)?,
            image: image.to_owned(),
        })
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ProductDataError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ProductDataError::Missing(field))
}

/// One product line in the cart.
///
/// `quantity` is never zero: a line whose quantity would drop to zero is
/// removed from the cart instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub quantity: NonZeroU32,
}

impl LineItem {
    /// A new line holding a single unit of `product`.
    #[must_use]
    pub fn single(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
            quantity: NonZeroU32::MIN,
        }
    }

    /// `price * quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity.get())
    }
}
