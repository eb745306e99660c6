//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::CatalogEntry;
use crate::error::Result;
use crate::filters;
use crate::routes::layout::PageChrome;
use crate::state::AppState;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    /// Exact amount submitted with the add-to-cart form, never rounded.
    pub price: String,
    /// Two-decimal amount shown to the shopper, e.g. "9.99".
    pub display_price: String,
    pub image: String,
    pub description: String,
}

impl From<&CatalogEntry> for ProductCardView {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            name: entry.name.clone(),
            price: entry.price.amount().to_string(),
            display_price: entry.price.to_string(),
            image: entry.image.clone(),
            description: entry.description.clone(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageChrome,
    pub products: Vec<ProductCardView>,
}

/// Display the home page with the product grid.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<HomeTemplate> {
    Ok(HomeTemplate {
        page: PageChrome::load(&session).await?,
        products: state
            .catalog()
            .entries()
            .iter()
            .map(ProductCardView::from)
            .collect(),
    })
}
