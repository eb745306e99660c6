//! Contact form route handlers.
//!
//! The storefront has no mail backend: a valid submission is logged and
//! acknowledged, and the shopper gets a fresh form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::routes::layout::PageChrome;
use crate::services::flash;

/// Shown after a successful submission.
pub const MESSAGE_SENT: &str = "Message sent successfully! We will get back to you soon.";

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub page: PageChrome,
}

/// Display the contact page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<ContactTemplate> {
    Ok(ContactTemplate {
        page: PageChrome::load(&session).await?,
    })
}

/// Accept a contact form submission.
#[instrument(skip(session, form), fields(email = %form.email))]
pub async fn submit(session: Session, Form(form): Form<ContactForm>) -> Result<Redirect> {
    let notice = match validate(&form) {
        Ok(()) => {
            tracing::info!(
                name = %form.name.trim(),
                message_len = form.message.trim().len(),
                "contact message received"
            );
            MESSAGE_SENT
        }
        Err(reason) => reason,
    };

    flash::push(&session, [notice]).await?;
    Ok(Redirect::to("/contact"))
}

/// Check required fields, returning the message to show on failure.
fn validate(form: &ContactForm) -> std::result::Result<(), &'static str> {
    if form.name.trim().is_empty() || form.message.trim().is_empty() {
        return Err("Name and message are required.");
    }
    if !is_valid_email(form.email.trim()) {
        return Err("Please enter a valid email address.");
    }
    Ok(())
}

/// Basic email validation.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let Some(local) = parts.next() else {
        return false;
    };
    let Some(domain) = parts.next() else {
        return false;
    };
    !local.is_empty() && !domain.is_empty() && domain.contains('.')
}
