//! One-shot notices carried across a redirect.
//!
//! Handlers push messages after a POST; the next page render takes them out of
//! the session and shows them once.

use tower_sessions::Session;

use crate::models::session_keys;

/// Append messages to the session's pending notices.
///
/// # Errors
///
/// Returns the session error if the store cannot be read or written.
pub async fn push<I>(session: &Session, messages: I) -> Result<(), tower_sessions::session::Error>
where
    I: IntoIterator,
    I::Item: ToString,
{
    let mut fresh: Vec<String> = messages.into_iter().map(|m| m.to_string()).collect();
    if fresh.is_empty() {
        return Ok(());
    }

    let mut pending = session
        .get::<Vec<String>>(session_keys::NOTICES)
        .await?
        .unwrap_or_default();
    pending.append(&mut fresh);
    session.insert(session_keys::NOTICES, pending).await
}

/// Take all pending notices out of the session.
///
/// # Errors
///
/// Returns the session error if the store cannot be read or written.
pub async fn take(session: &Session) -> Result<Vec<String>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<String>>(session_keys::NOTICES)
        .await?
        .unwrap_or_default())
}
