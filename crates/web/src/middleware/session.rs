//! Session middleware configuration and the flash queue.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions. The session carries
//! nothing but pending flash messages; identity lives in the auth token.

use sqlx::SqlitePool;
use tower_sessions::{Expiry, Session, SessionManagerLayer, session};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::MotorsConfig;
use crate::models::{FlashMessage, session_keys};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "cse_session";

/// Session expiry time in seconds (1 day of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with `SQLite` store.
///
/// The session table is created by [`crate::db::migrate`].
#[must_use]
pub fn create_session_layer(
    pool: &SqlitePool,
    config: &MotorsConfig,
) -> SessionManagerLayer<SqliteStore> {
    let store = SqliteStore::new(pool.clone());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.secure_cookies())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Append one message to the pending flash queue.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn push_flash(session: &Session, message: FlashMessage) -> Result<(), session::Error> {
    let mut queue: Vec<FlashMessage> = session.get(session_keys::FLASH).await?.unwrap_or_default();
    queue.push(message);
    session.insert(session_keys::FLASH, queue).await
}

/// Append several messages to the pending flash queue.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn store_flash(
    session: &Session,
    messages: Vec<FlashMessage>,
) -> Result<(), session::Error> {
    if messages.is_empty() {
        return Ok(());
    }
    let mut queue: Vec<FlashMessage> = session.get(session_keys::FLASH).await?.unwrap_or_default();
    queue.extend(messages);
    session.insert(session_keys::FLASH, queue).await
}

/// Remove and return every pending flash message.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn take_flash(session: &Session) -> Result<Vec<FlashMessage>, session::Error> {
    Ok(session
        .remove::<Vec<FlashMessage>>(session_keys::FLASH)
        .await?
        .unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db;

    async fn session() -> Session {
        let pool = db::connect_in_memory().await.unwrap();
        Session::new(None, Arc::new(SqliteStore::new(pool)), None)
    }

    #[tokio::test]
    async fn test_flash_is_taken_once() {
        let session = session().await;
        push_flash(&session, FlashMessage::notice("first")).await.unwrap();
        push_flash(&session, FlashMessage::error("second")).await.unwrap();

        let taken = take_flash(&session).await.unwrap();
        assert_eq!(
            taken,
            vec![FlashMessage::notice("first"), FlashMessage::error("second")]
        );
        assert!(take_flash(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_flash_appends() {
        let session = session().await;
        push_flash(&session, FlashMessage::notice("kept")).await.unwrap();
        store_flash(&session, vec![FlashMessage::notice("added")])
            .await
            .unwrap();

        assert_eq!(take_flash(&session).await.unwrap().len(), 2);
    }
}
