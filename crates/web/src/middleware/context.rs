//! Per-request rendering context.
//!
//! [`RequestContext`] gathers what every page needs: the caller's identity,
//! the navigation built from the classification table, and the flash
//! messages queued by the previous request. Taking it out of the session
//! clears the queue; messages that are not rendered are written back when the
//! handler redirects.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::{resolve_identity, store_flash, take_flash};
use crate::db::ClassificationRepository;
use crate::error::{self, AppError, Result};
use crate::models::{Classification, FlashMessage};
use crate::services::auth::{AuthClaims, Identity};
use crate::state::AppState;
use crate::views::{self, AccountBadge, Layout};

/// Identity, navigation and flash for the current request.
pub struct RequestContext {
    session: Session,
    identity: Identity,
    classifications: Vec<Classification>,
    nav: String,
    flash: Vec<FlashMessage>,
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let identity = resolve_identity(parts, state);
        let classifications = ClassificationRepository::new(state.pool()).list().await?;
        let nav = views::navigation(&classifications)?;
        let flash = take_flash(&session).await?;

        Ok(Self {
            session,
            identity,
            classifications,
            nav,
            flash,
        })
    }
}

impl RequestContext {
    #[must_use]
    pub const fn claims(&self) -> Option<&AuthClaims> {
        self.identity.claims()
    }

    /// Classifications ordered by name, as used for the navigation.
    #[must_use]
    pub fn classifications(&self) -> &[Classification] {
        &self.classifications
    }

    /// Queue a message for the next rendered page.
    pub fn notice(&mut self, message: FlashMessage) {
        self.flash.push(message);
    }

    /// Layout for a rendered page. Drains the flash queue.
    pub fn layout(&mut self, title: impl Into<String>) -> Layout {
        Layout {
            title: title.into(),
            nav: self.nav.clone(),
            flash: std::mem::take(&mut self.flash),
            account: self.identity.claims().map(AccountBadge::from),
        }
    }

    /// 303 redirect; unrendered messages are saved for the next request.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn redirect(self, to: &str) -> Result<Response> {
        self.keep_flash().await?;
        Ok(Redirect::to(to).into_response())
    }

    /// Put unrendered messages back into the session, for responses that
    /// render no page.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn keep_flash(self) -> Result<()> {
        store_flash(&self.session, self.flash).await?;
        Ok(())
    }

    /// Queue a message and redirect.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn redirect_with(mut self, to: &str, message: FlashMessage) -> Result<Response> {
        self.notice(message);
        self.redirect(to).await
    }

    /// 404 page with the given message.
    #[must_use]
    pub fn not_found(mut self, message: &str) -> Response {
        error::error_page(
            StatusCode::NOT_FOUND,
            self.layout(error::status_title(StatusCode::NOT_FOUND)),
            message,
        )
    }

    /// 403 page for accounts without inventory rights.
    #[must_use]
    pub fn forbidden(mut self) -> Response {
        error::error_page(
            StatusCode::FORBIDDEN,
            self.layout(error::status_title(StatusCode::FORBIDDEN)),
            "You do not have permission to access this page.",
        )
    }
}
