//! Authentication extractors.
//!
//! The auth cookie is verified at most once per request; the resulting
//! [`Identity`] is cached in the request extensions. Put these extractors
//! before [`RequestContext`] in handler arguments so a rejection's flash
//! message survives to the login page.

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::Span;

use super::{RequestContext, push_flash};
use crate::error::AppError;
use crate::models::FlashMessage;
use crate::services::auth::token::token_from_cookie_header;
use crate::services::auth::{AuthClaims, Identity};
use crate::state::AppState;

/// Path unauthenticated visitors are sent to.
pub const LOGIN_PATH: &str = "/account/login";

/// Resolve the request's identity from the auth cookie.
///
/// Records the account ID in the request span when signed in.
pub fn resolve_identity(parts: &mut Parts, state: &AppState) -> Identity {
    if let Some(identity) = parts.extensions.get::<Identity>() {
        return identity.clone();
    }

    let identity = parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(token_from_cookie_header)
        .map_or(Identity::Anonymous, |token| state.tokens().verify(&token));

    if let Some(claims) = identity.claims() {
        Span::current().record("account_id", claims.account_id().as_i32());
    }

    parts.extensions.insert(identity.clone());
    identity
}

/// Extractor that requires a signed-in account.
///
/// Anonymous visitors are redirected to the login page with a notice.
pub struct RequireAuth(pub AuthClaims);

/// Extractor that requires an `Employee` or `Admin` account.
///
/// Anonymous visitors are redirected to log in; signed-in clients get 403.
pub struct RequireEmployee(pub AuthClaims);

/// Rejection for the auth extractors.
pub enum AuthRejection {
    /// Redirect to the login page (notice already queued).
    RedirectToLogin,
    /// Rendered 403 page.
    Forbidden(Response),
    /// The rejection itself could not be produced.
    Failed(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Forbidden(response) => response,
            Self::Failed(e) => e.into_response(),
        }
    }
}

async fn login_required(parts: &Parts) -> AuthRejection {
    let Some(session) = parts.extensions.get::<Session>() else {
        return AuthRejection::Failed(AppError::Internal("session layer missing".to_string()));
    };

    match push_flash(session, FlashMessage::error("Please log in.")).await {
        Ok(()) => AuthRejection::RedirectToLogin,
        Err(e) => AuthRejection::Failed(e.into()),
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_identity(parts, state) {
            Identity::Account(claims) => Ok(Self(claims)),
            Identity::Anonymous => Err(login_required(parts).await),
        }
    }
}

impl FromRequestParts<AppState> for RequireEmployee {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_identity(parts, state) {
            Identity::Account(claims) if claims.can_manage_inventory() => Ok(Self(claims)),
            Identity::Account(claims) => {
                tracing::warn!(
                    account_id = %claims.account_id(),
                    path = %parts.uri.path(),
                    "Client account denied inventory management"
                );
                let ctx = RequestContext::from_request_parts(parts, state)
                    .await
                    .map_err(AuthRejection::Failed)?;
                Err(AuthRejection::Forbidden(ctx.forbidden()))
            }
            Identity::Anonymous => Err(login_required(parts).await),
        }
    }
}
