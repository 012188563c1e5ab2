//! Signed auth tokens and the cookie that carries them.
//!
//! The token is the single source of identity: a request is either
//! [`Identity::Anonymous`] or carries verified [`AuthClaims`]. Invalid,
//! tampered and expired tokens all resolve to anonymous.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};

use cse_motors_core::{AccountId, AccountType};

use super::TokenError;
use crate::models::Account;

/// Auth cookie name.
pub const AUTH_COOKIE_NAME: &str = "cse_auth";

/// Token and cookie lifetime in seconds (1 hour).
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Claims carried by the auth token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    pub sub: AccountId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub account_type: AccountType,
    pub iat: i64,
    pub exp: i64,
}

impl AuthClaims {
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        self.sub
    }

    #[must_use]
    pub const fn can_manage_inventory(&self) -> bool {
        self.account_type.can_manage_inventory()
    }
}

/// Who is making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    Account(AuthClaims),
}

impl Identity {
    #[must_use]
    pub const fn claims(&self) -> Option<&AuthClaims> {
        match self {
            Self::Anonymous => None,
            Self::Account(claims) => Some(claims),
        }
    }
}

/// HS256 signing and verification keys derived from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a one-hour token for an account.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encode` if signing fails.
    pub fn issue(&self, account: &Account) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = AuthClaims {
            sub: account.id,
            email: account.email.as_str().to_owned(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            account_type: account.account_type,
            iat: now,
            exp: now + TOKEN_TTL_SECONDS,
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &AuthClaims) -> Result<String, TokenError> {
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding,
        )?)
    }

    /// Verify a token. Anything that fails verification is anonymous.
    #[must_use]
    pub fn verify(&self, token: &str) -> Identity {
        match jsonwebtoken::decode::<AuthClaims>(token, &self.decoding, &self.validation) {
            Ok(data) => Identity::Account(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected auth token");
                Identity::Anonymous
            }
        }
    }
}

/// Build the `Set-Cookie` value carrying a freshly issued token.
#[must_use]
pub fn auth_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(TOKEN_TTL_SECONDS))
        .build()
}

/// Build the `Set-Cookie` value that removes the auth cookie.
#[must_use]
pub fn clear_auth_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

/// Find the auth token in a `Cookie` request header value.
#[must_use]
pub fn token_from_cookie_header(header: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|c| c.name() == AUTH_COOKIE_NAME)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cse_motors_core::Email;

    fn keys() -> TokenKeys {
        TokenKeys::new(&SecretString::from("k8$Vq2!zR7#mW4@pL9^tY6&uB3*eN5%c"))
    }

    fn account(account_type: AccountType) -> Account {
        Account {
            id: AccountId::new(7),
            first_name: "Basic".to_owned(),
            last_name: "Client".to_owned(),
            email: Email::parse("basic@example.com").unwrap(),
            account_type,
            profile_image: None,
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let keys = keys();
        let token = keys.issue(&account(AccountType::Employee)).unwrap();

        let Identity::Account(claims) = keys.verify(&token) else {
            panic!("expected an authenticated identity");
        };
        assert_eq!(claims.account_id(), AccountId::new(7));
        assert_eq!(claims.first_name, "Basic");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
        assert!(claims.can_manage_inventory());
    }

    #[test]
    fn test_tampered_token_is_anonymous() {
        let keys = keys();
        let token = keys.issue(&account(AccountType::Client)).unwrap();

        let other = TokenKeys::new(&SecretString::from("Z1!yX2@wV3#uT4$sR5%qP6^oN7&mL8*k"));
        assert_eq!(other.verify(&token), Identity::Anonymous);
        assert_eq!(keys.verify("not-a-token"), Identity::Anonymous);
    }

    #[test]
    fn test_expired_token_is_anonymous() {
        let keys = keys();
        let now = Utc::now().timestamp();
        let claims = AuthClaims {
            sub: AccountId::new(1),
            email: "old@example.com".to_owned(),
            first_name: "Old".to_owned(),
            last_name: "Token".to_owned(),
            account_type: AccountType::Admin,
            iat: now - 2 * TOKEN_TTL_SECONDS,
            exp: now - TOKEN_TTL_SECONDS,
        };
        let token = keys.sign(&claims).unwrap();
        assert_eq!(keys.verify(&token), Identity::Anonymous);
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = auth_cookie("abc".to_owned(), true).to_string();
        assert!(cookie.starts_with("cse_auth=abc"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Max-Age=3600"));

        let dev = auth_cookie("abc".to_owned(), false).to_string();
        assert!(!dev.contains("Secure"));

        let cleared = clear_auth_cookie(false).to_string();
        assert!(cleared.contains("Max-Age=0"));
    }

    #[test]
    fn test_token_from_cookie_header() {
        assert_eq!(
            token_from_cookie_header("cse_session=xyz; cse_auth=tok123").as_deref(),
            Some("tok123")
        );
        assert_eq!(token_from_cookie_header("cse_session=xyz"), None);
        assert_eq!(token_from_cookie_header("cse_auth="), None);
    }
}
