//! Authentication service.
//!
//! Provides password registration, login and account maintenance. Argon2
//! work runs on the blocking thread pool so it never stalls the runtime.

mod error;
pub mod token;

pub use error::{AuthError, TokenError};
pub use token::{AuthClaims, Identity, TokenKeys};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use cse_motors_core::{AccountId, AccountType, Email};

use crate::db::{AccountRepository, RepositoryError};
use crate::models::Account;

/// Authentication service.
pub struct AuthService<'a> {
    accounts: AccountRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new `Client` account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &Email,
        password: &str,
    ) -> Result<Account, AuthError> {
        self.create_account(first_name, last_name, email, password, AccountType::Client)
            .await
    }

    /// Create an account with an explicit role (used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn create_account(
        &self,
        first_name: &str,
        last_name: &str,
        email: &Email,
        password: &str,
        account_type: AccountType,
    ) -> Result<Account, AuthError> {
        let password_hash = hash_password(password.to_owned()).await?;

        self.accounts
            .create(first_name, last_name, email, &password_hash, account_type)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email and for a
    /// wrong password alike.
    pub async fn login(&self, email: &Email, password: &str) -> Result<Account, AuthError> {
        let (account, password_hash) = self
            .accounts
            .get_credentials_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password.to_owned(), password_hash).await?;

        Ok(account)
    }

    // =========================================================================
    // Account Maintenance
    // =========================================================================

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccountNotFound` if the account doesn't exist.
    pub async fn get_account(&self, id: AccountId) -> Result<Account, AuthError> {
        self.accounts
            .get_by_id(id)
            .await?
            .ok_or(AuthError::AccountNotFound)
    }

    /// Update names and email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` if the email belongs to another account.
    pub async fn update_profile(
        &self,
        id: AccountId,
        first_name: &str,
        last_name: &str,
        email: &Email,
    ) -> Result<Account, AuthError> {
        self.accounts
            .update_profile(id, first_name, last_name, email)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                RepositoryError::NotFound => AuthError::AccountNotFound,
                other => AuthError::Repository(other),
            })
    }

    /// Replace the password after checking the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if `current` does not match.
    pub async fn change_password(
        &self,
        id: AccountId,
        current: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let stored = self
            .accounts
            .get_password_hash(id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        verify_password(current.to_owned(), stored).await?;

        let new_hash = hash_password(new_password.to_owned()).await?;
        self.accounts
            .update_password(id, &new_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::AccountNotFound,
                other => AuthError::Repository(other),
            })
    }
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hash a password using Argon2id on the blocking pool.
async fn hash_password(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    })
    .await
    .map_err(|_| AuthError::PasswordHash)?
}

/// Verify a password against a hash on the blocking pool.
///
/// A wrong password is `InvalidCredentials`; a stored hash that cannot be
/// parsed is `PasswordHash`, which surfaces as a server error.
async fn verify_password(password: String, hash: String) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&hash).map_err(|e| {
            tracing::error!(error = %e, "Stored password hash is unreadable");
            AuthError::PasswordHash
        })?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)
    })
    .await
    .map_err(|_| AuthError::PasswordHash)?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    const PASSWORD: &str = "Sup3r$ecret!Pass";

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let pool = connect_in_memory().await.unwrap();
        let auth = AuthService::new(&pool);

        let account = auth
            .register("Ada", "Lovelace", &email("ada@example.com"), PASSWORD)
            .await
            .unwrap();
        assert_eq!(account.account_type, AccountType::Client);

        let logged_in = auth.login(&email("ada@example.com"), PASSWORD).await.unwrap();
        assert_eq!(logged_in.id, account.id);
    }

    #[tokio::test]
    async fn test_password_is_not_stored_in_plain_text() {
        let pool = connect_in_memory().await.unwrap();
        let auth = AuthService::new(&pool);
        let account = auth
            .register("Ada", "Lovelace", &email("ada@example.com"), PASSWORD)
            .await
            .unwrap();

        let stored = AccountRepository::new(&pool)
            .get_password_hash(account.id)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored, PASSWORD);
        assert!(stored.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
        let pool = connect_in_memory().await.unwrap();
        let auth = AuthService::new(&pool);
        auth.register("Ada", "Lovelace", &email("ada@example.com"), PASSWORD)
            .await
            .unwrap();

        let wrong_password = auth
            .login(&email("ada@example.com"), "Wr0ng!Password")
            .await
            .unwrap_err();
        let unknown_email = auth
            .login(&email("nobody@example.com"), PASSWORD)
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_corrupt_stored_hash_is_not_a_credentials_error() {
        let pool = connect_in_memory().await.unwrap();
        AccountRepository::new(&pool)
            .create(
                "Ada",
                "Lovelace",
                &email("ada@example.com"),
                "not-a-phc-string",
                AccountType::Client,
            )
            .await
            .unwrap();

        let err = AuthService::new(&pool)
            .login(&email("ada@example.com"), PASSWORD)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::PasswordHash));
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let pool = connect_in_memory().await.unwrap();
        let auth = AuthService::new(&pool);
        auth.register("Ada", "Lovelace", &email("ada@example.com"), PASSWORD)
            .await
            .unwrap();

        let err = auth
            .register("Other", "Person", &email("ada@example.com"), PASSWORD)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_change_password() {
        let pool = connect_in_memory().await.unwrap();
        let auth = AuthService::new(&pool);
        let account = auth
            .register("Ada", "Lovelace", &email("ada@example.com"), PASSWORD)
            .await
            .unwrap();

        let err = auth
            .change_password(account.id, "not-it", "N3w!Password#1")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        auth.change_password(account.id, PASSWORD, "N3w!Password#1")
            .await
            .unwrap();
        assert!(auth.login(&email("ada@example.com"), PASSWORD).await.is_err());
        assert!(
            auth.login(&email("ada@example.com"), "N3w!Password#1")
                .await
                .is_ok()
        );
    }
}
