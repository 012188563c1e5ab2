//! Account repository for database operations.

use sqlx::SqlitePool;

use cse_motors_core::{AccountId, AccountType, Email};

use super::RepositoryError;
use crate::models::Account;

const EMAIL_TAKEN: &str = "email already exists";

/// Database row for the `account` table, without the password hash.
#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: AccountId,
    account_firstname: String,
    account_lastname: String,
    account_email: String,
    account_type: String,
    profile_image: Option<String>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.account_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let account_type = row
            .account_type
            .parse::<AccountType>()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Self {
            id: row.account_id,
            first_name: row.account_firstname,
            last_name: row.account_lastname,
            email,
            account_type,
            profile_image: row.profile_image,
        })
    }
}

/// Row carrying an account together with its stored hash.
#[derive(sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    account: AccountRow,
    account_password: String,
}

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        email: &Email,
        password_hash: &str,
        account_type: AccountType,
    ) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            INSERT INTO account
                (account_firstname, account_lastname, account_email, account_password, account_type)
            VALUES (?, ?, ?, ?, ?)
            RETURNING account_id, account_firstname, account_lastname, account_email,
                      account_type, profile_image
            ",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(password_hash)
        .bind(account_type.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, EMAIL_TAKEN))?;

        row.try_into()
    }

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT account_id, account_firstname, account_lastname, account_email,
                   account_type, profile_image
            FROM account
            WHERE account_id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    /// Get an account and its password hash by email (for login).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r"
            SELECT account_id, account_firstname, account_lastname, account_email,
                   account_type, profile_image, account_password
            FROM account
            WHERE account_email = ?
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((r.account.try_into()?, r.account_password))),
            None => Ok(None),
        }
    }

    /// Get the stored password hash for an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(&self, id: AccountId) -> Result<Option<String>, RepositoryError> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT account_password FROM account WHERE account_id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(hash)
    }

    /// Update names and email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email belongs to another account.
    /// Returns `RepositoryError::NotFound` if the account does not exist.
    pub async fn update_profile(
        &self,
        id: AccountId,
        first_name: &str,
        last_name: &str,
        email: &Email,
    ) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            UPDATE account
            SET account_firstname = ?, account_lastname = ?, account_email = ?
            WHERE account_id = ?
            RETURNING account_id, account_firstname, account_lastname, account_email,
                      account_type, profile_image
            ",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, EMAIL_TAKEN))?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Replace the stored password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account does not exist.
    pub async fn update_password(
        &self,
        id: AccountId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE account SET account_password = ? WHERE account_id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count all accounts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM account")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let pool = connect_in_memory().await.unwrap();
        let repo = AccountRepository::new(&pool);

        let created = repo
            .create("Ada", "Lovelace", &email("ada@example.com"), "hash", AccountType::Client)
            .await
            .unwrap();
        assert_eq!(created.first_name, "Ada");
        assert_eq!(created.account_type, AccountType::Client);
        assert!(created.profile_image.is_none());

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.email.as_str(), "ada@example.com");

        let (account, hash) = repo
            .get_credentials_by_email(&email("ada@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.id, created.id);
        assert_eq!(hash, "hash");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = connect_in_memory().await.unwrap();
        let repo = AccountRepository::new(&pool);

        repo.create("A", "One", &email("dup@example.com"), "h1", AccountType::Client)
            .await
            .unwrap();
        let err = repo
            .create("B", "Two", &email("dup@example.com"), "h2", AccountType::Client)
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_profile_conflict_and_missing() {
        let pool = connect_in_memory().await.unwrap();
        let repo = AccountRepository::new(&pool);

        let first = repo
            .create("A", "One", &email("a@example.com"), "h", AccountType::Client)
            .await
            .unwrap();
        repo.create("B", "Two", &email("b@example.com"), "h", AccountType::Employee)
            .await
            .unwrap();

        let err = repo
            .update_profile(first.id, "A", "One", &email("b@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let err = repo
            .update_profile(AccountId::new(999), "X", "Y", &email("x@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));

        let updated = repo
            .update_profile(first.id, "Alice", "Uno", &email("alice@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Alice");
        assert_eq!(updated.email.as_str(), "alice@example.com");
    }

    #[tokio::test]
    async fn test_update_password() {
        let pool = connect_in_memory().await.unwrap();
        let repo = AccountRepository::new(&pool);

        let account = repo
            .create("A", "One", &email("a@example.com"), "old", AccountType::Client)
            .await
            .unwrap();
        repo.update_password(account.id, "new").await.unwrap();

        assert_eq!(
            repo.get_password_hash(account.id).await.unwrap().as_deref(),
            Some("new")
        );
        assert!(matches!(
            repo.update_password(AccountId::new(42), "x").await,
            Err(RepositoryError::NotFound)
        ));
    }
}
