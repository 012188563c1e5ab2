//! CLI subcommand implementations.

pub mod account;
pub mod migrate;
pub mod seed;

use cse_motors_web::db::{self, RepositoryError};
use cse_motors_web::services::auth::AuthError;
use secrecy::SecretString;
use sqlx::SqlitePool;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Account operation failed.
    #[error("Account error: {0}")]
    Auth(#[from] AuthError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: client, employee, admin")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password is missing or fails the strength policy.
    #[error("Password must be at least 12 characters with upper and lower case letters, a digit and a symbol")]
    WeakPassword,

    /// Seed data is inconsistent.
    #[error("Invalid seed data: {0}")]
    Seed(String),
}

/// Read the database URL the same way the server does.
fn database_url() -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();

    std::env::var("MOTORS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("MOTORS_DATABASE_URL"))
}

/// Connect to the configured database.
async fn connect() -> Result<SqlitePool, CliError> {
    let url = database_url()?;
    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&url).await?)
}
