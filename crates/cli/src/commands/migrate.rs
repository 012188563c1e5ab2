//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! motors-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `MOTORS_DATABASE_URL` (or `DATABASE_URL`) - `SQLite` connection string,
//!   e.g. `sqlite://cse_motors.db`. The file is created if missing.
//!
//! # Migration Files
//!
//! Schema migrations live in `crates/web/migrations/`; the session table is
//! created by the session store.

use cse_motors_web::db;

use super::{CliError, connect};

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be reached or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
