//! Account management commands.
//!
//! The web form only creates `Client` accounts; employees and admins are
//! created here.
//!
//! # Usage
//!
//! ```bash
//! MOTORS_ACCOUNT_PASSWORD='...' motors-cli account create \
//!     --email manager@example.com --first-name Happy --last-name Manager --role admin
//! ```

use cse_motors_core::{AccountType, Email};
use cse_motors_web::services::auth::AuthService;
use cse_motors_web::validation::is_strong_password;
use secrecy::{ExposeSecret, SecretString};

use super::{CliError, connect};

/// Create an account with an explicit role.
///
/// # Returns
///
/// The ID of the created account.
///
/// # Errors
///
/// Returns an error for an invalid role, email or password, or if the email
/// is already registered.
pub async fn create(
    email: &str,
    first_name: &str,
    last_name: &str,
    role: &str,
    password: &SecretString,
) -> Result<i32, CliError> {
    let account_type: AccountType = role
        .parse()
        .map_err(|_| CliError::InvalidRole(role.to_owned()))?;

    let email = Email::parse(email).map_err(|_| CliError::InvalidEmail(email.to_owned()))?;

    if !is_strong_password(password.expose_secret()) {
        return Err(CliError::WeakPassword);
    }

    let pool = connect().await?;

    tracing::info!(email = %email, role = %account_type, "Creating account");
    let account = AuthService::new(&pool)
        .create_account(
            first_name.trim(),
            last_name.trim(),
            &email,
            password.expose_secret(),
            account_type,
        )
        .await?;

    tracing::info!(
        account_id = %account.id,
        email = %account.email,
        role = %account.account_type,
        "Account created successfully"
    );

    Ok(account.id.as_i32())
}
