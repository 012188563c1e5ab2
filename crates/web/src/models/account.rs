//! Account domain types.

use cse_motors_core::{AccountId, AccountType, Email};

/// A registered site account (domain type).
///
/// Never carries the password hash; see `AccountRepository::get_credentials_by_email`.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    /// Normalized (lowercase) email address, unique per account.
    pub email: Email,
    /// Role; registration always creates `Client`.
    pub account_type: AccountType,
    /// Path of an uploaded profile picture, if any.
    pub profile_image: Option<String>,
}
