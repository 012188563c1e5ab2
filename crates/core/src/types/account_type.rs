//! Account roles.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a stored or submitted role name is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown account type: {0}")]
pub struct AccountTypeError(pub String);

/// The role attached to an account.
///
/// New registrations are always `Client`. Employees and admins are created
/// from the command line and may manage inventory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    #[default]
    Client,
    Employee,
    Admin,
}

impl AccountType {
    /// The name stored in the `account_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::Employee => "Employee",
            Self::Admin => "Admin",
        }
    }

    /// Whether this role may reach the inventory management pages.
    #[must_use]
    pub const fn can_manage_inventory(self) -> bool {
        matches!(self, Self::Employee | Self::Admin)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = AccountTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "employee" => Ok(Self::Employee),
            "admin" => Ok(Self::Admin),
            _ => Err(AccountTypeError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_client() {
        assert_eq!(AccountType::default(), AccountType::Client);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("Employee".parse::<AccountType>().unwrap(), AccountType::Employee);
        assert_eq!("admin".parse::<AccountType>().unwrap(), AccountType::Admin);
        assert!("Manager".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_display_matches_column_value() {
        assert_eq!(AccountType::Client.to_string(), "Client");
        assert_eq!(AccountType::Admin.to_string(), "Admin");
    }

    #[test]
    fn test_inventory_permission() {
        assert!(!AccountType::Client.can_manage_inventory());
        assert!(AccountType::Employee.can_manage_inventory());
        assert!(AccountType::Admin.can_manage_inventory());
    }
}
