//! Core types for CSE Motors.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod account_type;
pub mod email;
pub mod id;
pub mod vehicle;

pub use account_type::{AccountType, AccountTypeError};
pub use email::{Email, EmailError};
pub use id::*;
pub use vehicle::{Mileage, ModelYear, Price, VehicleFieldError, group_thousands};
