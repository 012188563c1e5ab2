//! CSE Motors Core - Shared types library.
//!
//! This crate provides the domain types used across the CSE Motors crates:
//! - `web` - Server-rendered dealership site and inventory management
//! - `cli` - Command-line tools for migrations, accounts and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles and vehicle facts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
