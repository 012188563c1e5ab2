//! Domain models for the dealership site.
//!
//! These are validated domain objects, separate from the database row types
//! in `db/`.

pub mod account;
pub mod flash;
pub mod inventory;

pub use account::Account;
pub use flash::{FlashLevel, FlashMessage, session_keys};
pub use inventory::{Classification, ClassifiedVehicle, Vehicle, VehicleInput};
