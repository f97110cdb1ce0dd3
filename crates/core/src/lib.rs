#![warn(clippy::all, missing_docs)]

//! Core domain logic for the Wingman private jet rental desk.
//!
//! This crate hosts the jet catalog, user directory, booking ledger and
//! filtering layer, together with configuration, CSV import/export and the
//! [`RentalDesk`] context used by the terminal UI.

pub mod archive;
pub mod catalog;
pub mod config;
pub mod desk;
pub mod directory;
pub mod error;
pub mod import;
pub mod ledger;
pub mod models;
pub mod query;
pub mod validation;

pub use catalog::{JetCatalog, JetQuery};
pub use config::AppConfig;
pub use desk::{LoginOutcome, RentalDesk};
pub use directory::UserDirectory;
pub use error::{CatalogError, DeskError, LedgerError, RegistrationError, ValidationError};
pub use ledger::{BookingLedger, BookingRequest};
pub use models::{Booking, BookingId, Jet, JetId, JetType, JetUpdate, TripType, User, UserId};
pub use query::BudgetRange;
