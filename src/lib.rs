//! Core library surface for the Contact Book TUI application.
//!
//! The binary only wires these pieces together; tests and any other tooling
//! can drive the store and the add/update/delete protocol directly.
pub mod book;
pub mod config;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;
pub mod validate;

/// Add, update and delete on top of the record file.
pub use book::{add_contact, delete_contact, update_contact, BookError, UpdateOutcome};

pub use config::Config;
pub use models::Contact;
pub use store::ContactStore;

/// The interactive application entry point and state container.
pub use ui::{run_app, App, StatusKind};

pub use validate::{is_valid_email, is_valid_phone, validate_fields, ValidationError};
