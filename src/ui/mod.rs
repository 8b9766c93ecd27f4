//! Ratatui front-end: a contact table with modal add/edit form and delete
//! confirmation.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::{App, StatusKind};
pub use terminal::run_app;
