//! Add, update and delete on top of [`ContactStore`]. Every operation reloads
//! the full list from disk first and, for update/delete, writes the full list
//! back, so the cost is linear in the number of contacts.

use log::{debug, info};
use thiserror::Error;

use crate::models::Contact;
use crate::store::ContactStore;
use crate::validate::{validate_fields, ValidationError};

/// Errors from the mutation protocol.
#[derive(Debug, Error)]
pub enum BookError {
    /// The submitted fields failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// An identical (name, phone, email) row already exists.
    #[error("This contact already exists.")]
    Duplicate,

    /// Reading or writing the record file failed.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Result of an update. A missing target is not an error: the list is
/// rewritten unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(Contact),
    NotFound,
}

/// Validate the fields and append a new row unless the exact tuple is already
/// stored.
pub fn add_contact(
    store: &ContactStore,
    name: &str,
    phone: &str,
    email: &str,
) -> Result<Contact, BookError> {
    let contact = validate_fields(name, phone, email)?;

    let existing = store.load_all()?;
    if existing.contains(&contact) {
        debug!("event=contact_add module=book status=duplicate");
        return Err(BookError::Duplicate);
    }

    store.append(&contact)?;
    info!(
        "event=contact_add module=book status=ok rows={}",
        existing.len() + 1
    );
    Ok(contact)
}

/// Replace the first row equal to `target` with the new values, keeping its
/// position. No duplicate check is made on update.
pub fn update_contact(
    store: &ContactStore,
    target: &Contact,
    name: &str,
    phone: &str,
    email: &str,
) -> Result<UpdateOutcome, BookError> {
    let updated = validate_fields(name, phone, email)?;

    let mut contacts = store.load_all()?;
    let outcome = match contacts.iter_mut().find(|contact| **contact == *target) {
        Some(slot) => {
            *slot = updated.clone();
            UpdateOutcome::Updated(updated)
        }
        None => UpdateOutcome::NotFound,
    };

    store.replace_all(&contacts)?;

    match &outcome {
        UpdateOutcome::Updated(_) => info!("event=contact_update module=book status=ok"),
        UpdateOutcome::NotFound => debug!("event=contact_update module=book status=not_found"),
    }
    Ok(outcome)
}

/// Remove the first row equal to `contact`. Returns `false` (and leaves the
/// file alone) when nothing matches.
pub fn delete_contact(store: &ContactStore, contact: &Contact) -> Result<bool, BookError> {
    let mut contacts = store.load_all()?;
    let Some(index) = contacts.iter().position(|stored| stored == contact) else {
        debug!("event=contact_delete module=book status=not_found");
        return Ok(false);
    };

    contacts.remove(index);
    store.replace_all(&contacts)?;
    info!(
        "event=contact_delete module=book status=ok rows={}",
        contacts.len()
    );
    Ok(true)
}
