//! Syntax checks applied to form input before anything touches the record
//! file.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::Contact;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));
// Anchored at both ends: a second `@` after the domain is rejected.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("valid email regex"));

/// Reasons a submitted form is rejected. The display strings are shown to the
/// user as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required.")]
    MissingField,
    #[error("Enter a valid email address.")]
    InvalidEmail,
    #[error("Phone number must be 10 digits.")]
    InvalidPhone,
}

/// True iff `phone` is exactly ten ASCII decimal digits.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// True iff `email` looks like `local@domain.tld`. This is a syntactic check
/// only; no case or whitespace normalization happens here.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trim the raw form values and turn them into a [`Contact`].
///
/// Checks run in a fixed order: blank fields first, then the email, then the
/// phone number. The first failure wins.
pub fn validate_fields(name: &str, phone: &str, email: &str) -> Result<Contact, ValidationError> {
    let (name, phone, email) = (name.trim(), phone.trim(), email.trim());

    if name.is_empty() || phone.is_empty() || email.is_empty() {
        return Err(ValidationError::MissingField);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_valid_phone(phone) {
        return Err(ValidationError::InvalidPhone);
    }

    Ok(Contact::new(name, phone, email))
}
