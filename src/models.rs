//! Domain model shared by the record file, the mutation protocol and the TUI.
//! A contact has no surrogate key: the exact (name, phone, email) triple is
//! its identity, so equality is derived over all three fields and nothing
//! else. Keeping the type a plain data holder lets the store and the UI agree
//! on what "the same contact" means without any extra bookkeeping.

use std::fmt;

/// Column titles written as the first line of the record file.
pub const HEADER: [&str; 3] = ["Name", "Phone", "Email"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
/// One row of the address book. Two contacts are considered the same entry
/// only when all three fields are byte-identical, which is exactly what the
/// derived `PartialEq` gives us.
pub struct Contact {
    /// Free-form display name; the only requirement is that it is not blank.
    pub name: String,
    /// Ten ASCII digits, stored verbatim as text so leading zeros survive.
    pub phone: String,
    /// Email address checked with a simple syntactic pattern.
    pub email: String,
}

impl Contact {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    /// Field values in file column order.
    pub fn as_record(&self) -> [&str; 3] {
        [&self.name, &self.phone, &self.email]
    }
}

impl fmt::Display for Contact {
    /// Used in status messages, e.g. `Ada <ada@example.com> (5551234567)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> ({})", self.name, self.email, self.phone)
    }
}
