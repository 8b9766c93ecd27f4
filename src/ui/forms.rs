use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Contact;

/// Form state for adding or editing a contact.
///
/// `editing` holds the row the form was populated from. When it is set, the
/// form submits an update against that exact tuple instead of an add.
#[derive(Default, Clone)]
pub(crate) struct ContactForm {
    pub(crate) name: String,
    pub(crate) phone: String,
    pub(crate) email: String,
    pub(crate) active: ContactField,
    pub(crate) error: Option<String>,
    pub(crate) editing: Option<Contact>,
}

/// Enumerates the fields within the contact form to drive focus management.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum ContactField {
    #[default]
    Name,
    Phone,
    Email,
}

impl ContactField {
    /// Column label shown in front of the field value.
    pub(crate) fn label(self) -> &'static str {
        match self {
            ContactField::Name => "Name",
            ContactField::Phone => "Phone",
            ContactField::Email => "Email",
        }
    }

    /// Zero-based line the field occupies inside the form.
    pub(crate) fn row(self) -> u16 {
        match self {
            ContactField::Name => 0,
            ContactField::Phone => 1,
            ContactField::Email => 2,
        }
    }

    fn next(self) -> Self {
        match self {
            ContactField::Name => ContactField::Phone,
            ContactField::Phone => ContactField::Email,
            ContactField::Email => ContactField::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            ContactField::Name => ContactField::Email,
            ContactField::Phone => ContactField::Name,
            ContactField::Email => ContactField::Phone,
        }
    }
}

impl ContactForm {
    /// Populate the form from a listed row and remember it as the edit target.
    pub(crate) fn from_contact(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            email: contact.email.clone(),
            active: ContactField::Name,
            error: None,
            editing: Some(contact.clone()),
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub(crate) fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Contact"
        } else {
            "Add Contact"
        }
    }

    /// Blank every field and forget the edit target, turning the form back
    /// into an add form.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn next_field(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.previous();
    }

    /// Append a character to the active field. Control characters are
    /// ignored; everything else is left for validation to judge.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value_mut(self.active).push(ch);
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    pub(crate) fn value(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Phone => &self.phone,
            ContactField::Email => &self.email,
        }
    }

    fn value_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Phone => &mut self.phone,
            ContactField::Email => &mut self.email,
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: ContactField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: ContactField) -> usize {
        self.value(field).chars().count()
    }
}

/// Pending delete awaiting a yes/no answer.
#[derive(Clone)]
pub(crate) struct ConfirmContactDelete {
    pub(crate) contact: Contact,
}
