use crate::models::Contact;

/// Wrapper around the contact rows shown in the main table.
pub(crate) struct ContactListScreen {
    pub(crate) contacts: Vec<Contact>,
    pub(crate) selected: usize,
}

impl ContactListScreen {
    pub(crate) fn new(contacts: Vec<Contact>) -> Self {
        let mut screen = Self {
            contacts,
            selected: 0,
        };
        screen.ensure_in_bounds();
        screen
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub(crate) fn current_contact(&self) -> Option<&Contact> {
        self.contacts.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.contacts.is_empty() {
            return;
        }
        let len = self.contacts.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        if !self.contacts.is_empty() {
            self.selected = 0;
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.contacts.is_empty() {
            self.selected = self.contacts.len() - 1;
        }
    }

    /// Swap in freshly loaded rows. When `focus` is given and present, the
    /// selection jumps to its first occurrence; otherwise the index is kept
    /// and clamped.
    pub(crate) fn set_contacts(&mut self, contacts: Vec<Contact>, focus: Option<&Contact>) {
        self.contacts = contacts;
        if let Some(target) = focus {
            if let Some(idx) = self.contacts.iter().position(|c| c == target) {
                self.selected = idx;
                return;
            }
        }
        self.ensure_in_bounds();
    }

    fn ensure_in_bounds(&mut self) {
        if self.contacts.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.contacts.len() {
            self.selected = self.contacts.len() - 1;
        }
    }
}
