use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use log::warn;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::book::{add_contact, delete_contact, update_contact, UpdateOutcome};
use crate::models::{Contact, HEADER};
use crate::store::ContactStore;

use super::forms::{ConfirmContactDelete, ContactField, ContactForm};
use super::helpers::{book_error_message, centered_rect, surface_error};
use super::screens::ContactListScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp / PageDown.
const PAGE_STEP: isize = 5;

/// Fine-grained modes layered over the contact table.
enum Mode {
    Normal,
    Form(ContactForm),
    ConfirmDelete(ConfirmContactDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    store: ContactStore,
    list: ContactListScreen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: ContactStore, contacts: Vec<Contact>) -> Self {
        Self {
            store,
            list: ContactListScreen::new(contacts),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Show a message in the footer, e.g. a non-fatal startup warning.
    pub fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Form(form) => self.handle_form(code, form)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        Ok(exit)
    }

    /// Ctrl+L inside the form: blank the fields and drop the edit target.
    pub(crate) fn handle_ctrl_l(&mut self) -> Result<()> {
        if let Mode::Form(form) = &mut self.mode {
            form.clear();
            self.set_status("Fields cleared.", StatusKind::Info);
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.list.move_selection(-1),
            KeyCode::Down => self.list.move_selection(1),
            KeyCode::PageUp => self.list.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.list.move_selection(PAGE_STEP),
            KeyCode::Home => self.list.select_first(),
            KeyCode::End => self.list.select_last(),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::Form(ContactForm::default()));
            }
            KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(contact) = self.list.current_contact() {
                    let form = ContactForm::from_contact(contact);
                    self.clear_status();
                    return Ok(Mode::Form(form));
                }
                self.set_status("No contact selected to edit.", StatusKind::Error);
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('-') | KeyCode::Delete => {
                if let Some(contact) = self.list.current_contact().cloned() {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(ConfirmContactDelete { contact }));
                }
                self.set_status("Select a contact to delete.", StatusKind::Error);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => match self.reload_contacts(None) {
                Ok(()) => self.set_status("Contacts reloaded.", StatusKind::Info),
                Err(err) => {
                    warn!("event=contact_reload module=ui status=error");
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
            },
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_form(&mut self, code: KeyCode, mut form: ContactForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                let message = if form.is_editing() {
                    "Edit cancelled."
                } else {
                    "Add contact cancelled."
                };
                self.set_status(message, StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                if self.submit_form(&mut form)? {
                    keep_open = false;
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::Form(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    /// Run the add or update protocol depending on whether the form carries
    /// an edit target. Returns `true` when the form should close.
    fn submit_form(&mut self, form: &mut ContactForm) -> Result<bool> {
        let result = match &form.editing {
            Some(target) => update_contact(&self.store, target, &form.name, &form.phone, &form.email)
                .map(|outcome| match outcome {
                    UpdateOutcome::Updated(contact) => Some(contact),
                    UpdateOutcome::NotFound => None,
                }),
            None => add_contact(&self.store, &form.name, &form.phone, &form.email).map(Some),
        };

        match result {
            Ok(saved) => {
                let message = if form.is_editing() {
                    "Contact updated successfully."
                } else {
                    "Contact added successfully."
                };
                form.clear();
                self.refresh_after_change(saved.as_ref(), Some(message));
                Ok(true)
            }
            Err(err) => {
                let message = book_error_message(&err);
                form.error = Some(message.clone());
                self.set_status(message, StatusKind::Error);
                Ok(false)
            }
        }
    }

    fn handle_confirm_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmContactDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.clear_status();
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match delete_contact(&self.store, &confirm.contact) {
                    Ok(removed) => {
                        self.clear_status();
                        let message = removed.then_some("Contact deleted successfully.");
                        self.refresh_after_change(None, message);
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        self.set_status(book_error_message(&err), StatusKind::Error);
                        Ok(Mode::ConfirmDelete(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_contact_table(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Form(form) => self.draw_contact_form(frame, area, form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_contact_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Contacts ({})", self.list.contacts.len()));

        if self.list.is_empty() {
            let message = Paragraph::new("No contacts yet. Press 'a' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let header = Row::new(HEADER.iter().map(|title| Cell::from(*title))).style(header_style);

        let rows = self.list.contacts.iter().map(|contact| {
            Row::new(
                contact
                    .as_record()
                    .into_iter()
                    .map(|value| Cell::from(value.to_string())),
            )
        });

        let widths = [
            Constraint::Percentage(30),
            Constraint::Percentage(25),
            Constraint::Percentage(45),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(self.list.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match &self.mode {
            Mode::Form(_) => &[
                ("[Enter]", " Save   "),
                ("[Tab]", " Next Field   "),
                ("[Ctrl+L]", " Clear   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmDelete(_) => &[("[y]", " Delete   "), ("[n/Esc]", " Keep")],
            Mode::Normal => &[
                ("[↑↓]", " Navigate   "),
                ("[a]", " Add   "),
                ("[Enter/e]", " Edit   "),
                ("[d]", " Delete   "),
                ("[r]", " Refresh   "),
                ("[q]", " Quit"),
            ],
        };

        let spans = keys
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect::<Vec<_>>();
        Line::from(spans)
    }

    fn draw_contact_form(&self, frame: &mut Frame, area: Rect, form: &ContactForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(form.title()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let fields = [ContactField::Name, ContactField::Phone, ContactField::Email];
        let mut lines: Vec<Line> = fields.iter().map(|field| form.build_line(*field)).collect();
        lines.push(Line::from(""));

        if let Some(target) = &form.editing {
            lines.push(Line::from(Span::styled(
                format!("Editing {target}"),
                Style::default().fg(Color::Gray),
            )));
        }

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Ctrl+L to clear • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        // No wrapping: the cursor math below relies on one line per field.
        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        frame.set_cursor_position(form_cursor(inner, form));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmContactDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Confirm").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from("Are you sure you want to delete this contact?"),
            Line::from(Span::styled(
                confirm.contact.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Reload after a successful write. A failed reload is reported on the
    /// status line; the write itself already happened.
    fn refresh_after_change(&mut self, focus: Option<&Contact>, message: Option<&str>) {
        match self.reload_contacts(focus) {
            Ok(()) => {
                if let Some(message) = message {
                    self.set_status(message, StatusKind::Info);
                }
            }
            Err(err) => {
                warn!("event=contact_reload module=ui status=error");
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    fn reload_contacts(&mut self, focus: Option<&Contact>) -> Result<()> {
        let contacts = self.store.load_all()?;
        self.list.set_contacts(contacts, focus);
        Ok(())
    }
}

/// Cursor cell for the active form field, kept inside `inner` however long
/// the value gets.
fn form_cursor(inner: Rect, form: &ContactForm) -> (u16, u16) {
    let prefix = format!("{}: ", form.active.label()).len();
    let offset = u16::try_from(prefix + form.value_len(form.active)).unwrap_or(u16::MAX);
    let cursor_x = inner
        .x
        .saturating_add(offset)
        .min(inner.right().saturating_sub(1));
    let cursor_y = inner.y.saturating_add(form.active.row());
    (cursor_x, cursor_y)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn app_with(contacts: &[Contact]) -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let store = ContactStore::new(dir.path().join("contacts.csv"));
        store.replace_all(contacts).unwrap();
        let loaded = store.load_all().unwrap();
        (dir, App::new(store, loaded))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn fill_form(app: &mut App, name: &str, phone: &str, email: &str) {
        type_text(app, name);
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(app, phone);
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(app, email);
    }

    fn status_text(app: &App) -> Option<&str> {
        app.status.as_ref().map(|status| status.text.as_str())
    }

    #[test]
    fn add_form_appends_and_closes() {
        let (_dir, mut app) = app_with(&[]);
        app.handle_key(KeyCode::Char('a')).unwrap();
        fill_form(&mut app, "Ada", "5551234567", "ada@example.com");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(status_text(&app), Some("Contact added successfully."));
        assert_eq!(
            app.store.load_all().unwrap(),
            vec![Contact::new("Ada", "5551234567", "ada@example.com")]
        );
        assert_eq!(app.list.contacts.len(), 1);
    }

    #[test]
    fn invalid_input_keeps_form_open_with_message() {
        let (_dir, mut app) = app_with(&[]);
        app.handle_key(KeyCode::Char('a')).unwrap();
        fill_form(&mut app, "Ada", "555", "ada@example.com");
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::Form(form) => {
                assert_eq!(form.error.as_deref(), Some("Phone number must be 10 digits."))
            }
            _ => panic!("form should stay open"),
        }
        assert!(app.store.load_all().unwrap().is_empty());
    }

    #[test]
    fn duplicate_add_is_reported() {
        let existing = Contact::new("Ada", "5551234567", "ada@example.com");
        let (_dir, mut app) = app_with(&[existing]);
        app.handle_key(KeyCode::Char('+')).unwrap();
        fill_form(&mut app, "Ada", "5551234567", "ada@example.com");
        app.handle_key(KeyCode::Enter).unwrap();

        assert_eq!(status_text(&app), Some("This contact already exists."));
        assert_eq!(app.store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn selecting_a_row_then_saving_updates_in_place() {
        let first = Contact::new("A", "1111111111", "a@a.co");
        let second = Contact::new("B", "3333333333", "b@b.co");
        let (_dir, mut app) = app_with(&[first, second.clone()]);

        app.handle_key(KeyCode::Enter).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        for _ in 0..10 {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        type_text(&mut app, "2222222222");
        app.handle_key(KeyCode::Enter).unwrap();

        assert_eq!(status_text(&app), Some("Contact updated successfully."));
        assert_eq!(
            app.store.load_all().unwrap(),
            vec![Contact::new("A", "2222222222", "a@a.co"), second]
        );
    }

    #[test]
    fn clearing_the_form_turns_edit_into_add() {
        let first = Contact::new("A", "1111111111", "a@a.co");
        let (_dir, mut app) = app_with(&[first.clone()]);

        app.handle_key(KeyCode::Char('e')).unwrap();
        app.handle_ctrl_l().unwrap();
        fill_form(&mut app, "B", "2222222222", "b@b.co");
        app.handle_key(KeyCode::Enter).unwrap();

        assert_eq!(
            app.store.load_all().unwrap(),
            vec![first, Contact::new("B", "2222222222", "b@b.co")]
        );
    }

    #[test]
    fn delete_requires_confirmation() {
        let x = Contact::new("X", "1111111111", "x@x.co");
        let y = Contact::new("Y", "2222222222", "y@y.co");
        let (_dir, mut app) = app_with(&[x, y.clone()]);

        app.handle_key(KeyCode::Char('d')).unwrap();
        app.handle_key(KeyCode::Char('n')).unwrap();
        assert_eq!(app.store.load_all().unwrap().len(), 2);

        app.handle_key(KeyCode::Char('d')).unwrap();
        app.handle_key(KeyCode::Char('y')).unwrap();
        assert_eq!(status_text(&app), Some("Contact deleted successfully."));
        assert_eq!(app.store.load_all().unwrap(), vec![y.clone()]);
        assert_eq!(app.list.contacts, vec![y]);
    }

    #[test]
    fn delete_on_empty_list_asks_for_selection() {
        let (_dir, mut app) = app_with(&[]);
        app.handle_key(KeyCode::Char('d')).unwrap();
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(status_text(&app), Some("Select a contact to delete."));
    }

    #[test]
    fn refresh_picks_up_external_changes() {
        let (_dir, mut app) = app_with(&[]);
        app.store
            .append(&Contact::new("Z", "9999999999", "z@z.co"))
            .unwrap();
        assert!(app.list.is_empty());

        app.handle_key(KeyCode::Char('r')).unwrap();
        assert_eq!(app.list.contacts.len(), 1);
    }

    #[test]
    fn failed_reload_after_a_write_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let mut app = App::new(ContactStore::new(blocker.join("contacts.csv")), Vec::new());

        app.refresh_after_change(None, Some("Contact added successfully."));

        let status = app.status.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert_ne!(status.text, "Contact added successfully.");
    }

    #[test]
    fn cursor_stays_inside_the_form_for_long_values() {
        let inner = Rect::new(10, 5, 30, 6);
        let mut form = ContactForm::default();
        form.active = ContactField::Email;
        form.email = "x".repeat(70_000);

        let (x, y) = form_cursor(inner, &form);
        assert_eq!(x, inner.right() - 1);
        assert_eq!(y, 7);

        form.email = "ab".to_string();
        assert_eq!(form_cursor(inner, &form), (10 + "Email: ".len() as u16 + 2, 7));
    }

    #[test]
    fn quit_keys_exit_only_from_the_list() {
        let (_dir, mut app) = app_with(&[]);
        app.handle_key(KeyCode::Char('a')).unwrap();
        assert!(!app.handle_key(KeyCode::Char('q')).unwrap());
        app.handle_key(KeyCode::Esc).unwrap();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }
}
