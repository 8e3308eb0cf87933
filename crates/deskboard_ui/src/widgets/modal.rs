use crossterm::event::{KeyCode, KeyEvent};
use deskboard_api::{Record, TableRecord};
use serde_json::Value;
use ratatui::{
    prelude::{Alignment, Buffer, Constraint, Layout, Rect, Widget},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use thiserror::Error;

use crate::{handlers::handle_form_input, widgets::{buttons::Buttons, text_input::TextInput}};

const FORM_BUTTONS: [&str; 2] = ["Save", "Cancel"];
const CONFIRM_BUTTONS: [&str; 2] = ["Yes", "No"];
const LABEL_WIDTH: usize = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    New,
    Edit,
}

/// How the text of a form field becomes a JSON value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldKind {
    #[default]
    Text,
    Number,
    /// Comma separated values, stored as an array of strings
    List,
    /// Masked, never prefilled. Left out of the record when empty on edit.
    Secret,
}

/// One editable field of a record form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FormField {
    #[must_use]
    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Text,
            required: false,
        }
    }

    #[must_use]
    pub const fn number(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Number,
            ..Self::text(key, label)
        }
    }

    #[must_use]
    pub const fn list(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::List,
            ..Self::text(key, label)
        }
    }

    #[must_use]
    pub const fn secret(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Secret,
            ..Self::text(key, label)
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} must be a number")]
    InvalidNumber(&'static str),
}

/// What the application should do after a modal handled a key
#[derive(Debug, Clone, PartialEq)]
pub enum ModalAction {
    None,
    Cancel,
    ConfirmDelete { id: String },
    Save {
        mode: Mode,
        id: Option<String>,
        record: Record,
    },
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn modal_block(title: String, border: Color) -> Block<'static> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(Color::Black))
}

/// Yes/No prompt before a record is deleted. No is preselected.
#[derive(Debug, Clone)]
pub struct ConfirmationModal {
    pub message: String,
    pub id: String,
    pub selected_button: usize,
}

impl ConfirmationModal {
    #[must_use]
    pub const fn new(message: String, id: String) -> Self {
        Self {
            message,
            id,
            selected_button: 1,
        }
    }

    #[must_use]
    pub const fn confirm(&self) -> bool {
        self.selected_button == 0
    }

    pub const fn toggle(&mut self) {
        self.selected_button = (self.selected_button + 1) % CONFIRM_BUTTONS.len();
    }

    /// Returns the action and whether the modal is done
    pub fn handle_key_event(&mut self, key: KeyEvent) -> (ModalAction, bool) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => (ModalAction::Cancel, true),
            KeyCode::Char('y') => (
                ModalAction::ConfirmDelete {
                    id: self.id.clone(),
                },
                true,
            ),
            KeyCode::Enter if self.confirm() => (
                ModalAction::ConfirmDelete {
                    id: self.id.clone(),
                },
                true,
            ),
            KeyCode::Enter => (ModalAction::Cancel, true),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.toggle();
                (ModalAction::None, false)
            }
            _ => (ModalAction::None, false),
        }
    }
}

impl Widget for &ConfirmationModal {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal_area = centered(area, 50, 8);
        Clear.render(modal_area, buf);
        modal_block("Confirm Delete".to_string(), Color::Red).render(modal_area, buf);

        let [message, buttons] =
            Layout::vertical([Constraint::Length(3), Constraint::Length(1)])
                .margin(1)
                .areas(modal_area);

        Paragraph::new(self.message.as_str())
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(message, buf);
        Buttons {
            buttons: &CONFIRM_BUTTONS,
            selected: self.selected_button,
        }
        .render(buttons, buf);
    }
}

/// Read-only dump of every field of a record
#[derive(Debug, Clone)]
pub struct RecordViewModal {
    pub title: String,
    pub rows: Vec<(String, String)>,
    pub scroll: u16,
}

impl RecordViewModal {
    #[must_use]
    pub fn new(title: String, record: &Record) -> Self {
        let rows = record
            .iter()
            .map(|(key, _)| (key.clone(), record.field(key).unwrap_or_default().into_owned()))
            .collect();
        Self {
            title,
            rows,
            scroll: 0,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> (ModalAction, bool) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => (ModalAction::Cancel, true),
            KeyCode::Char('j') | KeyCode::Down => {
                let max = u16::try_from(self.rows.len().saturating_sub(1)).unwrap_or(u16::MAX);
                self.scroll = self.scroll.saturating_add(1).min(max);
                (ModalAction::None, false)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                (ModalAction::None, false)
            }
            _ => (ModalAction::None, false),
        }
    }
}

impl Widget for &RecordViewModal {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = u16::try_from(self.rows.len())
            .unwrap_or(u16::MAX)
            .saturating_add(4)
            .clamp(8, area.height.saturating_sub(2).max(8));
        let modal_area = centered(area, 80, height);
        Clear.render(modal_area, buf);
        modal_block(self.title.clone(), Color::Cyan).render(modal_area, buf);

        let [body, button] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)])
                .margin(1)
                .areas(modal_area);

        let lines = self
            .rows
            .iter()
            .map(|(key, value)| {
                Line::from(vec![
                    Span::styled(format!("{key:<LABEL_WIDTH$}"), Style::default().fg(Color::Yellow)),
                    Span::raw(value.as_str()),
                ])
            })
            .collect::<Vec<_>>();
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(body, buf);
        Buttons {
            buttons: &["Close"],
            selected: 0,
        }
        .render(button, buf);
    }
}

#[derive(Debug, Clone)]
struct FieldInput {
    field: FormField,
    input: TextInput,
    /// Prefilled text and the stored value it was shown for. An unchanged
    /// input saves the stored value as is.
    original: Option<(String, Value)>,
}

impl FieldInput {
    fn blank(field: FormField) -> Self {
        Self {
            field,
            input: TextInput::new(),
            original: None,
        }
    }

    fn prefilled(field: FormField, record: &Record) -> Self {
        let stored = match field.kind {
            FieldKind::Secret => None,
            FieldKind::Text | FieldKind::Number | FieldKind::List => {
                record.get(field.key)
            }
        };
        let Some(value) = stored else {
            return Self::blank(field);
        };
        let text = record.field(field.key).unwrap_or_default().into_owned();
        Self {
            field,
            input: TextInput::with_text(text.clone()),
            original: Some((text, value.clone())),
        }
    }

    /// The stored value, if the input still shows it untouched
    fn unchanged(&self) -> Option<&Value> {
        self.original
            .as_ref()
            .filter(|(text, _)| text == self.input.text())
            .map(|(_, value)| value)
    }
}

/// Create or edit form over a fixed list of fields
#[derive(Debug, Clone)]
pub struct RecordFormModal {
    title: String,
    mode: Mode,
    id: Option<String>,
    fields: Vec<FieldInput>,
    /// Index into the fields, then the buttons
    focus: usize,
    error: Option<String>,
}

impl RecordFormModal {
    #[must_use]
    pub fn new_record(title: &str, fields: &[FormField]) -> Self {
        Self {
            title: format!("New {title}"),
            mode: Mode::New,
            id: None,
            fields: fields.iter().copied().map(FieldInput::blank).collect(),
            focus: 0,
            error: None,
        }
    }

    #[must_use]
    pub fn edit_record(title: &str, fields: &[FormField], id: String, record: &Record) -> Self {
        Self {
            title: format!("Edit {title}"),
            mode: Mode::Edit,
            id: Some(id),
            fields: fields
                .iter()
                .map(|field| FieldInput::prefilled(*field, record))
                .collect(),
            focus: 0,
            error: None,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current text of the field named `key`
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field.key == key)
            .map(|f| f.input.text())
    }

    fn item_count(&self) -> usize {
        self.fields.len() + FORM_BUTTONS.len()
    }

    fn focused_button(&self) -> Option<usize> {
        self.focus.checked_sub(self.fields.len())
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.item_count();
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.checked_sub(1).unwrap_or(self.item_count() - 1);
    }

    /// Validate the inputs and turn them into a record
    pub fn build_record(&self) -> Result<Record, FormError> {
        let mut record = Record::new();
        for entry in &self.fields {
            let FieldInput { field, input, .. } = entry;
            let text = input.text().trim();
            let optional_secret =
                field.kind == FieldKind::Secret && self.mode == Mode::Edit;
            if text.is_empty() && field.required && !optional_secret {
                return Err(FormError::MissingField(field.label));
            }
            if let Some(value) = entry.unchanged() {
                record.insert(field.key, value.clone());
                continue;
            }
            match field.kind {
                FieldKind::Secret if text.is_empty() => {}
                FieldKind::Text | FieldKind::Secret => {
                    record.insert(field.key, text);
                }
                FieldKind::Number if text.is_empty() => {}
                FieldKind::Number => {
                    if let Ok(n) = text.parse::<i64>() {
                        record.insert(field.key, n);
                    } else {
                        let n = text
                            .parse::<f64>()
                            .ok()
                            .filter(|n| n.is_finite())
                            .ok_or(FormError::InvalidNumber(field.label))?;
                        record.insert(field.key, n);
                    }
                }
                FieldKind::List => {
                    let items = text
                        .split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(str::to_string)
                        .collect::<Vec<_>>();
                    record.insert(field.key, items);
                }
            }
        }
        Ok(record)
    }

    fn submit(&mut self) -> (ModalAction, bool) {
        match self.build_record() {
            Ok(record) => (
                ModalAction::Save {
                    mode: self.mode,
                    id: self.id.clone(),
                    record,
                },
                true,
            ),
            Err(error) => {
                self.error = Some(error.to_string());
                (ModalAction::None, false)
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> (ModalAction, bool) {
        match key.code {
            KeyCode::Esc => return (ModalAction::Cancel, true),
            KeyCode::Tab | KeyCode::Down => {
                self.next_field();
                return (ModalAction::None, false);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.prev_field();
                return (ModalAction::None, false);
            }
            KeyCode::Enter => {
                return match self.focused_button() {
                    Some(1) => (ModalAction::Cancel, true),
                    Some(_) | None => self.submit(),
                };
            }
            _ => {}
        }

        if let Some(button) = self.focused_button() {
            if matches!(key.code, KeyCode::Left | KeyCode::Right) {
                let next = (button + 1) % FORM_BUTTONS.len();
                self.focus = self.fields.len() + next;
            }
        } else if let Some(field) = self.fields.get_mut(self.focus)
            && handle_form_input(key, &mut field.input)
        {
            self.error = None;
        }
        (ModalAction::None, false)
    }
}

impl Widget for &RecordFormModal {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = u16::try_from(self.fields.len()).unwrap_or(u16::MAX);
        let modal_area = centered(area, 70, rows.saturating_add(6));
        Clear.render(modal_area, buf);
        modal_block(self.title.clone(), Color::Blue).render(modal_area, buf);

        let [fields_area, error_area, buttons_area] = Layout::vertical([
            Constraint::Min(rows),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .margin(1)
        .areas(modal_area);

        let lines = self
            .fields
            .iter()
            .enumerate()
            .map(|(index, FieldInput { field, input, .. })| {
                let marker = if field.required { "*" } else { "" };
                let masked;
                let shown = if field.kind == FieldKind::Secret {
                    masked = "•".repeat(input.text().chars().count());
                    masked.as_str()
                } else {
                    input.text()
                };
                let label = format!("{}{marker}:", field.label);
                let label = Span::raw(format!("{label:<LABEL_WIDTH$}"));
                if index == self.focus {
                    let cursor = shown
                        .char_indices()
                        .nth(input.cursor_position())
                        .map_or(shown.len(), |(i, _)| i);
                    let (before, after) = shown.split_at(cursor);
                    Line::from(vec![
                        label.yellow(),
                        Span::raw(before.to_string()),
                        Span::styled("█", Style::default().fg(Color::White)),
                        Span::raw(after.to_string()),
                    ])
                    .bg(Color::DarkGray)
                } else {
                    Line::from(vec![label, Span::raw(shown.to_string())])
                }
            })
            .collect::<Vec<_>>();
        Paragraph::new(lines).render(fields_area, buf);

        if let Some(error) = &self.error {
            Paragraph::new(error.as_str().red())
                .alignment(Alignment::Center)
                .render(error_area, buf);
        }

        Buttons {
            buttons: &FORM_BUTTONS,
            selected: self.focused_button().unwrap_or(usize::MAX),
        }
        .render(buttons_area, buf);
    }
}

#[derive(Debug, Clone)]
enum ActiveModal {
    Confirm(ConfirmationModal),
    View(RecordViewModal),
    Form(RecordFormModal),
}

/// Holds the one modal that is open, if any, and routes keys to it
#[derive(Debug, Clone, Default)]
pub struct ModalManager {
    active: Option<ActiveModal>,
}

impl ModalManager {
    #[must_use]
    pub const fn new() -> Self {
        Self { active: None }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn open_confirmation(&mut self, message: String, id: String) {
        self.active = Some(ActiveModal::Confirm(ConfirmationModal::new(message, id)));
    }

    pub fn open_view(&mut self, title: String, record: &Record) {
        self.active = Some(ActiveModal::View(RecordViewModal::new(title, record)));
    }

    pub fn open_new(&mut self, title: &str, fields: &[FormField]) {
        self.active = Some(ActiveModal::Form(RecordFormModal::new_record(title, fields)));
    }

    pub fn open_edit(&mut self, title: &str, fields: &[FormField], id: String, record: &Record) {
        self.active = Some(ActiveModal::Form(RecordFormModal::edit_record(
            title, fields, id, record,
        )));
    }

    pub fn close(&mut self) {
        self.active = None;
    }

    #[must_use]
    pub const fn form(&self) -> Option<&RecordFormModal> {
        match &self.active {
            Some(ActiveModal::Form(form)) => Some(form),
            Some(ActiveModal::Confirm(_) | ActiveModal::View(_)) | None => None,
        }
    }

    #[must_use]
    pub const fn confirmation(&self) -> Option<&ConfirmationModal> {
        match &self.active {
            Some(ActiveModal::Confirm(confirm)) => Some(confirm),
            Some(ActiveModal::Form(_) | ActiveModal::View(_)) | None => None,
        }
    }

    /// Route a key to the open modal, closing it once it is done
    pub fn handle_key_event(&mut self, key: KeyEvent) -> ModalAction {
        let (action, done) = match &mut self.active {
            Some(ActiveModal::Confirm(modal)) => modal.handle_key_event(key),
            Some(ActiveModal::View(modal)) => modal.handle_key_event(key),
            Some(ActiveModal::Form(modal)) => modal.handle_key_event(key),
            None => (ModalAction::None, false),
        };
        if done {
            self.active = None;
        }
        action
    }
}

impl Widget for &ModalManager {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.active {
            Some(ActiveModal::Confirm(modal)) => modal.render(area, buf),
            Some(ActiveModal::View(modal)) => modal.render(area, buf),
            Some(ActiveModal::Form(modal)) => modal.render(area, buf),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(manager: &mut ModalManager, text: &str) {
        for ch in text.chars() {
            manager.handle_key_event(press(KeyCode::Char(ch)));
        }
    }

    fn pricing_fields() -> [FormField; 3] {
        [
            FormField::text("priceTitle", "Title").required(),
            FormField::number("price", "Price"),
            FormField::list("options", "Options"),
        ]
    }

    #[test]
    fn test_confirmation_defaults_to_no() {
        let mut manager = ModalManager::new();
        manager.open_confirmation("Delete Ada?".to_string(), "u1".to_string());
        assert_eq!(manager.handle_key_event(press(KeyCode::Enter)), ModalAction::Cancel);
        assert!(!manager.is_open());
    }

    #[test]
    fn test_confirmation_yes_emits_delete() {
        let mut manager = ModalManager::new();
        manager.open_confirmation("Delete Ada?".to_string(), "u1".to_string());
        manager.handle_key_event(press(KeyCode::Left));
        assert_eq!(
            manager.handle_key_event(press(KeyCode::Enter)),
            ModalAction::ConfirmDelete {
                id: "u1".to_string()
            }
        );
    }

    #[test]
    fn test_form_builds_typed_record() {
        let mut manager = ModalManager::new();
        manager.open_new("Pricing", &pricing_fields());
        type_text(&mut manager, "Pro");
        manager.handle_key_event(press(KeyCode::Tab));
        type_text(&mut manager, "49.5");
        manager.handle_key_event(press(KeyCode::Tab));
        type_text(&mut manager, "email, chat,,");

        let action = manager.handle_key_event(press(KeyCode::Enter));
        let expected = Record::from_value(json!({
            "priceTitle": "Pro",
            "price": 49.5,
            "options": ["email", "chat"]
        }))
        .expect("record");
        assert_eq!(
            action,
            ModalAction::Save {
                mode: Mode::New,
                id: None,
                record: expected,
            }
        );
        assert!(!manager.is_open());
    }

    #[test]
    fn test_form_reports_missing_required_field() {
        let mut manager = ModalManager::new();
        manager.open_new("Pricing", &pricing_fields());
        assert_eq!(manager.handle_key_event(press(KeyCode::Enter)), ModalAction::None);
        assert!(manager.is_open());
        assert_eq!(
            manager.form().and_then(RecordFormModal::error),
            Some("Title is required")
        );
    }

    #[test]
    fn test_form_rejects_bad_number() {
        let mut form = RecordFormModal::new_record("Pricing", &pricing_fields());
        for ch in "Pro".chars() {
            form.handle_key_event(press(KeyCode::Char(ch)));
        }
        form.next_field();
        form.handle_key_event(press(KeyCode::Char('x')));
        assert_eq!(form.build_record(), Err(FormError::InvalidNumber("Price")));
    }

    #[test]
    fn test_edit_prefills_and_keeps_id() {
        let record = Record::from_value(json!({
            "_id": "p1",
            "priceTitle": "Basic",
            "price": 10,
            "options": ["a", "b"]
        }))
        .expect("record");
        let mut manager = ModalManager::new();
        manager.open_edit("Pricing", &pricing_fields(), "p1".to_string(), &record);
        assert_eq!(manager.form().and_then(|f| f.value("options")), Some("a, b"));

        let ModalAction::Save { mode, id, record } =
            manager.handle_key_event(press(KeyCode::Enter))
        else {
            panic!("expected save");
        };
        assert_eq!(mode, Mode::Edit);
        assert_eq!(id.as_deref(), Some("p1"));
        assert_eq!(record.get("price"), Some(&json!(10)));
    }

    #[test]
    fn test_untouched_fields_keep_stored_values() {
        let record = Record::from_value(json!({
            "_id": "p1",
            "priceTitle": 2024,
            "price": 10,
            "options": ["email, chat", "phone"]
        }))
        .expect("record");
        let form =
            RecordFormModal::edit_record("Pricing", &pricing_fields(), "p1".to_string(), &record);

        let saved = form.build_record().expect("record");
        assert_eq!(saved.get("priceTitle"), Some(&json!(2024)));
        assert_eq!(saved.get("options"), Some(&json!(["email, chat", "phone"])));
    }

    #[test]
    fn test_edited_list_is_split_again() {
        let record = Record::from_value(json!({
            "_id": "p1",
            "priceTitle": "Basic",
            "options": ["a", "b"]
        }))
        .expect("record");
        let mut form =
            RecordFormModal::edit_record("Pricing", &pricing_fields(), "p1".to_string(), &record);
        form.next_field();
        form.next_field();
        for ch in ", c".chars() {
            form.handle_key_event(press(KeyCode::Char(ch)));
        }

        let saved = form.build_record().expect("record");
        assert_eq!(saved.get("options"), Some(&json!(["a", "b", "c"])));
    }

    fn account_fields() -> [FormField; 2] {
        [
            FormField::text("name", "Name").required(),
            FormField::secret("password", "Password").required(),
        ]
    }

    #[test]
    fn test_secret_required_when_creating() {
        let mut form = RecordFormModal::new_record("User", &account_fields());
        form.handle_key_event(press(KeyCode::Char('a')));
        assert_eq!(form.build_record(), Err(FormError::MissingField("Password")));

        form.next_field();
        for ch in "hunter2".chars() {
            form.handle_key_event(press(KeyCode::Char(ch)));
        }
        let saved = form.build_record().expect("record");
        assert_eq!(saved.get("password"), Some(&json!("hunter2")));
    }

    #[test]
    fn test_secret_is_blank_and_optional_when_editing() {
        let record = Record::from_value(json!({ "_id": "u1", "name": "Ada", "password": "hash" }))
            .expect("record");
        let form =
            RecordFormModal::edit_record("User", &account_fields(), "u1".to_string(), &record);
        assert_eq!(form.value("password"), Some(""));

        let saved = form.build_record().expect("record");
        assert_eq!(saved.get("name"), Some(&json!("Ada")));
        assert!(saved.get("password").is_none());
    }

    #[test]
    fn test_secret_is_masked() {
        let mut form = RecordFormModal::new_record("User", &account_fields());
        form.next_field();
        for ch in "hunter2".chars() {
            form.handle_key_event(press(KeyCode::Char(ch)));
        }
        let mut buf = Buffer::empty(Rect::new(0, 0, 90, 12));
        (&form).render(buf.area, &mut buf);
        let text = buf
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect::<String>();
        assert!(!text.contains("hunter2"));
        assert!(text.contains("•••••••"));
    }

    #[test]
    fn test_cancel_button() {
        let mut manager = ModalManager::new();
        manager.open_new("Pricing", &pricing_fields());
        for _ in 0..4 {
            manager.handle_key_event(press(KeyCode::Tab));
        }
        assert_eq!(manager.handle_key_event(press(KeyCode::Enter)), ModalAction::Cancel);
    }

    #[test]
    fn test_view_lists_fields() {
        let record = Record::from_value(json!({ "_id": "m1", "userEmail": "a@x.io" }))
            .expect("record");
        let mut manager = ModalManager::new();
        manager.open_view("Message".to_string(), &record);
        let mut buf = Buffer::empty(Rect::new(0, 0, 90, 20));
        (&manager).render(buf.area, &mut buf);
        let text = (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .filter_map(|x| buf.cell((x, y)))
                    .map(ratatui::buffer::Cell::symbol)
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("userEmail"));
        assert!(text.contains("a@x.io"));
        assert_eq!(manager.handle_key_event(press(KeyCode::Esc)), ModalAction::Cancel);
        assert!(!manager.is_open());
    }
}
