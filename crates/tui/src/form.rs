//! Modal text forms used for login, registration, filters and bookings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    Secret,
    Choice { options: Vec<&'static str>, selected: usize },
}

#[derive(Debug, Clone)]
pub struct Field {
    pub label: &'static str,
    pub kind: FieldKind,
    input: String,
    cursor: usize,
}

impl Field {
    pub fn text(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Text,
            input: String::new(),
            cursor: 0,
        }
    }

    pub fn secret(label: &'static str) -> Self {
        Self {
            kind: FieldKind::Secret,
            ..Self::text(label)
        }
    }

    pub fn choice(label: &'static str, options: Vec<&'static str>, selected: usize) -> Self {
        let selected = selected.min(options.len().saturating_sub(1));
        Self {
            kind: FieldKind::Choice { options, selected },
            ..Self::text(label)
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.input = value.into();
        self.cursor = self.input.chars().count();
        self
    }

    pub fn value(&self) -> &str {
        match &self.kind {
            FieldKind::Choice { options, selected } => options.get(*selected).copied().unwrap_or(""),
            FieldKind::Text | FieldKind::Secret => &self.input,
        }
    }

    /// Text as it should appear on screen.
    pub fn display(&self) -> String {
        match &self.kind {
            FieldKind::Text => self.input.clone(),
            FieldKind::Secret => "•".repeat(self.input.chars().count()),
            FieldKind::Choice { options, selected } => options
                .iter()
                .enumerate()
                .map(|(idx, option)| {
                    if idx == *selected {
                        format!("[{option}]")
                    } else {
                        format!(" {option} ")
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn is_choice(&self) -> bool {
        matches!(self.kind, FieldKind::Choice { .. })
    }

    fn cycle(&mut self, delta: isize) {
        if let FieldKind::Choice { options, selected } = &mut self.kind {
            if options.is_empty() {
                return;
            }
            let len = options.len() as isize;
            *selected = ((*selected as isize + delta).rem_euclid(len)) as usize;
        }
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.input.len())
    }

    fn insert(&mut self, ch: char) {
        let idx = self.byte_index();
        self.input.insert(idx, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let idx = self.byte_index();
        self.input.remove(idx);
    }

    fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let idx = self.byte_index();
            self.input.remove(idx);
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.input.chars().count() as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, len) as usize;
    }
}

/// Result of feeding a key to a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Continue,
    Submit,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct Form {
    pub title: String,
    pub fields: Vec<Field>,
    pub focus: usize,
    pub error: Option<String>,
}

impl Form {
    pub fn new(title: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            title: title.into(),
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(Field::value).unwrap_or("")
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        let count = self.fields.len();
        let Some(field) = self.fields.get_mut(self.focus) else {
            return match key.code {
                KeyCode::Esc => FormAction::Cancel,
                _ => FormAction::Continue,
            };
        };
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => {
                if self.focus + 1 < count {
                    self.focus += 1;
                    return FormAction::Continue;
                }
                return FormAction::Submit;
            }
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % count,
            KeyCode::BackTab | KeyCode::Up => self.focus = (self.focus + count - 1) % count,
            KeyCode::Left if field.is_choice() => field.cycle(-1),
            KeyCode::Right if field.is_choice() => field.cycle(1),
            KeyCode::Char(' ') if field.is_choice() => field.cycle(1),
            KeyCode::Left => field.move_cursor(-1),
            KeyCode::Right => field.move_cursor(1),
            KeyCode::Home => field.move_cursor(isize::MIN / 2),
            KeyCode::End => field.move_cursor(isize::MAX / 2),
            KeyCode::Backspace => field.backspace(),
            KeyCode::Delete => field.delete(),
            KeyCode::Char('s') if key.modifiers == KeyModifiers::CONTROL => {
                return FormAction::Submit;
            }
            KeyCode::Char(ch) if !field.is_choice() => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    field.insert(ch);
                }
            }
            _ => {}
        }
        self.error = None;
        FormAction::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut Form, text: &str) {
        for ch in text.chars() {
            form.handle_key(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn enter_advances_then_submits() {
        let mut form = Form::new("Login", vec![Field::text("User"), Field::secret("Pass")]);
        type_text(&mut form, "john");
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Continue);
        type_text(&mut form, "pw");
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Submit);
        assert_eq!(form.value(0), "john");
        assert_eq!(form.value(1), "pw");
        assert_eq!(form.fields[1].display(), "••");
    }

    #[test]
    fn editing_respects_cursor() {
        let mut form = Form::new("Edit", vec![Field::text("Model").with_value("G650")]);
        form.handle_key(key(KeyCode::Home));
        type_text(&mut form, "Gulfstream ");
        form.handle_key(key(KeyCode::End));
        form.handle_key(key(KeyCode::Backspace));
        assert_eq!(form.value(0), "Gulfstream G65");
    }

    #[test]
    fn choice_fields_cycle() {
        let mut form = Form::new(
            "Trip",
            vec![Field::choice("Trip", vec!["One-way", "Round-trip"], 0)],
        );
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.value(0), "Round-trip");
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.value(0), "One-way");
        form.handle_key(key(KeyCode::Left));
        assert_eq!(form.value(0), "Round-trip");
        // Typing into a choice field is ignored.
        type_text(&mut form, "x");
        assert_eq!(form.value(0), "Round-trip");
    }

    #[test]
    fn escape_cancels() {
        let mut form = Form::new("Any", vec![Field::text("A")]);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormAction::Cancel);
    }
}
