use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::geometry::Geometry;

/// The text editing surface embedded in a window body.
///
/// Values always use `\n` line breaks; callers that need another convention
/// convert on the way out.
pub trait EditorSurface: std::fmt::Debug {
    fn focus(&mut self);
    fn blur(&mut self);
    /// The box the editor occupies changed (or may have).
    fn relayout(&mut self, area: Geometry);
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);

    fn is_focused(&self) -> bool;

    /// Feed a key press. Returns `true` when the key was used.
    fn handle_key(&mut self, _key: &KeyEvent) -> bool {
        false
    }

    /// Caret position as (column, row) inside the editor area.
    fn cursor(&self) -> (usize, usize) {
        (0, 0)
    }
}

/// Minimal multi-line text buffer with a single caret.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    /// Caret as a byte offset into `text`, always on a char boundary.
    caret: usize,
    focused: bool,
    area: Option<Geometry>,
}

impl TextBuffer {
    pub fn new(text: &str) -> Self {
        let mut buffer = Self::default();
        buffer.set_value(text);
        buffer
    }

    pub fn area(&self) -> Option<Geometry> {
        self.area
    }

    pub fn insert(&mut self, ch: char) {
        self.text.insert(self.caret, ch);
        self.caret += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.text[..self.caret].chars().next_back() {
            self.caret -= prev.len_utf8();
            self.text.remove(self.caret);
        }
    }

    pub fn delete(&mut self) {
        if self.caret < self.text.len() {
            self.text.remove(self.caret);
        }
    }

    fn left(&mut self) {
        if let Some(prev) = self.text[..self.caret].chars().next_back() {
            self.caret -= prev.len_utf8();
        }
    }

    fn right(&mut self) {
        if let Some(next) = self.text[self.caret..].chars().next() {
            self.caret += next.len_utf8();
        }
    }

    fn line_start(&self) -> usize {
        self.text[..self.caret].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self) -> usize {
        self.text[self.caret..]
            .find('\n')
            .map(|i| self.caret + i)
            .unwrap_or(self.text.len())
    }
}

impl EditorSurface for TextBuffer {
    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn relayout(&mut self, area: Geometry) {
        self.area = Some(area);
    }

    fn value(&self) -> String {
        self.text.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.text = value.replace("\r\n", "\n");
        self.caret = self.text.len();
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if !self.focused
            || key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        match key.code {
            KeyCode::Char(ch) => self.insert(ch),
            KeyCode::Enter => self.insert('\n'),
            KeyCode::Tab => self.insert('\t'),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.left(),
            KeyCode::Right => self.right(),
            KeyCode::Home => self.caret = self.line_start(),
            KeyCode::End => self.caret = self.line_end(),
            _ => return false,
        }
        true
    }

    fn cursor(&self) -> (usize, usize) {
        let before = &self.text[..self.caret];
        let row = before.matches('\n').count();
        let col = before[self.line_start()..].chars().count();
        (col, row)
    }
}
