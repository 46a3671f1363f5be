//! `KeyboardNormalizer` filters raw key events down to presses.
//!
//! Some terminals report releases and auto-repeats. Esc cancels the gesture in
//! progress, so a held Esc must only count once.
use crossterm::event::{Event, KeyCode, KeyEventKind};

#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        match evt {
            Event::Key(key) => {
                match key.kind {
                    KeyEventKind::Release => {
                        if key.code == KeyCode::Esc {
                            self.esc_down = false;
                        }
                        return None;
                    }
                    KeyEventKind::Repeat if key.code == KeyCode::Esc => return None,
                    KeyEventKind::Repeat | KeyEventKind::Press => {}
                }
                if key.code == KeyCode::Esc {
                    if self.esc_down && cfg!(windows) {
                        return None;
                    }
                    self.esc_down = true;
                } else {
                    self.esc_down = false;
                }
                Some(Event::Key(key))
            }
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        let mut key = KeyEvent::new(code, KeyModifiers::NONE);
        key.kind = kind;
        Event::Key(key)
    }

    #[test]
    fn release_key_is_ignored() {
        let mut norm = KeyboardNormalizer::new();
        assert!(norm.normalize(key(KeyCode::Char('a'), KeyEventKind::Release)).is_none());
    }

    #[test]
    fn esc_repeat_is_dropped_but_char_repeat_kept() {
        let mut norm = KeyboardNormalizer::new();
        assert!(norm.normalize(key(KeyCode::Esc, KeyEventKind::Press)).is_some());
        assert!(norm.normalize(key(KeyCode::Esc, KeyEventKind::Repeat)).is_none());
        assert!(norm.normalize(key(KeyCode::Char('a'), KeyEventKind::Repeat)).is_some());
    }

    #[test]
    fn non_key_events_pass_through() {
        let mut norm = KeyboardNormalizer::new();
        assert!(norm.normalize(Event::Resize(10, 20)).is_some());
    }
}
