use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, MouseEventKind};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::keyboard::KeyboardNormalizer;
use super::{InputDriver, OutputDriver};
use crate::ui::UiFrame;

/// Reads the terminal, normalizing keys and collapsing bursts of drag
/// reports and resizes into the most recent one. A drag only ever moves a
/// window to where the pointer is now, so intermediate cells are noise once
/// a frame falls behind.
#[derive(Debug, Default)]
pub struct ConsoleInputDriver {
    normalizer: KeyboardNormalizer,
    motion: MotionCoalescer,
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_normalized(&mut self) -> io::Result<Event> {
        loop {
            if let Some(event) = self.normalizer.normalize(crossterm::event::read()?) {
                return Ok(event);
            }
        }
    }
}

impl InputDriver for ConsoleInputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if self.motion.has_held() {
            return Ok(true);
        }
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        let first = match self.motion.take_held() {
            Some(event) => event,
            None => self.read_normalized()?,
        };
        let normalizer = &mut self.normalizer;
        self.motion.coalesce(first, || {
            while crossterm::event::poll(Duration::ZERO)? {
                if let Some(event) = normalizer.normalize(crossterm::event::read()?) {
                    return Ok(Some(event));
                }
            }
            Ok(None)
        })
    }
}

/// Keeps the first event that interrupted a run of superseded motion so it
/// is delivered next, in order.
#[derive(Debug, Default)]
struct MotionCoalescer {
    held: Option<Event>,
}

impl MotionCoalescer {
    fn has_held(&self) -> bool {
        self.held.is_some()
    }

    fn take_held(&mut self) -> Option<Event> {
        self.held.take()
    }

    /// `ready` yields events that are already buffered, never blocking.
    fn coalesce(
        &mut self,
        first: Event,
        mut ready: impl FnMut() -> io::Result<Option<Event>>,
    ) -> io::Result<Event> {
        let mut current = first;
        while is_motion(&current) {
            let Some(next) = ready()? else {
                break;
            };
            if supersedes(&current, &next) {
                current = next;
            } else {
                self.held = Some(next);
                break;
            }
        }
        Ok(current)
    }
}

fn is_motion(event: &Event) -> bool {
    match event {
        Event::Mouse(mouse) => matches!(mouse.kind, MouseEventKind::Drag(_)),
        Event::Resize(..) => true,
        _ => false,
    }
}

/// Same button with the same modifiers, or two resizes.
fn supersedes(current: &Event, next: &Event) -> bool {
    match (current, next) {
        (Event::Mouse(a), Event::Mouse(b)) => {
            matches!(a.kind, MouseEventKind::Drag(_))
                && a.kind == b.kind
                && a.modifiers == b.modifiers
        }
        (Event::Resize(..), Event::Resize(..)) => true,
        _ => false,
    }
}

/// Owns the real terminal: alternate screen, raw mode and mouse reporting
/// are switched on together and restored together, including on drop.
pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self {
            terminal,
            active: false,
        })
    }
}

impl OutputDriver for ConsoleOutputDriver {
    fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        terminal::enable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            EnterAlternateScreen,
            EnableMouseCapture
        )?;
        self.active = true;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let restored = execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        terminal::disable_raw_mode()?;
        restored?;
        self.terminal.show_cursor()
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        self.terminal
            .draw(|frame| f(UiFrame::new(frame)))
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
