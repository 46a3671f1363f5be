//! The interactive desktop: an input dialog whose applied text opens result
//! windows.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Style};
use tokio::sync::oneshot::error::TryRecvError;

use crate::config::Config;
use crate::dialogs::{InputDialog, InputReceiver, ResultDialog};
use crate::event_loop::{App, ControlFlow};
use crate::geometry::Size;
use crate::pointer::PointerAdapter;
use crate::render::render_desktop;
use crate::surface::SelectorError;
use crate::ui::UiFrame;
use crate::window::decorator::OpenStepDecorator;
use crate::window::{Desktop, Stored};

const HINT: &str = " s: edit stdin  Esc: cancel  Ctrl+R: recenter  Ctrl+Q: quit ";

#[derive(Debug)]
pub struct DesktopApp {
    desktop: Desktop,
    pointer: PointerAdapter,
    input: InputDialog,
    results: Vec<ResultDialog>,
    pending: Option<InputReceiver>,
    last_input: Option<String>,
    decorator: OpenStepDecorator,
}

impl DesktopApp {
    pub fn new(config: &Config, viewport: Size) -> Result<Self, SelectorError> {
        let mut desktop = Desktop::new(viewport, config.desktop())?;
        let input = InputDialog::new(&mut desktop);
        Ok(Self {
            desktop,
            pointer: PointerAdapter::new(),
            input,
            results: Vec::new(),
            pending: None,
            last_input: config.initial.clone(),
            decorator: OpenStepDecorator,
        })
    }

    pub fn desktop(&self) -> &Desktop {
        &self.desktop
    }

    pub fn desktop_mut(&mut self) -> &mut Desktop {
        &mut self.desktop
    }

    pub fn input(&self) -> &InputDialog {
        &self.input
    }

    pub fn results(&self) -> &[ResultDialog] {
        &self.results
    }

    /// Show the input dialog preloaded with the last applied text.
    pub fn open_input(&mut self) {
        match self
            .input
            .show_and_wait(&mut self.desktop, self.last_input.as_deref())
        {
            Ok(rx) => self.pending = Some(rx),
            Err(err) => tracing::debug!(%err, "input dialog not reopened"),
        }
    }

    fn dispatch_desktop_events(&mut self) {
        for event in self.desktop.take_events() {
            self.input.handle_event(&mut self.desktop, &event);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> ControlFlow {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') if ctrl => return ControlFlow::Quit,
            KeyCode::Char('r') if ctrl => {
                self.desktop.reset_stored_position(
                    self.input.window(),
                    Stored::Clear,
                    Stored::Clear,
                    Stored::Clear,
                    Stored::Clear,
                );
                return ControlFlow::Continue;
            }
            KeyCode::Esc => {
                if let Some(cancel) = self.pointer.cancel(self.desktop.surface()) {
                    self.desktop.handle_pointer(&cancel);
                } else if self.input.is_open() {
                    self.input.cancel(&mut self.desktop);
                }
                self.dispatch_desktop_events();
                return ControlFlow::Continue;
            }
            _ => {}
        }
        if self.desktop.handle_key(&key) {
            return ControlFlow::Continue;
        }
        if key.code == KeyCode::Char('s') && !ctrl {
            self.open_input();
        }
        ControlFlow::Continue
    }

    fn show_result(&mut self, text: String) {
        let dialog = ResultDialog::new(&mut self.desktop);
        dialog.set_text(&mut self.desktop, text);
        dialog.show(&mut self.desktop);
        self.results.push(dialog);
    }
}

impl App for DesktopApp {
    fn handle_event(&mut self, event: Event) -> ControlFlow {
        match event {
            Event::Key(key) => return self.handle_key(key),
            Event::Mouse(mouse) => {
                if let Some(pointer) = self.pointer.translate(self.desktop.surface(), &mouse) {
                    self.desktop.handle_pointer(&pointer);
                    self.dispatch_desktop_events();
                }
            }
            Event::Resize(cols, rows) => {
                self.desktop
                    .set_viewport(Size::new(f64::from(cols), f64::from(rows)));
            }
            _ => {}
        }
        ControlFlow::Continue
    }

    fn tick(&mut self) -> ControlFlow {
        if let Some(rx) = self.pending.as_mut() {
            match rx.try_recv() {
                Ok(value) => {
                    self.pending = None;
                    if let Some(text) = value {
                        tracing::info!(bytes = text.len(), "input applied");
                        self.last_input = Some(text.clone());
                        self.show_result(text);
                    }
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => self.pending = None,
            }
        }
        let desktop = &self.desktop;
        self.results.retain(|r| !r.is_disposed(desktop));
        ControlFlow::Continue
    }

    fn render(&mut self, mut frame: UiFrame<'_>) {
        render_desktop(&mut frame, &self.desktop, &self.decorator);
        let area = frame.area();
        if area.height > 0 {
            let y = i32::from(area.bottom()) - 1;
            frame.set_string_signed(
                i32::from(area.x),
                y,
                i32::from(area.right()),
                HINT,
                Style::default().fg(Color::Black).bg(Color::Gray),
            );
        }
    }
}
