//! Dialogs built on top of the desktop: a modal text input and a read-only
//! result viewer.

mod editor;

use thiserror::Error;
use tokio::sync::oneshot;

pub use editor::{EditorSurface, TextBuffer};

use crate::geometry::Size;
use crate::surface::ElementId;
use crate::window::{Desktop, DesktopEvent, WindowId, WindowOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DialogError {
    #[error("dialog already open")]
    AlreadyOpen,
    #[error("{0} no longer exists")]
    Disposed(WindowId),
}

/// Result delivered by [`InputDialog::show_and_wait`]: the edited text on
/// apply, the initial value on cancel or close.
pub type InputReceiver = oneshot::Receiver<Option<String>>;

fn field_button(desktop: &mut Desktop, row: ElementId, label: &str) -> ElementId {
    let surface = desktop.surface_mut();
    let button = surface.create_element("button", &[]);
    surface.set_attr(button, "type", "button");
    surface.set_text(button, label);
    surface.append_child(row, button);
    button
}

/// Modal text editor window.
#[derive(Debug)]
pub struct InputDialog {
    window: WindowId,
    crlf_toggle: ElementId,
    apply_button: ElementId,
    cancel_button: ElementId,
    original: Option<String>,
    pending: Option<oneshot::Sender<Option<String>>>,
}

impl InputDialog {
    pub fn new(desktop: &mut Desktop) -> Self {
        Self::with_editor(desktop, Box::new(TextBuffer::default()))
    }

    pub fn with_editor(desktop: &mut Desktop, editor: Box<dyn EditorSurface>) -> Self {
        let window = desktop.create_window(
            WindowOptions::dialog("Edit STDIN")
                .with_icon("✎")
                .with_min_size_fraction(Size::new(0.5, 0.5)),
        );
        desktop.attach_editor(window, editor);

        let body = desktop
            .window(window)
            .map(|w| w.elements().body)
            .unwrap_or_else(|| desktop.surface().root());
        let surface = desktop.surface_mut();
        let row = surface.create_element("div", &["field-row", "align-right"]);
        surface.append_child(body, row);
        let crlf_toggle = surface.create_element("label", &["checkbox"]);
        surface.set_text(crlf_toggle, "Break Line Using CRLF");
        surface.set_attr(crlf_toggle, "checked", "");
        surface.append_child(row, crlf_toggle);
        let apply_button = field_button(desktop, row, "Apply");
        let cancel_button = field_button(desktop, row, "Cancel");
        desktop.relayout();

        Self {
            window,
            crlf_toggle,
            apply_button,
            cancel_button,
            original: None,
            pending: None,
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn apply_button(&self) -> ElementId {
        self.apply_button
    }

    pub fn cancel_button(&self) -> ElementId {
        self.cancel_button
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn crlf(&self, desktop: &Desktop) -> bool {
        desktop.surface().attr(self.crlf_toggle, "checked").is_some()
    }

    pub fn set_crlf(&self, desktop: &mut Desktop, crlf: bool) {
        let surface = desktop.surface_mut();
        if crlf {
            surface.set_attr(self.crlf_toggle, "checked", "");
        } else {
            surface.remove_attr(self.crlf_toggle, "checked");
        }
    }

    /// Current editor text with the selected line breaks.
    pub fn value(&self, desktop: &Desktop) -> Option<String> {
        let text = desktop.window(self.window)?.editor()?.value();
        Some(if self.crlf(desktop) {
            text.replace('\n', "\r\n")
        } else {
            text
        })
    }

    /// Load `value` into the editor and remember it as the cancel result.
    pub fn set_value(&mut self, desktop: &mut Desktop, value: Option<&str>) {
        self.original = value.map(str::to_string);
        if let Some(editor) = desktop.window_mut(self.window).and_then(|w| w.editor_mut()) {
            editor.set_value(value.unwrap_or_default());
        }
    }

    /// Open the dialog with `initial` loaded. While it is already open the
    /// dialog is only focused and the call fails.
    pub fn show_and_wait(
        &mut self,
        desktop: &mut Desktop,
        initial: Option<&str>,
    ) -> Result<InputReceiver, DialogError> {
        if self.pending.is_some() {
            desktop.focus(self.window);
            return Err(DialogError::AlreadyOpen);
        }
        if desktop.window(self.window).is_none() {
            return Err(DialogError::Disposed(self.window));
        }
        self.set_value(desktop, initial);
        desktop.show(self.window);
        let (tx, rx) = oneshot::channel();
        self.pending = Some(tx);
        tracing::debug!(window_id = %self.window, "input dialog waiting");
        Ok(rx)
    }

    pub fn apply(&mut self, desktop: &mut Desktop) {
        let value = self.value(desktop);
        let pending = self.pending.take();
        desktop.close(self.window);
        if let Some(tx) = pending {
            let _ = tx.send(value);
        }
    }

    pub fn cancel(&mut self, desktop: &mut Desktop) {
        desktop.close(self.window);
        self.resolve_original();
    }

    fn resolve_original(&mut self) {
        if let Some(tx) = self.pending.take() {
            let _ = tx.send(self.original.clone());
        }
    }

    /// React to a desktop event. Returns `true` if it concerned this dialog.
    pub fn handle_event(&mut self, desktop: &mut Desktop, event: &DesktopEvent) -> bool {
        match *event {
            DesktopEvent::Closed(id) if id == self.window => {
                self.resolve_original();
                true
            }
            DesktopEvent::Clicked { window, element } if window == self.window => {
                let surface = desktop.surface();
                if surface.is_ancestor_or_self(self.apply_button, element) {
                    self.apply(desktop);
                } else if surface.is_ancestor_or_self(self.cancel_button, element) {
                    self.cancel(desktop);
                } else if surface.is_ancestor_or_self(self.crlf_toggle, element) {
                    let crlf = self.crlf(desktop);
                    self.set_crlf(desktop, !crlf);
                }
                true
            }
            _ => false,
        }
    }

    pub fn dispose(mut self, desktop: &mut Desktop) {
        self.resolve_original();
        desktop.dispose(self.window);
    }
}

/// Read-only text window. Closing it disposes it.
#[derive(Debug, Clone, Copy)]
pub struct ResultDialog {
    window: WindowId,
    content: ElementId,
}

impl ResultDialog {
    pub fn new(desktop: &mut Desktop) -> Self {
        let window = desktop.create_window(
            WindowOptions::dialog("Execution Result")
                .with_icon("▶")
                .with_min_size(Size::new(24.0, 8.0))
                .disposing_on_close(),
        );
        let body = desktop
            .window(window)
            .map(|w| w.elements().body)
            .unwrap_or_else(|| desktop.surface().root());
        let surface = desktop.surface_mut();
        let content = surface.create_element("pre", &["result-text", "monospace"]);
        surface.set_attr(content, "readonly", "");
        surface.append_child(body, content);
        desktop.relayout();
        Self { window, content }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn text<'a>(&self, desktop: &'a Desktop) -> Option<&'a str> {
        desktop.window(self.window)?;
        Some(desktop.surface().text(self.content))
    }

    pub fn set_text(&self, desktop: &mut Desktop, text: impl Into<String>) -> bool {
        desktop.surface_mut().set_text(self.content, text)
    }

    pub fn show(&self, desktop: &mut Desktop) -> bool {
        desktop.show(self.window)
    }

    pub fn is_disposed(&self, desktop: &Desktop) -> bool {
        desktop.window(self.window).is_none()
    }
}
