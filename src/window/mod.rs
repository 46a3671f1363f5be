pub mod decorator;
mod layout;
pub mod manager;
pub mod stack;

use std::fmt;

use crate::dialogs::EditorSurface;
use crate::dnd::Direction;
use crate::geometry::{Geometry, Size};
use crate::surface::{ElementId, Surface};

pub use manager::{Desktop, DesktopConfig, DesktopEvent};
pub use stack::StackManager;

pub(crate) use layout::effective_geometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u64);

impl WindowId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// The three mutually exclusive layout states of a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

/// Last known Normal-state geometry. Each component may be unknown on its
/// own, e.g. a window created with only a position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SavedGeometry {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl SavedGeometry {
    pub fn from_geometry(g: Geometry) -> Self {
        Self {
            x: Some(g.x),
            y: Some(g.y),
            width: Some(g.width),
            height: Some(g.height),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Per-component instruction for [`Desktop::reset_stored_position`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Stored {
    #[default]
    Keep,
    Clear,
    Set(f64),
}

impl Stored {
    fn apply(self, slot: &mut Option<f64>) {
        match self {
            Stored::Keep => {}
            Stored::Clear => *slot = None,
            Stored::Set(value) => *slot = Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowOptions {
    pub title: String,
    /// Single glyph drawn before the title; double-clicking it closes.
    pub icon: Option<String>,
    pub close_button: bool,
    pub maximize_button: bool,
    pub minimize_button: bool,
    pub resizable: bool,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub min_size: Option<Size>,
    /// Minimum size as a fraction of the viewport, re-resolved on every
    /// viewport change. Takes precedence over `min_size`.
    pub min_size_fraction: Option<Size>,
    /// Dispose the window as soon as it is closed.
    pub dispose_on_close: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            icon: None,
            close_button: true,
            maximize_button: false,
            minimize_button: false,
            resizable: false,
            x: None,
            y: None,
            min_size: None,
            min_size_fraction: None,
            dispose_on_close: false,
        }
    }
}

impl WindowOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// A fully decorated, resizable dialog.
    pub fn dialog(title: impl Into<String>) -> Self {
        Self {
            minimize_button: true,
            maximize_button: true,
            resizable: true,
            ..Self::new(title)
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn with_min_size(mut self, min: Size) -> Self {
        self.min_size = Some(min);
        self
    }

    /// Minimum size tracking the viewport, e.g. `(0.5, 0.5)` for half of it.
    pub fn with_min_size_fraction(mut self, fraction: Size) -> Self {
        self.min_size_fraction = Some(fraction);
        self
    }

    pub fn disposing_on_close(mut self) -> Self {
        self.dispose_on_close = true;
        self
    }
}

/// Ids of the elements making up one window.
#[derive(Debug, Clone)]
pub struct WindowElements {
    pub root: ElementId,
    pub title_bar: ElementId,
    pub title_text: ElementId,
    pub icon: Option<ElementId>,
    pub controls: ElementId,
    pub minimize_button: Option<ElementId>,
    pub maximize_button: Option<ElementId>,
    pub close_button: Option<ElementId>,
    pub body: ElementId,
    pub handles: Vec<(Direction, ElementId)>,
}

impl WindowElements {
    fn build(surface: &mut Surface, id: WindowId, options: &WindowOptions) -> Self {
        let root = surface.create_element("div", &["window", "floating", "hidden"]);
        surface.set_attr(root, "id", id.to_string());
        if options.resizable {
            surface.add_class(root, "resizable");
        }
        surface.set_min_size(root, options.min_size);

        let mut handles = Vec::new();
        if options.resizable {
            for direction in Direction::ALL {
                let handle =
                    surface.create_element("div", &["resize-handle", direction.class_name()]);
                surface.append_child(root, handle);
                handles.push((direction, handle));
            }
        }

        let title_bar = surface.create_element("div", &["title-bar"]);
        surface.append_child(root, title_bar);
        let title_text = surface.create_element("div", &["title-bar-text"]);
        surface.append_child(title_bar, title_text);
        let icon = options.icon.as_ref().map(|glyph| {
            let icon = surface.create_element("span", &["icon"]);
            surface.set_text(icon, glyph.clone());
            surface.append_child(title_text, icon);
            icon
        });
        let label = surface.create_element("span", &["title-label"]);
        surface.set_text(label, options.title.clone());
        surface.append_child(title_text, label);

        let controls = surface.create_element("div", &["title-bar-controls"]);
        surface.append_child(title_bar, controls);
        let mut button = |enabled: bool, label: &str| {
            enabled.then(|| {
                let b = surface.create_element("button", &[]);
                surface.set_attr(b, "aria-label", label);
                surface.set_attr(b, "type", "button");
                surface.append_child(controls, b);
                b
            })
        };
        let minimize_button = button(options.minimize_button, "Minimize");
        let maximize_button = button(options.maximize_button, "Maximize");
        let close_button = button(options.close_button, "Close");

        let body = surface.create_element("div", &["window-body"]);
        surface.append_child(root, body);

        surface.append_child(surface.root(), root);

        Self {
            root,
            title_bar,
            title_text,
            icon,
            controls,
            minimize_button,
            maximize_button,
            close_button,
            body,
            handles,
        }
    }
}

/// One dialog window: its elements plus the state the desktop tracks for it.
#[derive(Debug)]
pub struct Window {
    id: WindowId,
    options: WindowOptions,
    elements: WindowElements,
    state: WindowState,
    saved: SavedGeometry,
    visible: bool,
    z_order: u32,
    focused: bool,
    editor: Option<Box<dyn EditorSurface>>,
}

impl Window {
    pub(crate) fn build(surface: &mut Surface, id: WindowId, options: WindowOptions) -> Self {
        let elements = WindowElements::build(surface, id, &options);
        let saved = SavedGeometry {
            x: options.x,
            y: options.y,
            ..SavedGeometry::default()
        };
        Self {
            id,
            options,
            elements,
            state: WindowState::Normal,
            saved,
            visible: false,
            z_order: 0,
            focused: false,
            editor: None,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.options.title
    }

    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    pub fn elements(&self) -> &WindowElements {
        &self.elements
    }

    pub fn root(&self) -> ElementId {
        self.elements.root
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn saved_geometry(&self) -> SavedGeometry {
        self.saved
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn z_order(&self) -> u32 {
        self.z_order
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn editor(&self) -> Option<&dyn EditorSurface> {
        self.editor.as_deref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut (dyn EditorSurface + 'static)> {
        self.editor.as_deref_mut()
    }

    pub(crate) fn set_editor(&mut self, editor: Option<Box<dyn EditorSurface>>) {
        self.editor = editor;
    }

    pub(crate) fn set_state(&mut self, state: WindowState) {
        self.state = state;
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_z_order(&mut self, z: u32) {
        self.z_order = z;
    }

    /// Mark the window focused or blurred, forwarding to the embedded editor.
    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if let Some(editor) = self.editor.as_mut() {
            if focused {
                editor.focus();
            } else {
                editor.blur();
            }
        }
    }

    pub(crate) fn saved_mut(&mut self) -> &mut SavedGeometry {
        &mut self.saved
    }

    /// Remember the live Normal-state geometry.
    pub(crate) fn capture_geometry(&mut self, surface: &Surface) {
        self.saved = SavedGeometry::from_geometry(effective_geometry(surface, self.elements.root));
    }

    pub(crate) fn reset_stored(&mut self, x: Stored, y: Stored, width: Stored, height: Stored) {
        x.apply(&mut self.saved.x);
        y.apply(&mut self.saved.y);
        width.apply(&mut self.saved.width);
        height.apply(&mut self.saved.height);
    }

    /// Project state onto classes, labels and the z-index.
    pub(crate) fn sync_classes(&self, surface: &mut Surface) {
        let el = &self.elements;
        surface.toggle_class(el.root, "hidden", !self.visible);
        surface.toggle_class(el.root, "minimized", self.state == WindowState::Minimized);
        surface.toggle_class(el.root, "maximized", self.state == WindowState::Maximized);
        surface.toggle_class(el.title_bar, "inactive", !self.focused);
        surface.set_z_index(el.root, Some(self.z_order));
        if let Some(button) = el.minimize_button {
            let label = if self.state == WindowState::Minimized {
                "Restore"
            } else {
                "Minimize"
            };
            surface.set_attr(button, "aria-label", label);
        }
        if let Some(button) = el.maximize_button {
            let label = if self.state == WindowState::Maximized {
                "Restore"
            } else {
                "Maximize"
            };
            surface.set_attr(button, "aria-label", label);
        }
    }

    pub(crate) fn layout(&mut self, surface: &mut Surface) {
        if let Some(fraction) = self.options.min_size_fraction {
            let viewport = surface.viewport();
            let min = Size::new(viewport.width * fraction.width, viewport.height * fraction.height);
            surface.set_min_size(self.elements.root, Some(min));
        }
        let editor_area = layout::layout_window(surface, &self.elements, self.state);
        if let (Some(editor), Some(area)) = (self.editor.as_mut(), editor_area) {
            editor.relayout(area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_produces_selector_friendly_tree() {
        let mut s = Surface::new(Size::new(80.0, 24.0));
        let w = Window::build(&mut s, WindowId::new(7), WindowOptions::dialog("Edit").with_icon("#"));
        let el = w.elements();
        assert_eq!(s.attr(el.root, "id"), Some("window-7"));
        assert!(s.has_class(el.root, "hidden"));
        assert_eq!(el.handles.len(), 8);
        assert_eq!(s.parent(el.title_bar), Some(el.root));
        // handles precede the title bar
        assert_eq!(s.children(el.root)[0], el.handles[0].1);
        assert_eq!(s.children(el.controls).len(), 3);
        assert!(s.has_class(el.handles[1].1, "dir-se"));
    }

    #[test]
    fn labels_follow_state() {
        let mut s = Surface::new(Size::new(80.0, 24.0));
        let mut w = Window::build(&mut s, WindowId::new(1), WindowOptions::dialog("x"));
        w.set_state(WindowState::Maximized);
        w.sync_classes(&mut s);
        let el = w.elements().clone();
        assert_eq!(s.attr(el.maximize_button.unwrap(), "aria-label"), Some("Restore"));
        assert_eq!(s.attr(el.minimize_button.unwrap(), "aria-label"), Some("Minimize"));
        assert!(s.has_class(el.root, "maximized"));
        assert!(!s.has_class(el.root, "minimized"));

        w.set_state(WindowState::Minimized);
        w.sync_classes(&mut s);
        assert_eq!(s.attr(el.maximize_button.unwrap(), "aria-label"), Some("Maximize"));
        assert_eq!(s.attr(el.minimize_button.unwrap(), "aria-label"), Some("Restore"));
        assert!(!s.has_class(el.root, "maximized"));
    }

    #[test]
    fn reset_stored_is_tri_state() {
        let mut s = Surface::new(Size::new(80.0, 24.0));
        let mut w = Window::build(
            &mut s,
            WindowId::new(1),
            WindowOptions::new("x").with_position(3.0, 4.0),
        );
        w.reset_stored(Stored::Keep, Stored::Clear, Stored::Set(30.0), Stored::Keep);
        assert_eq!(
            w.saved_geometry(),
            SavedGeometry {
                x: Some(3.0),
                y: None,
                width: Some(30.0),
                height: None,
            }
        );
    }
}
