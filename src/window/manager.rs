use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use tracing::{debug, trace};

use super::{Stored, Window, WindowId, WindowOptions, WindowState};
use crate::constants::{DEFAULT_DOUBLE_CLICK, DRAG_SELECTOR, RESIZE_SELECTOR, WINDOW_SELECTOR};
use crate::dialogs::EditorSurface;
use crate::dnd::{
    DragEngine, DragOutcome, PlainDrag, PointerEvent, PointerId, PointerKind, ResizeConfig,
    ResizeDrag,
};
use crate::geometry::{self, Geometry, Size};
use crate::surface::{ElementId, Selector, SelectorError, Surface};

use super::stack::StackManager;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesktopConfig {
    pub double_click: Duration,
    pub resize: ResizeConfig,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            double_click: DEFAULT_DOUBLE_CLICK,
            resize: ResizeConfig::default(),
        }
    }
}

/// Things that happened to windows which their owners may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopEvent {
    Closed(WindowId),
    /// A click inside a window that the chrome did not consume.
    Clicked { window: WindowId, element: ElementId },
}

/// Owns the surface, every window on it and the gesture engines.
#[derive(Debug)]
pub struct Desktop {
    surface: Surface,
    windows: BTreeMap<WindowId, Window>,
    roots: BTreeMap<ElementId, WindowId>,
    stack: StackManager,
    drag: DragEngine<PlainDrag>,
    resize: DragEngine<ResizeDrag>,
    window_selector: Selector,
    config: DesktopConfig,
    next_id: u64,
    presses: BTreeMap<PointerId, ElementId>,
    last_click: Option<(ElementId, Instant)>,
    events: Vec<DesktopEvent>,
}

impl Desktop {
    pub fn new(viewport: Size, config: DesktopConfig) -> Result<Self, SelectorError> {
        let surface = Surface::new(viewport);
        let root = surface.root();
        let mut drag = DragEngine::new(PlainDrag::new());
        drag.bind(DRAG_SELECTOR, Some(WINDOW_SELECTOR), root)?;
        let mut resize = DragEngine::new(ResizeDrag::new(config.resize));
        resize.bind(RESIZE_SELECTOR, Some(WINDOW_SELECTOR), root)?;
        Ok(Self {
            surface,
            windows: BTreeMap::new(),
            roots: BTreeMap::new(),
            stack: StackManager::new(),
            drag,
            resize,
            window_selector: Selector::parse(WINDOW_SELECTOR)?,
            config,
            next_id: 1,
            presses: BTreeMap::new(),
            last_click: None,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> DesktopConfig {
        self.config
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Direct surface access for builders adding content to window bodies.
    /// Call [`Desktop::relayout`] afterwards.
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn stack(&self) -> &StackManager {
        &self.stack
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(&id)
    }

    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.stack.focused()
    }

    /// Visible windows from the bottom of the stack to the top.
    pub fn draw_order(&self) -> Vec<WindowId> {
        self.stack.ordered(&self.windows)
    }

    /// Window owning `element`, if any.
    pub fn window_of(&self, element: ElementId) -> Option<WindowId> {
        let root = self.surface.closest(element, &self.window_selector)?;
        self.roots.get(&root).copied()
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.surface.set_viewport(viewport);
        self.relayout();
    }

    fn container(&self) -> Geometry {
        let viewport = self.surface.viewport();
        Geometry::new(0.0, 0.0, viewport.width, viewport.height)
    }

    /// Re-project every window onto the surface.
    pub fn relayout(&mut self) {
        for window in self.windows.values_mut() {
            window.sync_classes(&mut self.surface);
            window.layout(&mut self.surface);
        }
    }

    /// Build a hidden window. Call [`Desktop::show`] to put it on screen.
    pub fn create_window(&mut self, options: WindowOptions) -> WindowId {
        let id = WindowId::new(self.next_id);
        self.next_id += 1;
        let window = Window::build(&mut self.surface, id, options);
        self.roots.insert(window.root(), id);
        debug!(window_id = %id, title = window.title(), "created window");
        self.windows.insert(id, window);
        self.relayout();
        id
    }

    /// Embed `editor` at the top of the window body.
    pub fn attach_editor(&mut self, id: WindowId, editor: Box<dyn EditorSurface>) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        let body = window.elements().body;
        let container = self.surface.create_element("div", &["editor-container"]);
        let first = self.surface.children(body).first().copied();
        self.surface.insert_before(body, container, first);
        window.set_editor(Some(editor));
        if window.is_focused()
            && let Some(editor) = window.editor_mut()
        {
            editor.focus();
        }
        self.relayout();
        true
    }

    /// Put the window on screen and focus it. A window that was left
    /// minimized or maximized comes back that way; a Normal one is placed
    /// from its saved geometry.
    pub fn show(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        let was_hidden = !window.is_visible();
        window.set_visible(true);
        if was_hidden && window.state() == WindowState::Normal {
            self.place_normal(id);
        }
        self.stack.insert(id);
        debug!(window_id = %id, was_hidden, "show window");
        self.focus(id)
    }

    /// Raise the window above all other visible windows and make it the
    /// only active one.
    pub fn focus(&mut self, id: WindowId) -> bool {
        if !self.windows.get(&id).is_some_and(Window::is_visible) {
            return false;
        }
        let previous = self.stack.focused();
        self.stack.bring_to_front(&mut self.windows, id);
        if previous != Some(id) {
            trace!(window_id = %id, ?previous, "focus window");
        }
        self.relayout();
        true
    }

    pub fn minimize(&mut self, id: WindowId) -> bool {
        self.enter_state(id, WindowState::Minimized)
    }

    pub fn maximize(&mut self, id: WindowId) -> bool {
        self.enter_state(id, WindowState::Maximized)
    }

    fn enter_state(&mut self, id: WindowId, state: WindowState) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        match window.state() {
            current if current == state => return false,
            WindowState::Normal => window.capture_geometry(&self.surface),
            _ => {}
        }
        window.set_state(state);
        debug!(window_id = %id, ?state, "window state changed");
        self.relayout();
        true
    }

    /// Return a minimized or maximized window to Normal at its saved
    /// geometry. `false` when it already is Normal.
    pub fn restore(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        if window.state() == WindowState::Normal {
            return false;
        }
        window.set_state(WindowState::Normal);
        self.place_normal(id);
        debug!(window_id = %id, "window restored");
        self.relayout();
        true
    }

    pub fn toggle_minimize(&mut self, id: WindowId) -> bool {
        match self.windows.get(&id).map(Window::state) {
            Some(WindowState::Minimized) => self.restore(id),
            Some(_) => self.minimize(id),
            None => false,
        }
    }

    pub fn toggle_maximize(&mut self, id: WindowId) -> bool {
        match self.windows.get(&id).map(Window::state) {
            Some(WindowState::Maximized) => self.restore(id),
            Some(_) => self.maximize(id),
            None => false,
        }
    }

    /// Write the saved geometry back onto the surface, centering whatever
    /// is unknown. Unknown sizes default to half the container.
    fn place_normal(&mut self, id: WindowId) {
        let Some(window) = self.windows.get(&id) else {
            return;
        };
        let root = window.root();
        let saved = window.saved_geometry();
        let container = self.container();
        let fallback = Size::new(container.width / 2.0, container.height / 2.0);
        let style = self.surface.style(root).cloned().unwrap_or_default();

        let width = saved.width.or(style.width).unwrap_or(fallback.width);
        let height = saved.height.or(style.height).unwrap_or(fallback.height);
        self.surface.set_width(root, Some(width));
        self.surface.set_height(root, Some(height));

        let centered = container.centered(Size::new(
            saved.width.unwrap_or(fallback.width),
            saved.height.unwrap_or(fallback.height),
        ));
        let x = saved.x.unwrap_or(centered.x);
        let y = saved.y.unwrap_or(centered.y);
        geometry::set_offset(&mut self.surface, root, x, y);
    }

    /// Change the remembered Normal geometry without touching the window.
    pub fn reset_stored_position(
        &mut self,
        id: WindowId,
        x: Stored,
        y: Stored,
        width: Stored,
        height: Stored,
    ) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        window.reset_stored(x, y, width, height);
        true
    }

    /// Hide the window and hand the focus to the highest remaining one.
    /// `false` when it was already hidden.
    pub fn close(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        if !window.is_visible() {
            return false;
        }
        if window.state() == WindowState::Normal {
            window.capture_geometry(&self.surface);
        }
        window.set_visible(false);
        window.set_focused(false);
        let dispose = window.options().dispose_on_close;

        self.stack.remove(&mut self.windows, id);
        let next = self.stack.topmost_visible(&self.windows);
        self.stack.set_focus(&mut self.windows, next);
        debug!(window_id = %id, next = ?next, "closed window");
        self.events.push(DesktopEvent::Closed(id));

        if dispose {
            self.dispose(id);
        } else {
            self.relayout();
        }
        true
    }

    /// Remove the window for good. Gestures still running on it finish
    /// without effect.
    pub fn dispose(&mut self, id: WindowId) -> bool {
        let was_focused = self.stack.focused() == Some(id);
        self.stack.remove(&mut self.windows, id);
        let Some(window) = self.windows.remove(&id) else {
            return false;
        };
        self.roots.remove(&window.root());
        self.surface.remove(window.root());
        if was_focused {
            let next = self.stack.topmost_visible(&self.windows);
            self.stack.set_focus(&mut self.windows, next);
        }
        debug!(window_id = %id, "disposed window");
        self.relayout();
        true
    }

    /// Events produced since the last call.
    pub fn take_events(&mut self) -> Vec<DesktopEvent> {
        std::mem::take(&mut self.events)
    }

    /// Forward a key press to the focused window's editor.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let Some(id) = self.stack.focused() else {
            return false;
        };
        self.windows
            .get_mut(&id)
            .and_then(Window::editor_mut)
            .is_some_and(|editor| editor.handle_key(key))
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        self.handle_pointer_at(event, Instant::now())
    }

    /// Route one pointer event. Returns `true` when it was consumed by a
    /// gesture or a click on a window.
    pub fn handle_pointer_at(&mut self, event: &PointerEvent, now: Instant) -> bool {
        if event.kind == PointerKind::Down
            && let Some(id) = self.window_of(event.target)
        {
            self.focus(id);
        }

        let outcome = self.drive_engines(event);
        match outcome {
            DragOutcome::Started { target, .. } => {
                self.surface.add_class(target, "dragging");
                if let Some(id) = self.roots.get(&target).copied() {
                    self.focus(id);
                }
            }
            DragOutcome::Moved { .. } => self.relayout(),
            DragOutcome::Ended { target, .. } | DragOutcome::Cancelled { target, .. } => {
                self.surface.remove_class(target, "dragging");
                self.relayout();
            }
            DragOutcome::Ignored => {}
        }

        let clicked = self.track_click(event, now);
        outcome.is_consumed() || clicked
    }

    /// A window is moved or resized by one gesture at a time, whichever
    /// engine owns it, and a pointer drives at most one gesture.
    fn drive_engines(&mut self, event: &PointerEvent) -> DragOutcome {
        if event.kind == PointerKind::Down
            && (self.drag.session(event.pointer_id).is_some()
                || self.resize.session(event.pointer_id).is_some())
        {
            trace!(pointer_id = event.pointer_id, "pointer already in a gesture");
            return DragOutcome::Ignored;
        }
        if event.kind != PointerKind::Down {
            let outcome = self.drag.handle(&mut self.surface, event);
            if outcome.is_consumed() {
                return outcome;
            }
            return self.resize.handle(&mut self.surface, event);
        }
        let root = self
            .window_of(event.target)
            .and_then(|id| self.windows.get(&id))
            .map(Window::root);
        if !root.is_some_and(|r| self.resize.is_in_use(r)) {
            let outcome = self.drag.handle(&mut self.surface, event);
            if outcome.is_consumed() {
                return outcome;
            }
        }
        if root.is_some_and(|r| self.drag.is_in_use(r)) {
            return DragOutcome::Ignored;
        }
        self.resize.handle(&mut self.surface, event)
    }

    fn track_click(&mut self, event: &PointerEvent, now: Instant) -> bool {
        match event.kind {
            PointerKind::Down => {
                self.presses.insert(event.pointer_id, event.target);
                false
            }
            PointerKind::Up => {
                if self.presses.remove(&event.pointer_id) == Some(event.target) {
                    self.click(event.target, now)
                } else {
                    false
                }
            }
            PointerKind::Cancel => {
                self.presses.remove(&event.pointer_id);
                false
            }
            PointerKind::Move => false,
        }
    }

    fn click(&mut self, element: ElementId, now: Instant) -> bool {
        let Some(id) = self.window_of(element) else {
            return false;
        };
        let Some(elements) = self.windows.get(&id).map(|w| w.elements().clone()) else {
            return false;
        };
        let surface = &self.surface;
        let inside = |part: Option<ElementId>| {
            part.is_some_and(|part| surface.is_ancestor_or_self(part, element))
        };
        let on_minimize = inside(elements.minimize_button);
        let on_maximize = inside(elements.maximize_button);
        let on_close = inside(elements.close_button);
        let zone = if inside(elements.icon) {
            elements.icon.unwrap_or(element)
        } else if inside(Some(elements.title_bar)) {
            elements.title_bar
        } else {
            element
        };

        if on_minimize || on_maximize || on_close {
            self.last_click = None;
            if on_minimize {
                self.toggle_minimize(id);
            } else if on_maximize {
                self.toggle_maximize(id);
            } else {
                self.close(id);
            }
            return true;
        }

        let double = self.last_click.is_some_and(|(prev, at)| {
            prev == zone && now.saturating_duration_since(at) <= self.config.double_click
        });
        self.last_click = if double { None } else { Some((zone, now)) };

        if Some(zone) == elements.icon {
            if double {
                self.close(id);
            }
        } else if zone == elements.title_bar {
            if double {
                self.toggle_maximize(id);
            }
        } else {
            self.events.push(DesktopEvent::Clicked {
                window: id,
                element,
            });
        }
        true
    }
}
