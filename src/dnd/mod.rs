//! Multi-pointer drag engine.
//!
//! One [`DragEngine`] tracks any number of concurrent gestures, one per
//! pointer id, and hands the geometry math to a [`DragStrategy`]. An element
//! can only be manipulated by one pointer at a time; different elements are
//! independent.

pub mod capability;
pub mod plain;
pub mod resize;

use std::collections::{BTreeMap, BTreeSet};

pub use capability::{Capability, Html, Svg};
pub use plain::PlainDrag;
pub use resize::{Direction, ResizeConfig, ResizeDrag};

use crate::geometry::{Geometry, Point};
use crate::surface::{ElementId, Selector, SelectorError, Surface};

pub type PointerId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    /// Element the pointer is over.
    pub target: ElementId,
}

impl PointerEvent {
    pub fn new(pointer_id: PointerId, kind: PointerKind, x: f64, y: f64, target: ElementId) -> Self {
        Self {
            pointer_id,
            kind,
            x,
            y,
            target,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Offset clamps for a session. Equal min and max pin an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub const UNBOUNDED: Bounds = Bounds {
        min_x: f64::NEG_INFINITY,
        max_x: f64::INFINITY,
        min_y: f64::NEG_INFINITY,
        max_y: f64::INFINITY,
    };

    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.max(self.min_x).min(self.max_x),
            p.y.max(self.min_y).min(self.max_y),
        )
    }
}

/// State of one in-progress gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Element being manipulated; the session never owns it.
    pub target: ElementId,
    /// Pointer position minus the element offset at gesture start.
    pub origin: Point,
    /// Geometry captured at gesture start, restored on cancel.
    pub start: Geometry,
    pub bounds: Option<Bounds>,
    pub direction: Option<Direction>,
    /// Per-axis size reference constants used by resize sessions.
    pub reference: Point,
}

impl DragSession {
    pub fn new(target: ElementId, pointer: Point, start: Geometry) -> Self {
        Self {
            target,
            origin: pointer - start.origin(),
            start,
            bounds: None,
            direction: None,
            reference: Point::default(),
        }
    }

    /// Offset the pointer asks for, clamped to the session bounds.
    pub fn offset_for(&self, pointer: Point) -> Point {
        let raw = pointer - self.origin;
        match &self.bounds {
            Some(bounds) => bounds.clamp(raw),
            None => raw,
        }
    }
}

/// Geometry math for one kind of gesture.
pub trait DragStrategy {
    /// Build a session for `target` (the resolved container) grabbed through
    /// `grabbed`. Returning `None` rejects the gesture.
    fn start(
        &mut self,
        surface: &mut Surface,
        event: &PointerEvent,
        target: ElementId,
        grabbed: ElementId,
    ) -> Option<DragSession>;

    fn drag_move(&mut self, surface: &mut Surface, event: &PointerEvent, session: &DragSession);

    fn end(&mut self, _surface: &mut Surface, _event: &PointerEvent, _session: &DragSession) {}

    fn cancel(&mut self, surface: &mut Surface, event: &PointerEvent, session: &DragSession);
}

/// What the engine did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Ignored,
    Started { pointer_id: PointerId, target: ElementId },
    Moved { pointer_id: PointerId, target: ElementId },
    Ended { pointer_id: PointerId, target: ElementId },
    Cancelled { pointer_id: PointerId, target: ElementId },
}

impl DragOutcome {
    /// Whether the event belongs to a gesture and must not propagate.
    pub fn is_consumed(&self) -> bool {
        !matches!(self, DragOutcome::Ignored)
    }

    pub fn target(&self) -> Option<ElementId> {
        match *self {
            DragOutcome::Ignored => None,
            DragOutcome::Started { target, .. }
            | DragOutcome::Moved { target, .. }
            | DragOutcome::Ended { target, .. }
            | DragOutcome::Cancelled { target, .. } => Some(target),
        }
    }
}

#[derive(Debug, Clone)]
struct Binding {
    draggable: Selector,
    container: Option<Selector>,
    root: ElementId,
}

#[derive(Debug)]
pub struct DragEngine<S: DragStrategy> {
    strategy: S,
    binding: Option<Binding>,
    sessions: BTreeMap<PointerId, DragSession>,
    in_use: BTreeSet<ElementId>,
}

impl<S: DragStrategy> DragEngine<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            binding: None,
            sessions: BTreeMap::new(),
            in_use: BTreeSet::new(),
        }
    }

    /// Start listening below `root`. Gestures begin on elements matching
    /// `draggable` (or their descendants) and move the closest ancestor
    /// matching `container`, or the grabbed element itself without one.
    /// Rebinding drops any in-flight sessions.
    pub fn bind(
        &mut self,
        draggable: &str,
        container: Option<&str>,
        root: ElementId,
    ) -> Result<(), SelectorError> {
        let draggable = Selector::parse(draggable)?;
        let container = container.map(Selector::parse).transpose()?;
        self.unbind();
        tracing::debug!(
            draggable = %draggable,
            container = ?container.as_ref().map(Selector::as_str),
            "bound drag engine"
        );
        self.binding = Some(Binding {
            draggable,
            container,
            root,
        });
        Ok(())
    }

    pub fn unbind(&mut self) {
        self.binding = None;
        self.sessions.clear();
        self.in_use.clear();
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    pub fn session(&self, pointer_id: PointerId) -> Option<&DragSession> {
        self.sessions.get(&pointer_id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_in_use(&self, element: ElementId) -> bool {
        self.in_use.contains(&element)
    }

    pub fn handle(&mut self, surface: &mut Surface, event: &PointerEvent) -> DragOutcome {
        if self.binding.is_none() {
            return DragOutcome::Ignored;
        }
        match event.kind {
            PointerKind::Down => self.pointer_down(surface, event),
            PointerKind::Move => {
                let Some(session) = self.sessions.get(&event.pointer_id) else {
                    return DragOutcome::Ignored;
                };
                self.strategy.drag_move(surface, event, session);
                DragOutcome::Moved {
                    pointer_id: event.pointer_id,
                    target: session.target,
                }
            }
            PointerKind::Up => {
                let Some(session) = self.sessions.remove(&event.pointer_id) else {
                    return DragOutcome::Ignored;
                };
                self.strategy.end(surface, event, &session);
                self.in_use.remove(&session.target);
                tracing::trace!(pointer_id = event.pointer_id, "drag ended");
                DragOutcome::Ended {
                    pointer_id: event.pointer_id,
                    target: session.target,
                }
            }
            PointerKind::Cancel => {
                let Some(session) = self.sessions.remove(&event.pointer_id) else {
                    return DragOutcome::Ignored;
                };
                self.strategy.cancel(surface, event, &session);
                self.in_use.remove(&session.target);
                tracing::debug!(pointer_id = event.pointer_id, "drag cancelled, geometry rolled back");
                DragOutcome::Cancelled {
                    pointer_id: event.pointer_id,
                    target: session.target,
                }
            }
        }
    }

    fn pointer_down(&mut self, surface: &mut Surface, event: &PointerEvent) -> DragOutcome {
        let Some(binding) = self.binding.as_ref() else {
            return DragOutcome::Ignored;
        };
        if self.sessions.contains_key(&event.pointer_id)
            || !surface.is_ancestor_or_self(binding.root, event.target)
            || !surface.matches_or_descendant(event.target, &binding.draggable)
        {
            return DragOutcome::Ignored;
        }
        let target = binding
            .container
            .as_ref()
            .and_then(|container| surface.closest(event.target, container))
            .unwrap_or(event.target);
        if self.in_use.contains(&target) {
            tracing::trace!(pointer_id = event.pointer_id, "element already being dragged");
            return DragOutcome::Ignored;
        }
        let Some(session) = self.strategy.start(surface, event, target, event.target) else {
            return DragOutcome::Ignored;
        };
        tracing::trace!(
            pointer_id = event.pointer_id,
            direction = ?session.direction,
            "drag started"
        );
        self.in_use.insert(target);
        self.sessions.insert(event.pointer_id, session);
        DragOutcome::Started {
            pointer_id: event.pointer_id,
            target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{self, Size};

    fn setup() -> (Surface, ElementId, ElementId, ElementId) {
        let mut s = Surface::new(Size::new(200.0, 100.0));
        let a = s.create_element("div", &["window"]);
        let a_bar = s.create_element("div", &["title-bar"]);
        let b = s.create_element("div", &["window"]);
        s.append_child(s.root(), a);
        s.append_child(a, a_bar);
        s.append_child(s.root(), b);
        geometry::set_offset(&mut s, a, 10.0, 10.0);
        (s, a, a_bar, b)
    }

    fn engine(s: &Surface) -> DragEngine<PlainDrag> {
        let mut e = DragEngine::new(PlainDrag::new());
        e.bind(".window", None, s.root()).unwrap();
        e
    }

    #[test]
    fn cancel_restores_starting_offset() {
        let (mut s, a, _, _) = setup();
        let mut e = engine(&s);
        let down = PointerEvent::new(1, PointerKind::Down, 15.0, 12.0, a);
        assert!(e.handle(&mut s, &down).is_consumed());
        e.handle(&mut s, &PointerEvent::new(1, PointerKind::Move, 45.0, 72.0, a));
        assert_eq!(geometry::get_offset(&s, a), Point::new(40.0, 70.0));
        let out = e.handle(&mut s, &PointerEvent::new(1, PointerKind::Cancel, 45.0, 72.0, a));
        assert!(matches!(out, DragOutcome::Cancelled { .. }));
        assert_eq!(geometry::get_offset(&s, a), Point::new(10.0, 10.0));
        assert_eq!(e.session_count(), 0);
        assert!(!e.is_in_use(a));
    }

    #[test]
    fn same_element_rejects_second_pointer_until_released() {
        let (mut s, a, _, b) = setup();
        let mut e = engine(&s);
        assert!(e.handle(&mut s, &PointerEvent::new(1, PointerKind::Down, 10.0, 10.0, a)).is_consumed());
        let second = PointerEvent::new(2, PointerKind::Down, 11.0, 11.0, a);
        assert_eq!(e.handle(&mut s, &second), DragOutcome::Ignored);
        assert!(e.session(2).is_none());
        // a different element is independent
        assert!(e.handle(&mut s, &PointerEvent::new(3, PointerKind::Down, 0.0, 0.0, b)).is_consumed());
        e.handle(&mut s, &PointerEvent::new(1, PointerKind::Up, 10.0, 10.0, a));
        assert!(e.handle(&mut s, &second).is_consumed());
    }

    #[test]
    fn pointer_with_session_cannot_start_another() {
        let (mut s, a, _, b) = setup();
        let mut e = engine(&s);
        e.handle(&mut s, &PointerEvent::new(1, PointerKind::Down, 10.0, 10.0, a));
        let again = PointerEvent::new(1, PointerKind::Down, 0.0, 0.0, b);
        assert_eq!(e.handle(&mut s, &again), DragOutcome::Ignored);
        assert!(!e.is_in_use(b));
    }

    #[test]
    fn container_selector_redirects_to_window() {
        let (mut s, a, bar, _) = setup();
        let mut e = DragEngine::new(PlainDrag::<Html>::new());
        e.bind(".title-bar", Some(".window"), s.root()).unwrap();
        let out = e.handle(&mut s, &PointerEvent::new(4, PointerKind::Down, 12.0, 11.0, bar));
        assert_eq!(out, DragOutcome::Started { pointer_id: 4, target: a });
        e.handle(&mut s, &PointerEvent::new(4, PointerKind::Move, 22.0, 31.0, bar));
        assert_eq!(geometry::get_offset(&s, a), Point::new(20.0, 30.0));
        assert_eq!(geometry::get_offset(&s, bar), Point::default());
    }

    #[test]
    fn unmatched_targets_and_stray_events_are_ignored() {
        let (mut s, a, bar, _) = setup();
        let mut e = DragEngine::new(PlainDrag::<Html>::new());
        e.bind(".title-bar", Some(".window"), s.root()).unwrap();
        assert_eq!(
            e.handle(&mut s, &PointerEvent::new(1, PointerKind::Down, 0.0, 0.0, a)),
            DragOutcome::Ignored
        );
        assert_eq!(
            e.handle(&mut s, &PointerEvent::new(9, PointerKind::Move, 0.0, 0.0, bar)),
            DragOutcome::Ignored
        );
        assert_eq!(
            e.handle(&mut s, &PointerEvent::new(9, PointerKind::Up, 0.0, 0.0, bar)),
            DragOutcome::Ignored
        );
    }

    #[test]
    fn unbind_is_idempotent_and_clears_sessions() {
        let (mut s, a, _, _) = setup();
        let mut e = engine(&s);
        e.handle(&mut s, &PointerEvent::new(1, PointerKind::Down, 10.0, 10.0, a));
        e.unbind();
        e.unbind();
        assert!(!e.is_bound());
        assert_eq!(e.session_count(), 0);
        assert_eq!(
            e.handle(&mut s, &PointerEvent::new(1, PointerKind::Down, 10.0, 10.0, a)),
            DragOutcome::Ignored
        );
    }

    #[test]
    fn removed_element_finishes_silently() {
        let (mut s, a, _, _) = setup();
        let mut e = engine(&s);
        e.handle(&mut s, &PointerEvent::new(1, PointerKind::Down, 10.0, 10.0, a));
        s.remove(a);
        let moved = e.handle(&mut s, &PointerEvent::new(1, PointerKind::Move, 30.0, 30.0, a));
        assert!(moved.is_consumed());
        let cancelled = e.handle(&mut s, &PointerEvent::new(1, PointerKind::Cancel, 30.0, 30.0, a));
        assert!(cancelled.is_consumed());
        assert_eq!(e.session_count(), 0);
    }

    #[test]
    fn events_outside_root_are_ignored() {
        let (mut s, a, bar, _) = setup();
        let mut e = DragEngine::new(PlainDrag::<Html>::new());
        e.bind(".title-bar", Some(".window"), a).unwrap();
        let detached = s.create_element("div", &["title-bar"]);
        assert_eq!(
            e.handle(&mut s, &PointerEvent::new(1, PointerKind::Down, 0.0, 0.0, detached)),
            DragOutcome::Ignored
        );
        assert!(e.handle(&mut s, &PointerEvent::new(1, PointerKind::Down, 0.0, 0.0, bar)).is_consumed());
    }
}
