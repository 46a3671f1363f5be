use std::marker::PhantomData;

use super::{Bounds, Capability, DragSession, DragStrategy, Html, PointerEvent};
use crate::geometry::Geometry;
use crate::surface::{ElementId, Surface};

/// Moves the target so it keeps its position relative to the pointer.
#[derive(Debug, Clone, Copy)]
pub struct PlainDrag<C: Capability = Html> {
    bounds: Option<Bounds>,
    _capability: PhantomData<C>,
}

impl<C: Capability> Default for PlainDrag<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Capability> PlainDrag<C> {
    pub fn new() -> Self {
        Self {
            bounds: None,
            _capability: PhantomData,
        }
    }

    /// Clamp every session started from now on to `bounds`.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

impl<C: Capability> DragStrategy for PlainDrag<C> {
    fn start(
        &mut self,
        surface: &mut Surface,
        event: &PointerEvent,
        target: ElementId,
        _grabbed: ElementId,
    ) -> Option<DragSession> {
        if !C::accepts(surface, target) {
            return None;
        }
        let start = Geometry::from_parts(C::offset(surface, target), C::size(surface, target));
        let mut session = DragSession::new(target, event.position(), start);
        session.bounds = self.bounds;
        Some(session)
    }

    fn drag_move(&mut self, surface: &mut Surface, event: &PointerEvent, session: &DragSession) {
        let offset = session.offset_for(event.position());
        C::set_offset(surface, session.target, offset);
    }

    fn cancel(&mut self, surface: &mut Surface, _event: &PointerEvent, session: &DragSession) {
        C::set_offset(surface, session.target, session.start.origin());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dnd::{DragEngine, PointerKind, Svg};
    use crate::geometry::{Point, Size};

    #[test]
    fn bounds_clamp_each_move() {
        let mut s = Surface::new(Size::new(100.0, 50.0));
        let el = s.create_element("div", &["box"]);
        s.append_child(s.root(), el);
        let bounds = Bounds {
            min_x: 0.0,
            max_x: 60.0,
            min_y: 0.0,
            max_y: 30.0,
        };
        let mut e = DragEngine::new(PlainDrag::<Html>::new().with_bounds(bounds));
        e.bind(".box", None, s.root()).unwrap();
        e.handle(&mut s, &PointerEvent::new(0, PointerKind::Down, 5.0, 5.0, el));
        e.handle(&mut s, &PointerEvent::new(0, PointerKind::Move, 500.0, -20.0, el));
        assert_eq!(crate::geometry::get_offset(&s, el), Point::new(60.0, 0.0));
        e.handle(&mut s, &PointerEvent::new(0, PointerKind::Up, 500.0, -20.0, el));
        // committed on release
        assert_eq!(crate::geometry::get_offset(&s, el), Point::new(60.0, 0.0));
    }

    #[test]
    fn svg_elements_move_through_their_attribute() {
        let mut s = Surface::new(Size::new(100.0, 50.0));
        let el = s.create_svg_element("g", &["node"]);
        s.append_child(s.root(), el);
        s.set_attr(el, "transform", "translate(4 4)");
        let mut e = DragEngine::new(PlainDrag::<Svg>::new());
        e.bind(".node", None, s.root()).unwrap();
        e.handle(&mut s, &PointerEvent::new(2, PointerKind::Down, 5.0, 6.0, el));
        e.handle(&mut s, &PointerEvent::new(2, PointerKind::Move, 9.0, 16.0, el));
        assert_eq!(s.attr(el, "transform"), Some("translate(8 14)"));
    }

    #[test]
    fn svg_drag_ignores_html_targets() {
        let mut s = Surface::new(Size::new(100.0, 50.0));
        let el = s.create_element("div", &["node"]);
        s.append_child(s.root(), el);
        let mut e = DragEngine::new(PlainDrag::<Svg>::new());
        e.bind(".node", None, s.root()).unwrap();
        e.handle(&mut s, &PointerEvent::new(0, PointerKind::Down, 5.0, 6.0, el));
        assert!(e.session(0).is_none());
        assert!(!e.is_in_use(el));
    }
}
