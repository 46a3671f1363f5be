use std::marker::PhantomData;

use super::{Bounds, Capability, DragSession, DragStrategy, Html, PointerEvent};
use crate::geometry::{Geometry, Point, Size};
use crate::surface::{ElementId, Surface};

/// Which edge or corner a resize handle controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

/// Side of an axis a handle touches: the near edge is left/top, the far edge
/// right/bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Near,
    Far,
}

impl Direction {
    /// Handle order used when building window chrome.
    pub const ALL: [Direction; 8] = [
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
        Direction::N,
        Direction::NE,
    ];

    pub fn class_name(self) -> &'static str {
        match self {
            Direction::N => "dir-n",
            Direction::NE => "dir-ne",
            Direction::E => "dir-e",
            Direction::SE => "dir-se",
            Direction::S => "dir-s",
            Direction::SW => "dir-sw",
            Direction::W => "dir-w",
            Direction::NW => "dir-nw",
        }
    }

    pub fn from_class(class: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.class_name() == class)
    }

    pub fn horizontal(self) -> Option<Edge> {
        match self {
            Direction::W | Direction::NW | Direction::SW => Some(Edge::Near),
            Direction::E | Direction::NE | Direction::SE => Some(Edge::Far),
            Direction::N | Direction::S => None,
        }
    }

    pub fn vertical(self) -> Option<Edge> {
        match self {
            Direction::N | Direction::NE | Direction::NW => Some(Edge::Near),
            Direction::S | Direction::SE | Direction::SW => Some(Edge::Far),
            Direction::E | Direction::W => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResizeConfig {
    /// Smallest size a resize may produce. `None` writes whatever the pointer
    /// asks for, including zero or negative sizes.
    pub min_size: Option<Size>,
}

/// Resizes the target from one of eight edge/corner handles.
#[derive(Debug, Clone, Copy)]
pub struct ResizeDrag<C: Capability = Html> {
    config: ResizeConfig,
    _capability: PhantomData<C>,
}

impl<C: Capability> Default for ResizeDrag<C> {
    fn default() -> Self {
        Self::new(ResizeConfig::default())
    }
}

impl<C: Capability> ResizeDrag<C> {
    pub fn new(config: ResizeConfig) -> Self {
        Self {
            config,
            _capability: PhantomData,
        }
    }

    fn direction_of(surface: &Surface, grabbed: ElementId, target: ElementId) -> Option<Direction> {
        let mut current = Some(grabbed);
        while let Some(el) = current {
            if let Some(direction) = surface
                .classes(el)
                .iter()
                .find_map(|class| Direction::from_class(class))
            {
                return Some(direction);
            }
            if el == target {
                break;
            }
            current = surface.parent(el);
        }
        None
    }
}

/// Offset clamp range and size reference for one axis.
fn axis_setup(edge: Option<Edge>, offset: f64, size: f64, pointer: f64, floor: f64) -> (f64, f64, f64) {
    match edge {
        // far edge stays put: the offset may move but never past it
        Some(Edge::Near) => (f64::NEG_INFINITY, offset + size - floor, size + pointer),
        // near edge stays put
        Some(Edge::Far) => (offset, offset, size - pointer),
        None => (offset, offset, 0.0),
    }
}

fn axis_size(edge: Option<Edge>, reference: f64, pointer: f64, start: f64) -> f64 {
    match edge {
        Some(Edge::Near) => reference - pointer,
        Some(Edge::Far) => reference + pointer,
        None => start,
    }
}

impl<C: Capability> DragStrategy for ResizeDrag<C> {
    fn start(
        &mut self,
        surface: &mut Surface,
        event: &PointerEvent,
        target: ElementId,
        grabbed: ElementId,
    ) -> Option<DragSession> {
        if !C::accepts(surface, target) {
            return None;
        }
        let direction = Self::direction_of(surface, grabbed, target)?;
        let offset = C::offset(surface, target);
        let size = C::size(surface, target);
        let pointer = event.position();
        let floor = self.config.min_size.unwrap_or_default();

        let (min_x, max_x, ref_x) =
            axis_setup(direction.horizontal(), offset.x, size.width, pointer.x, floor.width);
        let (min_y, max_y, ref_y) =
            axis_setup(direction.vertical(), offset.y, size.height, pointer.y, floor.height);

        let mut session = DragSession::new(target, pointer, Geometry::from_parts(offset, size));
        session.direction = Some(direction);
        session.reference = Point::new(ref_x, ref_y);
        session.bounds = Some(Bounds {
            min_x,
            max_x,
            min_y,
            max_y,
        });
        Some(session)
    }

    fn drag_move(&mut self, surface: &mut Surface, event: &PointerEvent, session: &DragSession) {
        let Some(direction) = session.direction else {
            return;
        };
        let pointer = event.position();
        let offset = session.offset_for(pointer);
        let mut size = Size::new(
            axis_size(
                direction.horizontal(),
                session.reference.x,
                pointer.x,
                session.start.width,
            ),
            axis_size(
                direction.vertical(),
                session.reference.y,
                pointer.y,
                session.start.height,
            ),
        );
        if let Some(min) = self.config.min_size {
            size.width = size.width.max(min.width);
            size.height = size.height.max(min.height);
        }
        C::set_offset(surface, session.target, offset);
        C::set_size(surface, session.target, size);
    }

    fn cancel(&mut self, surface: &mut Surface, _event: &PointerEvent, session: &DragSession) {
        C::set_offset(surface, session.target, session.start.origin());
        C::set_size(surface, session.target, session.start.size());
    }
}
