//! Terminal mouse input as pointer events.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::constants::MOUSE_POINTER_ID;
use crate::dnd::{PointerEvent, PointerKind};
use crate::geometry::Point;
use crate::surface::Surface;

/// Turns crossterm mouse reports into [`PointerEvent`]s targeted by hit
/// testing the surface. The terminal has one pointer, reported under
/// [`MOUSE_POINTER_ID`].
#[derive(Debug, Default)]
pub struct PointerAdapter {
    last: Option<Point>,
    pressed: bool,
}

impl PointerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, surface: &Surface, mouse: &MouseEvent) -> Option<PointerEvent> {
        let kind = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pressed = true;
                PointerKind::Down
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.pressed = false;
                PointerKind::Up
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => PointerKind::Move,
            _ => return None,
        };
        let x = f64::from(mouse.column);
        let y = f64::from(mouse.row);
        self.last = Some(Point::new(x, y));
        Some(PointerEvent::new(
            MOUSE_POINTER_ID,
            kind,
            x,
            y,
            surface.hit_test(x, y),
        ))
    }

    /// Abort the gesture in progress, if the button is held.
    pub fn cancel(&mut self, surface: &Surface) -> Option<PointerEvent> {
        if !self.pressed {
            return None;
        }
        self.pressed = false;
        let at = self.last.unwrap_or_default();
        Some(PointerEvent::new(
            MOUSE_POINTER_ID,
            PointerKind::Cancel,
            at.x,
            at.y,
            surface.hit_test(at.x, at.y),
        ))
    }
}
