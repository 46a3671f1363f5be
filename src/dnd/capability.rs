//! How a strategy reads and writes the geometry of one kind of element.

use crate::geometry::{self, Point, Size};
use crate::surface::{ElementId, ElementKind, Surface};

pub trait Capability {
    /// Kind of element this capability knows how to move.
    const KIND: ElementKind;

    /// Strategies refuse to start on elements of another kind.
    fn accepts(surface: &Surface, element: ElementId) -> bool {
        surface.kind(element) == Some(Self::KIND)
    }

    fn offset(surface: &Surface, element: ElementId) -> Point;
    /// Returns `false` when nothing was written (disposed element).
    fn set_offset(surface: &mut Surface, element: ElementId, offset: Point) -> bool;
    fn size(surface: &Surface, element: ElementId) -> Size;
    fn set_size(surface: &mut Surface, element: ElementId, size: Size) -> bool;
}

/// Regular elements: translation in the style `transform`, size in the
/// style `width` / `height`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html;

impl Capability for Html {
    const KIND: ElementKind = ElementKind::Html;

    fn offset(surface: &Surface, element: ElementId) -> Point {
        geometry::get_offset(surface, element)
    }

    fn set_offset(surface: &mut Surface, element: ElementId, offset: Point) -> bool {
        geometry::set_offset(surface, element, offset.x, offset.y)
    }

    fn size(surface: &Surface, element: ElementId) -> Size {
        geometry::get_size(surface, element)
    }

    fn set_size(surface: &mut Surface, element: ElementId, size: Size) -> bool {
        geometry::set_size(surface, element, size)
    }
}

/// Vector-graphics elements: translation in the `transform` attribute,
/// size in the `width` / `height` attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Svg;

impl Capability for Svg {
    const KIND: ElementKind = ElementKind::Svg;

    fn offset(surface: &Surface, element: ElementId) -> Point {
        surface
            .attr(element, "transform")
            .and_then(geometry::parse_svg_translation)
            .unwrap_or_default()
    }

    fn set_offset(surface: &mut Surface, element: ElementId, offset: Point) -> bool {
        surface.set_attr(element, "transform", geometry::format_svg_translation(offset))
    }

    fn size(surface: &Surface, element: ElementId) -> Size {
        let read = |name| {
            surface
                .attr(element, name)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .unwrap_or(0.0)
        };
        Size::new(read("width"), read("height"))
    }

    fn set_size(surface: &mut Surface, element: ElementId, size: Size) -> bool {
        surface.set_attr(element, "width", size.width.to_string())
            && surface.set_attr(element, "height", size.height.to_string())
    }
}
