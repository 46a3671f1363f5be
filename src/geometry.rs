//! Offsets, sizes and the translate-transform codec.
//!
//! A window's position lives in its element's `transform` (a translation),
//! while its size lives in `width`/`height`. Keeping the two apart is what
//! lets the drag engine move a window without touching its layout size and
//! lets the lifecycle code restore one independently of the other.

use crate::surface::{ElementId, Surface};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Position plus size, all in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && x >= self.x
            && x < self.right()
            && y >= self.y
            && y < self.bottom()
    }

    /// Place `size` in the middle of `self`.
    pub fn centered(&self, size: Size) -> Point {
        Point::new(
            self.x + (self.width - size.width) / 2.0,
            self.y + (self.height - size.height) / 2.0,
        )
    }
}

/// Extract the translation from a computed `transform` value.
///
/// Understands the two matrix encodings a layout engine reports
/// (`matrix(a, b, c, d, e, f)` and the 16-value `matrix3d(..)`) as well as the
/// `translate(Xpx, Ypx)` form that [`format_translation`] writes. Anything
/// else, including `none`, yields `None`.
pub fn parse_translation(transform: &str) -> Option<Point> {
    let transform = transform.trim();
    let (name, args) = split_function(transform)?;
    let values = parse_numbers(args)?;
    match name {
        "matrix3d" if values.len() == 16 => Some(Point::new(values[12], values[13])),
        "matrix" if values.len() == 6 => Some(Point::new(values[4], values[5])),
        "translate" | "translate3d" if !values.is_empty() && values.len() <= 3 => Some(Point::new(
            values[0],
            values.get(1).copied().unwrap_or(0.0),
        )),
        _ => None,
    }
}

pub fn format_translation(offset: Point) -> String {
    format!("translate({}px, {}px)", offset.x, offset.y)
}

/// Current translation of `element`, or the origin when it has none.
pub fn get_offset(surface: &Surface, element: ElementId) -> Point {
    surface
        .style(element)
        .and_then(|style| style.transform.as_deref())
        .and_then(parse_translation)
        .unwrap_or_default()
}

/// Overwrite the translation of `element`. Returns `false` when the element
/// has been disposed and there is nothing left to move.
pub fn set_offset(surface: &mut Surface, element: ElementId, x: f64, y: f64) -> bool {
    surface.set_transform(element, Some(format_translation(Point::new(x, y))))
}

pub fn get_size(surface: &Surface, element: ElementId) -> Size {
    surface
        .style(element)
        .map(|style| Size::new(style.width.unwrap_or(0.0), style.height.unwrap_or(0.0)))
        .unwrap_or_default()
}

pub fn set_size(surface: &mut Surface, element: ElementId, size: Size) -> bool {
    surface.set_width(element, Some(size.width)) && surface.set_height(element, Some(size.height))
}

pub fn get_geometry(surface: &Surface, element: ElementId) -> Geometry {
    Geometry::from_parts(get_offset(surface, element), get_size(surface, element))
}

/// Parse an SVG `transform` attribute (`translate(x y)` or `translate(x, y)`,
/// unitless) into its translation.
pub fn parse_svg_translation(attr: &str) -> Option<Point> {
    let (name, args) = split_function(attr.trim())?;
    if name != "translate" {
        return None;
    }
    let values = parse_numbers(args)?;
    match values.as_slice() {
        [x] => Some(Point::new(*x, 0.0)),
        [x, y] => Some(Point::new(*x, *y)),
        _ => None,
    }
}

pub fn format_svg_translation(offset: Point) -> String {
    format!("translate({} {})", offset.x, offset.y)
}

fn split_function(value: &str) -> Option<(&str, &str)> {
    let open = value.find('(')?;
    let inner = value[open + 1..].strip_suffix(')')?;
    Some((value[..open].trim(), inner))
}

fn parse_numbers(args: &str) -> Option<Vec<f64>> {
    args.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.strip_suffix("px").unwrap_or(part).parse::<f64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_2d_matrix_translation() {
        let p = parse_translation("matrix(1, 0, 0, 1, 12.5, -4)").unwrap();
        assert_eq!(p, Point::new(12.5, -4.0));
    }

    #[test]
    fn parses_3d_matrix_translation() {
        let p = parse_translation("matrix3d(1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 30, 40, 5, 1)")
            .unwrap();
        assert_eq!(p, Point::new(30.0, 40.0));
    }

    #[test]
    fn none_and_garbage_have_no_translation() {
        assert!(parse_translation("none").is_none());
        assert!(parse_translation("matrix(1, 0, 0)").is_none());
        assert!(parse_translation("rotate(45deg)").is_none());
    }

    #[test]
    fn offset_defaults_to_origin_and_round_trips() {
        let mut surface = Surface::new(Size::new(80.0, 24.0));
        let el = surface.create_element("div", &[]);
        assert_eq!(get_offset(&surface, el), Point::default());
        assert!(set_offset(&mut surface, el, 10.25, -3.0));
        assert_eq!(get_offset(&surface, el), Point::new(10.25, -3.0));
    }

    #[test]
    fn set_offset_leaves_size_alone() {
        let mut surface = Surface::new(Size::new(80.0, 24.0));
        let el = surface.create_element("div", &[]);
        set_size(&mut surface, el, Size::new(30.0, 12.0));
        set_offset(&mut surface, el, 4.0, 5.0);
        assert_eq!(get_geometry(&surface, el), Geometry::new(4.0, 5.0, 30.0, 12.0));
    }

    #[test]
    fn svg_translate_accepts_both_separators() {
        assert_eq!(parse_svg_translation("translate(3 4)"), Some(Point::new(3.0, 4.0)));
        assert_eq!(parse_svg_translation("translate(3,4)"), Some(Point::new(3.0, 4.0)));
        assert_eq!(parse_svg_translation("scale(2)"), None);
    }

    #[test]
    fn centered_uses_container_origin() {
        let container = Geometry::new(10.0, 0.0, 100.0, 40.0);
        assert_eq!(container.centered(Size::new(50.0, 20.0)), Point::new(35.0, 10.0));
    }
}
