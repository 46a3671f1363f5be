//! UiFrame: a thin wrapper around `ratatui::Frame` that clamps drawing to the
//! visible area.
//!
//! Window geometry is signed and may drift partially or fully off screen
//! while a window is dragged. Writing out of bounds into the underlying
//! `Buffer` can panic, so every draw call goes through this wrapper, which
//! clips rectangles and single cells to the frame area.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::geometry::Geometry;

/// Cell rectangle with a signed origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    /// Snap a surface box to whole cells.
    pub fn from_geometry(g: Geometry) -> Self {
        Self {
            x: g.x.round() as i32,
            y: g.y.round() as i32,
            width: g.width.round().clamp(0.0, f64::from(u16::MAX)) as u16,
            height: g.height.round().clamp(0.0, f64::from(u16::MAX)) as u16,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + i32::from(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y + i32::from(self.height)
    }

    /// The on-screen part of `self` inside `bounds`.
    pub fn clip(&self, bounds: Rect) -> Option<Rect> {
        let x0 = self.x.max(i32::from(bounds.x));
        let y0 = self.y.max(i32::from(bounds.y));
        let x1 = self.right().min(i32::from(bounds.x) + i32::from(bounds.width));
        let y1 = self.bottom().min(i32::from(bounds.y) + i32::from(bounds.height));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect {
            x: x0 as u16,
            y: y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        })
    }
}

/// Wrapper around `ratatui::Frame` that clamps drawing to the visible area.
pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    /// Write one cell at a signed position; off-screen cells are dropped.
    pub fn set_cell(&mut self, x: i32, y: i32, symbol: &str, style: Style) {
        let area = self.area;
        if x < i32::from(area.x)
            || y < i32::from(area.y)
            || x >= i32::from(area.x) + i32::from(area.width)
            || y >= i32::from(area.y) + i32::from(area.height)
        {
            return;
        }
        if let Some(cell) = self.buffer.cell_mut((x as u16, y as u16)) {
            cell.set_symbol(symbol);
            cell.set_style(style);
        }
    }

    /// Write `text` starting at a signed position, clipped to the frame and
    /// to `limit` (an exclusive right edge).
    pub fn set_string_signed(&mut self, x: i32, y: i32, limit: i32, text: &str, style: Style) {
        let mut buf = [0u8; 4];
        for (idx, ch) in text.chars().enumerate() {
            let cx = x + idx as i32;
            if cx >= limit {
                break;
            }
            self.set_cell(cx, y, ch.encode_utf8(&mut buf), style);
        }
    }
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use ratatui::style::Style;

    #[test]
    fn cell_rect_clips_negative_offsets() {
        let bounds = Rect::new(0, 0, 10, 5);
        let r = CellRect {
            x: -3,
            y: 2,
            width: 5,
            height: 10,
        };
        assert_eq!(r.clip(bounds), Some(Rect::new(0, 2, 2, 3)));
        let gone = CellRect {
            x: 20,
            y: 0,
            width: 2,
            height: 2,
        };
        assert_eq!(gone.clip(bounds), None);
    }

    #[test]
    fn from_geometry_rounds_and_floors_size() {
        let r = CellRect::from_geometry(Geometry::new(1.4, -2.6, -5.0, 3.5));
        assert_eq!(
            r,
            CellRect {
                x: 1,
                y: -3,
                width: 0,
                height: 4,
            }
        );
    }

    #[test]
    fn set_string_signed_skips_offscreen_cells() {
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);
        ui.set_string_signed(-2, 0, 3, "abcdef", Style::default());
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), "c");
        assert_eq!(buf.cell((2, 0)).unwrap().symbol(), "e");
        assert_eq!(buf.cell((3, 0)).unwrap().symbol(), " ");
    }

    #[test]
    fn truncate_to_width_short_and_long() {
        assert_eq!(truncate_to_width("abc", 5), "abc");
        assert_eq!(truncate_to_width("abcdef", 3), "abc");
    }

    #[test]
    fn render_widget_clips_to_frame_area() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 5,
            height: 3,
        };
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);

        struct FillWidget;
        impl Widget for FillWidget {
            fn render(self, area: Rect, buf: &mut Buffer) {
                for y in area.y..area.y.saturating_add(area.height) {
                    for x in area.x..area.x.saturating_add(area.width) {
                        if let Some(cell) = buf.cell_mut((x, y)) {
                            cell.set_symbol("A");
                        }
                    }
                }
            }
        }

        // Request an area that partially lies outside the right edge.
        ui.render_widget(
            FillWidget,
            Rect {
                x: 3,
                y: 1,
                width: 5,
                height: 2,
            },
        );

        let inside = buf.cell_mut((3, 1)).expect("cell present");
        assert!(inside.symbol().starts_with('A'));
        let outside = buf.cell_mut((2, 1)).expect("cell present");
        assert!(!outside.symbol().starts_with('A'));
    }
}
