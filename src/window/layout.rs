//! Cell layout of window chrome.
//!
//! Every window is drawn as a one-cell border with the title bar on the first
//! inner row. The resize handles sit on the border itself, one cell per corner
//! and the remaining run of each edge.

use super::{WindowElements, WindowState};
use crate::constants::{BUTTON_WIDTH, MINIMIZED_HEIGHT, MINIMIZED_WIDTH};
use crate::dnd::Direction;
use crate::geometry::{self, Geometry, Size};
use crate::surface::{ElementId, Surface};

/// Live Normal-state geometry of a window root, with the style minimum size
/// (and zero) applied the way a layout engine would.
pub(crate) fn effective_geometry(surface: &Surface, root: ElementId) -> Geometry {
    let offset = geometry::get_offset(surface, root);
    let size = geometry::get_size(surface, root);
    let (min_w, min_h) = surface
        .style(root)
        .map(|s| (s.min_width.unwrap_or(0.0), s.min_height.unwrap_or(0.0)))
        .unwrap_or((0.0, 0.0));
    Geometry::from_parts(
        offset,
        Size::new(size.width.max(min_w).max(0.0), size.height.max(min_h).max(0.0)),
    )
}

fn cell_box(x: f64, y: f64, width: f64, height: f64) -> Option<Geometry> {
    (width > 0.0 && height > 0.0).then(|| Geometry::new(x, y, width, height))
}

fn outer_geometry(surface: &Surface, root: ElementId, state: WindowState) -> Geometry {
    match state {
        WindowState::Normal => effective_geometry(surface, root),
        WindowState::Maximized => {
            let viewport = surface.viewport();
            Geometry::new(0.0, 0.0, viewport.width, viewport.height)
        }
        WindowState::Minimized => {
            let offset = geometry::get_offset(surface, root);
            Geometry::new(offset.x, offset.y, MINIMIZED_WIDTH, MINIMIZED_HEIGHT)
        }
    }
}

fn handle_box(outer: Geometry, direction: Direction) -> Option<Geometry> {
    let right = outer.right() - 1.0;
    let bottom = outer.bottom() - 1.0;
    let inner_w = outer.width - 2.0;
    let inner_h = outer.height - 2.0;
    match direction {
        Direction::NW => cell_box(outer.x, outer.y, 1.0, 1.0),
        Direction::NE => cell_box(right, outer.y, 1.0, 1.0),
        Direction::SW => cell_box(outer.x, bottom, 1.0, 1.0),
        Direction::SE => cell_box(right, bottom, 1.0, 1.0),
        Direction::N => cell_box(outer.x + 1.0, outer.y, inner_w, 1.0),
        Direction::S => cell_box(outer.x + 1.0, bottom, inner_w, 1.0),
        Direction::W => cell_box(outer.x, outer.y + 1.0, 1.0, inner_h),
        Direction::E => cell_box(right, outer.y + 1.0, 1.0, inner_h),
    }
}

/// Columns a body control takes up when laid out in a field row.
pub(crate) fn control_width(surface: &Surface, el: ElementId) -> f64 {
    let text = surface.text(el).chars().count() as f64;
    if surface.tag(el) == "button" {
        text + 2.0
    } else if surface.has_class(el, "checkbox") {
        text + 4.0
    } else {
        text
    }
}

/// Lay out every element of one window. Returns the box left for an
/// `.editor-container` in the body, if the body has one.
pub(crate) fn layout_window(
    surface: &mut Surface,
    el: &WindowElements,
    state: WindowState,
) -> Option<Geometry> {
    let outer = outer_geometry(surface, el.root, state);
    surface.set_layout_box(el.root, cell_box(outer.x, outer.y, outer.width, outer.height));

    for (direction, handle) in &el.handles {
        let b = if state == WindowState::Normal {
            handle_box(outer, *direction)
        } else {
            None
        };
        surface.set_layout_box(*handle, b);
    }

    let inner_x = outer.x + 1.0;
    let inner_w = outer.width - 2.0;
    let title_y = outer.y + 1.0;
    surface.set_layout_box(el.title_bar, cell_box(inner_x, title_y, inner_w, 1.0));

    let buttons: Vec<ElementId> = [el.minimize_button, el.maximize_button, el.close_button]
        .into_iter()
        .flatten()
        .collect();
    let controls_w = (BUTTON_WIDTH * buttons.len() as f64).min(inner_w.max(0.0));
    let controls_x = inner_x + inner_w - controls_w;
    surface.set_layout_box(el.controls, cell_box(controls_x, title_y, controls_w, 1.0));
    for (i, button) in buttons.iter().enumerate() {
        let x = controls_x + BUTTON_WIDTH * i as f64;
        let fits = x + BUTTON_WIDTH <= controls_x + controls_w;
        surface.set_layout_box(
            *button,
            if fits {
                cell_box(x, title_y, BUTTON_WIDTH, 1.0)
            } else {
                None
            },
        );
    }

    let text_w = inner_w - controls_w;
    surface.set_layout_box(el.title_text, cell_box(inner_x, title_y, text_w, 1.0));
    let mut label_x = inner_x + 1.0;
    if let Some(icon) = el.icon {
        let w = surface.text(icon).chars().count().max(1) as f64;
        surface.set_layout_box(icon, cell_box(label_x, title_y, w.min(text_w - 1.0), 1.0));
        label_x += w + 1.0;
    }
    let labels: Vec<ElementId> = surface
        .children(el.title_text)
        .iter()
        .copied()
        .filter(|c| Some(*c) != el.icon)
        .collect();
    for label in labels {
        surface.set_layout_box(
            label,
            cell_box(label_x, title_y, inner_x + text_w - label_x, 1.0),
        );
    }

    if state == WindowState::Minimized {
        clear_subtree(surface, el.body);
        return None;
    }
    let body = cell_box(inner_x, outer.y + 2.0, inner_w, outer.height - 3.0);
    surface.set_layout_box(el.body, body);
    body.and_then(|b| layout_body(surface, el.body, b))
}

fn clear_subtree(surface: &mut Surface, id: ElementId) {
    surface.set_layout_box(id, None);
    let children = surface.children(id).to_vec();
    for child in children {
        clear_subtree(surface, child);
    }
}

/// Field rows stack up from the bottom of the body, their controls aligned
/// right. Whatever is left goes to the editor container.
fn layout_body(surface: &mut Surface, body: ElementId, area: Geometry) -> Option<Geometry> {
    let children = surface.children(body).to_vec();
    let rows: Vec<ElementId> = children
        .iter()
        .copied()
        .filter(|c| surface.has_class(*c, "field-row"))
        .collect();
    let mut bottom = area.bottom();
    for row in rows.iter().rev() {
        bottom -= 1.0;
        let row_box = if bottom >= area.y {
            cell_box(area.x, bottom, area.width, 1.0)
        } else {
            None
        };
        surface.set_layout_box(*row, row_box);
        let controls = surface.children(*row).to_vec();
        let mut right = area.right();
        for control in controls.iter().rev() {
            let w = control_width(surface, *control);
            let x = right - w;
            let b = row_box
                .filter(|_| x >= area.x)
                .and_then(|r| cell_box(x, r.y, w, 1.0));
            surface.set_layout_box(*control, b);
            right = x - 1.0;
        }
    }

    let rest = cell_box(area.x, area.y, area.width, bottom - area.y);
    let mut editor = None;
    for child in children {
        if rows.contains(&child) {
            continue;
        }
        surface.set_layout_box(child, rest);
        if surface.has_class(child, "editor-container") {
            editor = rest;
        }
    }
    editor
}
