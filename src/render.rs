//! Paint the desktop into a frame, bottom window first.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Clear;

use crate::surface::{ElementId, Surface};
use crate::ui::{CellRect, UiFrame};
use crate::window::decorator::{WindowChrome, WindowDecorator};
use crate::window::{Desktop, Window};

pub fn render_desktop(frame: &mut UiFrame<'_>, desktop: &Desktop, decorator: &dyn WindowDecorator) {
    for id in desktop.draw_order() {
        if let Some(window) = desktop.window(id) {
            render_window(frame, desktop.surface(), window, decorator);
        }
    }
}

fn cell_rect(surface: &Surface, id: ElementId) -> Option<CellRect> {
    surface.layout_box(id).map(CellRect::from_geometry)
}

fn render_window(
    frame: &mut UiFrame<'_>,
    surface: &Surface,
    window: &Window,
    decorator: &dyn WindowDecorator,
) {
    let el = window.elements();
    let Some(rect) = cell_rect(surface, el.root) else {
        return;
    };
    if let Some(visible) = rect.clip(frame.area()) {
        frame.render_widget(Clear, visible);
    }

    let buttons = [el.minimize_button, el.maximize_button, el.close_button]
        .into_iter()
        .flatten()
        .filter_map(|b| {
            let r = cell_rect(surface, b)?;
            Some((r.x, surface.attr(b, "aria-label").unwrap_or_default()))
        })
        .collect();
    let chrome = WindowChrome {
        rect,
        title: window.title(),
        icon: el.icon.map(|icon| surface.text(icon)),
        focused: window.is_focused(),
        dragging: surface.has_class(el.root, "dragging"),
        buttons,
    };
    decorator.render_window(frame, &chrome);

    if let Some(editor) = window.editor() {
        let container = surface
            .children(el.body)
            .iter()
            .copied()
            .find(|c| surface.has_class(*c, "editor-container"));
        if let Some(area) = container.and_then(|c| cell_rect(surface, c)) {
            let cursor = editor.is_focused().then(|| editor.cursor());
            render_text(frame, area, &editor.value(), cursor);
        }
    }
    for child in surface.children(el.body) {
        render_body_element(frame, surface, *child);
    }
}

fn render_text(frame: &mut UiFrame<'_>, area: CellRect, text: &str, cursor: Option<(usize, usize)>) {
    let style = Style::default();
    let lines: Vec<&str> = text.split('\n').collect();
    // keep the caret row on screen
    let skip = cursor
        .map(|(_, row)| (row + 1).saturating_sub(usize::from(area.height)))
        .unwrap_or(0);
    for (row, line) in lines.iter().enumerate().skip(skip) {
        let y = area.y + (row - skip) as i32;
        if y >= area.bottom() {
            break;
        }
        frame.set_string_signed(area.x, y, area.right(), line, style);
    }
    if let Some((col, row)) = cursor {
        let x = area.x + col as i32;
        let y = area.y + (row - skip) as i32;
        if x < area.right() && y < area.bottom() {
            let ch = lines
                .get(row)
                .and_then(|l| l.chars().nth(col))
                .map(String::from)
                .unwrap_or_else(|| " ".to_string());
            frame.set_cell(x, y, &ch, style.add_modifier(Modifier::REVERSED));
        }
    }
}

fn render_body_element(frame: &mut UiFrame<'_>, surface: &Surface, id: ElementId) {
    if surface.has_class(id, "editor-container") {
        return;
    }
    if let Some(rect) = cell_rect(surface, id) {
        let text = surface.text(id);
        if surface.tag(id) == "button" {
            let style = Style::default().fg(Color::Black).bg(Color::Gray);
            frame.set_string_signed(rect.x, rect.y, rect.right(), &format!("[{text}]"), style);
        } else if surface.has_class(id, "checkbox") {
            let mark = if surface.attr(id, "checked").is_some() {
                "x"
            } else {
                " "
            };
            frame.set_string_signed(
                rect.x,
                rect.y,
                rect.right(),
                &format!("[{mark}] {text}"),
                Style::default(),
            );
        } else if !text.is_empty() {
            render_text(frame, rect, text, None);
        }
    }
    for child in surface.children(id) {
        render_body_element(frame, surface, *child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::ResultDialog;
    use crate::geometry::Size;
    use crate::window::DesktopConfig;
    use crate::window::decorator::OpenStepDecorator;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;

    fn screen(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn result_text_is_painted_inside_the_frame() {
        let mut d = Desktop::new(Size::new(80.0, 24.0), DesktopConfig::default()).unwrap();
        let result = ResultDialog::new(&mut d);
        result.set_text(&mut d, "hello\nworld");
        result.show(&mut d);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);
        render_desktop(&mut ui, &d, &OpenStepDecorator);
        let text = screen(&buf);
        assert!(text.contains("Execution Result"));
        assert!(text.contains("hello"));
        assert!(text.contains("world"));
        assert!(text.contains('×'));
    }

    #[test]
    fn hidden_windows_are_skipped() {
        let mut d = Desktop::new(Size::new(20.0, 6.0), DesktopConfig::default()).unwrap();
        let result = ResultDialog::new(&mut d);
        result.set_text(&mut d, "secret");
        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);
        render_desktop(&mut ui, &d, &OpenStepDecorator);
        assert!(!screen(&buf).contains("secret"));
    }
}
