use ratatui::style::{Color, Modifier, Style};

use crate::ui::{CellRect, UiFrame, truncate_to_width};

/// Everything a decorator needs to draw one window frame.
#[derive(Debug, Clone)]
pub struct WindowChrome<'a> {
    pub rect: CellRect,
    pub title: &'a str,
    pub icon: Option<&'a str>,
    pub focused: bool,
    pub dragging: bool,
    /// Title bar buttons, left to right, with the cell they start at.
    pub buttons: Vec<(i32, &'a str)>,
}

pub trait WindowDecorator: std::fmt::Debug {
    fn render_window(&self, frame: &mut UiFrame<'_>, chrome: &WindowChrome<'_>);
}

/// Glyph drawn for a title bar button, keyed by its accessible label.
pub fn button_glyph(label: &str) -> &'static str {
    match label {
        "Minimize" => "_",
        "Maximize" => "□",
        "Restore" => "❐",
        "Close" => "×",
        _ => "?",
    }
}

#[derive(Debug)]
pub struct OpenStepDecorator;

impl WindowDecorator for OpenStepDecorator {
    fn render_window(&self, frame: &mut UiFrame<'_>, chrome: &WindowChrome<'_>) {
        let rect = chrome.rect;
        if rect.width < 2 || rect.height < 2 {
            return;
        }

        let focused_header_style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        let normal_header_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        let border_style = if chrome.dragging {
            Style::default().fg(Color::Yellow).bg(Color::Reset)
        } else {
            Style::default().fg(Color::DarkGray).bg(Color::Reset)
        };
        let header_style = if chrome.focused {
            focused_header_style
        } else {
            normal_header_style
        };

        let outer_left = rect.x;
        let outer_top = rect.y;
        let outer_right = rect.right() - 1;
        let outer_bottom = rect.bottom() - 1;
        let header_y = outer_top + 1;

        // Header background, icon, title, buttons
        if header_y < outer_bottom {
            for x in outer_left + 1..outer_right {
                frame.set_cell(x, header_y, " ", header_style);
            }
            let mut text_left = outer_left + 2;
            if let Some(icon) = chrome.icon {
                frame.set_string_signed(text_left, header_y, outer_right, icon, header_style);
                text_left += icon.chars().count() as i32 + 1;
            }
            let text_right = chrome
                .buttons
                .first()
                .map(|(x, _)| *x)
                .unwrap_or(outer_right)
                .min(outer_right);
            let header_width = (text_right - text_left).max(0) as usize;
            let title = truncate_to_width(chrome.title, header_width);
            let title_len = title.chars().count();
            let start_x = text_left + (header_width.saturating_sub(title_len) / 2) as i32;
            frame.set_string_signed(start_x, header_y, text_right, &title, header_style);
            for (x, label) in &chrome.buttons {
                frame.set_string_signed(
                    *x,
                    header_y,
                    outer_right,
                    &format!(" {} ", button_glyph(label)),
                    header_style,
                );
            }
        }

        // Borders
        for x in outer_left..=outer_right {
            let (top, bottom) = if x == outer_left {
                ("┌", "└")
            } else if x == outer_right {
                ("┐", "┘")
            } else {
                ("─", "─")
            };
            frame.set_cell(x, outer_top, top, border_style);
            frame.set_cell(x, outer_bottom, bottom, border_style);
        }
        for y in outer_top + 1..outer_bottom {
            frame.set_cell(outer_left, y, "│", border_style);
            frame.set_cell(outer_right, y, "│", border_style);
        }
    }
}
