//! Shared crate-wide constants.

use std::time::Duration;

/// Elements that start a window move: the title bar of a Normal window.
pub const DRAG_SELECTOR: &str = ".window:not(.maximized):not(.minimized)>.title-bar";

/// Edge and corner handles of a Normal window.
pub const RESIZE_SELECTOR: &str = ".window:not(.maximized):not(.minimized)>.resize-handle";

/// What a drag or resize gesture actually manipulates.
pub const WINDOW_SELECTOR: &str = ".window";

/// Pointer id the terminal mouse is reported under.
pub const MOUSE_POINTER_ID: u32 = 0;

/// Two clicks on the same element within this interval form a double-click.
pub const DEFAULT_DOUBLE_CLICK: Duration = Duration::from_millis(500);

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Columns taken by one title bar button, e.g. ` x `.
pub const BUTTON_WIDTH: f64 = 3.0;

/// Size of a minimized window: border plus the title row.
pub const MINIMIZED_WIDTH: f64 = 24.0;
pub const MINIMIZED_HEIGHT: f64 = 3.0;
