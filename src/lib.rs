//! Floating, draggable and resizable dialog windows for the terminal.
//!
//! The [`surface`] module holds an element tree styled with a small CSS
//! subset. [`dnd`] moves and resizes elements on it from pointer events,
//! [`window`] builds dialog windows and their lifecycle on top, and
//! [`dialogs`] adds the input and result dialogs. The remaining modules
//! drive all of it from a crossterm terminal.

pub mod app;
pub mod config;
pub mod constants;
pub mod dialogs;
pub mod dnd;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod pointer;
pub mod render;
pub mod surface;
pub mod tracing_sub;
pub mod ui;
pub mod window;
