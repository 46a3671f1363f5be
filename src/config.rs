//! Command-line flags and the validated runtime configuration built from them.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use indoc::indoc;
use thiserror::Error;

use crate::constants::{DEFAULT_DOUBLE_CLICK, DEFAULT_POLL_INTERVAL};
use crate::dnd::resize::ResizeConfig;
use crate::geometry::Size;
use crate::window::DesktopConfig;

const AFTER_HELP: &str = indoc! {"
    Drag a window by its title bar, resize it from any edge or corner.
    Double-click a title bar to maximize, double-click the icon to close.

    Press `s` to open the stdin editor. Applying it opens a result window.
"};

#[derive(Debug, Parser)]
#[command(
    name = "float-wm",
    about = "Floating windows with drag, resize and an input dialog in the terminal",
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Two clicks closer than this (milliseconds) count as a double-click.
    #[arg(long, default_value_t = DEFAULT_DOUBLE_CLICK.as_millis() as u64)]
    pub double_click_ms: u64,

    /// Input poll interval in milliseconds.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    pub poll_ms: u64,

    /// Smallest size a resize may produce, as COLSxROWS.
    #[arg(long, value_name = "COLSxROWS")]
    pub min_size: Option<String>,

    /// Write logs here. Without it logging is off.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Text the input dialog starts with.
    #[arg(long)]
    pub initial: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("double-click interval must be between 50 and 5000 ms, got {0}")]
    DoubleClick(u64),
    #[error("poll interval must be between 1 and 1000 ms, got {0}")]
    PollInterval(u64),
    #[error("invalid minimum size `{0}`, expected COLSxROWS")]
    MinSize(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub double_click: Duration,
    pub poll_interval: Duration,
    pub min_size: Option<Size>,
    pub log_file: Option<PathBuf>,
    pub initial: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            double_click: DEFAULT_DOUBLE_CLICK,
            poll_interval: DEFAULT_POLL_INTERVAL,
            min_size: None,
            log_file: None,
            initial: None,
        }
    }
}

impl Config {
    pub fn desktop(&self) -> DesktopConfig {
        DesktopConfig {
            double_click: self.double_click,
            resize: ResizeConfig {
                min_size: self.min_size,
            },
        }
    }
}

fn parse_min_size(raw: &str) -> Result<Size, ConfigError> {
    let err = || ConfigError::MinSize(raw.to_string());
    let (cols, rows) = raw
        .split_once(['x', 'X'])
        .ok_or_else(err)?;
    let cols: u16 = cols.trim().parse().map_err(|_| err())?;
    let rows: u16 = rows.trim().parse().map_err(|_| err())?;
    if cols == 0 || rows == 0 {
        return Err(err());
    }
    Ok(Size::new(f64::from(cols), f64::from(rows)))
}

impl TryFrom<&Cli> for Config {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if !(50..=5000).contains(&cli.double_click_ms) {
            return Err(ConfigError::DoubleClick(cli.double_click_ms));
        }
        if !(1..=1000).contains(&cli.poll_ms) {
            return Err(ConfigError::PollInterval(cli.poll_ms));
        }
        let min_size = cli.min_size.as_deref().map(parse_min_size).transpose()?;
        Ok(Self {
            double_click: Duration::from_millis(cli.double_click_ms),
            poll_interval: Duration::from_millis(cli.poll_ms),
            min_size,
            log_file: cli.log_file.clone(),
            initial: cli.initial.clone(),
        })
    }
}
