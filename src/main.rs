use std::process::ExitCode;

use clap::Parser;

use float_wm::app::DesktopApp;
use float_wm::config::{Cli, Config};
use float_wm::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use float_wm::error::Result;
use float_wm::event_loop::EventLoop;
use float_wm::geometry::Size;
use float_wm::tracing_sub;

fn run(cli: &Cli) -> Result<()> {
    let config = Config::try_from(cli)?;
    tracing_sub::init_default(config.log_file.as_deref())?;

    let (cols, rows) = crossterm::terminal::size()?;
    let mut app = DesktopApp::new(&config, Size::new(f64::from(cols), f64::from(rows)))?;
    app.open_input();
    tracing::info!(cols, rows, "desktop started");

    let output = ConsoleOutputDriver::new()?;
    let mut event_loop = EventLoop::new(ConsoleInputDriver::new(), output, config.poll_interval);
    event_loop.run(&mut app)?;
    tracing::info!("desktop stopped");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("float-wm: {err}");
            ExitCode::FAILURE
        }
    }
}
