use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::{InputDriver, OutputDriver};
use crate::ui::UiFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Something the loop can drive: it reacts to input, advances on idle ticks
/// and paints itself once per iteration.
pub trait App {
    fn handle_event(&mut self, event: Event) -> ControlFlow;

    fn tick(&mut self) -> ControlFlow {
        ControlFlow::Continue
    }

    fn render(&mut self, frame: UiFrame<'_>);
}

/// Single-threaded message pump.
///
/// Owns both drivers and is the only place that polls for input. Each
/// iteration ticks the app, draws it, then drains every queued event so a
/// burst of mouse drags never falls behind the renderer.
pub struct EventLoop<I, O> {
    input: I,
    output: O,
    poll_interval: Duration,
}

impl<I: InputDriver, O: OutputDriver> EventLoop<I, O> {
    pub fn new(input: I, output: O, poll_interval: Duration) -> Self {
        Self {
            input,
            output,
            poll_interval,
        }
    }

    pub fn poll(&mut self) -> io::Result<Option<Event>> {
        if self.input.poll(self.poll_interval)? {
            Ok(Some(self.input.read()?))
        } else {
            Ok(None)
        }
    }

    pub fn input(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn output(&mut self) -> &mut O {
        &mut self.output
    }

    /// Enter the terminal, run until the app quits, then restore the
    /// terminal even if the loop failed.
    pub fn run<A: App>(&mut self, app: &mut A) -> io::Result<()> {
        self.output.enter()?;
        let result = self.pump(app);
        let exit = self.output.exit();
        result.and(exit)
    }

    fn pump<A: App>(&mut self, app: &mut A) -> io::Result<()> {
        loop {
            if app.tick() == ControlFlow::Quit {
                return Ok(());
            }
            self.output.draw(|frame| app.render(frame))?;

            if self.input.poll(self.poll_interval)? {
                loop {
                    let event = self.input.read()?;
                    if app.handle_event(event) == ControlFlow::Quit {
                        return Ok(());
                    }
                    if !self.input.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
    }
}
