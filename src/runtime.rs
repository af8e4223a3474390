use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseButton, MouseEventKind};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Left-button press, in terminal cell coordinates.
    Click { column: u16, row: u16 },
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, mouse, resize)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<InputEvent, RecvTimeoutError>;
}

/// Production event source: a reader thread translating crossterm events
pub struct TerminalEventSource {
    rx: Receiver<InputEvent>,
}

impl TerminalEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => Some(InputEvent::Key(key)),
                Ok(CtEvent::Mouse(mouse)) => match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::Click {
                        column: mouse.column,
                        row: mouse.row,
                    }),
                    _ => None,
                },
                Ok(CtEvent::Resize(_, _)) => Some(InputEvent::Resize),
                Ok(_) => None,
                Err(_) => break,
            };

            if let Some(ev) = forwarded {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for TerminalEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for TerminalEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<InputEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed event source for headless tests
pub struct TestEventSource {
    rx: Receiver<InputEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<InputEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<InputEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the application one event at a time, yielding `Tick` whenever the
/// frame interval elapses without input. The session timer only runs while a
/// session is playing, so nothing here needs cancelling between sessions.
pub struct Runner<E: EventSource> {
    source: E,
    frame_interval: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(source: E, frame_interval: Duration) -> Self {
        Self {
            source,
            frame_interval,
        }
    }

    /// Blocks up to the frame interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> InputEvent {
        match self.source.recv_timeout(self.frame_interval) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                InputEvent::Tick
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let source = TestEventSource::new(rx);
        let runner = Runner::new(source, Duration::from_millis(1));

        // With no events available, step should yield Tick
        assert_matches!(runner.step(), InputEvent::Tick);
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(InputEvent::Resize).unwrap();
        let source = TestEventSource::new(rx);
        let runner = Runner::new(source, Duration::from_millis(10));

        assert_matches!(runner.step(), InputEvent::Resize);
    }

    #[test]
    fn step_preserves_click_coordinates() {
        let (tx, rx) = mpsc::channel();
        tx.send(InputEvent::Click {
            column: 40,
            row: 12,
        })
        .unwrap();
        let source = TestEventSource::new(rx);
        let runner = Runner::new(source, Duration::from_millis(10));

        assert_matches!(
            runner.step(),
            InputEvent::Click {
                column: 40,
                row: 12
            }
        );
    }

    #[test]
    fn disconnected_source_degrades_to_ticks() {
        let (tx, rx) = mpsc::channel::<InputEvent>();
        drop(tx);
        let source = TestEventSource::new(rx);
        let runner = Runner::new(source, Duration::from_millis(1));

        assert_matches!(runner.step(), InputEvent::Tick);
    }
}
