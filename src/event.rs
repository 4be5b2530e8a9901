use std::io;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self as term, KeyEvent, KeyEventKind};
use tracing::{trace, warn};

/// Input, resize or frame tick delivered to the main loop.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
}

/// Reads the terminal on a background thread. Ticks arrive once per frame
/// period whether or not keys are being pressed, so the simulation rate does
/// not depend on input.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

/// Time left until the next tick is due.
fn poll_timeout(frame: Duration, since_tick: Duration) -> Duration {
    frame.saturating_sub(since_tick)
}

fn forward(tx: &Sender<Event>, raw: term::Event) -> bool {
    let event = match raw {
        term::Event::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
        term::Event::Resize(w, h) => Event::Resize(w, h),
        _ => return true,
    };
    tx.send(event).is_ok()
}

impl EventHandler {
    pub fn new(frame: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = poll_timeout(frame, last_tick.elapsed());
                match term::poll(timeout) {
                    Ok(true) => match term::read() {
                        Ok(raw) => {
                            if !forward(&tx, raw) {
                                return;
                            }
                        }
                        Err(e) => warn!(error = %e, "terminal read failed"),
                    },
                    Ok(false) => {}
                    Err(e) => warn!(error = %e, "terminal poll failed"),
                }
                if last_tick.elapsed() >= frame {
                    if tx.send(Event::Tick).is_err() {
                        trace!("event receiver gone");
                        return;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    #[test]
    fn timeout_counts_down_to_zero() {
        let frame = Duration::from_millis(16);
        assert_eq!(poll_timeout(frame, Duration::ZERO), frame);
        assert_eq!(poll_timeout(frame, Duration::from_millis(10)), Duration::from_millis(6));
        assert_eq!(poll_timeout(frame, Duration::from_millis(40)), Duration::ZERO);
    }

    #[test]
    fn only_presses_and_resizes_are_forwarded() {
        let (tx, rx) = mpsc::channel();
        let press = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        let release = KeyEvent {
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
            ..press
        };
        assert!(forward(&tx, term::Event::Key(release)));
        assert!(forward(&tx, term::Event::FocusGained));
        assert!(forward(&tx, term::Event::Key(press)));
        assert!(forward(&tx, term::Event::Resize(80, 24)));

        assert!(matches!(rx.try_recv(), Ok(Event::Key(k)) if k.code == KeyCode::Char('a')));
        assert!(matches!(rx.try_recv(), Ok(Event::Resize(80, 24))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_receiver_stops_forwarding() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        assert!(!forward(&tx, term::Event::Resize(1, 1)));
    }
}
