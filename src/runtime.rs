use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// One countdown step per second.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Everything the app loop reacts to, terminal input and time alike.
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Production event pump. A ticker thread and a crossterm reader thread
/// feed one channel, so ticks keep flowing while the user types and the
/// countdown never starves behind input.
pub fn spawn_event_channel(tick_interval: Duration) -> Receiver<AppEvent> {
    let (tx, rx) = mpsc::channel();

    let tick_tx = tx.clone();
    thread::spawn(move || loop {
        thread::sleep(tick_interval);
        if tick_tx.send(AppEvent::Tick).is_err() {
            return;
        }
    });

    thread::spawn(move || loop {
        let forwarded = match event::read() {
            Ok(CtEvent::Key(key)) => Some(AppEvent::Key(key)),
            Ok(CtEvent::Resize(_, _)) => Some(AppEvent::Resize),
            Ok(_) => None,
            Err(_) => return,
        };
        if let Some(event) = forwarded {
            if tx.send(event).is_err() {
                return;
            }
        }
    });

    rx
}

/// Where events come from. Swapped for a channel-backed fake in tests.
pub trait EventSource: Send + 'static {
    /// Wait up to `timeout` for the next event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// How long a quiet source waits before a step counts as a tick.
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed source for driving sessions without a terminal.
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the app one event at a time; a quiet interval becomes a
/// tick, so time passes even when nobody types.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    pub fn step(&self) -> AppEvent {
        self.event_source
            .recv_timeout(self.ticker.interval())
            .unwrap_or(AppEvent::Tick)
    }
}
