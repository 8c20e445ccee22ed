use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// Sampling tick, only produced while a [`TickSubscription`] is held
    Tick,
    /// Nothing happened within the idle interval
    Idle,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait AppEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                // some platforms report releases too
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(AppEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AppEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Decides whether ticks are due and how often.
///
/// Ticking is on exactly while at least one [`TickSubscription`] is alive.
/// Clones share the same subscription count.
#[derive(Clone, Debug)]
pub struct TickScheduler {
    interval: Duration,
    idle_interval: Duration,
    subscribers: Arc<AtomicUsize>,
}

impl TickScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            idle_interval: Duration::from_millis(250),
            subscribers: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_idle_interval(mut self, idle_interval: Duration) -> Self {
        self.idle_interval = idle_interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn idle_interval(&self) -> Duration {
        self.idle_interval
    }

    pub fn is_active(&self) -> bool {
        self.subscribers.load(Ordering::SeqCst) > 0
    }

    /// Start ticking until the returned subscription is dropped
    pub fn subscribe(&self) -> TickSubscription {
        self.subscribers.fetch_add(1, Ordering::SeqCst);
        TickSubscription {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

/// Scoped registration for ticks; dropping it cancels them
#[derive(Debug)]
pub struct TickSubscription {
    subscribers: Arc<AtomicUsize>,
}

impl Drop for TickSubscription {
    fn drop(&mut self) {
        self.subscribers.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: AppEventSource> {
    event_source: E,
    scheduler: TickScheduler,
}

impl<E: AppEventSource> Runner<E> {
    pub fn new(event_source: E, scheduler: TickScheduler) -> Self {
        Self {
            event_source,
            scheduler,
        }
    }

    /// Blocks up to the current interval and returns the next event.
    /// On timeout yields Tick while subscribed, Idle otherwise.
    pub fn step(&self) -> AppEvent {
        let ticking = self.scheduler.is_active();
        let timeout = if ticking {
            self.scheduler.interval()
        } else {
            self.scheduler.idle_interval()
        };

        match self.event_source.recv_timeout(timeout) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                if ticking {
                    AppEvent::Tick
                } else {
                    AppEvent::Idle
                }
            }
        }
    }
}
