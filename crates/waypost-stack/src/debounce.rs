//! Double-navigation suppression
//!
//! A rapid double tap can issue the same navigation twice before the first
//! transition finishes. [`DebouncedEngine`] drops a push of the same
//! destination as the previous push when it arrives within the window.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

use waypost_command::{Args, DestinationId};
use waypost_dispatch::{EngineError, NavigationEngine};

pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct LastPush {
    destination: DestinationId,
    at: Instant,
}

pub struct DebouncedEngine<E, C = SystemClock> {
    inner: E,
    window: Duration,
    clock: C,
    last: Mutex<Option<LastPush>>,
}

impl<E: NavigationEngine> DebouncedEngine<E> {
    pub fn new(inner: E, window: Duration) -> Self {
        Self::with_clock(inner, window, SystemClock)
    }
}

impl<E: NavigationEngine, C: Clock> DebouncedEngine<E, C> {
    pub fn with_clock(inner: E, window: Duration, clock: C) -> Self {
        Self {
            inner,
            window,
            clock,
            last: Mutex::new(None),
        }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record this attempt and report whether it repeats the last one.
    ///
    /// Every attempt refreshes the timestamp, suppressed ones included, so a
    /// burst of taps stays suppressed until it pauses for a full window.
    fn is_repeat(&self, destination: DestinationId) -> bool {
        let now = self.clock.now();
        let mut last = self.last.lock();
        let repeat = last.as_ref().is_some_and(|prev| {
            prev.destination == destination && now.duration_since(prev.at) <= self.window
        });
        *last = Some(LastPush {
            destination,
            at: now,
        });
        repeat
    }
}

impl<E: NavigationEngine, C: Clock> NavigationEngine for DebouncedEngine<E, C> {
    fn push(&self, destination: DestinationId, args: Option<&Args>) -> Result<(), EngineError> {
        if self.is_repeat(destination) {
            tracing::debug!(destination = %destination, "Suppressed double navigation");
            return Ok(());
        }
        self.inner.push(destination, args)
    }

    fn pop(&self) -> bool {
        self.inner.pop()
    }

    fn pop_to(&self, destination: DestinationId, inclusive: bool) -> bool {
        self.inner.pop_to(destination, inclusive)
    }
}
