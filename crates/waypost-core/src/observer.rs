//! Built-in command observers

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use waypost_command::{Command, Value};
use waypost_dispatch::{CommandObserver, Disposition};

/// Logs a screen view whenever a navigation carrying screen info is
/// handed to its engine
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenViewLogger;

impl CommandObserver for ScreenViewLogger {
    fn on_command(&self, command: &Command, disposition: Disposition) {
        if disposition != Disposition::Dispatched {
            return;
        }
        let Some(screen) = command.screen() else {
            return;
        };

        tracing::info!(
            surface = %command.surface(),
            screen = %screen.name,
            args = screen.args.len(),
            "Screen view"
        );
    }
}

/// Fans every callback out to a list of observers, in order.
///
/// A panicking observer is logged and skipped; the rest still run.
#[derive(Clone, Default)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn CommandObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observer: Arc<dyn CommandObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    fn each(&self, command: &Command, call: impl Fn(&dyn CommandObserver)) {
        for observer in &self.observers {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| call(observer.as_ref())));
            if outcome.is_err() {
                tracing::error!(command = %command, "Command observer panicked");
            }
        }
    }
}

impl CommandObserver for ObserverSet {
    fn on_command(&self, command: &Command, disposition: Disposition) {
        self.each(command, |observer| observer.on_command(command, disposition));
    }

    fn on_result_dropped(&self, command: &Command, payload: &Value) {
        self.each(command, |observer| observer.on_result_dropped(command, payload));
    }
}
