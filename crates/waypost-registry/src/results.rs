//! Result listeners
//!
//! A surface that expects data back from a later screen registers a listener
//! under a result code. When a "back with result" command for that code
//! executes, every listener registered for it receives the payload.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use waypost_command::ResultCode;

/// Receives payloads delivered for a result code
pub trait ResultListener: Send + Sync {
    fn on_result(&self, result: &Value);
}

impl<F> ResultListener for F
where
    F: Fn(&Value) + Send + Sync,
{
    fn on_result(&self, result: &Value) {
        self(result)
    }
}

/// Shared handle to a listener.
///
/// Two handles are equal only when they point at the same listener instance,
/// so registering a clone of a handle twice is a no-op.
#[derive(Clone)]
pub struct ListenerHandle(Arc<dyn ResultListener>);

impl ListenerHandle {
    pub fn new<L: ResultListener + 'static>(listener: L) -> Self {
        Self(Arc::new(listener))
    }

    /// Wrap a closure
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        Self::new(f)
    }

    pub fn notify(&self, result: &Value) {
        self.0.on_result(result);
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for ListenerHandle {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for ListenerHandle {}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListenerHandle({:p})", self.addr())
    }
}

#[derive(Default)]
pub struct ResultRegistry {
    listeners: HashMap<ResultCode, Vec<ListenerHandle>>,
}

impl ResultRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener; returns false if that instance was already registered
    pub fn add(&mut self, code: ResultCode, listener: ListenerHandle) -> bool {
        let listeners = self.listeners.entry(code).or_default();
        if listeners.contains(&listener) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Remove one listener instance
    pub fn remove(&mut self, code: &ResultCode, listener: &ListenerHandle) -> bool {
        let Some(listeners) = self.listeners.get_mut(code) else {
            return false;
        };

        let before = listeners.len();
        listeners.retain(|l| l != listener);
        let removed = listeners.len() != before;

        if listeners.is_empty() {
            self.listeners.remove(code);
        }

        removed
    }

    /// Remove every listener for `code`; true iff at least one was registered
    pub fn remove_all(&mut self, code: &ResultCode) -> bool {
        self.listeners
            .remove(code)
            .is_some_and(|listeners| !listeners.is_empty())
    }

    /// Snapshot of the listeners registered for `code`
    pub fn listeners(&self, code: &ResultCode) -> Vec<ListenerHandle> {
        self.listeners.get(code).cloned().unwrap_or_default()
    }

    pub fn count(&self, code: &ResultCode) -> usize {
        self.listeners.get(code).map_or(0, Vec::len)
    }
}

/// Result registry shared between callers and the execution context
#[derive(Default)]
pub struct SharedResultRegistry {
    inner: Arc<RwLock<ResultRegistry>>,
}

impl SharedResultRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, code: ResultCode, listener: ListenerHandle) -> bool {
        tracing::debug!(result_code = %code, "Adding result listener");
        self.inner.write().add(code, listener)
    }

    pub fn remove(&self, code: &ResultCode, listener: &ListenerHandle) -> bool {
        tracing::debug!(result_code = %code, "Removing result listener");
        self.inner.write().remove(code, listener)
    }

    pub fn remove_all(&self, code: &ResultCode) -> bool {
        tracing::debug!(result_code = %code, "Removing all result listeners");
        self.inner.write().remove_all(code)
    }

    pub fn listeners(&self, code: &ResultCode) -> Vec<ListenerHandle> {
        self.inner.read().listeners(code)
    }

    pub fn count(&self, code: &ResultCode) -> usize {
        self.inner.read().count(code)
    }

    /// Hand `payload` to every listener for `code`, returning how many got it.
    ///
    /// Listeners run outside the lock, so they may add or remove listeners.
    pub fn deliver(&self, code: &ResultCode, payload: &Value) -> usize {
        let listeners = self.listeners(code);
        for listener in &listeners {
            listener.notify(payload);
        }
        listeners.len()
    }
}

impl Clone for SharedResultRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
