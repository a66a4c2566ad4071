//! Execution contexts
//!
//! Engines are confined to one designated context (the UI-thread
//! equivalent). The dispatcher hands each execution to the context with
//! [`ExecutionContext::post`] and moves on without waiting for it.
//!
//! Contexts must run posted tasks one at a time, in posting order;
//! per-surface command ordering depends on it.

use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use tokio::sync::{mpsc, oneshot};

use crate::error::DispatchError;
use crate::panic_message;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait ExecutionContext: Send + Sync {
    fn post(&self, task: Task);
}

/// Runs each task immediately on the posting thread.
///
/// With this context engines execute on the dispatcher's consumer task,
/// which is convenient for headless use and deterministic tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineContext;

impl ExecutionContext for InlineContext {
    fn post(&self, task: Task) {
        task();
    }
}

/// A dedicated, named OS thread draining a FIFO of tasks.
///
/// A panicking task is logged and the thread keeps going.
pub struct ThreadContext {
    name: String,
    sender: Mutex<Option<mpsc::UnboundedSender<Task>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ThreadContext {
    pub fn spawn(name: impl Into<String>) -> Result<Self, DispatchError> {
        let name = name.into();
        let (sender, receiver) = mpsc::unbounded_channel::<Task>();

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || run_tasks(receiver))?;

        tracing::debug!(context = %name, "Execution context started");

        Ok(Self {
            name,
            sender: Mutex::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolves once every task posted before this call has run
    pub async fn idle(&self) {
        let (done, wait) = oneshot::channel();
        self.post(Box::new(move || {
            let _ = done.send(());
        }));
        let _ = wait.await;
    }

    /// Stop accepting tasks, let queued ones finish, and join the thread.
    ///
    /// Must not be called from a task running on this context.
    pub fn shutdown(&self) {
        self.sender.lock().take();
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            // Dropped from one of our own tasks; the thread exits on its own
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                tracing::error!(context = %self.name, "Execution context thread panicked");
            }
            tracing::debug!(context = %self.name, "Execution context stopped");
        }
    }
}

impl ExecutionContext for ThreadContext {
    fn post(&self, task: Task) {
        let sent = match self.sender.lock().as_ref() {
            Some(sender) => sender.send(task).is_ok(),
            None => false,
        };
        if !sent {
            tracing::warn!(context = %self.name, "Execution context stopped, task dropped");
        }
    }
}

impl Drop for ThreadContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_tasks(mut receiver: mpsc::UnboundedReceiver<Task>) {
    while let Some(task) = receiver.blocking_recv() {
        if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(task)) {
            tracing::error!(
                panic = %panic_message(panic.as_ref()),
                "Task panicked on execution context"
            );
        }
    }
}
