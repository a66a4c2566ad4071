//! Waypost Dispatcher
//!
//! Decouples the intent to navigate from its execution. Commands for a
//! surface whose engine does not exist yet are buffered and replayed once it
//! registers; "back with result" commands are matched against listeners.
//!
//! - [`Dispatcher`]: submit commands, register/unregister surfaces, shut down
//! - [`NavigationEngine`]: what a surface's engine must provide
//! - [`Executor`]: maps commands onto engine calls ([`StandardExecutor`])
//! - [`ExecutionContext`]: where engine calls run ([`ThreadContext`], [`InlineContext`])
//! - [`CommandObserver`]: watches routing decisions

mod consumer;
mod context;
mod dispatcher;
mod engine;
mod error;
mod executor;
mod observer;
#[cfg(test)]
mod testing;

use std::any::Any;

pub use context::{ExecutionContext, InlineContext, Task, ThreadContext};
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use engine::{EngineHandle, NavigationEngine};
pub use error::{DispatchError, EngineError};
pub use executor::{Executed, Executor, StandardExecutor};
pub use observer::{CommandObserver, Disposition};

pub type Result<T> = std::result::Result<T, DispatchError>;

/// Best-effort text of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "non-string panic payload".to_string()
}
