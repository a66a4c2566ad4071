//! Waypost Core
//!
//! Entry point for applications: start a [`Navigator`] from a [`Config`],
//! register each surface's engine, and navigate through per-surface
//! [`Router`]s.

mod config;
mod error;
mod navigator;
mod observer;
mod router;

pub use config::Config;
pub use error::CoreError;
pub use navigator::{Navigator, NavigatorBuilder};
pub use observer::{ObserverSet, ScreenViewLogger};
pub use router::Router;

// Re-export the building blocks
pub use waypost_command::{
    Args, Command, CommandKind, DestinationId, ResultCode, ScreenInfo, SurfaceTag, Value,
};
pub use waypost_dispatch::{
    CommandObserver, DispatchError, Dispatcher, Disposition, EngineError, EngineHandle,
    ExecutionContext, Executed, Executor, InlineContext, NavigationEngine, StandardExecutor,
    ThreadContext,
};
pub use waypost_registry::{ListenerHandle, ResultListener, SharedResultRegistry};
pub use waypost_stack::{Clock, DebouncedEngine, Entry, NavGraph, StackEngine, SystemClock};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// `RUST_LOG` wins over the configured filter. Calling this twice is a no-op.
pub fn init_logging(config: &Config) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));

    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
