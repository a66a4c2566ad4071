//! Dispatch error types

use thiserror::Error;
use waypost_command::DestinationId;

/// Raised by an engine that refuses an operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Unknown destination: {0}")]
    UnknownDestination(DestinationId),
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Dispatcher is shut down")]
    Closed,

    #[error("No tokio runtime available to run the command consumer")]
    NoRuntime,

    #[error("Command consumer panicked: {0}")]
    ConsumerPanicked(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
