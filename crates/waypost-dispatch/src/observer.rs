//! Hook for watching commands as the consumer routes them

use serde_json::Value;
use waypost_command::Command;

/// Where the consumer sent a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Handed to the surface's engine via the execution context
    Dispatched,
    /// Parked until the surface registers
    Buffered,
}

/// Sees every routing decision the consumer makes.
///
/// A buffered command is observed twice: once when parked and once when it
/// is replayed. Observers run on the consumer task and should be quick.
pub trait CommandObserver: Send + Sync {
    fn on_command(&self, command: &Command, disposition: Disposition);

    /// A result payload was produced but no listener was registered for it.
    ///
    /// Called on the execution context after the command ran.
    fn on_result_dropped(&self, _command: &Command, _payload: &Value) {}
}

impl<F> CommandObserver for F
where
    F: Fn(&Command, Disposition) + Send + Sync,
{
    fn on_command(&self, command: &Command, disposition: Disposition) {
        self(command, disposition)
    }
}
