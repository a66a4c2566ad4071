//! Command execution against an engine

use waypost_command::Command;

use crate::engine::NavigationEngine;
use crate::error::EngineError;

/// What an execution did to the engine's stack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Executed {
    pub popped: bool,
    pub pushed: bool,
}

impl Executed {
    fn popped(popped: bool) -> Self {
        Self {
            popped,
            pushed: false,
        }
    }

    fn pushed() -> Self {
        Self {
            popped: false,
            pushed: true,
        }
    }
}

/// Applies commands to engines.
///
/// Replaceable per UI toolkit; the dispatcher only relies on this contract.
pub trait Executor: Send + Sync {
    fn execute(
        &self,
        command: &Command,
        engine: &dyn NavigationEngine,
    ) -> Result<Executed, EngineError>;
}

/// Maps each command variant onto the engine's push/pop verbs
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardExecutor;

impl Executor for StandardExecutor {
    fn execute(
        &self,
        command: &Command,
        engine: &dyn NavigationEngine,
    ) -> Result<Executed, EngineError> {
        match command {
            Command::Navigate {
                destination, args, ..
            } => {
                engine.push(*destination, args.as_ref())?;
                Ok(Executed::pushed())
            }
            Command::Back { .. } => Ok(Executed::popped(engine.pop())),
            Command::BackTo {
                destination,
                inclusive,
                ..
            } => Ok(Executed::popped(engine.pop_to(*destination, *inclusive))),
            Command::BackOrNavigate {
                destination, args, ..
            } => {
                if engine.pop_to(*destination, false) {
                    return Ok(Executed::popped(true));
                }
                tracing::debug!(
                    destination = %destination,
                    "Destination not in back stack, navigating instead"
                );
                engine.push(*destination, args.as_ref())?;
                Ok(Executed::pushed())
            }
            Command::BackWithResult {
                destination,
                inclusive,
                ..
            } => {
                let popped = match destination {
                    Some(destination) => engine.pop_to(*destination, *inclusive),
                    None => engine.pop(),
                };
                Ok(Executed::popped(popped))
            }
        }
    }
}
