//! Test doubles shared by the unit tests in this crate

use parking_lot::Mutex;
use std::collections::HashSet;

use waypost_command::{Args, DestinationId};

use crate::engine::NavigationEngine;
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Push(DestinationId, Option<Args>),
    Pop,
    PopTo(DestinationId, bool),
}

/// Engine that records every call and answers from fixed settings
pub(crate) struct RecordingEngine {
    calls: Mutex<Vec<Call>>,
    rejected: HashSet<DestinationId>,
    pop_to_result: bool,
}

impl RecordingEngine {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            rejected: HashSet::new(),
            pop_to_result: true,
        }
    }

    pub(crate) fn rejecting(mut self, destination: DestinationId) -> Self {
        self.rejected.insert(destination);
        self
    }

    pub(crate) fn with_pop_to_result(mut self, result: bool) -> Self {
        self.pop_to_result = result;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

impl NavigationEngine for RecordingEngine {
    fn push(&self, destination: DestinationId, args: Option<&Args>) -> Result<(), EngineError> {
        self.calls.lock().push(Call::Push(destination, args.cloned()));
        if self.rejected.contains(&destination) {
            return Err(EngineError::UnknownDestination(destination));
        }
        Ok(())
    }

    fn pop(&self) -> bool {
        self.calls.lock().push(Call::Pop);
        true
    }

    fn pop_to(&self, destination: DestinationId, inclusive: bool) -> bool {
        self.calls.lock().push(Call::PopTo(destination, inclusive));
        self.pop_to_result
    }
}
