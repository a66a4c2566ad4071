//! In-memory back stack over a fixed navigation graph

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use waypost_command::{Args, DestinationId};
use waypost_dispatch::{EngineError, NavigationEngine};

/// The destinations a surface can reach, and where it starts
#[derive(Debug, Clone)]
pub struct NavGraph {
    start: DestinationId,
    destinations: HashSet<DestinationId>,
}

impl NavGraph {
    pub fn new(start: DestinationId) -> Self {
        let mut destinations = HashSet::new();
        destinations.insert(start);
        Self {
            start,
            destinations,
        }
    }

    pub fn with(mut self, destination: DestinationId) -> Self {
        self.destinations.insert(destination);
        self
    }

    pub fn with_all(mut self, destinations: impl IntoIterator<Item = DestinationId>) -> Self {
        self.destinations.extend(destinations);
        self
    }

    pub fn start(&self) -> DestinationId {
        self.start
    }

    pub fn contains(&self, destination: DestinationId) -> bool {
        self.destinations.contains(&destination)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub destination: DestinationId,
    pub args: Option<Args>,
}

/// Back stack seeded with the graph's start destination.
///
/// The start destination is never popped.
pub struct StackEngine {
    graph: NavGraph,
    entries: Mutex<Vec<Entry>>,
}

impl StackEngine {
    pub fn new(graph: NavGraph) -> Self {
        let root = Entry {
            destination: graph.start(),
            args: None,
        };
        Self {
            graph,
            entries: Mutex::new(vec![root]),
        }
    }

    /// Destinations from bottom to top
    pub fn stack(&self) -> Vec<DestinationId> {
        self.entries.lock().iter().map(|e| e.destination).collect()
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().clone()
    }

    pub fn current(&self) -> DestinationId {
        self.entries
            .lock()
            .last()
            .map(|e| e.destination)
            .unwrap_or(self.graph.start())
    }

    pub fn depth(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }
}

impl NavigationEngine for StackEngine {
    fn push(&self, destination: DestinationId, args: Option<&Args>) -> Result<(), EngineError> {
        if !self.graph.contains(destination) {
            tracing::warn!(
                destination = %destination,
                "Destination is not in the navigation graph"
            );
            return Err(EngineError::UnknownDestination(destination));
        }

        let mut entries = self.entries.lock();
        entries.push(Entry {
            destination,
            args: args.cloned(),
        });

        tracing::debug!(
            destination = %destination,
            depth = entries.len(),
            "Pushed destination"
        );
        Ok(())
    }

    fn pop(&self) -> bool {
        let mut entries = self.entries.lock();
        if entries.len() <= 1 {
            return false;
        }
        entries.pop();
        true
    }

    fn pop_to(&self, destination: DestinationId, inclusive: bool) -> bool {
        let mut entries = self.entries.lock();
        let Some(index) = entries.iter().rposition(|e| e.destination == destination) else {
            tracing::debug!(
                destination = %destination,
                "Destination is not in the back stack"
            );
            return false;
        };

        let keep = if inclusive { index } else { index + 1 };
        let keep = keep.max(1);
        if keep >= entries.len() {
            return false;
        }

        entries.truncate(keep);
        true
    }
}
