//! Commands waiting for their surface to register
//!
//! Buffered commands live in memory only. Entries for a surface that never
//! registers again are kept indefinitely; nothing purges them.

use std::collections::HashMap;

use waypost_command::{Command, SurfaceTag};

#[derive(Default)]
pub struct PendingBuffer {
    commands: HashMap<SurfaceTag, Vec<Command>>,
}

impl PendingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command under its own surface tag, keeping arrival order
    pub fn push(&mut self, command: Command) {
        let tag = command.surface().clone();
        let queue = self.commands.entry(tag.clone()).or_default();
        queue.push(command);

        tracing::debug!(surface = %tag, buffered = queue.len(), "Buffered command");
    }

    /// Drain everything buffered for `tag`, oldest first.
    ///
    /// The entry stays in the map, empty, so later commands start a fresh list.
    pub fn take(&mut self, tag: &SurfaceTag) -> Vec<Command> {
        self.commands
            .get_mut(tag)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    pub fn pending(&self, tag: &SurfaceTag) -> &[Command] {
        self.commands.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, tag: &SurfaceTag) -> usize {
        self.pending(tag).len()
    }

    /// Number of buffered commands across all surfaces
    pub fn total(&self) -> usize {
        self.commands.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
