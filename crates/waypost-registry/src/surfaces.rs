//! Surface registry
//!
//! Maps a surface tag to the engine currently attached to it. At most one
//! engine per tag; the last registration wins.

use std::collections::HashMap;

use waypost_command::SurfaceTag;

use crate::state::SurfaceState;

pub struct SurfaceRegistry<E> {
    engines: HashMap<SurfaceTag, E>,
}

impl<E> SurfaceRegistry<E> {
    pub fn new() -> Self {
        Self {
            engines: HashMap::new(),
        }
    }

    /// Attach an engine, returning the one it replaced
    pub fn register(&mut self, tag: SurfaceTag, engine: E) -> Option<E> {
        let replaced = self.engines.insert(tag.clone(), engine);

        tracing::debug!(
            surface = %tag,
            replaced = replaced.is_some(),
            "Surface registered"
        );

        replaced
    }

    /// Detach the engine for `tag`, if any
    pub fn unregister(&mut self, tag: &SurfaceTag) -> Option<E> {
        let removed = self.engines.remove(tag);

        tracing::debug!(
            surface = %tag,
            removed = removed.is_some(),
            "Surface unregistered"
        );

        removed
    }

    pub fn get(&self, tag: &SurfaceTag) -> Option<&E> {
        self.engines.get(tag)
    }

    pub fn state(&self, tag: &SurfaceTag) -> SurfaceState {
        SurfaceState::from_registered(self.engines.contains_key(tag))
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl<E> Default for SurfaceRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}
