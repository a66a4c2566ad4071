//! Navigation engine contract
//!
//! An engine owns one surface's back stack. The dispatcher never touches an
//! engine directly; every call happens inside a task posted to the
//! execution context.

use std::sync::Arc;

use waypost_command::{Args, DestinationId};

use crate::error::EngineError;

pub trait NavigationEngine: Send + Sync {
    /// Push `destination`; an engine must reject tokens it does not know
    /// instead of panicking.
    fn push(&self, destination: DestinationId, args: Option<&Args>) -> Result<(), EngineError>;

    /// Pop one entry, returning whether anything was popped
    fn pop(&self) -> bool;

    /// Pop down to `destination` (and it too when `inclusive`), returning
    /// whether anything was popped
    fn pop_to(&self, destination: DestinationId, inclusive: bool) -> bool;
}

pub type EngineHandle = Arc<dyn NavigationEngine>;

impl<E: NavigationEngine + ?Sized> NavigationEngine for Arc<E> {
    fn push(&self, destination: DestinationId, args: Option<&Args>) -> Result<(), EngineError> {
        (**self).push(destination, args)
    }

    fn pop(&self) -> bool {
        (**self).pop()
    }

    fn pop_to(&self, destination: DestinationId, inclusive: bool) -> bool {
        (**self).pop_to(destination, inclusive)
    }
}
