//! Waypost Registries
//!
//! Bookkeeping behind the dispatcher:
//! - [`SurfaceRegistry`]: tag → attached engine, last registration wins
//! - [`PendingBuffer`]: tag → commands waiting for that tag to register
//! - [`ResultRegistry`]: result code → listeners awaiting a payload
//!
//! The surface registry and pending buffer are plain single-owner maps;
//! the dispatcher's consumer task owns them. Result listeners are shared
//! with callers through [`SharedResultRegistry`].

mod pending;
mod results;
mod state;
mod surfaces;

pub use pending::PendingBuffer;
pub use results::{ListenerHandle, ResultListener, ResultRegistry, SharedResultRegistry};
pub use state::SurfaceState;
pub use surfaces::SurfaceRegistry;
