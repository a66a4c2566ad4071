//! Waypost Stack Engine
//!
//! A ready-made [`NavigationEngine`](waypost_dispatch::NavigationEngine):
//! - [`StackEngine`]: back stack over a [`NavGraph`], rejects unknown destinations
//! - [`DebouncedEngine`]: wraps any engine and drops rapid duplicate pushes

mod debounce;
mod stack;

pub use debounce::{Clock, DebouncedEngine, SystemClock, DEFAULT_WINDOW};
pub use stack::{Entry, NavGraph, StackEngine};
