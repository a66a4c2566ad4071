//! Waypost Commands
//!
//! Value types describing navigation intents:
//! - [`Command`]: one intent, always addressed to a [`SurfaceTag`]
//! - [`DestinationId`], [`ResultCode`]: opaque tokens the engine interprets
//! - [`Args`], [`ScreenInfo`]: arguments and analytics descriptors

mod args;
mod command;
mod ids;

pub use args::{Args, ScreenInfo};
pub use command::{Command, CommandKind};
pub use ids::{DestinationId, ResultCode, SurfaceTag};

/// Result payloads travel as JSON values
pub use serde_json::Value;
