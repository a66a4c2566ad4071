//! Opaque identifiers used to address surfaces, destinations and results

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifies the navigation engine a command belongs to.
///
/// Each independently lifecycled surface (screen, window, pane) registers
/// its engine under one tag. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceTag(Arc<str>);

impl SurfaceTag {
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(Arc::from(tag.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurfaceTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for SurfaceTag {
    fn from(tag: String) -> Self {
        Self(Arc::from(tag))
    }
}

impl AsRef<str> for SurfaceTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Opaque navigation target within a surface's graph.
///
/// May name a destination or an action edge; only the engine knows which.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestinationId(pub u32);

impl DestinationId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for DestinationId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Key correlating a "back with result" event to the listeners waiting for it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultCode(Arc<str>);

impl ResultCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(Arc::from(code.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResultCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for ResultCode {
    fn from(code: String) -> Self {
        Self(Arc::from(code))
    }
}
