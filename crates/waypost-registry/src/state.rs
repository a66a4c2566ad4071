//! Surface lifecycle state
//!
//! ```text
//! Unregistered ──register──▶ Registered (buffered commands replay)
//!      ▲                         │
//!      └───────unregister────────┘
//! ```
//!
//! Registering an already registered surface replaces its engine.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// No engine; commands for the surface are buffered
    Unregistered,
    /// An engine is attached and commands execute on it
    Registered,
}

impl SurfaceState {
    pub fn from_registered(registered: bool) -> Self {
        if registered {
            SurfaceState::Registered
        } else {
            SurfaceState::Unregistered
        }
    }

    /// Returns true if commands should be buffered rather than executed
    pub fn buffers_commands(&self) -> bool {
        matches!(self, SurfaceState::Unregistered)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceState::Unregistered => "unregistered",
            SurfaceState::Registered => "registered",
        }
    }
}

impl std::fmt::Display for SurfaceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
