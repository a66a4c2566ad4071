//! Navigation commands
//!
//! A command is one immutable navigation intent addressed to a surface:
//! - `Navigate`: push a destination
//! - `Back`: pop one entry
//! - `BackTo`: pop down to a destination
//! - `BackOrNavigate`: pop down to a destination, or push it if absent
//! - `BackWithResult`: pop, then hand a payload to result listeners

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::args::{Args, ScreenInfo};
use crate::ids::{DestinationId, ResultCode, SurfaceTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Navigate,
    Back,
    BackTo,
    BackOrNavigate,
    BackWithResult,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Navigate => "navigate",
            CommandKind::Back => "back",
            CommandKind::BackTo => "back_to",
            CommandKind::BackOrNavigate => "back_or_navigate",
            CommandKind::BackWithResult => "back_with_result",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    Navigate {
        surface: SurfaceTag,
        destination: DestinationId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        args: Option<Args>,
        /// Analytics descriptor, never seen by the engine
        #[serde(default, skip_serializing_if = "Option::is_none")]
        screen: Option<ScreenInfo>,
    },
    Back {
        surface: SurfaceTag,
    },
    BackTo {
        surface: SurfaceTag,
        destination: DestinationId,
        /// Also pop `destination` itself
        inclusive: bool,
    },
    BackOrNavigate {
        surface: SurfaceTag,
        destination: DestinationId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        args: Option<Args>,
    },
    BackWithResult {
        surface: SurfaceTag,
        result_code: ResultCode,
        payload: Value,
        /// `None` pops a single entry
        #[serde(default, skip_serializing_if = "Option::is_none")]
        destination: Option<DestinationId>,
        inclusive: bool,
    },
}

impl Command {
    pub fn navigate(
        surface: impl Into<SurfaceTag>,
        destination: DestinationId,
        args: Option<Args>,
    ) -> Self {
        Command::Navigate {
            surface: surface.into(),
            destination,
            args,
            screen: None,
        }
    }

    pub fn navigate_screen(
        surface: impl Into<SurfaceTag>,
        destination: DestinationId,
        args: Option<Args>,
        screen: ScreenInfo,
    ) -> Self {
        Command::Navigate {
            surface: surface.into(),
            destination,
            args,
            screen: Some(screen),
        }
    }

    pub fn back(surface: impl Into<SurfaceTag>) -> Self {
        Command::Back {
            surface: surface.into(),
        }
    }

    pub fn back_to(
        surface: impl Into<SurfaceTag>,
        destination: DestinationId,
        inclusive: bool,
    ) -> Self {
        Command::BackTo {
            surface: surface.into(),
            destination,
            inclusive,
        }
    }

    pub fn back_or_navigate(
        surface: impl Into<SurfaceTag>,
        destination: DestinationId,
        args: Option<Args>,
    ) -> Self {
        Command::BackOrNavigate {
            surface: surface.into(),
            destination,
            args,
        }
    }

    pub fn back_with_result(
        surface: impl Into<SurfaceTag>,
        result_code: impl Into<ResultCode>,
        payload: impl Into<Value>,
        destination: Option<DestinationId>,
        inclusive: bool,
    ) -> Self {
        Command::BackWithResult {
            surface: surface.into(),
            result_code: result_code.into(),
            payload: payload.into(),
            destination,
            inclusive,
        }
    }

    /// Tag of the surface whose engine must execute this command
    pub fn surface(&self) -> &SurfaceTag {
        match self {
            Command::Navigate { surface, .. }
            | Command::Back { surface }
            | Command::BackTo { surface, .. }
            | Command::BackOrNavigate { surface, .. }
            | Command::BackWithResult { surface, .. } => surface,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Navigate { .. } => CommandKind::Navigate,
            Command::Back { .. } => CommandKind::Back,
            Command::BackTo { .. } => CommandKind::BackTo,
            Command::BackOrNavigate { .. } => CommandKind::BackOrNavigate,
            Command::BackWithResult { .. } => CommandKind::BackWithResult,
        }
    }

    /// Destination named by the command, if any
    pub fn destination(&self) -> Option<DestinationId> {
        match self {
            Command::Navigate { destination, .. }
            | Command::BackTo { destination, .. }
            | Command::BackOrNavigate { destination, .. } => Some(*destination),
            Command::BackWithResult { destination, .. } => *destination,
            Command::Back { .. } => None,
        }
    }

    pub fn result_code(&self) -> Option<&ResultCode> {
        match self {
            Command::BackWithResult { result_code, .. } => Some(result_code),
            _ => None,
        }
    }

    pub fn screen(&self) -> Option<&ScreenInfo> {
        match self {
            Command::Navigate { screen, .. } => screen.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind(), self.surface())?;
        if let Some(destination) = self.destination() {
            write!(f, " -> {}", destination)?;
        }
        if let Some(code) = self.result_code() {
            write!(f, " [{}]", code)?;
        }
        Ok(())
    }
}
