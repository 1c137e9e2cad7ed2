//! Input abstraction layer.
//!
//! Normalizes pointer, drag-and-drop, keyboard and dialog events into a
//! unified `InputEvent` enum consumed by the interaction controller. Events
//! are plain data so hosts can queue, log, or replay them from JSON.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
}

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, ⌘ on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized input event. Coordinates are canvas units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: PointerButton,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
    },
    /// Secondary click (context menu request).
    ContextMenu {
        x: f64,
        y: f64,
    },
    /// A palette item dropped on the canvas; `token` names the component type.
    Drop {
        x: f64,
        y: f64,
        token: String,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Answer to the last confirmation request.
    Confirm {
        accepted: bool,
    },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            button: PointerButton::Primary,
        }
    }

    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Canvas position, if this is a positional event.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y }
            | Self::ContextMenu { x, y }
            | Self::Drop { x, y, .. } => Some((*x, *y)),
            Self::Key { .. } | Self::Confirm { .. } => None,
        }
    }
}
