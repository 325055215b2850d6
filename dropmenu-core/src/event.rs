//! Raw input events delivered by the host.
use serde::{Deserialize, Serialize};

use crate::item::ElementId;

/// Legacy `keyCode` / `which` values understood by the menu.
pub mod codes {
    pub const TAB: u32 = 9;
    pub const ENTER: u32 = 13;
    pub const ESCAPE: u32 = 27;
    pub const ARROW_UP: u32 = 38;
    pub const ARROW_DOWN: u32 = 40;
}

/// Keys the menu reacts to. Everything else is ignored by the host adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Key {
    Tab,
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
}

impl Key {
    #[must_use]
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            codes::TAB => Some(Self::Tab),
            codes::ENTER => Some(Self::Enter),
            codes::ESCAPE => Some(Self::Escape),
            codes::ARROW_UP => Some(Self::ArrowUp),
            codes::ARROW_DOWN => Some(Self::ArrowDown),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Tab => codes::TAB,
            Self::Enter => codes::ENTER,
            Self::Escape => codes::ESCAPE,
            Self::ArrowUp => codes::ARROW_UP,
            Self::ArrowDown => codes::ARROW_DOWN,
        }
    }

    /// Decode a DOM `KeyboardEvent.key` name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Tab" => Some(Self::Tab),
            "Enter" => Some(Self::Enter),
            "Escape" | "Esc" => Some(Self::Escape),
            "ArrowUp" | "Up" => Some(Self::ArrowUp),
            "ArrowDown" | "Down" => Some(Self::ArrowDown),
            _ => None,
        }
    }
}

/// One input event, carrying the originating item element where relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InputEvent {
    /// The menu container lost input focus.
    Blur,
    /// The menu container gained input focus.
    Focus,
    KeyDown { key: Key },
    PointerEnter { element: ElementId },
    PointerMove { element: ElementId },
    PointerUp { element: ElementId },
}

impl InputEvent {
    #[must_use]
    pub const fn key(key: Key) -> Self {
        Self::KeyDown { key }
    }

    /// Build a key event from a legacy key code; unknown codes yield `None`.
    #[must_use]
    pub const fn key_code(code: u32) -> Option<Self> {
        match Key::from_code(code) {
            Some(key) => Some(Self::KeyDown { key }),
            None => None,
        }
    }
}

/// What the host should do with the raw event after the menu handled it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[must_use]
pub struct EventOutcome {
    pub prevent_default: bool,
}

impl EventOutcome {
    pub const IGNORED: Self = Self {
        prevent_default: false,
    };
    pub const SUPPRESS: Self = Self {
        prevent_default: true,
    };
}
