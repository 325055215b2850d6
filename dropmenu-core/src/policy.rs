//! Variant policy: which raw events map to which transitions.
//!
//! The button-triggered menu and the select-replacement menu share one
//! controller; they only differ in the knobs below.
use serde::{Deserialize, Serialize};

use crate::event::InputEvent;
use crate::notify::Notification;
use crate::open_state::FocusTiming;

/// How pointer hover is turned into `focus-item`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HoverPolicy {
    /// Every pointer-enter on an item notifies.
    Enter,
    /// Pointer-move notifies only when the hovered item is not already focused.
    MoveOnChange,
}

/// What losing container focus means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlurPolicy {
    Blurred,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPolicy {
    pub hover: HoverPolicy,
    pub blur: BlurPolicy,
    /// Escape while open notifies `cancel`.
    pub escape_cancels: bool,
    /// Container focus notifies `focused`.
    pub focus_notifies: bool,
    pub open_focus: FocusTiming,
    /// Arrow-down with nothing focused moves to the first item.
    pub down_from_none: bool,
}

impl VariantPolicy {
    /// Menu opened by a separate trigger button.
    pub const BUTTON: Self = Self {
        hover: HoverPolicy::Enter,
        blur: BlurPolicy::Blurred,
        escape_cancels: false,
        focus_notifies: true,
        open_focus: FocusTiming::Immediate,
        down_from_none: true,
    };

    /// Menu standing in for a native `<select>`.
    pub const SELECT: Self = Self {
        hover: HoverPolicy::MoveOnChange,
        blur: BlurPolicy::Cancel,
        escape_cancels: true,
        focus_notifies: false,
        open_focus: FocusTiming::Deferred,
        down_from_none: true,
    };
}

impl VariantPolicy {
    /// Notification raised by a container `focus` or `blur`.
    ///
    /// These events never change menu state, so a host may report them even
    /// while a transition is still running.
    #[must_use]
    pub fn container_notification(&self, event: &InputEvent) -> Option<Notification> {
        match event {
            InputEvent::Blur => Some(match self.blur {
                BlurPolicy::Blurred => Notification::Blurred,
                BlurPolicy::Cancel => Notification::Cancel,
            }),
            InputEvent::Focus if self.focus_notifies => Some(Notification::Focused),
            _ => None,
        }
    }
}

impl Default for VariantPolicy {
    fn default() -> Self {
        Self::BUTTON
    }
}

/// Named presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuVariant {
    #[default]
    Button,
    Select,
}

impl MenuVariant {
    #[must_use]
    pub const fn policy(self) -> VariantPolicy {
        match self {
            Self::Button => VariantPolicy::BUTTON,
            Self::Select => VariantPolicy::SELECT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Key;

    #[test]
    fn container_events_follow_the_variant() {
        let button = MenuVariant::Button.policy();
        let select = MenuVariant::Select.policy();
        assert_eq!(
            button.container_notification(&InputEvent::Focus),
            Some(Notification::Focused)
        );
        assert_eq!(select.container_notification(&InputEvent::Focus), None);
        assert_eq!(
            button.container_notification(&InputEvent::Blur),
            Some(Notification::Blurred)
        );
        assert_eq!(
            select.container_notification(&InputEvent::Blur),
            Some(Notification::Cancel)
        );
    }

    #[test]
    fn other_events_have_no_container_notification() {
        let policy = VariantPolicy::BUTTON;
        assert_eq!(
            policy.container_notification(&InputEvent::key(Key::Enter)),
            None
        );
    }
}
