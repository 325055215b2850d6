//! Keyboard decoding for DOM `keydown` events.
use dropmenu_core::{InputEvent, Key};

/// Decode a `KeyboardEvent`: named `key` first, legacy `keyCode` second.
#[must_use]
pub fn key_from_event(name: &str, key_code: u32) -> Option<Key> {
    Key::from_name(name).or_else(|| Key::from_code(key_code))
}

/// Menu input for a `keydown`, or `None` when the menu does not care about the key.
#[must_use]
pub fn keydown_event(name: &str, key_code: u32) -> Option<InputEvent> {
    key_from_event(name, key_code).map(InputEvent::key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_keys_win_over_codes() {
        assert_eq!(key_from_event("ArrowDown", 0), Some(Key::ArrowDown));
        assert_eq!(key_from_event("Enter", 40), Some(Key::Enter));
    }

    #[test]
    fn legacy_codes_fill_in_for_unidentified_keys() {
        assert_eq!(key_from_event("Unidentified", 38), Some(Key::ArrowUp));
        assert_eq!(key_from_event("", 9), Some(Key::Tab));
        assert_eq!(key_from_event("a", 65), None);
    }

    #[test]
    fn keydown_event_wraps_known_keys() {
        assert_eq!(keydown_event("Escape", 27), Some(InputEvent::key(Key::Escape)));
        assert!(keydown_event("Shift", 16).is_none());
    }
}
