//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Every binding
//! is suppressed while a text-input-like control has focus — typing into a
//! message field must never delete the selection.

use crate::input::Modifiers;

/// Actions the keyboard can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Duplicate,
    Delete,
}

/// Resolves key events into shortcut actions.
///
/// Platform-aware: on macOS `meta` is ⌘, elsewhere `ctrl` serves the same
/// role (`Modifiers::command`).
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action. `key` is the platform
    /// `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`). Returns `None`
    /// for unbound combos and for anything while a text input has focus.
    pub fn resolve(key: &str, modifiers: Modifiers, in_text_input: bool) -> Option<ShortcutAction> {
        if in_text_input {
            return None;
        }

        if modifiers.command() {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            _ => None,
        }
    }
}
