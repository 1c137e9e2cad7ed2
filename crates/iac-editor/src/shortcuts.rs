//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the browser bridge and headless hosts agree on bindings.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Delete the selected component (after confirmation) or connection.
    Delete,
    ToggleConnectMode,
    /// Leave connect-mode, or drop the selection when not connecting.
    Cancel,
    /// Ask the host to save. Persistence is not the editor's job.
    Save,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"Delete"`, `"c"`).
    /// Returns `None` if the combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        if modifiers.command() {
            return match key {
                "s" | "S" => Some(ShortcutAction::Save),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Cancel),
            "c" | "C" if !modifiers.alt => Some(ShortcutAction::ToggleConnectMode),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_keys() {
        assert_eq!(
            ShortcutMap::resolve("Backspace", Modifiers::NONE),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("c", Modifiers::NONE),
            Some(ShortcutAction::ToggleConnectMode)
        );
        assert_eq!(ShortcutMap::resolve("x", Modifiers::NONE), None);
    }

    #[test]
    fn command_combos() {
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(ShortcutMap::resolve("s", meta), Some(ShortcutAction::Save));
        // Cmd+C is the host's copy, not connect-mode.
        assert_eq!(ShortcutMap::resolve("c", meta), None);
    }
}
