//! Keymap actions.
//!
//! A [`KeyAction`] is what a single keymap cell holds. The engine resolves a
//! physical key through the active layers to one of these and then executes
//! it. Transparent cells are resolved away before execution.

use crate::keycode::KeyCode;

/// A KeyAction is the action at a keyboard position, stored in keymap.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// No action.
    #[default]
    No,
    /// Transparent action, next layer will be checked.
    Transparent,
    /// A normal key stroke, pressed and released together with the physical key.
    Key(KeyCode),
    /// Activate a layer while the key is held.
    LayerOn(u8),
    /// Toggle a layer when the key is pressed.
    LayerToggle(u8),
    /// Escape, or Grave while a Shift or GUI key is held.
    ///
    /// The choice is made on press and the same key code is released.
    GraveEscape,
}

impl KeyAction {
    /// Layer referenced by a layer action, `None` for every other action.
    pub fn target_layer(self) -> Option<u8> {
        match self {
            KeyAction::LayerOn(layer) | KeyAction::LayerToggle(layer) => Some(layer),
            _ => None,
        }
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self, KeyAction::Transparent)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, KeyAction::No)
    }
}

impl From<KeyCode> for KeyAction {
    fn from(keycode: KeyCode) -> Self {
        KeyAction::Key(keycode)
    }
}
