use crate::action::KeyAction;
use crate::event::{KeyEvent, KeyPos};
use crate::keycode::KeyCode;
use crate::keymap::KeyMap;
use crate::layer::{LayerStack, LayerStackFull};
use crate::output::{HidEvent, OutputSink};

/// Key action engine.
///
/// Owns the active layers and remembers, for every held key, the action it
/// resolved to when it went down. The release of a key always runs that same
/// action, whatever happened to the layers in between.
pub struct Keyboard<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    /// Keymap
    keymap: KeyMap<'a, ROW, COL, NUM_LAYER>,

    /// Active layers
    layers: LayerStack,

    /// Action resolved at press time for every held key
    held_actions: [[Option<KeyAction>; COL]; ROW],
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> Keyboard<'a, ROW, COL, NUM_LAYER> {
    /// Only the base layer is active and no key is held
    pub fn new(keymap: KeyMap<'a, ROW, COL, NUM_LAYER>) -> Self {
        Keyboard {
            keymap,
            layers: LayerStack::new(),
            held_actions: [[None; COL]; ROW],
        }
    }

    pub fn keymap(&self) -> &KeyMap<'a, ROW, COL, NUM_LAYER> {
        &self.keymap
    }

    pub fn layer_stack(&self) -> &LayerStack {
        &self.layers
    }

    /// Action recorded for a held key
    pub fn held_action(&self, pos: KeyPos) -> Option<KeyAction> {
        self.held_actions
            .get(pos.row as usize)?
            .get(pos.col as usize)
            .copied()
            .flatten()
    }

    /// Process a single key event, emitting HID events to `sink`.
    pub fn process(&mut self, event: KeyEvent, sink: &mut impl OutputSink) {
        let action = if event.pressed() {
            let action = match self.keymap.resolve(event.pos, &self.layers) {
                // Fix the key code now, so that the release matches it
                KeyAction::GraveEscape => KeyAction::Key(self.grave_escape_code()),
                action => action,
            };
            if let Some(slot) = self.held_slot(event.pos) {
                *slot = Some(action);
            }
            action
        } else {
            match self.held_slot(event.pos).and_then(Option::take) {
                Some(action) => action,
                None => {
                    // No press was seen for this key
                    debug!("No recorded press for ({}, {})", event.pos.row, event.pos.col);
                    self.keymap.resolve(event.pos, &self.layers)
                }
            }
        };

        debug!("Process {:?} -> {:?}", event, action);
        self.apply(action, event, sink);
    }

    fn held_slot(&mut self, pos: KeyPos) -> Option<&mut Option<KeyAction>> {
        self.held_actions
            .get_mut(pos.row as usize)?
            .get_mut(pos.col as usize)
    }

    /// `Grave` while any held key sends a Shift or GUI modifier, `Escape` otherwise
    fn grave_escape_code(&self) -> KeyCode {
        const SHIFT_OR_GUI: u8 = KeyCode::LShift.modifier_bit()
            | KeyCode::RShift.modifier_bit()
            | KeyCode::LGui.modifier_bit()
            | KeyCode::RGui.modifier_bit();

        let held_modifiers = self
            .held_actions
            .iter()
            .flatten()
            .fold(0, |bits, action| match action {
                Some(KeyAction::Key(keycode)) => bits | keycode.modifier_bit(),
                _ => bits,
            });

        if held_modifiers & SHIFT_OR_GUI != 0 {
            KeyCode::Grave
        } else {
            KeyCode::Escape
        }
    }

    fn apply(&mut self, action: KeyAction, event: KeyEvent, sink: &mut impl OutputSink) {
        match action {
            KeyAction::No => {}
            KeyAction::Key(keycode) => sink.send_event(HidEvent {
                keycode,
                transition: event.transition,
            }),
            KeyAction::LayerOn(layer) => {
                if event.pressed() {
                    if let Err(LayerStackFull(token)) = self.layers.push_momentary(layer, event.pos) {
                        error!("Layer stack is full, layer {} from {:?} isn't engaged", layer, token.source);
                    }
                } else if !self.layers.release_momentary(layer, event.pos) {
                    debug!("Layer {} was already released", layer);
                }
            }
            KeyAction::LayerToggle(layer) => {
                if event.pressed()
                    && let Err(LayerStackFull(_)) = self.layers.toggle(layer)
                {
                    error!("Layer stack is full, layer {} isn't toggled", layer);
                }
            }
            KeyAction::GraveEscape => sink.send_event(HidEvent {
                keycode: self.grave_escape_code(),
                transition: event.transition,
            }),
            KeyAction::Transparent => {
                debug_assert!(false, "Transparent action reached the engine");
                error!("Transparent action at ({}, {}) ignored", event.pos.row, event.pos.col);
            }
        }
    }
}
