use crate::action::KeyAction;
use crate::error::ConfigError;
use crate::event::KeyPos;
use crate::layer::{BASE_LAYER, LayerStack};

/// Keymap represents the stack of layers.
///
/// The conception of the keymap is borrowed from qmk: <https://docs.qmk.fm/#/keymap>.
///
/// The keymap should be bound to the actual pcb matrix definition: a physical key
/// at `(row, col)` is looked up in every active layer, from the most recently
/// engaged one down to the base layer.
pub struct KeyMap<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    /// Layers
    layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER],
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> KeyMap<'a, ROW, COL, NUM_LAYER> {
    /// Validate the layers and wrap them.
    ///
    /// The base layer must not contain `Transparent`, and every layer key must
    /// point to a defined layer.
    pub fn new(layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER]) -> Result<Self, ConfigError> {
        if NUM_LAYER == 0 {
            return Err(ConfigError::NoLayers);
        }
        if NUM_LAYER > u8::MAX as usize + 1 {
            return Err(ConfigError::TooManyLayers { layers: NUM_LAYER });
        }
        if ROW > u8::MAX as usize + 1 || COL > u8::MAX as usize + 1 {
            return Err(ConfigError::MatrixTooLarge { rows: ROW, cols: COL });
        }

        for (layer_idx, layer) in layers.iter().enumerate() {
            for (row_idx, row) in layer.iter().enumerate() {
                for (col_idx, action) in row.iter().enumerate() {
                    let (layer, row, col) = (layer_idx as u8, row_idx as u8, col_idx as u8);
                    if layer == BASE_LAYER && action.is_transparent() {
                        return Err(ConfigError::TransparentInBaseLayer { row, col });
                    }
                    if let Some(target) = action.target_layer()
                        && target as usize >= NUM_LAYER
                    {
                        return Err(ConfigError::UndefinedLayer {
                            layer,
                            row,
                            col,
                            target,
                        });
                    }
                }
            }
        }

        info!("Keymap loaded: {} layers of {}x{} keys", NUM_LAYER, ROW, COL);
        Ok(Self { layers })
    }

    pub fn get_keymap_config(&self) -> (usize, usize, usize) {
        (ROW, COL, NUM_LAYER)
    }

    /// Action stored at the position of a single layer, `None` when out of range
    pub fn get_action_at(&self, pos: KeyPos, layer: u8) -> Option<KeyAction> {
        self.layers
            .get(layer as usize)?
            .get(pos.row as usize)?
            .get(pos.col as usize)
            .copied()
    }

    /// Resolve the action of the key at `pos` through the active layers.
    ///
    /// Transparent entries fall through to the next layer down. The result is
    /// never `Transparent`.
    pub fn resolve<const N: usize>(&self, pos: KeyPos, stack: &LayerStack<N>) -> KeyAction {
        for layer in stack.iter_by_precedence() {
            match self.get_action_at(pos, layer) {
                Some(KeyAction::Transparent) => continue,
                Some(action) => return action,
                None => {
                    warn!("Key ({}, {}) isn't mapped on layer {}", pos.row, pos.col, layer);
                    return KeyAction::No;
                }
            }
        }
        // Unreachable with a validated base layer
        KeyAction::No
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{a, k, layer, mo, tg};

    const KEYMAP: [[[KeyAction; 3]; 2]; 3] = [
        layer!([[k!(A), k!(B), k!(C)], [mo!(1), tg!(2), k!(Space)]]),
        layer!([[k!(Kc1), a!(Transparent), a!(No)], [a!(Transparent), a!(Transparent), a!(Transparent)]]),
        layer!([[k!(F1), k!(F2), a!(Transparent)], [a!(Transparent), a!(Transparent), a!(Transparent)]]),
    ];

    #[test]
    fn test_base_resolution() {
        let keymap = KeyMap::new(&KEYMAP).unwrap();
        let stack: LayerStack = LayerStack::new();
        assert_eq!(keymap.resolve(KeyPos::new(0, 0), &stack), k!(A));
        assert_eq!(keymap.resolve(KeyPos::new(1, 0), &stack), mo!(1));
        assert_eq!(keymap.get_keymap_config(), (2, 3, 3));
    }

    #[test]
    fn test_punch_through() {
        let keymap = KeyMap::new(&KEYMAP).unwrap();
        let mut stack: LayerStack = LayerStack::new();
        stack.push_momentary(1, KeyPos::new(1, 0)).unwrap();

        assert_eq!(keymap.resolve(KeyPos::new(0, 0), &stack), k!(Kc1));
        assert_eq!(keymap.resolve(KeyPos::new(0, 1), &stack), k!(B));
        // `No` is concrete and stops the lookup
        assert_eq!(keymap.resolve(KeyPos::new(0, 2), &stack), a!(No));
    }

    #[test]
    fn test_most_recent_layer_first() {
        let keymap = KeyMap::new(&KEYMAP).unwrap();
        let mut stack: LayerStack = LayerStack::new();
        stack.toggle(2).unwrap();
        stack.push_momentary(1, KeyPos::new(1, 0)).unwrap();
        assert_eq!(keymap.resolve(KeyPos::new(0, 0), &stack), k!(Kc1));
        // Transparent on layer 1, so layer 2 is next
        assert_eq!(keymap.resolve(KeyPos::new(0, 1), &stack), k!(F2));

        let mut stack: LayerStack = LayerStack::new();
        stack.push_momentary(1, KeyPos::new(1, 0)).unwrap();
        stack.toggle(2).unwrap();
        assert_eq!(keymap.resolve(KeyPos::new(0, 0), &stack), k!(F1));
        assert_eq!(keymap.resolve(KeyPos::new(0, 2), &stack), a!(No));
    }

    #[test]
    fn test_transparent_in_base_layer() {
        let layers = [layer!([[k!(A), a!(Transparent)]])];
        assert_eq!(
            KeyMap::new(&layers).err(),
            Some(ConfigError::TransparentInBaseLayer { row: 0, col: 1 })
        );
    }

    #[test]
    fn test_undefined_layer() {
        let layers = [layer!([[k!(A), mo!(1)]]), layer!([[tg!(3), a!(Transparent)]])];
        assert_eq!(
            KeyMap::new(&layers).err(),
            Some(ConfigError::UndefinedLayer {
                layer: 1,
                row: 0,
                col: 0,
                target: 3
            })
        );
    }

    #[test]
    fn test_no_layers() {
        let layers: [[[KeyAction; 2]; 1]; 0] = [];
        assert_eq!(KeyMap::new(&layers).err(), Some(ConfigError::NoLayers));
    }

    #[test]
    fn test_get_action_out_of_range() {
        let keymap = KeyMap::new(&KEYMAP).unwrap();
        assert_eq!(keymap.get_action_at(KeyPos::new(0, 0), 3), None);
        assert_eq!(keymap.get_action_at(KeyPos::new(2, 0), 0), None);
        assert_eq!(keymap.get_action_at(KeyPos::new(1, 2), 0), Some(k!(Space)));
    }
}
