//! Active layer stack.
//!
//! Layers are engaged by tokens. A token remembers how its layer was engaged:
//! a momentary token belongs to the key holding it, a toggle token stays until
//! the layer is toggled off. The base layer sits below every token and can't be
//! removed.
//!
//! Precedence follows engagement order: the most recently pushed token is
//! looked up first, regardless of the layer number it carries.

use heapless::Vec;

use crate::event::KeyPos;

/// The base layer, always active
pub const BASE_LAYER: u8 = 0;

/// Maximum number of layer tokens held at the same time
pub const MAX_ACTIVE_LAYERS: usize = 8;

/// How a layer got engaged
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerSource {
    /// Held by the key at the given position
    Momentary(KeyPos),
    /// Latched by a toggle key
    Toggle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerToken {
    pub layer: u8,
    pub source: LayerSource,
}

/// Error returned when no more token fits in the stack
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerStackFull(pub LayerToken);

/// Ordered set of engaged layers, highest precedence last.
#[derive(Clone, Debug, Default)]
pub struct LayerStack<const N: usize = MAX_ACTIVE_LAYERS> {
    tokens: Vec<LayerToken, N>,
}

impl<const N: usize> LayerStack<N> {
    /// Only the base layer is active
    pub const fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Engage `layer` on behalf of the key at `pos`.
    pub fn push_momentary(&mut self, layer: u8, pos: KeyPos) -> Result<(), LayerStackFull> {
        self.push(LayerToken {
            layer,
            source: LayerSource::Momentary(pos),
        })
    }

    /// Drop the token the key at `pos` holds on `layer`.
    ///
    /// Returns false if there was none, e.g. the layer was toggled off while
    /// the key was held.
    pub fn release_momentary(&mut self, layer: u8, pos: KeyPos) -> bool {
        let held = LayerToken {
            layer,
            source: LayerSource::Momentary(pos),
        };
        match self.tokens.iter().rposition(|token| *token == held) {
            Some(idx) => {
                self.tokens.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Flip the membership of `layer`.
    ///
    /// An active layer is removed completely, whichever tokens keep it active.
    /// An inactive one gets a toggle token on top. The base layer can't be toggled.
    pub fn toggle(&mut self, layer: u8) -> Result<(), LayerStackFull> {
        if layer == BASE_LAYER {
            warn!("Base layer can't be toggled");
            return Ok(());
        }
        if self.is_engaged(layer) {
            self.tokens.retain(|token| token.layer != layer);
            Ok(())
        } else {
            self.push(LayerToken {
                layer,
                source: LayerSource::Toggle,
            })
        }
    }

    /// Whether `layer` takes part in resolution
    pub fn is_active(&self, layer: u8) -> bool {
        layer == BASE_LAYER || self.is_engaged(layer)
    }

    /// Layers in lookup order: most recent token first, base layer last.
    ///
    /// A layer engaged by several tokens shows up once per token.
    pub fn iter_by_precedence(&self) -> impl Iterator<Item = u8> + '_ {
        self.tokens
            .iter()
            .rev()
            .map(|token| token.layer)
            .chain(core::iter::once(BASE_LAYER))
    }

    /// Tokens from lowest to highest precedence
    pub fn tokens(&self) -> &[LayerToken] {
        &self.tokens
    }

    /// Layer with the highest precedence
    pub fn top(&self) -> u8 {
        self.tokens.last().map_or(BASE_LAYER, |token| token.layer)
    }

    /// Number of tokens, the base layer is not counted
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when only the base layer is active
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn is_engaged(&self, layer: u8) -> bool {
        self.tokens.iter().any(|token| token.layer == layer)
    }

    fn push(&mut self, token: LayerToken) -> Result<(), LayerStackFull> {
        self.tokens.push(token).map_err(LayerStackFull)?;
        debug!("Layer {} engaged, active tokens: {}", token.layer, self.tokens.len());
        Ok(())
    }
}
