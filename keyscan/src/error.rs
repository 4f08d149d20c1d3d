//! Errors raised while the engine is being configured.
//!
//! Every variant is detected before the scan loop starts. Runtime hardware
//! faults are never reported through this type, see [`RawScan`](crate::matrix::RawScan).

use core::fmt;

use crate::config::DiodeDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The keymap has no layer at all
    NoLayers,
    /// More layers than a `u8` layer index can address
    TooManyLayers { layers: usize },
    /// Rows or columns don't fit in a `u8` coordinate
    MatrixTooLarge { rows: usize, cols: usize },
    /// The base layer must resolve every key to a concrete action
    TransparentInBaseLayer { row: u8, col: u8 },
    /// A layer key refers to a layer that isn't defined
    UndefinedLayer { layer: u8, row: u8, col: u8, target: u8 },
    /// The pin table doesn't match the keymap size for the given diode direction
    MatrixDimensionMismatch {
        direction: DiodeDirection,
        rows: usize,
        cols: usize,
        input_pins: usize,
        output_pins: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoLayers => write!(f, "keymap contains no layer"),
            ConfigError::TooManyLayers { layers } => {
                write!(f, "keymap contains {} layers, at most 256 are supported", layers)
            }
            ConfigError::MatrixTooLarge { rows, cols } => {
                write!(f, "matrix {}x{} is too large, at most 256x256 is supported", rows, cols)
            }
            ConfigError::TransparentInBaseLayer { row, col } => {
                write!(f, "base layer maps ({}, {}) to Transparent", row, col)
            }
            ConfigError::UndefinedLayer { layer, row, col, target } => write!(
                f,
                "layer {} maps ({}, {}) to undefined layer {}",
                layer, row, col, target
            ),
            ConfigError::MatrixDimensionMismatch {
                direction,
                rows,
                cols,
                input_pins,
                output_pins,
            } => write!(
                f,
                "{:?} matrix of {}x{} keys doesn't match {} input pins and {} output pins",
                direction, rows, cols, input_pins, output_pins
            ),
        }
    }
}

impl core::error::Error for ConfigError {}
