//! Tunable configurations of the scanning engine.
//!
//! Everything here is plain data with sensible defaults; the keymap itself is
//! passed separately to [`KeyMap::new`](crate::keymap::KeyMap::new).

use core::num::NonZeroU8;

/// Default number of consecutive ticks a change must be observed before it is accepted.
pub const DEFAULT_SETTLE_TICKS: u8 = 5;

/// Config of the whole engine
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardConfig {
    pub matrix: MatrixConfig,
    pub debounce: DebounceConfig,
    pub scan: ScanConfig,
}

/// Direction of the diodes on the pcb, which decides which lines are driven.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiodeDirection {
    /// Current flows from column to row: columns are driven, rows are read.
    #[default]
    Col2Row,
    /// Current flows from row to column: rows are driven, columns are read.
    Row2Col,
}

/// Config for the pin matrix
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MatrixConfig {
    pub diode_direction: DiodeDirection,
    /// Wait after driving an output line before the input lines are read, in microseconds
    pub settle_time_us: u32,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            diode_direction: DiodeDirection::default(),
            settle_time_us: 1,
        }
    }
}

/// Config for the debouncer
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceConfig {
    /// Consecutive ticks a change must persist before it's committed, 1 disables filtering
    pub settle_ticks: NonZeroU8,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            settle_ticks: NonZeroU8::new(DEFAULT_SETTLE_TICKS).unwrap_or(NonZeroU8::MIN),
        }
    }
}

/// Config for the scan loop
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanConfig {
    /// Pause between two ticks, in microseconds
    pub interval_us: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { interval_us: 1000 }
    }
}
