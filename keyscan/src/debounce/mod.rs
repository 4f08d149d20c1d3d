//! Per-key debouncing.
//!
//! The algorithm deciding whether a single key changed lives behind
//! [`DebouncerTrait`]. [`Debouncer`] runs it over a whole [`RawScan`] and owns
//! the resulting stable grid.

use crate::matrix::{KeyGrid, RawScan};

pub mod default_debouncer;

pub trait DebouncerTrait<const ROW: usize, const COL: usize> {
    /// Feed the raw state of one key.
    ///
    /// `key_active` is the state read in this scan, `key_state` the current
    /// stable state of the key.
    fn detect_change_with_debounce(
        &mut self,
        row_idx: usize,
        col_idx: usize,
        key_active: bool,
        key_state: bool,
    ) -> DebounceState;
}

/// Debounce state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    /// The change has settled, the stable state should flip
    Debounced,
    /// A change is observed but not settled yet
    InProgress,
    /// Raw state equals the stable state
    Ignored,
}

/// Runs a [`DebouncerTrait`] over every key of the matrix.
pub struct Debouncer<D: DebouncerTrait<ROW, COL>, const ROW: usize, const COL: usize> {
    debouncer: D,
    stable: KeyGrid<ROW, COL>,
}

impl<D: DebouncerTrait<ROW, COL>, const ROW: usize, const COL: usize> Debouncer<D, ROW, COL> {
    /// All keys start released
    pub fn new(debouncer: D) -> Self {
        Self {
            debouncer,
            stable: KeyGrid::new(),
        }
    }

    /// Consume one raw scan and return the stable grid after it.
    ///
    /// Faulted keys are skipped: neither their stable state nor their pending
    /// debounce progress changes.
    pub fn update(&mut self, raw: &RawScan<ROW, COL>) -> KeyGrid<ROW, COL> {
        for row in 0..ROW {
            for col in 0..COL {
                if raw.faulted.get(row, col) {
                    continue;
                }
                let stable = self.stable.get(row, col);
                let state = self
                    .debouncer
                    .detect_change_with_debounce(row, col, raw.closed.get(row, col), stable);
                if state == DebounceState::Debounced {
                    trace!("Key ({}, {}) settled to {}", row, col, !stable);
                    self.stable.set(row, col, !stable);
                }
            }
        }
        self.stable
    }

    pub fn stable(&self) -> &KeyGrid<ROW, COL> {
        &self.stable
    }
}
