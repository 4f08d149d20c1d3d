use core::num::NonZeroU8;

use super::{DebounceState, DebouncerTrait};

/// Tracks the debounce state of a single key.
#[derive(Copy, Clone, Debug, PartialEq)]
enum DebounceCounter {
    /// The key is in a stable state (idle).
    Idle,
    /// The raw state differs from the stable one.
    /// The payload is the number of consecutive scans it has differed for.
    Debouncing(NonZeroU8),
}

/// Symmetric counting debouncer.
///
/// A change is committed after it has been seen in `settle_ticks` consecutive
/// scans. Seeing the stable state again in between restarts the count. Press and
/// release are treated the same.
pub struct DefaultDebouncer<const ROW: usize, const COL: usize> {
    counters: [[DebounceCounter; COL]; ROW],
    settle_ticks: NonZeroU8,
}

impl<const ROW: usize, const COL: usize> DefaultDebouncer<ROW, COL> {
    pub fn new(settle_ticks: NonZeroU8) -> Self {
        DefaultDebouncer {
            counters: [[DebounceCounter::Idle; COL]; ROW],
            settle_ticks,
        }
    }
}

impl<const ROW: usize, const COL: usize> DebouncerTrait<ROW, COL> for DefaultDebouncer<ROW, COL> {
    fn detect_change_with_debounce(
        &mut self,
        row_idx: usize,
        col_idx: usize,
        key_active: bool,
        key_state: bool,
    ) -> DebounceState {
        let counter = &mut self.counters[row_idx][col_idx];

        // Raw state agrees with the stable one, drop any pending change
        if key_state == key_active {
            *counter = DebounceCounter::Idle;
            return DebounceState::Ignored;
        }

        let seen = match counter {
            DebounceCounter::Idle => NonZeroU8::MIN,
            DebounceCounter::Debouncing(seen) => seen.saturating_add(1),
        };

        if seen >= self.settle_ticks {
            *counter = DebounceCounter::Idle;
            DebounceState::Debounced
        } else {
            *counter = DebounceCounter::Debouncing(seen);
            DebounceState::InProgress
        }
    }
}
