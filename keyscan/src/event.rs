//! Key events and the event extractor.
//!
//! [`diff`] compares two consecutive stable grids and yields one [`KeyEvent`]
//! per changed key. Keys are visited row by row, so keys changing in the same
//! tick always come out in the same order.

use crate::matrix::KeyGrid;

/// Position of a switch in the matrix
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPos {
    pub row: u8,
    pub col: u8,
}

impl KeyPos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    Pressed,
    Released,
}

impl Transition {
    pub fn from_pressed(pressed: bool) -> Self {
        if pressed { Transition::Pressed } else { Transition::Released }
    }

    pub fn is_pressed(self) -> bool {
        self == Transition::Pressed
    }
}

/// Scan counter, advanced once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick(pub u32);

impl Tick {
    pub fn next(self) -> Self {
        Tick(self.0.wrapping_add(1))
    }
}

/// A debounced key press or release
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub pos: KeyPos,
    pub transition: Transition,
    /// Tick in which the change was committed by the debouncer
    pub tick: Tick,
}

impl KeyEvent {
    pub fn press(row: u8, col: u8, tick: Tick) -> Self {
        Self {
            pos: KeyPos::new(row, col),
            transition: Transition::Pressed,
            tick,
        }
    }

    pub fn release(row: u8, col: u8, tick: Tick) -> Self {
        Self {
            pos: KeyPos::new(row, col),
            transition: Transition::Released,
            tick,
        }
    }

    pub fn pressed(&self) -> bool {
        self.transition.is_pressed()
    }
}

/// Produce the events between two stable grids, in row-major order.
pub fn diff<'a, const ROW: usize, const COL: usize>(
    previous: &'a KeyGrid<ROW, COL>,
    current: &'a KeyGrid<ROW, COL>,
    tick: Tick,
) -> impl Iterator<Item = KeyEvent> + 'a {
    previous
        .iter()
        .zip(current.iter())
        .filter(|((_, was), (_, now))| was != now)
        .map(move |(_, (pos, now))| KeyEvent {
            pos,
            transition: Transition::from_pressed(now),
            tick,
        })
}
