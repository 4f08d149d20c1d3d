#![allow(dead_code)]

use std::collections::VecDeque;
use std::num::NonZeroU8;

use keyscan::action::KeyAction;
use keyscan::config::{DebounceConfig, KeyboardConfig};
use keyscan::debounce::default_debouncer::DefaultDebouncer;
use keyscan::keymap::KeyMap;
use keyscan::matrix::{KeyGrid, MatrixTrait, RawScan};
use keyscan::output::HidEvent;
use keyscan::scanner::Scanner;
use keyscan::{a, k, layer, mo};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub const ROW: usize = 5;
pub const COL: usize = 14;
pub const NUM_LAYER: usize = 2;

/// Position of the `mo!(1)` key
pub const FN_KEY: (usize, usize) = (4, 10);

/// Position of the grave escape key
pub const GESC_KEY: (usize, usize) = (0, 0);

/// 5x14 ANSI/ISO hybrid with a function layer on the right of the space bar
pub static KEYMAP: [[[KeyAction; COL]; ROW]; NUM_LAYER] = [
    layer!([
        [a!(GraveEscape), k!(Kc1), k!(Kc2), k!(Kc3), k!(Kc4), k!(Kc5), k!(Kc6), k!(Kc7), k!(Kc8), k!(Kc9), k!(Kc0), k!(Minus), k!(Equal), k!(Backspace)],
        [k!(Tab), k!(Q), k!(W), k!(E), k!(R), k!(T), k!(Y), k!(U), k!(I), k!(O), k!(P), k!(LeftBracket), k!(RightBracket), k!(MediaPlayPause)],
        [k!(CapsLock), k!(A), k!(S), k!(D), k!(F), k!(G), k!(H), k!(J), k!(K), k!(L), k!(Semicolon), k!(Quote), k!(Enter), k!(Delete)],
        [k!(LShift), k!(NonusBackslash), k!(Z), k!(X), k!(C), k!(V), k!(B), k!(N), k!(M), k!(Comma), k!(Dot), k!(Slash), k!(NonusHash), k!(Up)],
        [k!(LCtrl), k!(LGui), k!(LAlt), a!(No), a!(No), a!(No), k!(Space), a!(No), a!(No), k!(RAlt), mo!(1), k!(Left), k!(Down), k!(Right)]
    ]),
    layer!([
        [k!(Grave), k!(F1), k!(F2), k!(F3), k!(F4), k!(F5), k!(F6), k!(F7), k!(F8), k!(F9), k!(F10), k!(F11), k!(F12), a!(Transparent)],
        [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)],
        [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)],
        [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)],
        [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)]
    ]),
];

pub fn get_keymap() -> KeyMap<'static, ROW, COL, NUM_LAYER> {
    KeyMap::new(&KEYMAP).unwrap()
}

/// Matrix replaying a fixed list of scans, the last one repeats forever
pub struct ScriptedMatrix<const ROW: usize, const COL: usize> {
    scans: VecDeque<RawScan<ROW, COL>>,
    last: RawScan<ROW, COL>,
    pub scan_count: usize,
}

impl<const ROW: usize, const COL: usize> ScriptedMatrix<ROW, COL> {
    pub fn new(scans: impl IntoIterator<Item = RawScan<ROW, COL>>) -> Self {
        Self {
            scans: scans.into_iter().collect(),
            last: RawScan::new(),
            scan_count: 0,
        }
    }

    /// Queue more scans behind the remaining ones
    pub fn extend(&mut self, scans: impl IntoIterator<Item = RawScan<ROW, COL>>) {
        self.scans.extend(scans);
    }
}

impl<const ROW: usize, const COL: usize> MatrixTrait<ROW, COL> for ScriptedMatrix<ROW, COL> {
    fn scan(&mut self) -> RawScan<ROW, COL> {
        self.scan_count += 1;
        if let Some(scan) = self.scans.pop_front() {
            self.last = scan;
        }
        self.last
    }
}

/// Grid of the fixture size with the given keys closed
pub fn closed(keys: &[(usize, usize)]) -> KeyGrid<ROW, COL> {
    let mut grid = KeyGrid::new();
    for &(row, col) in keys {
        grid.set(row, col, true);
    }
    grid
}

/// `ticks` identical fault-free scans with the given keys closed
pub fn hold(keys: &[(usize, usize)], ticks: usize) -> impl Iterator<Item = RawScan<ROW, COL>> + use<> {
    std::iter::repeat_n(RawScan::from_grid(closed(keys)), ticks)
}

pub type TestScanner = Scanner<'static, ScriptedMatrix<ROW, COL>, DefaultDebouncer<ROW, COL>, Vec<HidEvent>, ROW, COL, NUM_LAYER>;

pub fn create_test_scanner(settle_ticks: u8, scans: impl IntoIterator<Item = RawScan<ROW, COL>>) -> TestScanner {
    let config = KeyboardConfig {
        debounce: DebounceConfig {
            settle_ticks: NonZeroU8::new(settle_ticks).unwrap(),
        },
        ..Default::default()
    };
    Scanner::from_config(ScriptedMatrix::new(scans), get_keymap(), Vec::new(), &config)
}

/// Run ticks until the script is consumed, returning all HID events
pub fn run_script(scanner: &mut TestScanner, ticks: usize) -> Vec<HidEvent> {
    for _ in 0..ticks {
        scanner.tick();
    }
    std::mem::take(scanner.sink_mut())
}
