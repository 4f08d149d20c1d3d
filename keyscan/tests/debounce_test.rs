pub mod common;

use std::num::NonZeroU8;

use keyscan::debounce::Debouncer;
use keyscan::debounce::default_debouncer::DefaultDebouncer;
use keyscan::event::{KeyEvent, Tick};
use keyscan::keycode::KeyCode;
use keyscan::matrix::{KeyGrid, RawScan};
use keyscan::output::HidEvent;

use crate::common::{closed, create_test_scanner, hold, run_script};

fn single_key(settle_ticks: u8) -> Debouncer<DefaultDebouncer<1, 1>, 1, 1> {
    Debouncer::new(DefaultDebouncer::new(NonZeroU8::new(settle_ticks).unwrap()))
}

fn raw(pressed: bool) -> RawScan<1, 1> {
    RawScan::from_grid(KeyGrid::from_rows([[pressed]]))
}

/// Stable state of a single key after each raw sample
fn debounce_sequence(settle_ticks: u8, samples: &[bool]) -> Vec<bool> {
    let mut debouncer = single_key(settle_ticks);
    samples
        .iter()
        .map(|&sample| debouncer.update(&raw(sample)).get(0, 0))
        .collect()
}

#[test]
fn test_press_then_early_release() {
    // Release has to settle as well, so the key stays pressed on the third tick
    assert_eq!(debounce_sequence(2, &[true, true, false]), [false, true, true]);
    assert_eq!(debounce_sequence(2, &[true, true, false, false]), [false, true, true, false]);
}

#[test]
fn test_chatter_never_commits() {
    let samples: Vec<bool> = (0..20).map(|i| i % 2 == 0).collect();
    assert!(debounce_sequence(2, &samples).iter().all(|stable| !stable));

    // Bursts shorter than the window
    let samples = [true, true, false, true, true, false, true, true, false];
    assert!(debounce_sequence(3, &samples).iter().all(|stable| !stable));
}

#[test]
fn test_settle_window_exhaustive() {
    const LEN: usize = 8;
    for settle in 1..=4u8 {
        let window = settle as usize;
        for bits in 0u32..(1 << LEN) {
            let samples: Vec<bool> = (0..LEN).map(|i| bits & (1 << i) != 0).collect();
            let stable = debounce_sequence(settle, &samples);

            let mut previous = false;
            for (tick, &now) in stable.iter().enumerate() {
                if now != previous {
                    // A change is only committed after `settle` equal samples
                    assert!(tick + 1 >= window, "settle {settle}, samples {samples:?}");
                    assert!(
                        samples[tick + 1 - window..=tick].iter().all(|&s| s == now),
                        "settle {settle}, samples {samples:?}, stable {stable:?}"
                    );
                }
                if tick + 1 >= window {
                    let recent = &samples[tick + 1 - window..=tick];
                    // A full window of equal samples always wins
                    if recent.iter().all(|&s| s == recent[0]) {
                        assert_eq!(now, recent[0], "settle {settle}, samples {samples:?}");
                    }
                }
                previous = now;
            }
        }
    }
}

#[test]
fn test_keys_debounce_independently() {
    let mut debouncer: Debouncer<DefaultDebouncer<1, 2>, 1, 2> =
        Debouncer::new(DefaultDebouncer::new(NonZeroU8::new(2).unwrap()));
    let both = RawScan::from_grid(KeyGrid::from_rows([[true, true]]));
    let left = RawScan::from_grid(KeyGrid::from_rows([[true, false]]));

    debouncer.update(&both);
    // Right key bounces open, left keeps counting
    assert_eq!(debouncer.update(&left), KeyGrid::from_rows([[true, false]]));
    assert_eq!(debouncer.update(&both), KeyGrid::from_rows([[true, false]]));
    assert_eq!(debouncer.update(&both), KeyGrid::from_rows([[true, true]]));
}

#[test]
fn test_faulted_read_is_no_change() {
    let mut faulted = RawScan::from_grid(closed(&[]));
    faulted.faulted.set(1, 1, true);

    // Q is held, one read of it fails in the middle of the press
    let script = hold(&[(1, 1)], 2)
        .chain([faulted])
        .chain(hold(&[(1, 1)], 1))
        .chain(hold(&[], 3));
    let mut scanner = create_test_scanner(3, script);

    let mut reports = Vec::new();
    for _ in 0..7 {
        reports.push(scanner.tick());
    }

    assert_eq!(reports[2].faults, 1);
    assert_eq!(reports[2].events, 0);
    // Pressed after the 3rd good sample, the fault is skipped
    assert_eq!(reports[3].events, 1);
    assert_eq!(reports[6].events, 1);
    assert_eq!(
        scanner.sink().as_slice(),
        [HidEvent::press(KeyCode::Q), HidEvent::release(KeyCode::Q)]
    );
    assert_eq!(scanner.keyboard().held_action(keyscan::event::KeyPos::new(1, 1)), None);
}

#[test]
fn test_short_glitch_emits_nothing() {
    let script = hold(&[], 2).chain(hold(&[(2, 4)], 4)).chain(hold(&[], 10));
    let mut scanner = create_test_scanner(5, script);
    assert!(run_script(&mut scanner, 16).is_empty());
}

#[test]
fn test_event_tick_is_commit_tick() {
    let events = keyscan::event::diff(&closed(&[]), &closed(&[(0, 0), (4, 13)]), Tick(42)).collect::<Vec<_>>();
    assert_eq!(events, [KeyEvent::press(0, 0, Tick(42)), KeyEvent::press(4, 13, Tick(42))]);
}
