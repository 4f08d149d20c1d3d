//! The scan loop.
//!
//! One tick runs the whole pipeline once: scan the matrix, debounce, extract
//! the events, resolve and apply them, and hand the HID events to the sink.
//! Everything takes `&mut self`, so two ticks can never overlap.

use embedded_hal::delay::DelayNs;

use crate::config::{KeyboardConfig, ScanConfig};
use crate::debounce::default_debouncer::DefaultDebouncer;
use crate::debounce::{DebouncerTrait, Debouncer};
use crate::event::{Tick, diff};
use crate::keyboard::Keyboard;
use crate::keymap::KeyMap;
use crate::matrix::{KeyGrid, MatrixTrait};
use crate::output::OutputSink;

/// Summary of a single tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    pub tick: Tick,
    /// Key events extracted in this tick
    pub events: usize,
    /// Keys that couldn't be read in this tick
    pub faults: usize,
}

pub struct Scanner<
    'a,
    M: MatrixTrait<ROW, COL>,
    D: DebouncerTrait<ROW, COL>,
    S: OutputSink,
    const ROW: usize,
    const COL: usize,
    const NUM_LAYER: usize,
> {
    matrix: M,
    debouncer: Debouncer<D, ROW, COL>,
    keyboard: Keyboard<'a, ROW, COL, NUM_LAYER>,
    sink: S,
    /// Stable grid of the previous tick
    previous: KeyGrid<ROW, COL>,
    /// Tick to be run next
    tick: Tick,
    config: ScanConfig,
}

impl<'a, M: MatrixTrait<ROW, COL>, S: OutputSink, const ROW: usize, const COL: usize, const NUM_LAYER: usize>
    Scanner<'a, M, DefaultDebouncer<ROW, COL>, S, ROW, COL, NUM_LAYER>
{
    /// Build the pipeline with the default debouncer
    pub fn from_config(
        matrix: M,
        keymap: KeyMap<'a, ROW, COL, NUM_LAYER>,
        sink: S,
        config: &KeyboardConfig,
    ) -> Self {
        Self::new(
            matrix,
            DefaultDebouncer::new(config.debounce.settle_ticks),
            Keyboard::new(keymap),
            sink,
            config.scan,
        )
    }
}

impl<
    'a,
    M: MatrixTrait<ROW, COL>,
    D: DebouncerTrait<ROW, COL>,
    S: OutputSink,
    const ROW: usize,
    const COL: usize,
    const NUM_LAYER: usize,
> Scanner<'a, M, D, S, ROW, COL, NUM_LAYER>
{
    pub fn new(matrix: M, debouncer: D, keyboard: Keyboard<'a, ROW, COL, NUM_LAYER>, sink: S, config: ScanConfig) -> Self {
        Self {
            matrix,
            debouncer: Debouncer::new(debouncer),
            keyboard,
            sink,
            previous: KeyGrid::new(),
            tick: Tick::default(),
            config,
        }
    }

    /// Run one full pass of the pipeline.
    ///
    /// All HID events of the tick are handed to the sink, followed by
    /// [`OutputSink::end_of_tick`], before this returns.
    pub fn tick(&mut self) -> TickReport {
        let tick = self.tick;
        let raw = self.matrix.scan();
        let stable = self.debouncer.update(&raw);

        let mut events = 0;
        for event in diff(&self.previous, &stable, tick) {
            self.keyboard.process(event, &mut self.sink);
            events += 1;
        }
        self.previous = stable;
        self.sink.end_of_tick(tick);

        let faults = raw.fault_count();
        if faults > 0 {
            debug!("Tick {}: {} keys faulted", tick.0, faults);
        }

        self.tick = tick.next();
        TickReport { tick, events, faults }
    }

    /// Scan forever, pausing `interval_us` between ticks
    pub fn run(&mut self, delay: &mut impl DelayNs) -> ! {
        info!("Start scanning, interval: {}us", self.config.interval_us);
        loop {
            self.tick();
            delay.delay_us(self.config.interval_us);
        }
    }

    pub fn keyboard(&self) -> &Keyboard<'a, ROW, COL, NUM_LAYER> {
        &self.keyboard
    }

    pub fn matrix(&self) -> &M {
        &self.matrix
    }

    pub fn matrix_mut(&mut self) -> &mut M {
        &mut self.matrix
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Debounced state after the last tick
    pub fn stable(&self) -> &KeyGrid<ROW, COL> {
        self.debouncer.stable()
    }

    /// Number of the tick `tick()` will run next
    pub fn next_tick(&self) -> Tick {
        self.tick
    }
}
