use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, InputPin, OutputPin};

use crate::config::{DiodeDirection, MatrixConfig};
use crate::error::ConfigError;
use crate::event::KeyPos;

/// Boolean state of every switch in the matrix, indexed by `[row][col]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyGrid<const ROW: usize, const COL: usize> {
    states: [[bool; COL]; ROW],
}

impl<const ROW: usize, const COL: usize> Default for KeyGrid<ROW, COL> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROW: usize, const COL: usize> KeyGrid<ROW, COL> {
    /// Create a grid with every key open
    pub const fn new() -> Self {
        Self {
            states: [[false; COL]; ROW],
        }
    }

    pub const fn from_rows(states: [[bool; COL]; ROW]) -> Self {
        Self { states }
    }

    /// State at (row, col), out of range positions read as open
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.states
            .get(row)
            .and_then(|cols| cols.get(col))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, row: usize, col: usize, closed: bool) {
        if let Some(state) = self.states.get_mut(row).and_then(|cols| cols.get_mut(col)) {
            *state = closed;
        }
    }

    pub fn is_pressed(&self, pos: KeyPos) -> bool {
        self.get(pos.row as usize, pos.col as usize)
    }

    /// Number of closed keys
    pub fn pressed_count(&self) -> usize {
        self.states.iter().flatten().filter(|closed| **closed).count()
    }

    /// Iterate all keys in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (KeyPos, bool)> + '_ {
        self.states.iter().enumerate().flat_map(|(row, cols)| {
            cols.iter()
                .enumerate()
                .map(move |(col, closed)| (KeyPos::new(row as u8, col as u8), *closed))
        })
    }
}

/// Result of one matrix scan.
///
/// `faulted` marks the keys whose line could not be driven or read in this
/// scan. Their `closed` value is meaningless and the debouncer leaves them
/// untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawScan<const ROW: usize, const COL: usize> {
    pub closed: KeyGrid<ROW, COL>,
    pub faulted: KeyGrid<ROW, COL>,
}

impl<const ROW: usize, const COL: usize> RawScan<ROW, COL> {
    pub const fn new() -> Self {
        Self {
            closed: KeyGrid::new(),
            faulted: KeyGrid::new(),
        }
    }

    /// A fault-free scan
    pub const fn from_grid(closed: KeyGrid<ROW, COL>) -> Self {
        Self {
            closed,
            faulted: KeyGrid::new(),
        }
    }

    pub fn fault_count(&self) -> usize {
        self.faulted.pressed_count()
    }
}

/// MatrixTrait is the trait for keyboard matrix.
///
/// The only contact point with the hardware: read every row/column
/// intersection once and return the result.
pub trait MatrixTrait<const ROW: usize, const COL: usize> {
    fn scan(&mut self) -> RawScan<ROW, COL>;
}

/// Matrix is the physical pcb layout of the keyboard matrix.
///
/// Output pins are driven high one after another and the input pins are read
/// while the line is high. Which of them are rows depends on the diode direction:
/// for [`DiodeDirection::Col2Row`] the columns are outputs and the rows are inputs.
pub struct Matrix<
    In: InputPin,
    Out: OutputPin,
    D: DelayNs,
    const ROW: usize,
    const COL: usize,
    const INPUT_PIN_NUM: usize,
    const OUTPUT_PIN_NUM: usize,
> {
    /// Input pins of the pcb matrix
    input_pins: [In; INPUT_PIN_NUM],
    /// Output pins of the pcb matrix
    output_pins: [Out; OUTPUT_PIN_NUM],
    /// Delay used for the settle time after driving an output
    delay: D,
    direction: DiodeDirection,
    settle_time_us: u32,
    /// Total number of faulted key reads since creation
    fault_count: u32,
}

impl<
    In: InputPin,
    Out: OutputPin,
    D: DelayNs,
    const ROW: usize,
    const COL: usize,
    const INPUT_PIN_NUM: usize,
    const OUTPUT_PIN_NUM: usize,
> Matrix<In, Out, D, ROW, COL, INPUT_PIN_NUM, OUTPUT_PIN_NUM>
{
    /// Create a matrix from input and output pins.
    ///
    /// The pin counts must match `ROW`x`COL` for the configured diode direction.
    pub fn new(
        input_pins: [In; INPUT_PIN_NUM],
        output_pins: [Out; OUTPUT_PIN_NUM],
        delay: D,
        config: MatrixConfig,
    ) -> Result<Self, ConfigError> {
        let (rows, cols) = match config.diode_direction {
            DiodeDirection::Col2Row => (INPUT_PIN_NUM, OUTPUT_PIN_NUM),
            DiodeDirection::Row2Col => (OUTPUT_PIN_NUM, INPUT_PIN_NUM),
        };
        if rows != ROW || cols != COL {
            return Err(ConfigError::MatrixDimensionMismatch {
                direction: config.diode_direction,
                rows: ROW,
                cols: COL,
                input_pins: INPUT_PIN_NUM,
                output_pins: OUTPUT_PIN_NUM,
            });
        }

        Ok(Matrix {
            input_pins,
            output_pins,
            delay,
            direction: config.diode_direction,
            settle_time_us: config.settle_time_us,
            fault_count: 0,
        })
    }

    /// Faulted key reads since the matrix was created
    pub fn fault_count(&self) -> u32 {
        self.fault_count
    }
}

/// Map an (output, input) pin pair to (row, col)
fn key_position(direction: DiodeDirection, out_idx: usize, in_idx: usize) -> (usize, usize) {
    match direction {
        DiodeDirection::Col2Row => (in_idx, out_idx),
        DiodeDirection::Row2Col => (out_idx, in_idx),
    }
}

/// Flag every key on an output line as faulted
fn fault_line<const ROW: usize, const COL: usize>(
    scan: &mut RawScan<ROW, COL>,
    direction: DiodeDirection,
    out_idx: usize,
    input_pin_num: usize,
) {
    for in_idx in 0..input_pin_num {
        let (row, col) = key_position(direction, out_idx, in_idx);
        scan.faulted.set(row, col, true);
    }
}

impl<
    In: InputPin,
    Out: OutputPin,
    D: DelayNs,
    const ROW: usize,
    const COL: usize,
    const INPUT_PIN_NUM: usize,
    const OUTPUT_PIN_NUM: usize,
> MatrixTrait<ROW, COL> for Matrix<In, Out, D, ROW, COL, INPUT_PIN_NUM, OUTPUT_PIN_NUM>
{
    fn scan(&mut self) -> RawScan<ROW, COL> {
        let mut scan = RawScan::new();
        let direction = self.direction;
        // Output line that couldn't be pulled back to low
        let mut stuck_line = None;

        for (out_idx, out_pin) in self.output_pins.iter_mut().enumerate() {
            // A line stuck high shows its switches on every later line too
            if let Some(stuck) = stuck_line {
                trace!("Skip output line {}, line {} is stuck high", out_idx, stuck);
                fault_line(&mut scan, direction, out_idx, INPUT_PIN_NUM);
                continue;
            }

            // Pull up output pin, wait for the change to settle
            if let Err(e) = out_pin.set_high() {
                warn!("Failed to drive output line {}: {:?}", out_idx, e.kind());
                fault_line(&mut scan, direction, out_idx, INPUT_PIN_NUM);
                continue;
            }
            self.delay.delay_us(self.settle_time_us);

            for (in_idx, in_pin) in self.input_pins.iter_mut().enumerate() {
                let (row, col) = key_position(direction, out_idx, in_idx);
                match in_pin.is_high() {
                    Ok(closed) => scan.closed.set(row, col, closed),
                    Err(e) => {
                        warn!("Failed to read key ({}, {}): {:?}", row, col, e.kind());
                        scan.faulted.set(row, col, true);
                    }
                }
            }

            // Pull it back to low
            if let Err(e) = out_pin.set_low() {
                warn!("Failed to release output line {}: {:?}", out_idx, e.kind());
                stuck_line = Some(out_idx);
            }
        }

        let faults = scan.fault_count();
        if faults > 0 {
            self.fault_count = self.fault_count.saturating_add(faults as u32);
        }
        scan
    }
}
