//! Boundary between the engine and the HID transport.
//!
//! The engine hands over key codes with their transition, in the order they
//! happened. Building and sending reports is the sink's business.

use crate::event::{Tick, Transition};
use crate::keycode::KeyCode;

/// A key code going down or up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidEvent {
    pub keycode: KeyCode,
    pub transition: Transition,
}

impl HidEvent {
    pub fn press(keycode: KeyCode) -> Self {
        Self {
            keycode,
            transition: Transition::Pressed,
        }
    }

    pub fn release(keycode: KeyCode) -> Self {
        Self {
            keycode,
            transition: Transition::Released,
        }
    }
}

/// Receiver of the HID events produced by the engine.
pub trait OutputSink {
    /// Called for every event, in emission order
    fn send_event(&mut self, event: HidEvent);

    /// Called once per tick after its last event, also for ticks without events
    fn end_of_tick(&mut self, _tick: Tick) {}
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn send_event(&mut self, event: HidEvent) {
        (**self).send_event(event)
    }

    fn end_of_tick(&mut self, tick: Tick) {
        (**self).end_of_tick(tick)
    }
}

impl<const N: usize> OutputSink for heapless::Vec<HidEvent, N> {
    fn send_event(&mut self, event: HidEvent) {
        if self.push(event).is_err() {
            warn!("Output buffer is full, dropping {:?}", event);
        }
    }
}

#[cfg(any(test, feature = "std"))]
impl OutputSink for std::vec::Vec<HidEvent> {
    fn send_event(&mut self, event: HidEvent) {
        self.push(event);
    }
}
