//! Keyboard matrix scanning and layered key resolution.
//!
//! A [`Scanner`](scanner::Scanner) ties together a pin [`Matrix`](matrix::Matrix),
//! a per-key [`Debouncer`](debounce::Debouncer), the layer-aware
//! [`Keyboard`](keyboard::Keyboard) engine and an [`OutputSink`](output::OutputSink)
//! receiving HID key events.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

pub mod config;
pub mod debounce;
pub mod error;
pub mod event;
pub mod keyboard;
pub mod keymap;
pub mod layer;
pub mod layout_macro;
pub mod matrix;
pub mod output;
pub mod scanner;

pub use keyscan_types as types;
pub use keyscan_types::{action, keycode};
