//! # keyscan types
//!
//! Type definitions shared by the keyscan engine and anything that produces
//! keymaps for it.
//!
//! - [`action`] - Actions stored in a keymap cell (plain key, layer keys, transparent, no-op)
//! - [`keycode`] - USB HID keyboard usages

#![no_std]

pub mod action;
pub mod keycode;
