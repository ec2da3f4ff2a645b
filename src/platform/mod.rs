//! Platform abstraction layer
//!
//! Turns raw input into per-tick `TickInput`s:
//! - `input`: keyboard hold tracking for terminals with and without key release events
//! - `script`: JSON input scripts for headless runs

pub mod input;
pub mod script;

pub use input::{DriveKey, HeldKeys};
pub use script::{InputScript, ScriptStep};
