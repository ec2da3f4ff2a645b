//! Terminal rendering module
//!
//! The static layers (grass, road, finish line) are rasterized once per
//! viewport into a background; each frame copies it, draws waypoints, cars
//! and the HUD, then writes only the cells that changed.

pub mod frame;
pub mod scene;

pub use frame::{Cell, Frame};
pub use scene::{HUD_ROWS, Scene, Viewport};
