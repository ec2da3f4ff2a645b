//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per frame
//! - No rendering or platform dependencies
//! - Pixel collision against immutable track masks

pub mod car;
pub mod collision;
pub mod kinematics;
pub mod mask;
pub mod mask_cache;
pub mod path;
pub mod sdf;
pub mod state;
pub mod tick;
pub mod track;

pub use car::{Car, CarParams, Controller, Motion, car_sprite_mask};
pub use collision::{FinishCrossing, FinishRule, classify_crossing, probe, rotated_origin};
pub use kinematics::{advance, velocity_vector};
pub use mask::OccupancyMask;
pub use mask_cache::RotatedMaskCache;
pub use path::Path;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use track::Track;
