//! Car entity: motion state plus clamped driving transitions
//!
//! Player and computer cars share the same motion model; the `Controller`
//! tag says who drives. All transitions are total: velocity is clamped to
//! `[-max_vel / 2, max_vel]` and every velocity change is followed by one
//! kinematic step.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::kinematics::{advance, velocity_vector};
use super::mask::OccupancyMask;
use super::path::Path;
use super::sdf::sd_rounded_box;
use crate::consts::*;

/// Per-car tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarParams {
    /// Top forward speed (pixels per tick)
    pub max_vel: f32,
    /// Degrees turned per tick while steering
    pub rotation_vel: f32,
    /// Speed gained per tick of throttle
    pub acceleration: f32,
}

impl Default for CarParams {
    fn default() -> Self {
        Self {
            max_vel: MAX_VEL,
            rotation_vel: ROTATION_VEL,
            acceleration: ACCELERATION,
        }
    }
}

impl CarParams {
    /// Top reverse speed (magnitude)
    #[inline]
    pub fn max_reverse_vel(&self) -> f32 {
        self.max_vel / 2.0
    }
}

/// Position, orientation and signed speed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Motion {
    /// Top-left of the unrotated sprite
    pub pos: Vec2,
    /// Degrees, 0 = up, counter-clockwise positive
    pub angle: f32,
    /// Forward positive
    pub vel: f32,
}

/// Who drives a car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Controller {
    /// Driven by keyboard or script input
    Player,
    /// Parked car carrying a waypoint path
    Computer { path: Path },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub controller: Controller,
    pub params: CarParams,
    pub start: Vec2,
    pub motion: Motion,
}

impl Car {
    fn new(controller: Controller, params: CarParams, start: Vec2) -> Self {
        Self {
            controller,
            params,
            start,
            motion: Motion {
                pos: start,
                ..Default::default()
            },
        }
    }

    pub fn player(params: CarParams, start: Vec2) -> Self {
        Self::new(Controller::Player, params, start)
    }

    /// Computer cars start with their speed at max
    pub fn computer(params: CarParams, start: Vec2, path: Path) -> Self {
        let mut car = Self::new(Controller::Computer { path }, params, start);
        car.motion.vel = params.max_vel;
        car
    }

    pub fn is_player(&self) -> bool {
        matches!(self.controller, Controller::Player)
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.controller {
            Controller::Computer { path } => Some(path),
            Controller::Player => None,
        }
    }

    pub fn path_mut(&mut self) -> Option<&mut Path> {
        match &mut self.controller {
            Controller::Computer { path } => Some(path),
            Controller::Player => None,
        }
    }

    /// Steer. Both directions may be held; they cancel out.
    pub fn rotate(&mut self, left: bool, right: bool) {
        if left {
            self.motion.angle += self.params.rotation_vel;
        }
        if right {
            self.motion.angle -= self.params.rotation_vel;
        }
    }

    /// Throttle forward
    pub fn accelerate(&mut self) {
        self.motion.vel = (self.motion.vel + self.params.acceleration).min(self.params.max_vel);
        self.step();
    }

    /// Throttle in reverse
    pub fn decelerate(&mut self) {
        self.motion.vel =
            (self.motion.vel - self.params.acceleration).max(-self.params.max_reverse_vel());
        self.step();
    }

    /// No throttle: bleed off half an acceleration step, never below zero
    pub fn coast(&mut self) {
        self.motion.vel = (self.motion.vel - self.params.acceleration / 2.0).max(0.0);
        self.step();
    }

    /// Reverse direction of travel at the same speed
    pub fn bounce(&mut self) {
        self.motion.vel = -self.motion.vel;
        self.step();
    }

    /// Back to the start position, facing up, stopped
    pub fn reset(&mut self) {
        self.motion = Motion {
            pos: self.start,
            angle: 0.0,
            vel: 0.0,
        };
    }

    /// Velocity as a vector in screen space
    pub fn velocity(&self) -> Vec2 {
        velocity_vector(self.motion.angle, self.motion.vel)
    }

    fn step(&mut self) {
        self.motion.pos = advance(self.motion.pos, self.motion.angle, self.motion.vel);
    }
}

/// Sprite footprint of a car pointing up: a rounded rectangle
pub fn car_sprite_mask(size: UVec2) -> OccupancyMask {
    let half = size.as_vec2() / 2.0;
    let radius = (half.x * 0.4).min(half.y);
    OccupancyMask::from_fn(size.x, size.y, |x, y| {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        sd_rounded_box(p, half, half, radius) <= 0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> Car {
        Car::player(CarParams::default(), Vec2::new(180.0, 200.0))
    }

    fn player_at(vel: f32) -> Car {
        let mut car = player();
        car.motion.vel = vel;
        car
    }

    #[test]
    fn test_new_cars() {
        let car = player();
        assert_eq!(car.motion.pos, Vec2::new(180.0, 200.0));
        assert_eq!(car.motion.angle, 0.0);
        assert_eq!(car.motion.vel, 0.0);
        assert!(car.is_player());
        assert!(car.path().is_none());

        let cpu = Car::computer(CarParams::default(), Vec2::new(150.0, 200.0), Path::circuit());
        assert_eq!(cpu.motion.vel, MAX_VEL);
        assert_eq!(cpu.path().map(Path::len), Some(26));
    }

    #[test]
    fn test_accelerate_moves_up() {
        let mut car = player();
        car.accelerate();
        assert!((car.motion.vel - 0.1).abs() < 1e-6);
        assert!((car.motion.pos.y - 199.9).abs() < 1e-4);
        assert_eq!(car.motion.pos.x, 180.0);
    }

    #[test]
    fn test_coast_never_reverses() {
        let mut car = player_at(0.03);
        car.coast();
        assert_eq!(car.motion.vel, 0.0);
        car.coast();
        assert_eq!(car.motion.vel, 0.0);
        assert_eq!(car.motion.pos, Vec2::new(180.0, 200.0));
    }

    #[test]
    fn test_coast_reverse_stops_immediately() {
        let mut car = player_at(-1.5);
        car.coast();
        assert_eq!(car.motion.vel, 0.0);
    }

    #[test]
    fn test_rotate_both_ways_cancels() {
        let mut car = player();
        car.rotate(true, false);
        assert_eq!(car.motion.angle, 4.0);
        car.rotate(false, true);
        car.rotate(false, true);
        assert_eq!(car.motion.angle, -4.0);
        car.rotate(true, true);
        assert_eq!(car.motion.angle, -4.0);
    }

    #[test]
    fn test_bounce_moves_back() {
        let mut car = player_at(2.0);
        car.bounce();
        assert_eq!(car.motion.vel, -2.0);
        assert_eq!(car.motion.pos, Vec2::new(180.0, 202.0));
    }

    #[test]
    fn test_path_mut_only_for_computer() {
        let mut cpu = Car::computer(CarParams::default(), Vec2::ZERO, Path::default());
        cpu.path_mut().unwrap().push(Vec2::new(1.0, 1.0));
        assert_eq!(cpu.path().unwrap().len(), 1);
        assert!(player().path_mut().is_none());
    }

    #[test]
    fn test_car_sprite_mask() {
        let mask = car_sprite_mask(UVec2::new(CAR_WIDTH, CAR_HEIGHT));
        assert_eq!(mask.size(), UVec2::new(CAR_WIDTH, CAR_HEIGHT));
        assert!(mask.get(9, 18));
        assert!(mask.get(9, 0));
        assert!(!mask.get(0, 0));
        assert!(mask.count() > CAR_WIDTH * CAR_HEIGHT * 3 / 4);
    }

    proptest! {
        #[test]
        fn prop_accelerate_clamps(v in 0.0f32..=MAX_VEL) {
            let mut car = player_at(v);
            car.accelerate();
            prop_assert_eq!(car.motion.vel, (v + ACCELERATION).min(MAX_VEL));
        }

        #[test]
        fn prop_accelerate_idempotent_at_max(n in 1usize..20) {
            let mut car = player_at(MAX_VEL);
            for _ in 0..n {
                car.accelerate();
            }
            prop_assert_eq!(car.motion.vel, MAX_VEL);
        }

        #[test]
        fn prop_decelerate_clamps(v in -MAX_VEL / 2.0..=0.0f32) {
            let mut car = player_at(v);
            car.decelerate();
            prop_assert_eq!(car.motion.vel, (v - ACCELERATION).max(-MAX_VEL / 2.0));
        }

        #[test]
        fn prop_double_bounce_restores_velocity(v in -MAX_VEL / 2.0..=MAX_VEL) {
            let mut car = player_at(v);
            car.bounce();
            car.bounce();
            prop_assert_eq!(car.motion.vel, v);
        }

        #[test]
        fn prop_reset_idempotent(
            x in -1000.0f32..1000.0, y in -1000.0f32..1000.0,
            angle in -720.0f32..720.0, v in -2.0f32..4.0,
        ) {
            let mut car = player();
            car.motion = Motion { pos: Vec2::new(x, y), angle, vel: v };
            car.reset();
            let once = car.clone();
            car.reset();
            prop_assert_eq!(&car, &once);
            prop_assert_eq!(car.motion, Motion { pos: car.start, angle: 0.0, vel: 0.0 });
        }
    }
}
