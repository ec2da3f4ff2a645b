//! Fixed timestep simulation tick
//!
//! One tick: player input, then the border probe, then the finish probe.
//! A finish overlap is judged once, when it begins.
//! The computer car is parked and never moves.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::car::Car;
use super::collision::{FinishCrossing, classify_crossing, probe, rotated_origin};
use super::mask::OccupancyMask;
use super::mask_cache::RotatedMaskCache;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickInput {
    /// Steer counter-clockwise
    pub left: bool,
    /// Steer clockwise
    pub right: bool,
    /// Throttle forward
    pub forward: bool,
    /// Throttle in reverse
    pub back: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Waypoint to append to the computer car's path (one-shot)
    pub waypoint: Option<Vec2>,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        state.phase = match state.phase {
            GamePhase::Racing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Racing,
        };
        log::debug!("Phase -> {:?}", state.phase);
    }

    // Waypoints are recorded even while paused
    if let Some(point) = input.waypoint {
        if let Some(path) = state.computer.path_mut() {
            path.push(point);
            log::debug!("Waypoint {} added at ({:.0}, {:.0})", path.len(), point.x, point.y);
            state.push_event(GameEvent::WaypointAdded { point });
        }
    }

    if state.phase == GamePhase::Paused {
        return;
    }

    state.time_ticks += 1;

    drive(&mut state.player, input);

    if border_hit(state) {
        state.player.bounce();
        let pos = state.player.motion.pos;
        log::debug!("Border hit at ({:.1}, {:.1})", pos.x, pos.y);
        state.push_event(GameEvent::BorderHit { pos });
    }

    check_finish(state);
}

/// Classify a finish overlap when it begins; a wrong-way entry holds until
/// the car is off the line again
fn check_finish(state: &mut GameState) {
    let Some(point) = finish_hit(state) else {
        state.wrong_way_contact = false;
        return;
    };

    if state.wrong_way_contact {
        // Only backing out the way it came in is allowed
        if state.player.velocity().dot(state.track.finish_normal) <= 0.0 {
            state.player.bounce();
        }
        return;
    }

    let crossing = classify_crossing(
        state.finish_rule,
        point,
        state.player.velocity(),
        state.track.finish_normal,
    );
    match crossing {
        FinishCrossing::WrongWay => {
            state.wrong_way_contact = true;
            state.player.bounce();
            log::debug!("Wrong-way finish crossing");
            state.push_event(GameEvent::WrongWayFinish);
        }
        FinishCrossing::Forward => complete_lap(state),
    }
}

/// Translate held keys into car transitions
fn drive(car: &mut Car, input: &TickInput) {
    car.rotate(input.left, input.right);

    let mut moved = false;
    if input.forward {
        moved = true;
        car.accelerate();
    }
    if input.back {
        moved = true;
        car.decelerate();
    }
    if !moved {
        car.coast();
    }
}

fn border_hit(state: &mut GameState) -> bool {
    let (sprite, origin) = footprint(&mut state.player_sprite, &state.player);
    probe(&state.track.border, IVec2::ZERO, sprite, origin).is_some()
}

fn finish_hit(state: &mut GameState) -> Option<IVec2> {
    let (sprite, origin) = footprint(&mut state.player_sprite, &state.player);
    probe(&state.track.finish, state.track.finish_pos, sprite, origin)
}

/// Car's rotated mask and the top-left it is drawn at
fn footprint<'a>(sprites: &'a mut RotatedMaskCache, car: &Car) -> (&'a OccupancyMask, Vec2) {
    let base = sprites.base().size();
    let sprite = sprites.get(car.motion.angle);
    (sprite, rotated_origin(car.motion.pos, base, sprite.size()))
}

fn complete_lap(state: &mut GameState) {
    let ticks = state.time_ticks - state.lap_start_tick;
    state.lap_ticks.push(ticks);
    state.lap_start_tick = state.time_ticks;
    state.player.reset();
    state.wrong_way_contact = false;
    let lap = state.laps();
    log::info!("Lap {} completed in {} ticks", lap, ticks);
    state.push_event(GameEvent::LapCompleted { lap, ticks });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::consts::*;
    use crate::sim::collision::FinishRule;
    use crate::sim::track::Track;

    const FORWARD: TickInput = TickInput {
        left: false,
        right: false,
        forward: true,
        back: false,
        pause: false,
        waypoint: None,
    };

    const BACK: TickInput = TickInput {
        left: false,
        right: false,
        forward: false,
        back: true,
        pause: false,
        waypoint: None,
    };

    /// Open 400x400 field with a wall along the top and a finish strip
    /// across x 150..250 at y 250..268, crossed upward.
    fn test_track() -> Track {
        let border = OccupancyMask::from_fn(400, 400, |_, y| y < 20);
        Track::new(
            border,
            OccupancyMask::filled(100, 18),
            IVec2::new(150, 250),
            Vec2::NEG_Y,
        )
    }

    fn test_state(settings: &Settings) -> GameState {
        GameState::with_track(settings, test_track())
    }

    #[test]
    fn test_start_on_circuit_is_clear() {
        let mut state = GameState::new(&Settings::default());
        tick(&mut state, &TickInput::default());
        assert!(state.drain_events().is_empty());
        assert_eq!(state.player.motion.pos, Vec2::from(PLAYER_START));
        assert_eq!(state.player.motion.vel, 0.0);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_driving_into_border_flips_velocity() {
        let mut state = test_state(&Settings::default());
        let mut hit = false;
        for _ in 0..400 {
            let before = state.player.motion.vel;
            tick(&mut state, &FORWARD);
            let events = state.drain_events();
            if events.iter().any(|e| matches!(e, GameEvent::BorderHit { .. })) {
                assert!(before > 0.0);
                assert!(state.player.motion.vel < 0.0);
                assert_eq!(state.player.motion.vel, -(before + ACCELERATION).min(MAX_VEL));
                hit = true;
                break;
            }
        }
        assert!(hit, "car never reached the wall");
    }

    #[test]
    fn test_forward_crossing_completes_lap() {
        let mut state = test_state(&Settings::default());
        // Just below the finish strip, driving up at full speed
        state.player.motion.pos = Vec2::new(190.0, 270.0);
        state.player.motion.vel = MAX_VEL;
        state.time_ticks = 500;
        state.lap_start_tick = 100;

        tick(&mut state, &FORWARD);

        assert_eq!(
            state.drain_events(),
            vec![GameEvent::LapCompleted { lap: 1, ticks: 401 }]
        );
        assert_eq!(state.player.motion.pos, Vec2::from(PLAYER_START));
        assert_eq!(state.player.motion.vel, 0.0);
        assert_eq!(state.lap_start_tick, 501);
        assert_eq!(state.best_lap(), Some(401));
    }

    #[test]
    fn test_reversing_onto_finish_bounces() {
        let mut state = test_state(&Settings::default());
        // Bottom of the sprite sits just above the finish strip
        state.player.motion.pos = Vec2::new(190.0, 250.0 - CAR_HEIGHT as f32 - 0.5);
        state.player.motion.vel = -MAX_VEL / 2.0;

        tick(&mut state, &BACK);

        assert_eq!(state.drain_events(), vec![GameEvent::WrongWayFinish]);
        assert!(state.player.motion.vel > 0.0);
        assert_eq!(state.laps(), 0);
    }

    #[test]
    fn test_scan_row_rule_uses_entry_edge() {
        let settings = Settings {
            finish_rule: FinishRule::ScanRow,
            ..Default::default()
        };

        // Entering through the top edge while reversing: wrong way
        let mut state = test_state(&settings);
        state.player.motion.pos = Vec2::new(190.0, 250.0 - CAR_HEIGHT as f32 - 0.5);
        state.player.motion.vel = -MAX_VEL / 2.0;
        tick(&mut state, &BACK);
        assert_eq!(state.drain_events(), vec![GameEvent::WrongWayFinish]);

        // Entering from below: first overlap is below the top row
        let mut state = test_state(&settings);
        state.player.motion.pos = Vec2::new(190.0, 270.0);
        state.player.motion.vel = MAX_VEL;
        tick(&mut state, &FORWARD);
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::LapCompleted { lap: 1, .. }]
        ));
    }

    #[test]
    fn test_rotating_onto_finish_then_throttling_is_not_a_lap() {
        let mut state = test_state(&Settings::default());
        state.player_sprite =
            RotatedMaskCache::new(OccupancyMask::filled(CAR_WIDTH, CAR_HEIGHT), ROTATION_BUCKETS);
        // Parked with the bottom row just above the strip
        state.player.motion.pos = Vec2::new(190.0, 250.0 - CAR_HEIGHT as f32);
        let left = TickInput {
            left: true,
            ..Default::default()
        };

        // Turning in place swings a corner onto the line
        let mut wrong_way = 0;
        for _ in 0..6 {
            tick(&mut state, &left);
            wrong_way += state
                .drain_events()
                .iter()
                .filter(|e| **e == GameEvent::WrongWayFinish)
                .count();
        }
        assert_eq!(state.player.motion.angle, 24.0);
        assert!(wrong_way >= 1);
        assert!(state.wrong_way_contact);

        // Sitting on the line raises nothing new
        tick(&mut state, &TickInput::default());
        assert!(state.drain_events().is_empty());

        // Driving off forward is not a lap
        for _ in 0..30 {
            tick(&mut state, &FORWARD);
            assert!(
                !state
                    .drain_events()
                    .iter()
                    .any(|e| matches!(e, GameEvent::LapCompleted { .. }))
            );
        }
        assert_eq!(state.laps(), 0);
        assert!(!state.wrong_way_contact);
    }

    #[test]
    fn test_forward_lap_after_clearing_wrong_way_contact() {
        let mut state = test_state(&Settings::default());
        state.wrong_way_contact = true;
        // Off the line: the stale contact clears
        tick(&mut state, &TickInput::default());
        assert!(!state.wrong_way_contact);

        state.player.motion.pos = Vec2::new(190.0, 270.0);
        state.player.motion.vel = MAX_VEL;
        tick(&mut state, &FORWARD);
        assert_eq!(state.laps(), 1);
    }

    #[test]
    fn test_waypoint_recorded_while_paused() {
        let mut state = test_state(&Settings::default());
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        let click = TickInput {
            waypoint: Some(Vec2::new(1.0, 2.0)),
            ..Default::default()
        };
        tick(&mut state, &click);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.path().len(), 27);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::WaypointAdded { point: Vec2::new(1.0, 2.0) }]
        );
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut state = test_state(&Settings::default());
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        tick(&mut state, &FORWARD);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.player.motion.vel, 0.0);

        // Unpausing runs the rest of the same tick
        let resume = TickInput {
            pause: true,
            forward: true,
            ..Default::default()
        };
        tick(&mut state, &resume);
        assert_eq!(state.phase, GamePhase::Racing);
        assert_eq!(state.time_ticks, 1);
        assert!(state.player.motion.vel > 0.0);
    }

    #[test]
    fn test_waypoint_appends_to_computer_path() {
        let mut state = test_state(&Settings::default());
        let input = TickInput {
            waypoint: Some(Vec2::new(12.0, 34.0)),
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.path().len(), 27);
        assert_eq!(state.path().points()[26], Vec2::new(12.0, 34.0));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::WaypointAdded { point: Vec2::new(12.0, 34.0) }]
        );
    }

    #[test]
    fn test_computer_car_stays_parked() {
        let mut state = test_state(&Settings::default());
        for _ in 0..30 {
            tick(&mut state, &FORWARD);
        }
        assert_eq!(state.computer.motion.pos, Vec2::from(COMPUTER_START));
    }

    #[test]
    fn test_determinism() {
        let mut a = test_state(&Settings::default());
        let mut b = test_state(&Settings::default());
        let inputs = [
            FORWARD,
            TickInput {
                left: true,
                forward: true,
                ..Default::default()
            },
            BACK,
            TickInput::default(),
        ];
        for _ in 0..50 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }
        assert_eq!(a.player.motion, b.player.motion);
        assert_eq!(a.time_ticks, b.time_ticks);
    }
}
