//! Game state and events
//!
//! Everything one tick reads or writes lives here: the track, both cars,
//! the player's rotated-mask cache, lap bookkeeping and pending events.

use glam::{UVec2, Vec2};

use super::car::{Car, car_sprite_mask};
use super::collision::FinishRule;
use super::mask_cache::RotatedMaskCache;
use super::path::Path;
use super::track::Track;
use crate::Settings;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Racing,
    Paused,
}

/// Things that happened during a tick, drained by the frontend
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player touched the track border and bounced
    BorderHit { pos: Vec2 },
    /// Player drove onto the finish line from the far side and bounced
    WrongWayFinish,
    /// Player crossed the finish line forward and was reset to the start
    LapCompleted { lap: u32, ticks: u64 },
    /// A waypoint was appended to the computer car's path
    WaypointAdded { point: Vec2 },
}

pub struct GameState {
    pub track: Track,
    pub player: Car,
    pub computer: Car,
    /// Player sprite masks by orientation
    pub player_sprite: RotatedMaskCache,
    pub finish_rule: FinishRule,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Tick the current lap started on
    pub lap_start_tick: u64,
    /// Completed lap durations in ticks
    pub lap_ticks: Vec<u64>,
    /// Player is still on the finish line it entered the wrong way
    pub wrong_way_contact: bool,
    events: Vec<GameEvent>,
}

impl GameState {
    /// New race on the built-in circuit
    pub fn new(settings: &Settings) -> Self {
        Self::with_track(settings, Track::circuit(settings.track_half_width))
    }

    /// New race on a custom track
    pub fn with_track(settings: &Settings, track: Track) -> Self {
        let sprite = car_sprite_mask(UVec2::new(CAR_WIDTH, CAR_HEIGHT));
        Self {
            track,
            player: Car::player(settings.player, Vec2::from(PLAYER_START)),
            computer: Car::computer(settings.computer, Vec2::from(COMPUTER_START), Path::circuit()),
            player_sprite: RotatedMaskCache::new(sprite, settings.rotation_buckets),
            finish_rule: settings.finish_rule,
            phase: GamePhase::Racing,
            time_ticks: 0,
            lap_start_tick: 0,
            lap_ticks: Vec::new(),
            wrong_way_contact: false,
            events: Vec::new(),
        }
    }

    pub fn laps(&self) -> u32 {
        self.lap_ticks.len() as u32
    }

    pub fn best_lap(&self) -> Option<u64> {
        self.lap_ticks.iter().copied().min()
    }

    /// The computer car's waypoint path
    pub fn path(&self) -> &Path {
        // The computer slot is always built with a Computer controller
        static EMPTY: Path = Path::empty();
        self.computer.path().unwrap_or(&EMPTY)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let mut state = GameState::new(&Settings::default());
        assert_eq!(state.phase, GamePhase::Racing);
        assert_eq!(state.player.motion.pos, Vec2::new(180.0, 200.0));
        assert_eq!(state.computer.motion.pos, Vec2::new(150.0, 200.0));
        assert_eq!(state.path().len(), 26);
        assert_eq!(state.laps(), 0);
        assert_eq!(state.best_lap(), None);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(&Settings::default());
        state.push_event(GameEvent::WrongWayFinish);
        assert_eq!(state.drain_events(), vec![GameEvent::WrongWayFinish]);
        assert!(state.drain_events().is_empty());
    }
}
