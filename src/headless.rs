//! Headless races driven by an input script

use glam::Vec2;
use serde::Serialize;

use crate::platform::InputScript;
use crate::sim::{GameEvent, GameState, Path, tick};

/// Outcome of a headless run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RaceSummary {
    pub ticks: u64,
    pub laps: u32,
    pub lap_ticks: Vec<u64>,
    pub best_lap: Option<u64>,
    pub border_hits: u32,
    pub wrong_way_crossings: u32,
    pub final_pos: Vec2,
    pub final_angle: f32,
    pub final_vel: f32,
    /// Computer car's waypoints at the end of the run
    pub path: Path,
}

/// Play every tick of `script` against `state`
pub fn run_script(state: &mut GameState, script: &InputScript) -> RaceSummary {
    let mut summary = RaceSummary::default();
    for input in script.inputs() {
        tick(state, &input);
        for event in state.drain_events() {
            match event {
                GameEvent::BorderHit { .. } => summary.border_hits += 1,
                GameEvent::WrongWayFinish => summary.wrong_way_crossings += 1,
                GameEvent::LapCompleted { .. } | GameEvent::WaypointAdded { .. } => {}
            }
        }
    }

    summary.ticks = state.time_ticks;
    summary.laps = state.laps();
    summary.lap_ticks = state.lap_ticks.clone();
    summary.best_lap = state.best_lap();
    summary.final_pos = state.player.motion.pos;
    summary.final_angle = state.player.motion.angle;
    summary.final_vel = state.player.motion.vel;
    summary.path = state.path().clone();
    log::info!(
        "Headless run finished: {} ticks, {} laps, {} border hits",
        summary.ticks,
        summary.laps,
        summary.border_hits
    );
    summary
}
