//! Track, cars and HUD drawn onto the character grid

use crossterm::style::Color;
use glam::{IVec2, UVec2, Vec2};

use super::frame::{Cell, Frame};
use crate::Settings;
use crate::consts::*;
use crate::normalize_degrees;
use crate::sim::{Car, GamePhase, GameState, Track};

/// Terminal rows reserved for the HUD above the track
pub const HUD_ROWS: u16 = 1;

const GRASS: Cell = Cell::new(' ', Color::White, Color::DarkGreen);
const ROAD: Cell = Cell::new(' ', Color::White, Color::DarkGrey);
const FINISH: Cell = Cell::new('▚', Color::White, Color::Black);

/// Glyphs for a car facing up, then every 45° counter-clockwise
const CAR_GLYPHS: [char; 8] = ['↑', '↖', '←', '↙', '↓', '↘', '→', '↗'];

/// Mapping between track pixels and terminal cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    /// Track pixels covered by one cell
    pub cell: Vec2,
}

impl Viewport {
    /// Fit the whole track into a terminal of `term_w × term_h` cells
    pub fn fit(track_size: UVec2, term_w: u16, term_h: u16) -> Option<Self> {
        let rows = term_h.checked_sub(HUD_ROWS)?;
        if term_w < 8 || rows < 4 {
            return None;
        }
        Some(Self {
            cols: term_w,
            rows,
            cell: track_size.as_vec2() / Vec2::new(term_w as f32, rows as f32),
        })
    }

    /// Terminal cell (column, row) showing track point `p`
    pub fn to_cell(&self, p: Vec2) -> Option<(u16, u16)> {
        let c = (p / self.cell).floor();
        if c.x < 0.0 || c.y < 0.0 || c.x >= self.cols as f32 || c.y >= self.rows as f32 {
            return None;
        }
        Some((c.x as u16, c.y as u16 + HUD_ROWS))
    }

    /// Track point at the center of terminal cell (column, row)
    pub fn to_track(&self, col: u16, row: u16) -> Option<Vec2> {
        let row = row.checked_sub(HUD_ROWS)?;
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some((Vec2::new(col as f32, row as f32) + 0.5) * self.cell)
    }
}

/// Pre-rendered static layers for one viewport
pub struct Scene {
    pub viewport: Viewport,
    background: Vec<Cell>,
}

impl Scene {
    pub fn new(track: &Track, viewport: Viewport, term_w: u16, term_h: u16) -> Self {
        let mut background = vec![Cell::BLANK; term_w as usize * term_h as usize];
        for row in 0..viewport.rows {
            for col in 0..viewport.cols {
                let cell = background_cell(track, &viewport, col, row);
                let y = row + HUD_ROWS;
                if col < term_w && y < term_h {
                    background[y as usize * term_w as usize + col as usize] = cell;
                }
            }
        }
        Self {
            viewport,
            background,
        }
    }

    /// Draw the whole game into `frame`
    pub fn draw(&self, frame: &mut Frame, state: &GameState, settings: &Settings) {
        frame.copy_from(&self.background);

        if settings.show_path {
            for &point in state.path().points() {
                if let Some((x, y)) = self.viewport.to_cell(point) {
                    frame.put_glyph(x, y, 'o', Color::Red);
                }
            }
        }

        self.draw_car(frame, &state.computer, Color::Green);
        self.draw_car(frame, &state.player, Color::Red);
        draw_hud(frame, state, settings);
    }

    fn draw_car(&self, frame: &mut Frame, car: &Car, color: Color) {
        let center = car.motion.pos + Vec2::new(CAR_WIDTH as f32, CAR_HEIGHT as f32) / 2.0;
        if let Some((x, y)) = self.viewport.to_cell(center) {
            frame.put_glyph(x, y, car_glyph(car.motion.angle), color);
        }
    }
}

fn background_cell(track: &Track, viewport: &Viewport, col: u16, row: u16) -> Cell {
    // 3x3 samples per cell; majority decides grass vs road
    let origin = Vec2::new(col as f32, row as f32) * viewport.cell;
    let mut walls = 0;
    let mut finish = false;
    for sy in 0..3 {
        for sx in 0..3 {
            let p = origin + (Vec2::new(sx as f32, sy as f32) + 0.5) / 3.0 * viewport.cell;
            let px = p.floor().as_ivec2();
            if track.border.get(px.x, px.y) {
                walls += 1;
            }
            finish |= track.on_finish(px);
        }
    }
    if finish {
        FINISH
    } else if walls >= 5 {
        GRASS
    } else {
        ROAD
    }
}

/// Arrow pointing the way a car faces
pub fn car_glyph(angle: f32) -> char {
    let index = (normalize_degrees(angle) / 45.0).round() as usize % CAR_GLYPHS.len();
    CAR_GLYPHS[index]
}

fn draw_hud(frame: &mut Frame, state: &GameState, settings: &Settings) {
    let width = frame.width();
    for x in 0..width {
        frame.put(x, 0, Cell::BLANK);
    }

    let secs = |ticks: Option<u64>| match ticks {
        Some(t) => format!("{:.2}s", settings.ticks_to_secs(t)),
        None => "--".to_string(),
    };
    let current = state.time_ticks - state.lap_start_tick;
    let status = if state.phase == GamePhase::Paused {
        " PAUSED"
    } else {
        ""
    };
    let text = format!(
        " WACKY RACERS  lap {}  time {}  last {}  best {}  speed {:+.1}{}  | WASD/arrows drive, P pause, Q quit, click: waypoint",
        state.laps() + 1,
        secs(Some(current)),
        secs(state.lap_ticks.last().copied()),
        secs(state.best_lap()),
        state.player.motion.vel,
        status,
    );
    frame.put_str(0, 0, &text, Color::Yellow, Color::Black);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::OccupancyMask;

    fn small_track() -> Track {
        // Left half grass, finish strip in the top-right corner
        Track::new(
            OccupancyMask::from_fn(100, 100, |x, _| x < 50),
            OccupancyMask::filled(20, 10),
            IVec2::new(80, 0),
            Vec2::NEG_Y,
        )
    }

    #[test]
    fn test_viewport_round_trip() {
        let vp = Viewport::fit(UVec2::new(810, 810), 81, 42).unwrap();
        assert_eq!(vp.rows, 41);
        assert_eq!(vp.cell.x, 10.0);
        let (col, row) = vp.to_cell(Vec2::new(185.0, 5.0)).unwrap();
        assert_eq!((col, row), (18, HUD_ROWS));
        let p = vp.to_track(col, row).unwrap();
        assert_eq!(vp.to_cell(p), Some((col, row)));
        assert_eq!(vp.to_cell(Vec2::new(-1.0, 5.0)), None);
        assert_eq!(vp.to_track(10, 0), None);
    }

    #[test]
    fn test_viewport_rejects_tiny_terminal() {
        assert!(Viewport::fit(UVec2::new(810, 810), 4, 3).is_none());
    }

    #[test]
    fn test_background_layers() {
        let track = small_track();
        let vp = Viewport::fit(track.size(), 10, 11).unwrap();
        let scene = Scene::new(&track, vp, 10, 11);
        let mut frame = Frame::new(10, 11);
        frame.copy_from(&scene.background);
        assert_eq!(frame.get(0, 5), Some(GRASS));
        assert_eq!(frame.get(7, 5), Some(ROAD));
        assert_eq!(frame.get(9, HUD_ROWS), Some(FINISH));
    }

    #[test]
    fn test_car_glyphs() {
        assert_eq!(car_glyph(0.0), '↑');
        assert_eq!(car_glyph(90.0), '←');
        assert_eq!(car_glyph(-90.0), '→');
        assert_eq!(car_glyph(178.0), '↓');
        assert_eq!(car_glyph(350.0), '↑');
    }
}
