//! Wacky Racers entry point
//!
//! Loads settings, then either runs the terminal game loop or plays an input
//! script headless. On exit the computer car's waypoint path is printed as
//! JSON.

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        MouseButton, MouseEventKind, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    style::{Color, ResetColor},
    terminal::{self, DisableLineWrap, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen},
};

use wacky_racers::consts::MAX_SUBSTEPS;
use wacky_racers::headless::run_script;
use wacky_racers::platform::{DriveKey, HeldKeys, InputScript};
use wacky_racers::renderer::{Cell, Frame, Scene, Viewport};
use wacky_racers::sim::{GameState, TickInput, tick};
use wacky_racers::{Result, Settings};

const USAGE: &str = "usage: wacky-racers [--settings <file.json>] [--replay <script.json>]";

#[derive(Debug, Default)]
struct Args {
    settings: Option<PathBuf>,
    replay: Option<PathBuf>,
}

fn parse_args() -> std::result::Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--settings" => {
                args.settings = Some(iter.next().ok_or("--settings needs a file")?.into());
            }
            "--replay" => {
                args.replay = Some(iter.next().ok_or("--replay needs a file")?.into());
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            other => return Err(format!("unknown argument `{other}`\n{USAGE}")),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let settings = Settings::load_or_default(Settings::locate(args.settings).as_deref());
    log::info!("Wacky Racers starting ({} fps)", settings.fps);

    if let Some(path) = args.replay {
        let script = InputScript::load(&path)?;
        let mut state = GameState::new(&settings);
        let summary = run_script(&mut state, &script);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let mut game = Game::new(settings);
    let mut out = io::stdout();

    terminal::enable_raw_mode()?;
    let releases = terminal::supports_keyboard_enhancement().unwrap_or(false);
    execute!(
        out,
        EnterAlternateScreen,
        cursor::Hide,
        DisableLineWrap,
        EnableMouseCapture,
        EnableFocusChange,
        terminal::Clear(terminal::ClearType::All)
    )?;
    if releases {
        execute!(
            out,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    game.keys = HeldKeys::new(releases);
    log::info!("Key release events supported: {}", releases);

    let res = game.run(&mut out);

    // restore
    if releases {
        let _ = execute!(out, PopKeyboardEnhancementFlags);
    }
    let _ = execute!(
        out,
        DisableFocusChange,
        DisableMouseCapture,
        EnableLineWrap,
        cursor::Show,
        LeaveAlternateScreen,
        ResetColor
    );
    let _ = terminal::disable_raw_mode();
    res?;

    println!("{}", serde_json::to_string(game.state.path())?);
    Ok(())
}

/// Game instance holding all state
struct Game {
    settings: Settings,
    state: GameState,
    keys: HeldKeys,
    /// One-shot inputs waiting for the next tick
    pending: TickInput,
    /// Ticks run, including paused ones (drives key hold windows)
    clock: u64,
    scene: Option<Scene>,
    frame: Frame,
    quit: bool,
}

impl Game {
    fn new(settings: Settings) -> Self {
        let state = GameState::new(&settings);
        Self {
            settings,
            state,
            keys: HeldKeys::new(false),
            pending: TickInput::default(),
            clock: 0,
            scene: None,
            frame: Frame::new(0, 0),
            quit: false,
        }
    }

    fn run(&mut self, out: &mut Stdout) -> Result<()> {
        let (w, h) = terminal::size()?;
        self.resize(w, h);

        let sim_dt = 1.0 / self.settings.fps.max(1) as f32;
        let frame_time = Duration::from_secs_f32(sim_dt);
        let mut last = Instant::now();
        let mut accumulator = 0.0f32;

        while !self.quit {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?);
            }
            if self.quit {
                break;
            }

            let now = Instant::now();
            accumulator += (now - last).as_secs_f32().min(0.25);
            last = now;

            let mut substeps = 0;
            while accumulator >= sim_dt && substeps < MAX_SUBSTEPS {
                self.step();
                accumulator -= sim_dt;
                substeps += 1;
            }
            if substeps == MAX_SUBSTEPS {
                // Too far behind; drop the backlog
                accumulator = 0.0;
            }

            self.draw();
            self.frame.flush_diff(out)?;

            if let Some(rest) = frame_time.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
        Ok(())
    }

    fn step(&mut self) {
        let mut input = self.keys.snapshot(self.clock);
        input.pause = std::mem::take(&mut self.pending.pause);
        input.waypoint = self.pending.waypoint.take();
        tick(&mut self.state, &input);
        self.clock += 1;
        // Events are already logged by the simulation
        self.state.drain_events();
    }

    fn draw(&mut self) {
        match &self.scene {
            Some(scene) => scene.draw(&mut self.frame, &self.state, &self.settings),
            None => {
                for y in 0..self.frame.height() {
                    for x in 0..self.frame.width() {
                        self.frame.put(x, y, Cell::BLANK);
                    }
                }
                self.frame
                    .put_str(0, 0, "Terminal too small", Color::White, Color::Black);
            }
        }
    }

    fn resize(&mut self, w: u16, h: u16) {
        self.frame.resize(w, h);
        self.scene = Viewport::fit(self.state.track.size(), w, h)
            .map(|vp| Scene::new(&self.state.track, vp, w, h));
        log::debug!("Resized to {}x{}", w, h);
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                    let point = self
                        .scene
                        .as_ref()
                        .and_then(|s| s.viewport.to_track(mouse.column, mouse.row));
                    if let Some(point) = point {
                        self.pending.waypoint = Some(point);
                    }
                }
            }
            Event::Resize(w, h) => self.resize(w, h),
            Event::FocusLost => self.keys.clear(),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let drive = match key.code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(DriveKey::Left),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(DriveKey::Right),
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(DriveKey::Forward),
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(DriveKey::Back),
            _ => None,
        };

        if let Some(drive) = drive {
            match key.kind {
                KeyEventKind::Press => self.keys.press(drive, false, self.clock),
                KeyEventKind::Repeat => self.keys.press(drive, true, self.clock),
                KeyEventKind::Release => self.keys.release(drive),
            }
            return;
        }

        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('p') | KeyCode::Char('P') => self.pending.pause = true,
            _ => {}
        }
    }
}
