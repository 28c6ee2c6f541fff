//! Helicopter Shooter - terminal frontend
//!
//! Usage:
//!   helicopter-shooter                      play in the terminal
//!   helicopter-shooter --demo               watch the autopilot
//!   helicopter-shooter --headless 20000     autopilot run, summary on stdout

use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    ExecutableCommand, cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
};

use helicopter_shooter::audio::{AudioManager, BellBackend};
use helicopter_shooter::highscores::{MAX_RECORDS, Records};
use helicopter_shooter::persistence::{JsonFileStore, RecordStore};
use helicopter_shooter::platform::{FrameClock, KeyTracker, NameEntry, NameInput};
use helicopter_shooter::renderer::{Canvas, TerminalRaster};
use helicopter_shooter::settings::{
    DEFAULT_PLAYER_NAME, DEFAULT_SETTINGS_FILE, QualityPreset, Settings,
};
use helicopter_shooter::sim::{GamePhase, TickInput, World, tick};
use helicopter_shooter::ui::{self, GameSession, Menu, MenuItem};

#[derive(Parser, Debug)]
#[command(name = "helicopter-shooter")]
#[command(about = "Side-scrolling helicopter shooter for the terminal")]
struct Args {
    /// Player name (skips the name prompt)
    #[arg(long)]
    name: Option<String>,

    /// Seed for the first run
    #[arg(long)]
    seed: Option<u64>,

    /// Records file
    #[arg(long)]
    records: Option<PathBuf>,

    /// Settings file
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Graphics quality: low, medium or high
    #[arg(long, value_parser = parse_quality)]
    quality: Option<QualityPreset>,

    /// Start with sound off
    #[arg(long)]
    mute: bool,

    /// Where log output goes
    #[arg(long, default_value = "helicopter-shooter.log")]
    log_file: PathBuf,

    /// Run the autopilot for this many ticks without a terminal and print a summary
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,

    /// Go straight into an autopilot demo
    #[arg(long)]
    demo: bool,
}

fn parse_quality(s: &str) -> Result<QualityPreset, String> {
    QualityPreset::parse(s).ok_or_else(|| format!("unknown quality '{}' (low, medium, high)", s))
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;
    log::info!("Helicopter Shooter starting...");

    let mut settings = Settings::load(&args.settings);
    if let Some(name) = &args.name {
        settings.player_name = name.clone();
    }
    if let Some(path) = &args.records {
        settings.records_path = path.clone();
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if let Some(quality) = args.quality {
        settings.quality = quality;
    }
    if args.mute {
        settings.muted = true;
    }
    log::info!(
        "Quality {} ({} particles)",
        settings.quality.as_str(),
        settings.max_particles()
    );

    if let Some(ticks) = args.headless {
        return run_headless(&settings, ticks);
    }

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Release events where the terminal supports them
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = App::new(settings, &args).and_then(|mut app| app.run(&mut out, &rx));

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("Fatal: {:#}", e);
    }
    log::info!("Bye");
    result
}

/// Autopilot run with no terminal
fn run_headless(settings: &Settings, ticks: u64) -> Result<()> {
    let seed = settings.seed.unwrap_or_else(rand::random);
    let mut world = World::with_tuning(seed, settings.tuning.clone())
        .with_particle_limit(settings.max_particles());
    let input = TickInput {
        idle_mode: true,
        ..TickInput::default()
    };

    let started = Instant::now();
    let mut ran = 0;
    while ran < ticks && !world.is_over() {
        tick(&mut world, &input);
        ran += 1;
    }
    log::info!("Headless run finished in {:?}", started.elapsed());

    let mut out = stdout().lock();
    writeln!(out, "seed      {}", seed)?;
    writeln!(out, "ticks     {}", ran)?;
    writeln!(out, "phase     {:?}", world.phase)?;
    writeln!(out, "distance  {}/{}", world.distance, world.target_distance)?;
    writeln!(out, "score     {}", world.score())?;
    writeln!(out, "health    {}", world.helicopter.health)?;
    Ok(())
}

enum Screen {
    Menu,
    NameEntry,
    Records,
    Playing,
}

enum Flow {
    Continue,
    Quit,
}

struct App {
    settings: Settings,
    settings_path: PathBuf,
    skip_name_prompt: bool,
    store: JsonFileStore,
    records: Records,
    audio: AudioManager,
    keys: KeyTracker,
    clock: FrameClock,
    canvas: Canvas,
    raster: TerminalRaster,
    screen: Screen,
    menu: Menu,
    name: NameEntry,
    session: Option<GameSession>,
    /// Pause pressed but not yet seen by a tick
    pause_pending: bool,
    first_seed: Option<u64>,
}

impl App {
    fn new(settings: Settings, args: &Args) -> Result<Self> {
        let (cols, rows) = terminal::size().context("querying terminal size")?;

        let mut audio = AudioManager::new(Box::new(BellBackend));
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        let store = JsonFileStore::new(&settings.records_path);
        let mut app = Self {
            skip_name_prompt: args.name.is_some(),
            settings_path: args.settings.clone(),
            store,
            records: Records::new(),
            audio,
            keys: KeyTracker::new(),
            clock: FrameClock::new(),
            canvas: Canvas::new(),
            raster: TerminalRaster::new(cols, rows),
            screen: Screen::Menu,
            menu: Menu::new(),
            name: NameEntry::new(),
            session: None,
            pause_pending: false,
            first_seed: settings.seed,
            settings,
        };
        app.reload_records();
        if args.demo {
            app.start_game(true);
        }
        Ok(app)
    }

    fn run<W: Write>(&mut self, out: &mut W, rx: &mpsc::Receiver<Event>) -> Result<()> {
        loop {
            let frame_start = Instant::now();
            self.keys.next_frame();

            while let Ok(ev) = rx.try_recv() {
                if let Flow::Quit = self.handle_event(ev) {
                    return Ok(());
                }
            }

            if let Screen::Playing = self.screen {
                self.update();
            }

            self.draw(out)?;
            self.clock.pace(frame_start);
        }
    }

    fn reload_records(&mut self) {
        self.records = self.store.load();
    }

    fn next_seed(&mut self) -> u64 {
        self.first_seed.take().unwrap_or_else(rand::random)
    }

    fn start_game(&mut self, demo: bool) {
        let seed = self.next_seed();
        let world = World::with_tuning(seed, self.settings.tuning.clone())
            .with_particle_limit(self.settings.max_particles());
        log::info!(
            "New {} (seed {})",
            if demo { "demo" } else { "run" },
            seed
        );
        self.session = Some(
            GameSession::new(world, self.settings.player_name.clone(), demo)
                .with_clouds(self.settings.quality.clouds_enabled()),
        );
        self.screen = Screen::Playing;
        self.keys.clear();
        self.clock.reset();
        self.pause_pending = false;
    }

    fn leave_game(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.leave(&self.store);
        }
        self.reload_records();
        self.screen = Screen::Menu;
    }

    /// Remember a typed name for next time (without CLI overrides)
    fn remember_player_name(&self) {
        let mut stored = Settings::load(&self.settings_path);
        if stored.player_name == self.settings.player_name {
            return;
        }
        stored.player_name = self.settings.player_name.clone();
        if let Err(e) = stored.save(&self.settings_path) {
            log::warn!("Could not save settings: {:#}", e);
        }
    }

    fn handle_event(&mut self, ev: Event) -> Flow {
        let key = match ev {
            Event::Key(key) => key,
            Event::Resize(cols, rows) => {
                self.raster.resize(cols, rows);
                return Flow::Continue;
            }
            _ => return Flow::Continue,
        };

        self.keys.handle(&key);
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.leave_game();
            return Flow::Quit;
        }

        match self.screen {
            Screen::Menu => self.handle_menu(key),
            Screen::NameEntry => {
                match self.name.handle(key.code) {
                    NameInput::Editing => {}
                    NameInput::Confirmed(name) => {
                        self.settings.player_name = name;
                        self.remember_player_name();
                        self.start_game(false);
                    }
                    NameInput::Cancelled => self.screen = Screen::Menu,
                }
                Flow::Continue
            }
            Screen::Records => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('Q')
                ) {
                    self.screen = Screen::Menu;
                }
                Flow::Continue
            }
            Screen::Playing => {
                self.handle_game_key(key);
                Flow::Continue
            }
        }
    }

    fn handle_menu(&mut self, key: KeyEvent) -> Flow {
        match self.menu.handle(key.code) {
            Some(MenuItem::Start) if self.skip_name_prompt => self.start_game(false),
            Some(MenuItem::Start) => {
                let last = &self.settings.player_name;
                self.name = if last == DEFAULT_PLAYER_NAME {
                    NameEntry::new()
                } else {
                    NameEntry::with_text(last)
                };
                self.screen = Screen::NameEntry;
            }
            Some(MenuItem::Records) => {
                self.reload_records();
                self.screen = Screen::Records;
            }
            Some(MenuItem::Demo) => self.start_game(true),
            Some(MenuItem::Quit) => return Flow::Quit,
            None => {}
        }
        Flow::Continue
    }

    fn handle_game_key(&mut self, key: KeyEvent) {
        let Some(session) = self.session.as_mut() else {
            self.screen = Screen::Menu;
            return;
        };

        match key.code {
            KeyCode::Char('p') | KeyCode::Char('P') => self.pause_pending = true,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if session.restart(&self.store) {
                    self.clock.reset();
                    self.pause_pending = false;
                }
            }
            KeyCode::Char('m') | KeyCode::Char('M') => self.audio.toggle_mute(),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                // The first press pauses a live run, the second leaves
                if session.world.phase == GamePhase::Playing && !session.demo {
                    session.toggle_pause();
                } else {
                    self.leave_game();
                }
            }
            _ => {}
        }
    }

    fn update(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let steps = self.clock.tick_count();
        for _ in 0..steps {
            let input = TickInput {
                keys: self.keys.held_keys(),
                fire: self.keys.fire_held(),
                pause: self.pause_pending,
                idle_mode: false,
            };
            self.pause_pending = false;
            let events = session.step(&input, &self.store);
            self.audio.play_events(&events);
        }
    }

    fn draw<W: Write>(&mut self, out: &mut W) -> Result<()> {
        match self.screen {
            Screen::Menu => ui::draw_menu(&mut self.canvas, &self.menu, self.records.best()),
            Screen::NameEntry => ui::draw_name_entry(&mut self.canvas, &self.name),
            Screen::Records => {
                ui::draw_records(&mut self.canvas, self.records.top(MAX_RECORDS))
            }
            Screen::Playing => match &self.session {
                Some(session) => {
                    let fps = self.settings.show_fps.then(|| self.clock.fps());
                    ui::draw_game(&mut self.canvas, session, fps);
                }
                None => ui::draw_menu(&mut self.canvas, &self.menu, self.records.best()),
            },
        }
        self.raster.rasterize(&self.canvas);
        self.raster.flush(out).context("drawing frame")?;
        Ok(())
    }
}
