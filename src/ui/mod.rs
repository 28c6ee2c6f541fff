//! Menus, name entry, records list and the in-game HUD
//!
//! Every screen draws onto a `Canvas` in world coordinates; the terminal
//! rasteriser takes care of fitting it to the window.

pub mod session;

use crossterm::event::KeyCode;
use glam::Vec2;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::highscores::{MAX_RECORDS, Record};
use crate::platform::NameEntry;
use crate::renderer::colors::*;
use crate::renderer::{Canvas, draw_world};
use crate::settings::DEFAULT_PLAYER_NAME;
use crate::sim::{GamePhase, Rect, World};

pub use session::GameSession;

const CENTER_X: f32 = SCREEN_WIDTH / 2.0;

/// Main menu entries, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    Records,
    Demo,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [
        MenuItem::Start,
        MenuItem::Records,
        MenuItem::Demo,
        MenuItem::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Start => "Start game",
            MenuItem::Records => "Records",
            MenuItem::Demo => "Watch demo",
            MenuItem::Quit => "Quit",
        }
    }
}

/// Main menu cursor
#[derive(Debug, Clone, Default)]
pub struct Menu {
    selected: usize,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> MenuItem {
        MenuItem::ALL[self.selected]
    }

    /// Move the cursor (wrapping) or pick an entry
    pub fn handle(&mut self, code: KeyCode) -> Option<MenuItem> {
        let n = MenuItem::ALL.len();
        match code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                self.selected = (self.selected + n - 1) % n;
                None
            }
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                self.selected = (self.selected + 1) % n;
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => Some(self.selected()),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(MenuItem::Quit),
            _ => None,
        }
    }
}

pub fn draw_menu(canvas: &mut Canvas, menu: &Menu, best: Option<&Record>) {
    canvas.clear(MENU_BG);
    canvas.text_centered(Vec2::new(CENTER_X, 80.0), "HELICOPTER SHOOTER", TITLE);

    if let Some(best) = best {
        canvas.text_centered(
            Vec2::new(CENTER_X, 130.0),
            format!("Best: {} - {}", best.name, best.score),
            RECORDS_TITLE,
        );
    }

    for (i, item) in MenuItem::ALL.iter().enumerate() {
        let selected = *item == menu.selected();
        let (label, color) = if selected {
            (format!("> {} <", item.label()), SELECTED)
        } else {
            (item.label().to_string(), WHITE)
        };
        canvas.text_centered(Vec2::new(CENTER_X, 220.0 + i as f32 * 70.0), label, color);
    }

    canvas.text_centered(
        Vec2::new(CENTER_X, 560.0),
        "UP/DOWN and ENTER to choose",
        HINT_GRAY,
    );
}

pub fn draw_name_entry(canvas: &mut Canvas, entry: &NameEntry) {
    canvas.clear(NAME_BG);
    canvas.text_centered(
        Vec2::new(CENTER_X, 140.0),
        "Enter your name (ENTER to accept)",
        PROMPT,
    );

    let boxed = Rect::new(CENTER_X - 200.0, 240.0, 400.0, 90.0);
    canvas.outline_rect(boxed, WHITE);
    let shown = if entry.text().is_empty() {
        DEFAULT_PLAYER_NAME
    } else {
        entry.text()
    };
    let color = if entry.text().is_empty() { HINT_GRAY } else { WHITE };
    canvas.text_centered(boxed.center(), format!("{}_", shown), color);

    canvas.text_centered(Vec2::new(CENTER_X, 400.0), "ESC to go back", LIGHT_GRAY);
}

pub fn draw_records(canvas: &mut Canvas, records: &[Record]) {
    canvas.clear(RECORDS_BG);
    canvas.text_centered(Vec2::new(CENTER_X, 70.0), "TOP PILOTS", RECORDS_TITLE);

    if records.is_empty() {
        canvas.text_centered(Vec2::new(CENTER_X, 250.0), "No records yet", WHITE);
    } else {
        canvas.text_centered(
            Vec2::new(CENTER_X, 130.0),
            format!("{:>3}  {:<16} {:>7} {:>9}", "#", "NAME", "SCORE", "DISTANCE"),
            HINT_GRAY,
        );
        for (i, r) in records.iter().take(MAX_RECORDS).enumerate() {
            canvas.text_centered(
                Vec2::new(CENTER_X, 170.0 + i as f32 * 40.0),
                format!("{:>3}  {:<16} {:>7} {:>9}", i + 1, r.name, r.score, r.distance),
                if i == 0 { SELECTED } else { WHITE },
            );
        }
    }

    canvas.text_centered(
        Vec2::new(CENTER_X, SCREEN_HEIGHT - 60.0),
        "ESC to return to the menu",
        HINT_GRAY,
    );
}

/// Score, distance and key hints
pub fn draw_hud(canvas: &mut Canvas, world: &World, name: &str, fps: Option<u32>) {
    canvas.text(
        Vec2::new(20.0, 20.0),
        format!("{} - Score: {}", name, world.score()),
        WHITE,
    );
    canvas.text(
        Vec2::new(20.0, 55.0),
        format!(
            "Distance: {}/{}  Health: {}",
            world.distance, world.target_distance, world.helicopter.health
        ),
        WHITE,
    );
    if let Some(fps) = fps {
        canvas.text(
            Vec2::new(SCREEN_WIDTH - 120.0, 20.0),
            format!("{} FPS", fps),
            LIGHT_GRAY,
        );
    }
    canvas.text(
        Vec2::new(20.0, SCREEN_HEIGHT - 30.0),
        "Arrows/WASD move  SPACE fire  P pause  R restart  ESC menu",
        LIGHT_GRAY,
    );
}

/// Pause, win and loss overlays
pub fn draw_overlay(canvas: &mut Canvas, world: &World, rank: Option<usize>) {
    let (title, hint) = match world.phase {
        GamePhase::Playing => return,
        GamePhase::Paused => ("PAUSED", "P to continue  R to restart  ESC to menu"),
        GamePhase::Won => ("YOU WIN!", "R to play again  ESC to menu"),
        GamePhase::Lost => ("GAME OVER", "R to restart  ESC to menu"),
    };

    canvas.shade(0.35);
    canvas.text_centered(Vec2::new(CENTER_X, 290.0), title, WHITE);
    canvas.text_centered(Vec2::new(CENTER_X, 340.0), hint, LIGHT_GRAY);
    if world.is_over() {
        let line = match rank {
            Some(rank) => format!("Final score {}  (rank #{})", world.score(), rank),
            None => format!("Final score {}", world.score()),
        };
        canvas.text_centered(Vec2::new(CENTER_X, 390.0), line, RECORDS_TITLE);
    }
}

/// Full in-game frame
pub fn draw_game(canvas: &mut Canvas, session: &GameSession, fps: Option<u32>) {
    draw_world(canvas, &session.world, Some(&session.scenery));
    let name = if session.demo {
        "Autopilot"
    } else {
        session.player_name.as_str()
    };
    draw_hud(canvas, &session.world, name, fps);
    draw_overlay(canvas, &session.world, session.rank);
}
