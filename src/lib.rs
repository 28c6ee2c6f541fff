//! Helicopter Shooter - A side-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, spawning, game state)
//! - `renderer`: Shape-based drawing and terminal rasterisation
//! - `platform`: Input tracking and frame pacing
//! - `persistence`: Record storage (JSON file or in-memory)
//! - `highscores`: Top-10 ranking rules
//! - `settings`: User preferences
//! - `tuning`: Data-driven game balance
//! - `audio`: Sound effect triggers
//! - `ui`: Menus, name entry and HUD screens

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::{Record, Records};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// World dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 1200.0;
    pub const SCREEN_HEIGHT: f32 = 700.0;
    pub const GROUND_HEIGHT: f32 = 50.0;

    /// Helicopter is kept this far inside the top/left edges
    pub const PLAYFIELD_MARGIN: f32 = 50.0;
    /// ...and this far inside the bottom/right edges
    pub const PLAYFIELD_FAR_MARGIN: f32 = 100.0;

    /// Distance needed to win a run
    pub const TARGET_DISTANCE: u64 = 4000;
    /// Helicopter hit points
    pub const MAX_HEALTH: i32 = 100;
    /// Distance units per score point
    pub const DISTANCE_PER_POINT: u64 = 5;
}

/// Clamp a point into the rectangle the helicopter may occupy
#[inline]
pub fn clamp_to_playfield(pos: Vec2) -> Vec2 {
    use consts::*;
    Vec2::new(
        pos.x
            .clamp(PLAYFIELD_MARGIN, SCREEN_WIDTH - PLAYFIELD_FAR_MARGIN),
        pos.y
            .clamp(PLAYFIELD_MARGIN, SCREEN_HEIGHT - PLAYFIELD_FAR_MARGIN),
    )
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_playfield() {
        let p = clamp_to_playfield(Vec2::new(-10.0, 5000.0));
        assert_eq!(p, Vec2::new(50.0, 600.0));

        let p = clamp_to_playfield(Vec2::new(2000.0, 0.0));
        assert_eq!(p, Vec2::new(1100.0, 50.0));
    }

    #[test]
    fn test_angle_between_and_direction() {
        let a = angle_between(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((a - std::f32::consts::FRAC_PI_2).abs() < 1e-6);

        let d = direction(a);
        assert!(d.x.abs() < 1e-6);
        assert!((d.y - 1.0).abs() < 1e-6);
    }
}
