//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order per entity kind)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entities;
pub mod particles;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use entities::{
    Bullet, Coin, EnemyBullet, Entity, Helicopter, HeldKeys, Medikit, Obstacle, Turret,
};
pub use particles::{Particle, ParticlePool};
pub use state::{GameEvent, GamePhase, World};
pub use tick::{TickInput, autopilot, tick};
