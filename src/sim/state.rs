//! Game state and core simulation types
//!
//! The `World` exclusively owns every live entity of one play session.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{
    Bullet, Coin, EnemyBullet, Entity, Helicopter, Medikit, Obstacle, Turret,
};
use super::particles::{DEFAULT_PARTICLE_LIMIT, ParticlePool};
use crate::consts::DISTANCE_PER_POINT;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Target distance reached
    Won,
    /// Helicopter destroyed
    Lost,
}

impl GamePhase {
    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Things that happened during a tick, for audio and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Player fired a bullet
    Shot,
    /// Something blew up (hits, kills, crashes)
    Explosion,
    CoinCollected,
    MedikitCollected,
    TurretDestroyed,
    Won,
    Lost,
}

/// Complete game state for one run
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Player helicopter
    pub helicopter: Helicopter,
    /// Live entities, in spawn order
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub obstacles: Vec<Obstacle>,
    pub turrets: Vec<Turret>,
    pub coins: Vec<Coin>,
    pub medikits: Vec<Medikit>,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticlePool,
    /// Distance flown
    pub distance: u64,
    /// Score from pickups and kills (on top of distance score)
    pub bonus: u64,
    /// Distance needed to win
    pub target_distance: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ticks until the player may fire again
    pub shoot_cooldown: u32,
    /// Ticks since the last spawn roll
    pub spawn_timer: u32,
    /// Gameplay balance
    pub tuning: Tuning,
    events: Vec<GameEvent>,
}

impl World {
    /// Create a new world with the default balance
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            helicopter: Helicopter::default(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            obstacles: Vec::new(),
            turrets: Vec::new(),
            coins: Vec::new(),
            medikits: Vec::new(),
            particles: ParticlePool::with_limit(DEFAULT_PARTICLE_LIMIT),
            distance: 0,
            bonus: 0,
            target_distance: tuning.target_distance,
            time_ticks: 0,
            shoot_cooldown: 0,
            spawn_timer: 0,
            tuning,
            events: Vec::new(),
        }
    }

    /// Replace the particle pool with one capped at `limit`
    pub fn with_particle_limit(mut self, limit: usize) -> Self {
        self.particles = ParticlePool::with_limit(limit);
        self
    }

    /// Start a fresh run in place
    ///
    /// The next seed comes from this run's RNG, so a session of restarts is
    /// reproducible from the first seed.
    pub fn reset(&mut self) {
        let seed = self.rng.random::<u64>();
        let limit = self.particles.limit();
        let tuning = self.tuning.clone();
        *self = Self::with_tuning(seed, tuning).with_particle_limit(limit);
        log::info!("World reset (seed {})", seed);
    }

    /// Distance score plus bonuses
    pub fn score(&self) -> u64 {
        self.distance / DISTANCE_PER_POINT + self.bonus
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    /// Restart is offered after a run ends or from the pause screen
    pub fn can_restart(&self) -> bool {
        matches!(self.phase, GamePhase::Won | GamePhase::Lost | GamePhase::Paused)
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    /// Fire a bullet if playing and the gun has cooled down
    pub fn fire(&mut self) -> bool {
        if self.phase != GamePhase::Playing || self.shoot_cooldown > 0 {
            return false;
        }
        self.bullets.push(Bullet::new(self.helicopter.muzzle()));
        self.shoot_cooldown = self.tuning.fire_cooldown;
        self.events.push(GameEvent::Shot);
        true
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn an explosion using the world RNG
    pub fn explode(&mut self, center: Vec2, intensity: u32) {
        self.particles.explode(center, intensity, &mut self.rng);
    }

    /// Every live entity, back to front
    pub fn entities(&self) -> impl Iterator<Item = Entity<'_>> {
        self.obstacles
            .iter()
            .map(Entity::Obstacle)
            .chain(self.coins.iter().map(Entity::Coin))
            .chain(self.turrets.iter().map(Entity::Turret))
            .chain(self.bullets.iter().map(Entity::Bullet))
            .chain(self.enemy_bullets.iter().map(Entity::EnemyBullet))
            .chain(self.medikits.iter().map(Entity::Medikit))
            .chain(std::iter::once(Entity::Helicopter(&self.helicopter)))
    }

    /// Number of live gameplay entities (helicopter excluded)
    pub fn entity_count(&self) -> usize {
        self.bullets.len()
            + self.enemy_bullets.len()
            + self.obstacles.len()
            + self.turrets.len()
            + self.coins.len()
            + self.medikits.len()
    }
}
