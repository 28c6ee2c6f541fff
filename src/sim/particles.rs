//! Explosion particles
//!
//! Purely cosmetic: gameplay code only ever spawns particles, never reads them.

use glam::Vec2;
use rand::Rng;

use crate::direction;

/// Explosion palette (orange red, gold, yellow)
pub const EXPLOSION_COLORS: [[u8; 3]; 3] = [[255, 69, 0], [255, 215, 0], [255, 255, 0]];

/// Downward pull on particles (per tick)
pub const PARTICLE_GRAVITY: f32 = 0.1;
/// Size retained per tick
pub const PARTICLE_SHRINK: f32 = 0.97;
/// Particles smaller than this are dropped
pub const MIN_PARTICLE_SIZE: f32 = 0.5;

/// Default upper bound on live particles
pub const DEFAULT_PARTICLE_LIMIT: usize = 1024;

/// A single particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left to live
    pub life: i32,
    pub color: [u8; 3],
    pub size: f32,
}

impl Particle {
    fn advance(&mut self) {
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.life -= 1;
        self.size *= PARTICLE_SHRINK;
    }

    fn is_alive(&self) -> bool {
        self.life > 0 && self.size >= MIN_PARTICLE_SIZE
    }
}

/// Pool of live particles
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    limit: usize,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::with_limit(DEFAULT_PARTICLE_LIMIT)
    }
}

impl ParticlePool {
    /// Create a pool holding at most `limit` particles (0 disables effects)
    pub fn with_limit(limit: usize) -> Self {
        Self {
            particles: Vec::new(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Burst `intensity` particles outward from `center`
    pub fn explode<R: Rng + ?Sized>(&mut self, center: Vec2, intensity: u32, rng: &mut R) {
        for _ in 0..intensity {
            if self.particles.len() >= self.limit {
                break;
            }
            let angle: f32 = rng.random_range(0.0..std::f32::consts::TAU);
            let speed: f32 = rng.random_range(2.0..8.0);
            let color = EXPLOSION_COLORS[rng.random_range(0..EXPLOSION_COLORS.len())];
            self.particles.push(Particle {
                pos: center,
                vel: direction(angle) * speed,
                life: rng.random_range(30..=60),
                color,
                size: rng.random_range(3.0..8.0),
            });
        }
    }

    /// Integrate, shrink and age out
    pub fn advance(&mut self) {
        for p in self.particles.iter_mut() {
            p.advance();
        }
        self.particles.retain(Particle::is_alive);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_explosion_spawns_intensity_particles() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut pool = ParticlePool::default();
        pool.explode(Vec2::new(100.0, 100.0), 20, &mut rng);
        assert_eq!(pool.len(), 20);
        for p in pool.iter() {
            assert!(p.life >= 30 && p.life <= 60);
            assert!(p.size >= 3.0 && p.size < 8.0);
            let speed = p.vel.length();
            assert!(speed >= 2.0 - 1e-4 && speed < 8.0 + 1e-4);
            assert!(EXPLOSION_COLORS.contains(&p.color));
        }
    }

    #[test]
    fn test_particles_drain_to_zero() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut pool = ParticlePool::default();
        pool.explode(Vec2::new(600.0, 350.0), 30, &mut rng);

        // Lifetime caps at 60 ticks, so everything is gone after that
        for _ in 0..60 {
            pool.advance();
        }
        assert!(pool.is_empty());
    }

    #[test]
    fn test_particles_fall() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = ParticlePool::default();
        pool.explode(Vec2::ZERO, 1, &mut rng);
        let vy0 = pool.iter().next().map(|p| p.vel.y).unwrap_or_default();
        pool.advance();
        let vy1 = pool.iter().next().map(|p| p.vel.y).unwrap_or_default();
        assert!((vy1 - vy0 - PARTICLE_GRAVITY).abs() < 1e-5);
    }

    #[test]
    fn test_limit_caps_pool() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = ParticlePool::with_limit(10);
        pool.explode(Vec2::ZERO, 25, &mut rng);
        assert_eq!(pool.len(), 10);

        let mut off = ParticlePool::with_limit(0);
        off.explode(Vec2::ZERO, 25, &mut rng);
        assert!(off.is_empty());
    }
}
