//! Data-driven game balance
//!
//! Every number the world step uses to award score, deal damage or spawn
//! entities. Defaults are the shipped balance; a settings file may override
//! any subset of them.

use serde::{Deserialize, Serialize};

use crate::consts::{GROUND_HEIGHT, SCREEN_HEIGHT, TARGET_DISTANCE};
use crate::sim::entities::MEDIKIT_HEAL;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Distance at which the run is won
    pub target_distance: u64,
    /// Ticks between spawn rolls
    pub spawn_interval: u32,
    /// Per-roll spawn probabilities
    pub obstacle_chance: f64,
    pub turret_chance: f64,
    pub coin_chance: f64,
    pub medikit_chance: f64,
    /// Obstacle height range (pixels)
    pub obstacle_min_height: f32,
    pub obstacle_max_height: f32,
    /// Damage dealt to the helicopter
    pub obstacle_damage: i32,
    pub enemy_bullet_damage: i32,
    /// Bonus score
    pub turret_bonus: u64,
    pub coin_bonus: u64,
    /// Health restored by a medikit
    pub medikit_heal: i32,
    /// Ticks between player shots
    pub fire_cooldown: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            target_distance: TARGET_DISTANCE,
            spawn_interval: 70,
            obstacle_chance: 0.35,
            turret_chance: 0.15,
            coin_chance: 0.45,
            medikit_chance: 0.05,
            obstacle_min_height: 70.0,
            obstacle_max_height: 180.0,
            obstacle_damage: 20,
            enemy_bullet_damage: 10,
            turret_bonus: 50,
            coin_bonus: 10,
            medikit_heal: MEDIKIT_HEAL,
            fire_cooldown: 15,
        }
    }
}

impl Tuning {
    /// Balance with all random spawning switched off (scripted scenarios)
    pub fn without_spawns() -> Self {
        Self {
            obstacle_chance: 0.0,
            turret_chance: 0.0,
            coin_chance: 0.0,
            medikit_chance: 0.0,
            ..Self::default()
        }
    }

    /// Clamp probabilities into [0, 1], obstacle heights to the playfield
    /// and intervals to at least one tick
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        for p in [
            &mut self.obstacle_chance,
            &mut self.turret_chance,
            &mut self.coin_chance,
            &mut self.medikit_chance,
        ] {
            if !p.is_finite() {
                *p = 0.0;
            }
            *p = p.clamp(0.0, 1.0);
        }
        let max_height = SCREEN_HEIGHT - GROUND_HEIGHT;
        for (h, default) in [
            (&mut self.obstacle_min_height, defaults.obstacle_min_height),
            (&mut self.obstacle_max_height, defaults.obstacle_max_height),
        ] {
            if !h.is_finite() || *h < 0.0 {
                *h = default;
            }
            *h = h.clamp(1.0, max_height);
        }
        if self.obstacle_min_height > self.obstacle_max_height {
            std::mem::swap(&mut self.obstacle_min_height, &mut self.obstacle_max_height);
        }
        self.target_distance = self.target_distance.max(1);
        self.spawn_interval = self.spawn_interval.max(1);
        self.fire_cooldown = self.fire_cooldown.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let t: Tuning = serde_json::from_str(r#"{"coin_bonus": 25}"#).unwrap();
        assert_eq!(t.coin_bonus, 25);
        assert_eq!(t.turret_bonus, 50);
        assert_eq!(t.spawn_interval, 70);
    }

    #[test]
    fn test_sanitized() {
        let t = Tuning {
            coin_chance: 3.0,
            turret_chance: f64::NAN,
            obstacle_min_height: 200.0,
            obstacle_max_height: 100.0,
            target_distance: 0,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(t.coin_chance, 1.0);
        assert_eq!(t.turret_chance, 0.0);
        assert!(t.obstacle_min_height <= t.obstacle_max_height);
        assert_eq!(t.target_distance, 1);
    }

    #[test]
    fn test_sanitized_heights_and_intervals() {
        let t = Tuning {
            obstacle_min_height: -5.0,
            obstacle_max_height: f32::INFINITY,
            spawn_interval: 0,
            fire_cooldown: 0,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(t.obstacle_min_height, 70.0);
        assert_eq!(t.obstacle_max_height, 180.0);
        assert_eq!(t.spawn_interval, 1);
        assert_eq!(t.fire_cooldown, 1);

        let tall = Tuning {
            obstacle_max_height: 5000.0,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(tall.obstacle_max_height, SCREEN_HEIGHT - GROUND_HEIGHT);
    }
}
