//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world deterministically, one tick at a
//! time. Every decision the game makes happens here.

use glam::Vec2;
use rand::Rng;

use super::entities::{Coin, HeldKeys, Medikit, Obstacle, Turret};
use super::state::{GameEvent, GamePhase, World};
use crate::consts::*;

/// Explosion sizes (particle counts)
const CRASH_BURST: u32 = 15;
const TURRET_HIT_BURST: u32 = 10;
const TURRET_KILL_BURST: u32 = 20;
const BULLET_HIT_BURST: u32 = 8;
const COIN_BURST: u32 = 10;
const DEATH_BURST: u32 = 30;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement keys held this tick
    pub keys: HeldKeys,
    /// Fire request (key pressed since last tick)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - autopilot flies the helicopter
    pub idle_mode: bool,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        let before = world.phase;
        world.toggle_pause();
        if world.phase != before {
            log::info!("Phase {:?} -> {:?}", before, world.phase);
        }
    }

    match world.phase {
        GamePhase::Paused => return,
        // Let the last explosions finish after the run ends
        GamePhase::Won | GamePhase::Lost => {
            world.particles.advance();
            return;
        }
        GamePhase::Playing => {}
    }

    let input = if input.idle_mode {
        autopilot(world)
    } else {
        input.clone()
    };

    if input.fire {
        world.fire();
    }

    world.time_ticks += 1;

    world.helicopter.advance(input.keys);

    world.distance += 1;
    let reached_target = world.distance >= world.target_distance;

    world.shoot_cooldown = world.shoot_cooldown.saturating_sub(1);

    update_bullets(world);
    update_obstacles(world);
    update_turrets(world);
    update_enemy_bullets(world);
    update_coins(world);
    update_medikits(world);

    world.particles.advance();

    spawn_entities(world);

    // A crash on the final stretch still loses the run
    if world.helicopter.is_destroyed() {
        world.phase = GamePhase::Lost;
        let pos = world.helicopter.pos;
        world.explode(pos, DEATH_BURST);
        world.emit(GameEvent::Lost);
        log::info!(
            "Run lost: distance {} score {}",
            world.distance,
            world.score()
        );
    } else if reached_target {
        world.phase = GamePhase::Won;
        world.emit(GameEvent::Won);
        log::info!(
            "Run won: distance {} score {}",
            world.distance,
            world.score()
        );
    }
}

fn update_bullets(world: &mut World) {
    world.bullets.retain_mut(|b| {
        b.advance();
        !b.is_off_screen()
    });
}

fn update_obstacles(world: &mut World) {
    let heli_box = world.helicopter.hitbox();
    let mut crashes = 0;
    world.obstacles.retain_mut(|o| {
        o.advance();
        if o.is_off_screen() {
            return false;
        }
        if o.hitbox().intersects(&heli_box) {
            crashes += 1;
            return false;
        }
        true
    });

    for _ in 0..crashes {
        world.helicopter.damage(world.tuning.obstacle_damage);
        let pos = world.helicopter.pos;
        world.explode(pos, CRASH_BURST);
        world.emit(GameEvent::Explosion);
    }
}

fn update_turrets(world: &mut World) {
    let target = world.helicopter.pos;
    let mut i = 0;

    while i < world.turrets.len() {
        let turret = &mut world.turrets[i];
        turret.advance(target);

        if turret.is_off_screen() {
            world.turrets.remove(i);
            continue;
        }

        if turret.can_fire() {
            let shot = turret.fire();
            world.enemy_bullets.push(shot);
        }

        // Player bullets chip away at the turret, one hit per bullet
        let turret_box = turret.hitbox();
        let mut j = 0;
        while j < world.bullets.len() && !turret.is_destroyed() {
            if world.bullets[j].hitbox().intersects(&turret_box) {
                world.bullets.remove(j);
                turret.take_hit();
                world
                    .particles
                    .explode(turret.pos, TURRET_HIT_BURST, &mut world.rng);
            } else {
                j += 1;
            }
        }

        if turret.is_destroyed() {
            let pos = turret.pos;
            world.turrets.remove(i);
            world.bonus += world.tuning.turret_bonus;
            world.explode(pos, TURRET_KILL_BURST);
            world.emit(GameEvent::TurretDestroyed);
            log::debug!("Turret destroyed at ({:.0}, {:.0})", pos.x, pos.y);
            continue;
        }

        i += 1;
    }
}

fn update_enemy_bullets(world: &mut World) {
    let heli_box = world.helicopter.hitbox();
    let mut hits: Vec<Vec2> = Vec::new();
    world.enemy_bullets.retain_mut(|b| {
        b.advance();
        if b.is_off_screen() {
            return false;
        }
        if b.hitbox().intersects(&heli_box) {
            hits.push(b.pos);
            return false;
        }
        true
    });

    for pos in hits {
        world.helicopter.damage(world.tuning.enemy_bullet_damage);
        world.explode(pos, BULLET_HIT_BURST);
        world.emit(GameEvent::Explosion);
    }
}

fn update_coins(world: &mut World) {
    let heli_box = world.helicopter.hitbox();
    let mut collected: Vec<Vec2> = Vec::new();
    world.coins.retain_mut(|c| {
        c.advance();
        if c.is_off_screen() {
            return false;
        }
        if c.hitbox().intersects(&heli_box) {
            collected.push(c.pos);
            return false;
        }
        true
    });

    for pos in collected {
        world.bonus += world.tuning.coin_bonus;
        world.explode(pos, COIN_BURST);
        world.emit(GameEvent::CoinCollected);
    }
}

fn update_medikits(world: &mut World) {
    let heli_box = world.helicopter.hitbox();
    let mut heals: Vec<i32> = Vec::new();
    world.medikits.retain_mut(|m| {
        m.advance();
        if m.is_off_screen() {
            return false;
        }
        if m.hitbox().intersects(&heli_box) {
            heals.push(m.heal_amount);
            return false;
        }
        true
    });

    for amount in heals {
        world.helicopter.heal(amount);
        world.emit(GameEvent::MedikitCollected);
    }
}

/// Roll for new entities once per spawn window
fn spawn_entities(world: &mut World) {
    world.spawn_timer += 1;
    if world.spawn_timer <= world.tuning.spawn_interval {
        return;
    }
    world.spawn_timer = 0;

    let t = &world.tuning;
    let rng = &mut world.rng;

    if rng.random_bool(t.obstacle_chance) {
        let height = rng.random_range(t.obstacle_min_height..=t.obstacle_max_height);
        world.obstacles.push(Obstacle::new(SCREEN_WIDTH, height));
        log::debug!("Spawned obstacle (height {:.0})", height);
    }
    if rng.random_bool(t.turret_chance) {
        let y = rng.random_range(150.0..=SCREEN_HEIGHT - 180.0);
        world.turrets.push(Turret::new(Vec2::new(SCREEN_WIDTH, y)));
        log::debug!("Spawned turret (y {:.0})", y);
    }
    if rng.random_bool(t.coin_chance) {
        let y = rng.random_range(100.0..=SCREEN_HEIGHT - 200.0);
        world.coins.push(Coin::new(Vec2::new(SCREEN_WIDTH, y)));
    }
    if rng.random_bool(t.medikit_chance) {
        let y = rng.random_range(100.0..=SCREEN_HEIGHT - 150.0);
        world
            .medikits
            .push(Medikit::new(Vec2::new(SCREEN_WIDTH, y), t.medikit_heal));
    }
}

/// Altitude the autopilot returns to when nothing needs attention
const CRUISE_ALTITUDE: f32 = 280.0;
/// Horizontal station the autopilot holds
const CRUISE_X: f32 = 250.0;
/// How far ahead the autopilot looks for pickups and turrets
const LOOKAHEAD: f32 = 450.0;

/// Compute inputs for demo mode
///
/// Priorities, lowest to highest: cruise, chase a pickup or line up a
/// turret, dodge nearby shots, clear pillars ahead.
pub fn autopilot(world: &World) -> TickInput {
    let heli = &world.helicopter;
    let pos = heli.pos;
    let hurt = heli.health < heli.max_health - 20;

    let ahead = |x: f32| x > pos.x && x < pos.x + LOOKAHEAD;

    let pickup = world
        .coins
        .iter()
        .map(|c| c.visual_pos())
        .chain(
            world
                .medikits
                .iter()
                .filter(|_| hurt)
                .map(|m| m.pos),
        )
        .filter(|p| ahead(p.x))
        .min_by(|a, b| a.x.total_cmp(&b.x));

    let turret = world
        .turrets
        .iter()
        .filter(|t| t.pos.x > pos.x && t.pos.x < SCREEN_WIDTH - 50.0)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

    let mut target_y = match (pickup, turret) {
        (Some(p), _) => p.y,
        (None, Some(t)) => t.pos.y,
        (None, None) => CRUISE_ALTITUDE,
    };

    for b in &world.enemy_bullets {
        if b.pos.distance(pos) < 140.0 {
            target_y = if b.pos.y >= pos.y {
                target_y.min(pos.y - 70.0)
            } else {
                target_y.max(pos.y + 70.0)
            };
        }
    }

    for o in &world.obstacles {
        if o.x + crate::sim::entities::OBSTACLE_WIDTH > pos.x - 40.0 && o.x < pos.x + 260.0 {
            target_y = target_y.min(o.top() - 45.0);
        }
    }

    let target_y = target_y.clamp(
        PLAYFIELD_MARGIN,
        SCREEN_HEIGHT - PLAYFIELD_FAR_MARGIN,
    );

    // Lead the vertical error by the current velocity to avoid overshoot
    let predicted = pos.y + heli.vel.y * 8.0;
    let keys = HeldKeys {
        up: predicted > target_y + 8.0,
        down: predicted < target_y - 8.0,
        left: pos.x > CRUISE_X + 20.0,
        right: pos.x < CRUISE_X - 20.0,
    };

    let fire = world
        .turrets
        .iter()
        .any(|t| t.pos.x > pos.x && (t.pos.y - pos.y).abs() < 25.0);

    TickInput {
        keys,
        fire,
        pause: false,
        idle_mode: false,
    }
}
