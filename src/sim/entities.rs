//! Kinematic entities
//!
//! Each entity kind owns its position and motion rules. The world decides
//! when they collide; entities only know how to move and where their
//! hitbox is.

use glam::Vec2;

use super::collision::Rect;
use crate::consts::*;
use crate::{angle_between, clamp_to_playfield, direction};

/// Helicopter spawn point
pub const HELICOPTER_START: Vec2 = Vec2::new(200.0, SCREEN_HEIGHT / 2.0);
/// Helicopter hitbox size (smaller than the drawn sprite)
pub const HELICOPTER_HITBOX: Vec2 = Vec2::new(50.0, 20.0);

/// Vertical thrust while up/down is held (per tick)
pub const LIFT_ACCEL: f32 = 0.45;
/// Horizontal thrust while left/right is held (per tick)
pub const STRAFE_ACCEL: f32 = 0.25;
/// Velocity retained per tick when no key is held on an axis
pub const DRAG: f32 = 0.96;
/// Constant downward pull (per tick)
pub const GRAVITY: f32 = 0.25;
/// Vertical speed limit
pub const MAX_VERTICAL_SPEED: f32 = 7.0;
/// Horizontal speed limits (backing up is slower than pushing forward)
pub const MIN_HORIZONTAL_SPEED: f32 = -3.0;
pub const MAX_HORIZONTAL_SPEED: f32 = 5.0;
/// Visual tilt while climbing/diving (degrees)
pub const TILT_DEGREES: f32 = 5.0;
pub const TILT_DECAY: f32 = 0.9;
/// Main rotor spin per tick (degrees)
pub const ROTOR_SPIN: f32 = 20.0;

pub const BULLET_SPEED: f32 = 12.0;
pub const BULLET_RADIUS: f32 = 12.0;
/// Bullets spawn ahead of the helicopter nose
pub const BULLET_MUZZLE_OFFSET: Vec2 = Vec2::new(30.0, 0.0);
/// Bullets live until this far past the right edge
pub const BULLET_MARGIN: f32 = 50.0;

pub const ENEMY_BULLET_SPEED: f32 = 6.5;
pub const ENEMY_BULLET_RADIUS: f32 = 5.0;

pub const OBSTACLE_WIDTH: f32 = 60.0;
pub const OBSTACLE_SPEED: f32 = 2.5;

pub const TURRET_SPEED: f32 = 2.5;
pub const TURRET_HEALTH: u8 = 3;
/// Ticks between turret shots
pub const TURRET_RELOAD: u32 = 70;
/// Turrets hold fire until they are this far inside the right edge
pub const TURRET_FIRE_LINE: f32 = SCREEN_WIDTH - 100.0;
/// Distance from the turret center to the barrel tip
pub const TURRET_MUZZLE: f32 = 20.0;
/// Turrets are dropped once this far past the left edge
pub const TURRET_EXIT: f32 = -50.0;

pub const COIN_RADIUS: f32 = 12.0;
pub const COIN_SPEED: f32 = 2.5;
/// Phase advance per tick and the resulting bob amplitude
pub const COIN_SPIN: f32 = 5.0;
pub const COIN_BOB: f32 = 5.0;

pub const MEDIKIT_RADIUS: f32 = 20.0;
pub const MEDIKIT_SPEED: f32 = 3.0;
pub const MEDIKIT_HEAL: i32 = 20;

/// Snapshot of held movement keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// The player's helicopter
#[derive(Debug, Clone)]
pub struct Helicopter {
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: i32,
    pub max_health: i32,
    /// Visual tilt in degrees (negative = nose up)
    pub tilt: f32,
    /// Main rotor angle in degrees
    pub rotor_angle: f32,
}

impl Default for Helicopter {
    fn default() -> Self {
        Self::new(HELICOPTER_START)
    }
}

impl Helicopter {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            tilt: 0.0,
            rotor_angle: 0.0,
        }
    }

    /// Apply one tick of input, gravity and drag, then integrate
    pub fn advance(&mut self, keys: HeldKeys) {
        if keys.up {
            self.vel.y -= LIFT_ACCEL;
            self.tilt = -TILT_DEGREES;
        } else if keys.down {
            self.vel.y += LIFT_ACCEL;
            self.tilt = TILT_DEGREES;
        } else {
            self.vel.y *= DRAG;
            self.tilt *= TILT_DECAY;
        }

        if keys.right {
            self.vel.x = (self.vel.x + STRAFE_ACCEL).min(MAX_HORIZONTAL_SPEED);
        } else if keys.left {
            self.vel.x = (self.vel.x - STRAFE_ACCEL).max(MIN_HORIZONTAL_SPEED);
        } else {
            self.vel.x *= DRAG;
        }

        self.vel.y = (self.vel.y + GRAVITY).clamp(-MAX_VERTICAL_SPEED, MAX_VERTICAL_SPEED);

        self.pos = clamp_to_playfield(self.pos + self.vel);
        self.rotor_angle = (self.rotor_angle + ROTOR_SPIN) % 360.0;
    }

    pub fn hitbox(&self) -> Rect {
        Rect::centered(self.pos, HELICOPTER_HITBOX.x, HELICOPTER_HITBOX.y)
    }

    pub fn damage(&mut self, amount: i32) {
        self.health = (self.health - amount).clamp(0, self.max_health);
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).clamp(0, self.max_health);
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    /// Health as a 0-1 fraction (for the health bar)
    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / self.max_health as f32
    }

    /// Where a fired bullet appears
    pub fn muzzle(&self) -> Vec2 {
        self.pos + BULLET_MUZZLE_OFFSET
    }
}

/// A player bullet (flies straight right)
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
}

impl Bullet {
    pub fn new(pos: Vec2) -> Self {
        Self { pos }
    }

    pub fn advance(&mut self) {
        self.pos.x += BULLET_SPEED;
    }

    pub fn hitbox(&self) -> Rect {
        Rect::around_circle(self.pos, BULLET_RADIUS)
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x > SCREEN_WIDTH + BULLET_MARGIN
    }
}

/// A turret shot; its heading is fixed when fired
#[derive(Debug, Clone)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub angle: f32,
}

impl EnemyBullet {
    pub fn new(pos: Vec2, angle: f32) -> Self {
        Self { pos, angle }
    }

    pub fn advance(&mut self) {
        self.pos += direction(self.angle) * ENEMY_BULLET_SPEED;
    }

    pub fn hitbox(&self) -> Rect {
        Rect::around_circle(self.pos, ENEMY_BULLET_RADIUS)
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x < 0.0
            || self.pos.x > SCREEN_WIDTH
            || self.pos.y < 0.0
            || self.pos.y > SCREEN_HEIGHT
    }
}

/// A stone pillar rising from the ground
#[derive(Debug, Clone)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn new(x: f32, height: f32) -> Self {
        Self { x, height }
    }

    pub fn advance(&mut self) {
        self.x -= OBSTACLE_SPEED;
    }

    /// Top edge of the pillar
    pub fn top(&self) -> f32 {
        SCREEN_HEIGHT - GROUND_HEIGHT - self.height
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.top(), OBSTACLE_WIDTH, self.height)
    }

    pub fn is_off_screen(&self) -> bool {
        self.x < -OBSTACLE_WIDTH
    }
}

/// An enemy gun emplacement that tracks the helicopter
#[derive(Debug, Clone)]
pub struct Turret {
    pub pos: Vec2,
    pub health: u8,
    /// Ticks until the next shot is allowed
    pub cooldown: u32,
    /// Barrel heading in radians
    pub angle: f32,
}

impl Turret {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            health: TURRET_HEALTH,
            cooldown: 0,
            angle: 0.0,
        }
    }

    /// Scroll left, aim at `target`, count down the reload timer
    pub fn advance(&mut self, target: Vec2) {
        self.pos.x -= TURRET_SPEED;
        self.angle = angle_between(self.pos, target);
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    pub fn can_fire(&self) -> bool {
        self.cooldown == 0 && self.pos.x < TURRET_FIRE_LINE
    }

    /// Fire along the current aim; the shot keeps this heading
    pub fn fire(&mut self) -> EnemyBullet {
        self.cooldown = TURRET_RELOAD;
        let muzzle = self.pos + direction(self.angle) * TURRET_MUZZLE;
        EnemyBullet::new(muzzle, self.angle)
    }

    pub fn take_hit(&mut self) {
        self.health = self.health.saturating_sub(1);
    }

    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos.x - 20.0, self.pos.y - 15.0, 40.0, 35.0)
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x < TURRET_EXIT
    }
}

/// A floating coin
#[derive(Debug, Clone)]
pub struct Coin {
    pub pos: Vec2,
    /// Spin phase driving the bob
    pub phase: f32,
    /// Current vertical bob offset
    pub bob: f32,
}

impl Coin {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            phase: 0.0,
            bob: 0.0,
        }
    }

    pub fn advance(&mut self) {
        self.pos.x -= COIN_SPEED;
        self.phase += COIN_SPIN;
        self.bob = (self.phase * 0.1).sin() * COIN_BOB;
    }

    /// Position including the bob
    pub fn visual_pos(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y + self.bob)
    }

    pub fn hitbox(&self) -> Rect {
        Rect::around_circle(self.visual_pos(), COIN_RADIUS)
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x < -COIN_RADIUS
    }
}

/// A health pickup
#[derive(Debug, Clone)]
pub struct Medikit {
    pub pos: Vec2,
    pub heal_amount: i32,
}

impl Medikit {
    pub fn new(pos: Vec2, heal_amount: i32) -> Self {
        Self { pos, heal_amount }
    }

    pub fn advance(&mut self) {
        self.pos.x -= MEDIKIT_SPEED;
    }

    pub fn hitbox(&self) -> Rect {
        Rect::around_circle(self.pos, MEDIKIT_RADIUS)
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x < -MEDIKIT_RADIUS
    }
}

/// Borrowed view of any live entity
///
/// The kind set is closed, so rendering and queries match on it instead of
/// going through trait objects.
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Helicopter(&'a Helicopter),
    Bullet(&'a Bullet),
    EnemyBullet(&'a EnemyBullet),
    Obstacle(&'a Obstacle),
    Turret(&'a Turret),
    Coin(&'a Coin),
    Medikit(&'a Medikit),
}

impl Entity<'_> {
    pub fn hitbox(&self) -> Rect {
        match self {
            Entity::Helicopter(h) => h.hitbox(),
            Entity::Bullet(b) => b.hitbox(),
            Entity::EnemyBullet(b) => b.hitbox(),
            Entity::Obstacle(o) => o.hitbox(),
            Entity::Turret(t) => t.hitbox(),
            Entity::Coin(c) => c.hitbox(),
            Entity::Medikit(m) => m.hitbox(),
        }
    }

    /// Reference point of the entity (center, or left edge for obstacles)
    pub fn position(&self) -> Vec2 {
        match self {
            Entity::Helicopter(h) => h.pos,
            Entity::Bullet(b) => b.pos,
            Entity::EnemyBullet(b) => b.pos,
            Entity::Obstacle(o) => Vec2::new(o.x, o.top()),
            Entity::Turret(t) => t.pos,
            Entity::Coin(c) => c.visual_pos(),
            Entity::Medikit(m) => m.pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_helicopter_climbs_and_tilts() {
        let mut heli = Helicopter::default();
        let keys = HeldKeys {
            up: true,
            ..Default::default()
        };
        heli.advance(keys);
        // -0.45 thrust then +0.25 gravity
        assert!((heli.vel.y - (-0.2)).abs() < 1e-5);
        assert_eq!(heli.tilt, -TILT_DEGREES);
        assert!(heli.pos.y < HELICOPTER_START.y);
    }

    #[test]
    fn test_helicopter_falls_without_input() {
        let mut heli = Helicopter::default();
        heli.advance(HeldKeys::default());
        assert!((heli.vel.y - GRAVITY).abs() < 1e-6);
        assert!(heli.pos.y > HELICOPTER_START.y);
    }

    #[test]
    fn test_up_wins_over_down() {
        let mut heli = Helicopter::default();
        heli.advance(HeldKeys {
            up: true,
            down: true,
            ..Default::default()
        });
        assert_eq!(heli.tilt, -TILT_DEGREES);
    }

    #[test]
    fn test_tilt_decays_when_released() {
        let mut heli = Helicopter::default();
        heli.advance(HeldKeys {
            down: true,
            ..Default::default()
        });
        heli.advance(HeldKeys::default());
        assert!((heli.tilt - TILT_DEGREES * TILT_DECAY).abs() < 1e-5);
    }

    #[test]
    fn test_damage_and_heal_clamp() {
        let mut heli = Helicopter::default();
        heli.damage(30);
        assert_eq!(heli.health, 70);
        heli.heal(50);
        assert_eq!(heli.health, MAX_HEALTH);
        heli.damage(500);
        assert_eq!(heli.health, 0);
        assert!(heli.is_destroyed());
    }

    #[test]
    fn test_turret_holds_fire_offscreen() {
        let mut turret = Turret::new(Vec2::new(SCREEN_WIDTH, 300.0));
        turret.advance(HELICOPTER_START);
        assert!(!turret.can_fire());

        let mut turret = Turret::new(Vec2::new(600.0, 300.0));
        turret.advance(HELICOPTER_START);
        assert!(turret.can_fire());
        let shot = turret.fire();
        assert_eq!(turret.cooldown, TURRET_RELOAD);
        assert!(!turret.can_fire());
        // Muzzle sits on the aim line
        assert!((shot.pos.distance(turret.pos) - TURRET_MUZZLE).abs() < 1e-3);
    }

    #[test]
    fn test_enemy_bullet_keeps_heading() {
        let mut turret = Turret::new(Vec2::new(600.0, 300.0));
        turret.advance(Vec2::new(200.0, 300.0));
        let mut shot = turret.fire();
        let heading = shot.angle;

        // Barrel keeps tracking a new target, the shot does not
        turret.advance(Vec2::new(200.0, 100.0));
        shot.advance();
        assert_eq!(shot.angle, heading);
        assert_ne!(turret.angle, heading);
        // Heading straight left
        assert!(shot.pos.x < 600.0 - TURRET_MUZZLE);
        assert!((shot.pos.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_turret_health_never_wraps() {
        let mut turret = Turret::new(Vec2::new(600.0, 300.0));
        for _ in 0..5 {
            turret.take_hit();
        }
        assert_eq!(turret.health, 0);
        assert!(turret.is_destroyed());
    }

    #[test]
    fn test_coin_bobs_within_amplitude() {
        let mut coin = Coin::new(Vec2::new(500.0, 300.0));
        for _ in 0..200 {
            coin.advance();
            assert!(coin.bob.abs() <= COIN_BOB + 1e-4);
        }
        assert!((coin.pos.x - (500.0 - 200.0 * COIN_SPEED)).abs() < 1e-2);
    }

    #[test]
    fn test_offscreen_thresholds() {
        assert!(Bullet::new(Vec2::new(SCREEN_WIDTH + 51.0, 10.0)).is_off_screen());
        assert!(!Bullet::new(Vec2::new(SCREEN_WIDTH + 49.0, 10.0)).is_off_screen());
        assert!(Obstacle::new(-61.0, 100.0).is_off_screen());
        assert!(!Obstacle::new(-59.0, 100.0).is_off_screen());
        assert!(EnemyBullet::new(Vec2::new(10.0, -1.0), 0.0).is_off_screen());
        assert!(Medikit::new(Vec2::new(-21.0, 10.0), MEDIKIT_HEAL).is_off_screen());
    }

    #[test]
    fn test_obstacle_stands_on_ground() {
        let o = Obstacle::new(500.0, 100.0);
        let hb = o.hitbox();
        assert_eq!(hb.bottom(), SCREEN_HEIGHT - GROUND_HEIGHT);
        assert_eq!(hb.w, OBSTACLE_WIDTH);
    }

    fn keys_strategy() -> impl Strategy<Value = HeldKeys> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(up, down, left, right)| HeldKeys {
                up,
                down,
                left,
                right,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_helicopter_stays_in_bounds(inputs in prop::collection::vec(keys_strategy(), 1..400)) {
            let mut heli = Helicopter::default();
            for keys in inputs {
                heli.advance(keys);
                prop_assert!(heli.vel.y >= -MAX_VERTICAL_SPEED && heli.vel.y <= MAX_VERTICAL_SPEED);
                prop_assert!(heli.vel.x >= MIN_HORIZONTAL_SPEED && heli.vel.x <= MAX_HORIZONTAL_SPEED);
                prop_assert!(heli.pos.x >= PLAYFIELD_MARGIN && heli.pos.x <= SCREEN_WIDTH - PLAYFIELD_FAR_MARGIN);
                prop_assert!(heli.pos.y >= PLAYFIELD_MARGIN && heli.pos.y <= SCREEN_HEIGHT - PLAYFIELD_FAR_MARGIN);
            }
        }
    }
}
