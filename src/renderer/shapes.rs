//! Shape generation for game entities
//!
//! Each entity kind has one draw function that pushes primitives onto a
//! `Canvas`. `draw_world` walks the world back to front.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::colors::*;
use super::{Canvas, Color};
use crate::consts::{GROUND_HEIGHT, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::direction;
use crate::sim::entities::{
    BULLET_RADIUS, COIN_RADIUS, ENEMY_BULLET_RADIUS, MEDIKIT_RADIUS, OBSTACLE_SPEED,
};
use crate::sim::{
    Bullet, Coin, EnemyBullet, Entity, GamePhase, Helicopter, Medikit, Obstacle, ParticlePool,
    Rect, Turret, World,
};

/// Horizontal bands used for the sky gradient
const SKY_BANDS: usize = 24;
const CLOUD_COUNT: usize = 6;
const GROUND_STRIPE: f32 = 100.0;
const TURRET_RADIUS: f32 = 15.0;
const BARREL_LENGTH: f32 = 25.0;
const ROTOR_SPAN: Vec2 = Vec2::new(40.0, 8.0);

/// A drifting background cloud
#[derive(Debug, Clone)]
pub struct Cloud {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

/// Cosmetic background state
///
/// Owns its own RNG so that scenery never touches the world's random
/// stream.
#[derive(Debug, Clone)]
pub struct Scenery {
    pub clouds: Vec<Cloud>,
    /// Clouds are drawn only when set
    pub show_clouds: bool,
    pub ground_offset: f32,
    rng: Pcg32,
}

impl Scenery {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let clouds = (0..CLOUD_COUNT)
            .map(|_| Cloud {
                pos: Vec2::new(
                    rng.random_range(0.0..SCREEN_WIDTH),
                    rng.random_range(50.0..200.0),
                ),
                size: Vec2::new(rng.random_range(100.0..180.0), rng.random_range(50.0..80.0)),
                speed: rng.random_range(0.3..1.0),
            })
            .collect();
        Self {
            clouds,
            show_clouds: true,
            ground_offset: 0.0,
            rng,
        }
    }

    pub fn with_clouds(mut self, show: bool) -> Self {
        self.show_clouds = show;
        self
    }

    /// Scroll clouds and ground by one frame
    pub fn advance(&mut self) {
        for cloud in &mut self.clouds {
            cloud.pos.x -= cloud.speed;
            if cloud.pos.x < -cloud.size.x {
                cloud.pos.x = SCREEN_WIDTH + self.rng.random_range(0.0..200.0);
                cloud.pos.y = self.rng.random_range(40.0..220.0);
            }
        }
        self.ground_offset = (self.ground_offset + OBSTACLE_SPEED) % GROUND_STRIPE;
    }
}

/// Sky gradient, clouds and scrolling ground
pub fn background(canvas: &mut Canvas, scenery: Option<&Scenery>) {
    canvas.clear(DARK_BLUE);

    let sky_height = SCREEN_HEIGHT - GROUND_HEIGHT;
    let band = sky_height / SKY_BANDS as f32;
    for i in 0..SKY_BANDS {
        let t = i as f32 / (SKY_BANDS - 1) as f32;
        canvas.fill_rect(
            Rect::new(0.0, i as f32 * band, SCREEN_WIDTH, band + 1.0),
            SKY_BLUE.lerp(DARK_BLUE, t),
        );
    }

    if let Some(scenery) = scenery.filter(|s| s.show_clouds) {
        for cloud in &scenery.clouds {
            // Three overlapping puffs read as a cloud at terminal resolution
            let r = cloud.size.y / 2.0;
            let mid = cloud.pos + cloud.size / 2.0;
            canvas.circle(mid, r, CLOUD_WHITE);
            canvas.circle(mid - Vec2::new(cloud.size.x / 3.0, -r / 4.0), r * 0.8, CLOUD_WHITE);
            canvas.circle(mid + Vec2::new(cloud.size.x / 3.0, r / 4.0), r * 0.8, CLOUD_WHITE);
        }
    }

    canvas.fill_rect(
        Rect::new(0.0, sky_height, SCREEN_WIDTH, GROUND_HEIGHT),
        GROUND_GREEN,
    );
    let offset = scenery.map_or(0.0, |s| s.ground_offset);
    let mut x = -offset;
    while x < SCREEN_WIDTH {
        canvas.fill_rect(
            Rect::new(x, sky_height, GROUND_STRIPE / 2.0, GROUND_HEIGHT),
            DARK_GREEN,
        );
        x += GROUND_STRIPE;
    }
}

pub fn helicopter(canvas: &mut Canvas, heli: &Helicopter) {
    let p = heli.pos;
    let nose = Vec2::new(tilt_lift(heli.tilt), 0.0);

    // Tail boom and tail rotor
    canvas.line(p, p + Vec2::new(-45.0, -5.0) + nose, HELICOPTER_BODY);
    canvas.line(p, p + Vec2::new(-45.0, 5.0) + nose, HELICOPTER_BODY);
    canvas.line(
        p + Vec2::new(-50.0, -8.0),
        p + Vec2::new(-50.0, 8.0),
        HELICOPTER_ACCENT,
    );

    // Body and cockpit
    canvas.fill_rect(Rect::centered(p, 50.0, 20.0), HELICOPTER_BODY);
    canvas.line(
        p + Vec2::new(-20.0, 0.0),
        p + Vec2::new(20.0, 0.0),
        HELICOPTER_ACCENT,
    );
    canvas.circle(p + Vec2::new(17.0, 0.0), 7.0, COCKPIT);

    // Skids
    let skid_y = 12.0;
    canvas.line(
        p + Vec2::new(-20.0, skid_y),
        p + Vec2::new(20.0, skid_y),
        STONE_DARK,
    );

    // Main rotor, two blades
    let hub = p + Vec2::new(0.0, -15.0);
    for blade in 0..2 {
        let angle = (heli.rotor_angle + blade as f32 * 180.0).to_radians();
        canvas.line(hub, hub + direction(angle) * ROTOR_SPAN, ROTOR);
    }
    canvas.circle(hub, 5.0, HELICOPTER_ACCENT);
}

/// Nose offset from tilt (tilt is a few degrees either way)
fn tilt_lift(tilt: f32) -> f32 {
    tilt.to_radians().sin() * 10.0
}

/// Health bar above the helicopter
pub fn health_bar(canvas: &mut Canvas, heli: &Helicopter) {
    let frame = Rect::new(heli.pos.x - 30.0, heli.pos.y - 30.0, 60.0, 6.0);
    canvas.fill_rect(frame, HEALTH_BG);

    let fill = Rect {
        w: frame.w * heli.health_fraction().clamp(0.0, 1.0),
        ..frame
    };
    canvas.fill_rect(fill, health_color(heli.health));
    canvas.outline_rect(frame, WHITE);
}

pub fn health_color(health: i32) -> Color {
    if health > 50 {
        HEALTH_GOOD
    } else if health > 25 {
        HEALTH_WARN
    } else {
        HEALTH_LOW
    }
}

pub fn bullet(canvas: &mut Canvas, b: &Bullet) {
    canvas.circle(b.pos, BULLET_RADIUS, BULLET);
}

pub fn enemy_bullet(canvas: &mut Canvas, b: &EnemyBullet) {
    canvas.circle(b.pos, ENEMY_BULLET_RADIUS, ENEMY_RED);
}

pub fn obstacle(canvas: &mut Canvas, o: &Obstacle) {
    let r = o.hitbox();
    canvas.fill_rect(r, STONE_GRAY);
    canvas.fill_rect(Rect::new(r.right() - 5.0, r.y, 5.0, r.h), STONE_DARK);
    canvas.fill_rect(Rect::new(r.x, r.y, 5.0, r.h), STONE_LIGHT);
    canvas.fill_rect(Rect::new(r.x, r.y, r.w, 4.0), STONE_CAP);
}

pub fn turret(canvas: &mut Canvas, t: &Turret) {
    canvas.circle(t.pos, TURRET_RADIUS, ENEMY_RED);
    canvas.line(t.pos, t.pos + direction(t.angle) * BARREL_LENGTH, TURRET_BARREL);
    for i in 0..t.health {
        canvas.circle(
            t.pos + Vec2::new(-10.0 + i as f32 * 10.0, -25.0),
            3.0,
            TURRET_PIP,
        );
    }
}

pub fn coin(canvas: &mut Canvas, c: &Coin) {
    let p = c.visual_pos();
    canvas.circle(p, COIN_RADIUS, COIN_EDGE);
    canvas.circle(p, COIN_RADIUS - 2.0, COIN_GOLD);
    canvas.circle(p, COIN_RADIUS - 5.0, COIN_SHINE);
}

pub fn medikit(canvas: &mut Canvas, m: &Medikit) {
    canvas.circle(m.pos, MEDIKIT_RADIUS, MEDIKIT_RED);
    canvas.line(m.pos - Vec2::X * 8.0, m.pos + Vec2::X * 8.0, WHITE);
    canvas.line(m.pos - Vec2::Y * 8.0, m.pos + Vec2::Y * 8.0, WHITE);
}

pub fn particles(canvas: &mut Canvas, pool: &ParticlePool) {
    for p in pool.iter() {
        canvas.circle(p.pos, p.size, Color::from_array(p.color));
    }
}

/// Draw one entity
pub fn entity(canvas: &mut Canvas, e: Entity<'_>) {
    match e {
        Entity::Helicopter(h) => {
            helicopter(canvas, h);
            health_bar(canvas, h);
        }
        Entity::Bullet(b) => bullet(canvas, b),
        Entity::EnemyBullet(b) => enemy_bullet(canvas, b),
        Entity::Obstacle(o) => obstacle(canvas, o),
        Entity::Turret(t) => turret(canvas, t),
        Entity::Coin(c) => coin(canvas, c),
        Entity::Medikit(m) => medikit(canvas, m),
    }
}

/// Draw the whole playfield
///
/// Particles go on top of pickups and enemies but under the helicopter.
/// A destroyed helicopter is not drawn.
pub fn draw_world(canvas: &mut Canvas, world: &World, scenery: Option<&Scenery>) {
    background(canvas, scenery);

    for e in world.entities() {
        if let Entity::Helicopter(_) = e {
            particles(canvas, &world.particles);
            if world.phase == GamePhase::Lost {
                continue;
            }
        }
        entity(canvas, e);
    }
}
