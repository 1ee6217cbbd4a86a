use crate::domain::state::SimPlayer;
use crate::domain::tuning::{PlayerTuning, WorldTuning};
use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct MovementConfig {
    pub base_speed: f32,   // acceleration per ms of held input
    pub friction: f32,     // per-tick velocity multiplier
    pub max_velocity: f32, // world units per tick

    pub world_size: f32,
    pub spawn_margin: f32,
}

impl MovementConfig {
    pub fn new(world: &WorldTuning, player: &PlayerTuning) -> Self {
        Self {
            base_speed: player.base_speed,
            friction: player.friction,
            max_velocity: player.max_velocity,
            world_size: world.size,
            spawn_margin: player.spawn_margin,
        }
    }
}

/// Advances a living player by one tick. Returns true if position or velocity changed.
pub fn tick_player(p: &mut SimPlayer, dt_ms: f32, cfg: MovementConfig) -> bool {
    let before = (p.x, p.y, p.vx, p.vy);

    // acceleration from held keys (opposite keys cancel, diagonals add)
    let speed = cfg.base_speed * p.element.profile().speed_modifier;
    let keys = p.last_input.keys;
    let mut accel_x = 0.0;
    let mut accel_y = 0.0;
    if keys.up {
        accel_y -= speed;
    }
    if keys.down {
        accel_y += speed;
    }
    if keys.left {
        accel_x -= speed;
    }
    if keys.right {
        accel_x += speed;
    }

    p.vx += accel_x * dt_ms;
    p.vy += accel_y * dt_ms;

    // friction
    p.vx *= cfg.friction;
    p.vy *= cfg.friction;

    // speed cap, direction preserved
    let speed_now = (p.vx * p.vx + p.vy * p.vy).sqrt();
    if speed_now > cfg.max_velocity {
        let ratio = cfg.max_velocity / speed_now;
        p.vx *= ratio;
        p.vy *= ratio;
    }

    // position integrate: velocity is already per tick, so no dt here
    p.x += p.vx;
    p.y += p.vy;

    clamp_to_world(p, cfg.world_size);

    before != (p.x, p.y, p.vx, p.vy)
}

/// Counts down a dead player's respawn timer. Returns true when the player respawned.
pub fn tick_respawn<R: Rng + ?Sized>(
    p: &mut SimPlayer,
    dt_ms: f32,
    cfg: MovementConfig,
    rng: &mut R,
) -> bool {
    p.respawn_ms -= dt_ms;
    if p.respawn_ms > 0.0 {
        return false;
    }

    let (x, y) = random_spawn(rng, cfg.world_size, cfg.spawn_margin);
    p.respawn_at(x, y);
    true
}

/// Uniform spawn point that keeps `margin` clear of every border.
pub fn random_spawn<R: Rng + ?Sized>(rng: &mut R, world_size: f32, margin: f32) -> (f32, f32) {
    let (lo, hi) = (margin, world_size - margin);
    if hi <= lo {
        return (world_size / 2.0, world_size / 2.0);
    }
    (rng.gen_range(lo..hi), rng.gen_range(lo..hi))
}

// Hard stop at the walls; no bounce.
fn clamp_to_world(p: &mut SimPlayer, world_size: f32) {
    p.x = p.x.clamp(p.radius, world_size - p.radius);
    p.y = p.y.clamp(p.radius, world_size - p.radius);
}
