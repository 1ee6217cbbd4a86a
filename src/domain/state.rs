// Domain-level simulation entities and input/snapshot types.

use crate::domain::element::Element;
use crate::domain::tuning::PlayerTuning;

/// Player identity; equal to the owning connection's id.
pub type PlayerId = u64;

/// Four independent directional keys. Opposite keys may be held together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Last input received from a client. Overwritten wholesale on every update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    pub keys: KeyState,
    pub aim_x: f32,
    pub aim_y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub element: Element,
    pub name: String,
    pub level: u32,
    pub hp: f32,
    pub max_hp: f32,
    pub radius: f32,
    pub alive: bool,
    pub room: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSnapshot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub element: Element,
    pub color: &'static str,
    pub radius: f32,
    pub room: String,
}

#[derive(Debug, Clone)]
pub struct SimPlayer {
    pub id: PlayerId,
    pub room: String,
    pub name: String,
    pub element: Element,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,

    // Display-only progression; gameplay never mutates these yet.
    pub level: u32,
    pub xp: u32,

    // Combat state.
    pub hp: f32,
    pub max_hp: f32,
    pub alive: bool,
    pub respawn_ms: f32, // only meaningful while !alive

    // Movement-only state (do not serialize to clients)
    pub last_input: PlayerInput,
}

impl SimPlayer {
    pub fn new(
        id: PlayerId,
        room: String,
        name: String,
        element: Element,
        (x, y): (f32, f32),
        tuning: &PlayerTuning,
    ) -> Self {
        Self {
            id,
            room,
            name,
            element,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius: tuning.radius,
            level: 1,
            xp: 0,
            hp: tuning.max_hp,
            max_hp: tuning.max_hp,
            alive: true,
            respawn_ms: 0.0,
            last_input: PlayerInput::default(),
        }
    }

    /// Subtracts damage, flooring hp at zero. Returns true only on the
    /// living-to-dead transition.
    pub fn take_damage(&mut self, damage: f32, respawn_ms: f32) -> bool {
        self.hp = (self.hp - damage).max(0.0);
        if self.hp <= 0.0 && self.alive {
            self.alive = false;
            self.respawn_ms = respawn_ms;
            return true;
        }
        false
    }

    pub fn respawn_at(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.hp = self.max_hp;
        self.alive = true;
        self.respawn_ms = 0.0;
    }
}

#[derive(Debug, Clone)]
pub struct SimProjectile {
    pub id: u64,
    pub shooter_id: PlayerId,
    // Captured at spawn; does not follow the shooter across rooms.
    pub room: String,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub vx: f32,
    pub vy: f32,
    pub damage: f32,
    pub radius: f32,
    pub spawned_at_ms: u64,
    pub element: Element,
}

impl From<&SimPlayer> for PlayerSnapshot {
    fn from(p: &SimPlayer) -> Self {
        Self {
            id: p.id,
            x: p.x,
            y: p.y,
            vx: p.vx,
            vy: p.vy,
            element: p.element,
            name: p.name.clone(),
            level: p.level,
            hp: p.hp,
            max_hp: p.max_hp,
            radius: p.radius,
            alive: p.alive,
            room: p.room.clone(),
        }
    }
}

impl From<&SimProjectile> for ProjectileSnapshot {
    fn from(p: &SimProjectile) -> Self {
        Self {
            id: p.id,
            x: p.x,
            y: p.y,
            angle: p.angle,
            element: p.element,
            color: p.element.profile().color,
            radius: p.radius,
            room: p.room.clone(),
        }
    }
}
