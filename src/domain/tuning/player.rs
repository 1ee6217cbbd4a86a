/// Gameplay tuning for player-controlled mages.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Acceleration per millisecond of held input, before the element modifier.
    pub base_speed: f32,

    /// Velocity multiplier applied once per tick (must be below 1).
    pub friction: f32,

    /// Speed cap in world units per tick.
    pub max_velocity: f32,

    /// World-space collision radius.
    pub radius: f32,

    pub max_hp: f32,

    /// Time a dead player waits before respawning, in milliseconds.
    pub respawn_ms: f32,

    /// Distance from the world border that fresh spawns keep clear of.
    pub spawn_margin: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            base_speed: 0.3,
            friction: 0.90,
            max_velocity: 4.0,
            radius: 20.0,
            max_hp: 100.0,
            respawn_ms: 3000.0,
            spawn_margin: 1000.0,
        }
    }
}
