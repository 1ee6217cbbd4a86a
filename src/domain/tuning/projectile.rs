/// Gameplay tuning for projectiles.

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Damage before the shooter's element modifier is applied.
    pub base_damage: f32,

    /// Lifetime in milliseconds before the projectile is despawned.
    pub life_time_ms: u64,

    /// World-space collision radius.
    pub radius: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            base_damage: 10.0,
            life_time_ms: 2000,
            radius: 10.0,
        }
    }
}
