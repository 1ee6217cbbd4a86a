// Gameplay tuning, kept apart from runtime/server configuration.

pub mod player;
pub mod projectile;
pub mod world;

pub use player::PlayerTuning;
pub use projectile::ProjectileTuning;
pub use world::WorldTuning;

/// Every gameplay constant the arena needs, grouped by concern.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArenaTuning {
    pub world: WorldTuning,
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
}
