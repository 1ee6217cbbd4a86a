// Pure per-tick systems operating on the entity store.

pub mod movement;
pub mod projectiles;
