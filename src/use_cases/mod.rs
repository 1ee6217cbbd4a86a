// Use cases layer: the arena engine and the world task that owns it.

pub mod arena;
pub mod game;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use arena::Arena;
pub use game::{WorldSettings, world_task};
pub use types::{GameEvent, JoinRequest, Outbound, ServerEvent, StatusReport};
