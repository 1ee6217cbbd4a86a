// Domain layer: arena entities, tuning and the pure simulation systems.

pub mod element;
pub mod ports;
pub mod rooms;
pub mod state;
pub mod store;
pub mod systems;
pub mod tuning;

pub use element::{Element, ElementProfile};
pub use ports::Clock;
pub use rooms::{DEFAULT_ROOM, Room, RoomRegistry};
pub use state::{
    KeyState, PlayerId, PlayerInput, PlayerSnapshot, ProjectileSnapshot, SimPlayer, SimProjectile,
};
pub use store::EntityStore;
