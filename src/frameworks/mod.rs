// Frameworks layer: runtime config and server bootstrap.

pub mod config;
pub mod server;
