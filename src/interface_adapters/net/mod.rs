// Network adapter modules: client sockets, outbound fan-out and the status route.

pub mod client;
pub mod dispatch;
pub mod hub;
pub mod status;

pub use client::ws_handler;
pub use dispatch::outbound_dispatcher;
pub use hub::ConnectionHub;
pub use status::status_handler;
