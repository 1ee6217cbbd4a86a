use crate::domain::Clock;
use crate::interface_adapters::net::hub::ConnectionHub;
use crate::use_cases::GameEvent;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct AppState {
    // Gateway events flowing from the network into the world task.
    pub game_tx: mpsc::Sender<GameEvent>,
    // Per-connection outbound queues fed by the dispatcher.
    pub hub: Arc<ConnectionHub>,
    // Process start, reported by the status route.
    pub started_at: Instant,
}

// Wall clock adapter used by the arena.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}
