use super::arena::Arena;
use super::types::{GameEvent, Outbound};
use crate::domain::Clock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Notify, mpsc};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

const LOG_THROTTLE: Duration = Duration::from_secs(2);

/// Timer settings for the world task.
#[derive(Debug, Clone, Copy)]
pub struct WorldSettings {
    /// Fixed interval between simulation steps.
    pub tick_interval: Duration,
    /// Fixed interval between snapshot broadcasts; independent of the tick.
    pub broadcast_interval: Duration,
}

/// Single owner of the arena.
///
/// Gateway events, simulation ticks and snapshot broadcasts are all handled
/// here one at a time, so state is never mutated concurrently. Produced events
/// are handed to `outbound_tx` without waiting; a full queue drops them.
pub async fn world_task<C: Clock>(
    mut arena: Arena<C>,
    mut game_rx: mpsc::Receiver<GameEvent>,
    outbound_tx: mpsc::Sender<Outbound>,
    settings: WorldSettings,
    shutdown: Arc<Notify>,
) {
    let mut tick: u64 = 0;

    // Drive the fixed-step loop and the slower broadcast loop on separate timers.
    let mut tick_timer = tokio::time::interval(settings.tick_interval);
    tick_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut broadcast_timer = tokio::time::interval(settings.broadcast_interval);
    broadcast_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last_full_log = Instant::now() - LOG_THROTTLE;

    info!(
        tick_ms = settings.tick_interval.as_millis() as u64,
        broadcast_ms = settings.broadcast_interval.as_millis() as u64,
        "world task started"
    );

    loop {
        let outbound = tokio::select! {
            biased;
            _ = shutdown.notified() => {
                info!(ticks = tick, "world task stopping");
                break;
            }
            _ = tick_timer.tick() => {
                tick += 1;
                arena.tick()
            }
            _ = broadcast_timer.tick() => arena.broadcast(),
            event = game_rx.recv() => match event {
                Some(event) => arena.handle(event),
                None => {
                    info!(ticks = tick, "game event channel closed; world task exiting");
                    break;
                }
            },
        };

        if !emit(&outbound_tx, outbound, &mut last_full_log) {
            warn!("outbound channel closed; world task exiting");
            break;
        }
    }
}

// Returns false once the dispatcher is gone.
fn emit(
    outbound_tx: &mpsc::Sender<Outbound>,
    batch: Vec<Outbound>,
    last_full_log: &mut Instant,
) -> bool {
    for outbound in batch {
        if outbound.recipients.is_empty() {
            continue;
        }
        match outbound_tx.try_send(outbound) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                if last_full_log.elapsed() >= LOG_THROTTLE {
                    *last_full_log = Instant::now();
                    warn!(
                        recipients = dropped.recipients.len(),
                        "outbound channel full; dropping event"
                    );
                }
            }
            Err(TrySendError::Closed(_)) => return false,
        }
    }
    true
}
