use crate::interface_adapters::net::hub::{ConnectionHub, Delivery};
use crate::interface_adapters::protocol::ServerMessage;
use crate::use_cases::Outbound;
use axum::extract::ws::Utf8Bytes;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

const LOG_THROTTLE: Duration = Duration::from_secs(2);

/// Serializes each outbound event once and fans the shared bytes out to its
/// recipients. Exits when the world task drops its sender.
pub async fn outbound_dispatcher(
    mut outbound_rx: mpsc::Receiver<Outbound>,
    hub: Arc<ConnectionHub>,
) {
    let mut last_drop_log = Instant::now() - LOG_THROTTLE;
    let mut dropped: u64 = 0;

    while let Some(outbound) = outbound_rx.recv().await {
        let msg = ServerMessage::from(&outbound.event);
        let txt = match serde_json::to_string(&msg) {
            Ok(txt) => txt,
            Err(e) => {
                error!(error = ?e, "failed to serialize outbound event");
                continue;
            }
        };
        let bytes = Utf8Bytes::from(txt);

        let outcome = hub.deliver(&outbound.recipients, &bytes).await;
        let newly_dropped = outcome.iter().filter(|d| **d == Delivery::Dropped).count() as u64;
        if newly_dropped > 0 {
            dropped += newly_dropped;
            if last_drop_log.elapsed() >= LOG_THROTTLE {
                last_drop_log = Instant::now();
                warn!(total_dropped = dropped, "client queue full; dropping message");
            }
        }
    }

    info!(total_dropped = dropped, "outbound channel closed; dispatcher exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::ServerEvent;
    use serde_json::Value;

    #[tokio::test]
    async fn when_event_targets_two_connections_then_both_receive_the_same_json() {
        let hub = Arc::new(ConnectionHub::new(8));
        let mut a = hub.register(1).await;
        let mut b = hub.register(2).await;
        let mut bystander = hub.register(3).await;
        let (tx, rx) = mpsc::channel(8);
        let task = tokio::spawn(outbound_dispatcher(rx, hub.clone()));

        tx.send(Outbound {
            recipients: vec![1, 2],
            event: ServerEvent::Hit {
                victim_id: 2,
                damage: 12.0,
                hp: 88.0,
            },
        })
        .await
        .expect("dispatcher alive");
        drop(tx);
        task.await.expect("dispatcher exits cleanly");

        let from_a = a.recv().await.expect("a receives");
        let from_b = b.recv().await.expect("b receives");
        assert_eq!(from_a, from_b);
        let value: Value = serde_json::from_str(&from_a).expect("valid json");
        assert_eq!(value["type"], "Hit");
        assert_eq!(value["data"]["victim_id"], "2");
        assert!(bystander.try_recv().is_err());
    }
}
