use crate::domain::PlayerId;
use axum::extract::ws::Utf8Bytes;
use std::collections::HashMap;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{RwLock, mpsc};

/// Outcome of handing serialized bytes to one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Queued,
    // Queue full; the message is dropped for this connection only.
    Dropped,
    // Connection already gone.
    Missing,
}

/// Maps connection ids to their bounded outbound queues.
pub struct ConnectionHub {
    capacity: usize,
    conns: RwLock<HashMap<PlayerId, mpsc::Sender<Utf8Bytes>>>,
}

impl ConnectionHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            conns: RwLock::new(HashMap::new()),
        }
    }

    /// Creates the outbound queue for a new connection.
    pub async fn register(&self, conn_id: PlayerId) -> mpsc::Receiver<Utf8Bytes> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.conns.write().await.insert(conn_id, tx);
        rx
    }

    pub async fn unregister(&self, conn_id: PlayerId) {
        self.conns.write().await.remove(&conn_id);
    }

    pub async fn connection_count(&self) -> usize {
        self.conns.read().await.len()
    }

    /// Queues the same bytes for every recipient without waiting on slow sockets.
    pub async fn deliver(&self, recipients: &[PlayerId], bytes: &Utf8Bytes) -> Vec<Delivery> {
        let conns = self.conns.read().await;
        recipients
            .iter()
            .map(|id| match conns.get(id) {
                None => Delivery::Missing,
                Some(tx) => match tx.try_send(bytes.clone()) {
                    Ok(()) => Delivery::Queued,
                    Err(TrySendError::Full(_)) => Delivery::Dropped,
                    Err(TrySendError::Closed(_)) => Delivery::Missing,
                },
            })
            .collect()
    }
}
