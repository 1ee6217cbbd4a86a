use crate::interface_adapters::http::ErrorResponse;
use crate::interface_adapters::state::AppState;
use crate::use_cases::GameEvent;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::{sync::Arc, time::Duration};
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::warn;

const STATUS_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, serde::Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    // Living players across all rooms.
    pub players: usize,
    pub total_players: usize,
    pub rooms: Vec<String>,
    pub uptime_seconds: u64,
}

pub async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (reply, reply_rx) = oneshot::channel();
    if state.game_tx.send(GameEvent::Status { reply }).await.is_err() {
        return unavailable("world task unavailable");
    }

    match timeout(STATUS_TIMEOUT, reply_rx).await {
        Ok(Ok(report)) => (
            StatusCode::OK,
            Json(StatusResponse {
                status: "online",
                players: report.alive_players,
                total_players: report.total_players,
                rooms: report.rooms,
                uptime_seconds: state.started_at.elapsed().as_secs(),
            }),
        )
            .into_response(),
        Ok(Err(_)) => unavailable("world task unavailable"),
        Err(_) => {
            warn!("status request timed out");
            unavailable("status timed out")
        }
    }
}

fn unavailable(reason: &str) -> axum::response::Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse::new(reason)),
    )
        .into_response()
}
