use crate::domain::{Element, PlayerId, PlayerInput};
use crate::interface_adapters::protocol::{ClientMessage, JoinPayload, PlayerInputDto};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::ids::next_connection_id;
use crate::use_cases::{GameEvent, JoinRequest};

use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{Instrument, debug, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    GameClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

enum LoopControl {
    Continue,
    Disconnect,
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        let conn_id = next_connection_id();
        let span = info_span!("conn", conn_id, room = tracing::field::Empty);
        handle_socket(socket, state, conn_id).instrument(span)
    })
}

struct ConnCtx {
    conn_id: PlayerId,
    game_tx: mpsc::Sender<GameEvent>,
    joined: bool,

    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,

    invalid_json: u32,

    last_input_full_log: Instant,
    last_invalid_input_log: Instant,

    close_frame: Option<CloseFrame>,
}

impl ConnCtx {
    fn new(conn_id: PlayerId, game_tx: mpsc::Sender<GameEvent>) -> Self {
        let now = Instant::now() - LOG_THROTTLE;
        Self {
            conn_id,
            game_tx,
            joined: false,
            msgs_in: 0,
            msgs_out: 0,
            bytes_in: 0,
            bytes_out: 0,
            invalid_json: 0,
            last_input_full_log: now,
            last_invalid_input_log: now,
            close_frame: None,
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, conn_id: PlayerId) {
    // Register before reading so nothing addressed to this id is lost.
    let outbound_rx = state.hub.register(conn_id).await;
    let connections = state.hub.connection_count().await;
    info!(connections, "client connected");

    let mut ctx = ConnCtx::new(conn_id, state.game_tx.clone());
    if let Err(e) = run_client_loop(socket, outbound_rx, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }

    // Leave is idempotent, so it is sent even if Join never arrived.
    if ctx
        .game_tx
        .send(GameEvent::Leave { player_id: conn_id })
        .await
        .is_err()
    {
        debug!("world task gone before leave");
    }
    state.hub.unregister(conn_id).await;

    debug!(
        msgs_in = ctx.msgs_in,
        msgs_out = ctx.msgs_out,
        bytes_in = ctx.bytes_in,
        bytes_out = ctx.bytes_out,
        invalid_json = ctx.invalid_json,
        joined = ctx.joined,
        "connection stats"
    );
    info!("client disconnected");
}

async fn run_client_loop(
    socket: WebSocket,
    mut outbound_rx: mpsc::Receiver<Utf8Bytes>,
    ctx: &mut ConnCtx,
) -> Result<(), NetError> {
    let (mut sender, mut receiver) = socket.split();
    let mut fatal: Option<NetError> = None;

    loop {
        let disconnect = tokio::select! {
            // Incoming Message from Client
            incoming = receiver.next() => {
                match handle_incoming_ws(incoming, ctx).await {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            // Outgoing serialized event from the dispatcher
            bytes = outbound_rx.recv() => match bytes {
                Some(bytes) => matches!(
                    forward_bytes(bytes, &mut sender, ctx).await,
                    LoopControl::Disconnect
                ),
                // Unregistered elsewhere or the hub is gone.
                None => true,
            },
        };

        if disconnect {
            if let Some(frame) = ctx.close_frame.take() {
                let _ = sender.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = sender.close().await {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

async fn handle_incoming_ws(
    incoming: Option<Result<Message, axum::Error>>,
    ctx: &mut ConnCtx,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                ctx.msgs_in += 1;
                ctx.bytes_in += text.len() as u64;

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Join(payload)) => {
                        let request = join_request(payload);
                        tracing::Span::current().record("room", request.room.as_str());
                        // Joins are never dropped; wait for queue space.
                        ctx.game_tx
                            .send(GameEvent::Join {
                                player_id: ctx.conn_id,
                                request,
                            })
                            .await
                            .map_err(|_| NetError::GameClosed)?;
                        ctx.joined = true;
                        Ok(LoopControl::Continue)
                    }
                    Ok(ClientMessage::Input(input)) => process_input_message(ctx, input),
                    Ok(ClientMessage::Fire(fire)) => {
                        if !fire.angle.is_finite() {
                            if should_log(&mut ctx.last_invalid_input_log) {
                                warn!("invalid fire angle (NaN/inf); dropping");
                            }
                            return Ok(LoopControl::Continue);
                        }
                        let event = GameEvent::Fire {
                            player_id: ctx.conn_id,
                            angle: fire.angle,
                        };
                        forward_event(ctx, event)
                    }
                    Err(parse_err) => {
                        ctx.invalid_json += 1;
                        if should_log(&mut ctx.last_invalid_input_log) {
                            warn!(
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message"
                            );
                        }

                        if ctx.invalid_json > MAX_INVALID_JSON {
                            ctx.close_frame = Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "too many invalid messages".into(),
                            });
                            return Ok(LoopControl::Disconnect);
                        }

                        Ok(LoopControl::Continue)
                    }
                }
            }
            Message::Binary(_) => {
                ctx.close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                Ok(LoopControl::Disconnect)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!("websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

fn join_request(payload: JoinPayload) -> JoinRequest {
    let element = Element::from_wire(&payload.element).unwrap_or_else(|| {
        warn!(requested = %payload.element, "unknown element; defaulting to fire");
        Element::Fire
    });
    JoinRequest {
        room: payload.room,
        element,
        name: payload.name,
    }
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

fn sanitize_input(input: PlayerInput) -> Option<PlayerInput> {
    if !input.aim_x.is_finite() || !input.aim_y.is_finite() {
        return None;
    }
    Some(input)
}

fn process_input_message(
    ctx: &mut ConnCtx,
    input: PlayerInputDto,
) -> Result<LoopControl, NetError> {
    let Some(input) = sanitize_input(input.into()) else {
        if should_log(&mut ctx.last_invalid_input_log) {
            warn!("invalid aim values (NaN/inf); dropping");
        }
        return Ok(LoopControl::Continue);
    };

    let event = GameEvent::Input {
        player_id: ctx.conn_id,
        input,
    };
    forward_event(ctx, event)
}

// Input and fire are best-effort: a full queue drops them rather than stalling the socket.
fn forward_event(ctx: &mut ConnCtx, event: GameEvent) -> Result<LoopControl, NetError> {
    match ctx.game_tx.try_send(event) {
        Ok(()) => Ok(LoopControl::Continue),
        Err(TrySendError::Full(_evt)) => {
            if should_log(&mut ctx.last_input_full_log) {
                warn!("game event channel full; dropping input");
            }
            Ok(LoopControl::Continue)
        }
        Err(TrySendError::Closed(_evt)) => Err(NetError::GameClosed),
    }
}

async fn forward_bytes(
    bytes: Utf8Bytes,
    sender: &mut SplitSink<WebSocket, Message>,
    ctx: &mut ConnCtx,
) -> LoopControl {
    let bytes_len = bytes.len();
    match sender.send(Message::Text(bytes)).await.map_err(NetError::Ws) {
        Ok(()) => {
            ctx.msgs_out += 1;
            ctx.bytes_out += bytes_len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            // Disconnect follows immediately.
            warn!(error = ?err, "failed to send message");
            LoopControl::Disconnect
        }
    }
}
