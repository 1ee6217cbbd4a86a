// Use-case level inputs/outputs for the arena world task.

use crate::domain::{Element, PlayerId, PlayerInput, PlayerSnapshot, ProjectileSnapshot};
use tokio::sync::oneshot;

/// Inbound gateway events. `player_id` is always the sending connection's id.
#[derive(Debug)]
pub enum GameEvent {
    Join {
        player_id: PlayerId,
        request: JoinRequest,
    },
    Input {
        player_id: PlayerId,
        input: PlayerInput,
    },
    Fire {
        player_id: PlayerId,
        angle: f32,
    },
    Leave {
        player_id: PlayerId,
    },
    Status {
        reply: oneshot::Sender<StatusReport>,
    },
}

#[derive(Debug, Clone)]
pub struct JoinRequest {
    pub room: String,
    pub element: Element,
    pub name: String,
}

/// Events the arena wants delivered to clients.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    Welcome {
        player_id: PlayerId,
        room: String,
        player_count: usize,
    },
    RosterUpdate {
        room: String,
        players: Vec<PlayerSnapshot>,
    },
    StateSnapshot {
        room: String,
        players: Vec<PlayerSnapshot>,
        projectiles: Vec<ProjectileSnapshot>,
    },
    ShootEffect {
        shooter_id: PlayerId,
        x: f32,
        y: f32,
        angle: f32,
        element: Element,
    },
    Hit {
        victim_id: PlayerId,
        damage: f32,
        hp: f32,
    },
    Death {
        victim_id: PlayerId,
        killer_id: PlayerId,
    },
}

/// A server event plus the connections it must reach.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub recipients: Vec<PlayerId>,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn to_player(player_id: PlayerId, event: ServerEvent) -> Self {
        Self {
            recipients: vec![player_id],
            event,
        }
    }
}

/// Aggregate counts for the read-only status surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub alive_players: usize,
    pub total_players: usize,
    pub rooms: Vec<String>,
}
