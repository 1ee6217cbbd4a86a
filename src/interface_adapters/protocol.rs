// Wire protocol DTOs and conversions for the arena WebSocket.

use crate::domain::{KeyState, PlayerInput, PlayerSnapshot, ProjectileSnapshot};
use crate::use_cases::ServerEvent;
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Reply to the joining connection only.
    Welcome(WelcomeDto),
    // Full room roster after a join or leave.
    RosterUpdate(RosterDto),
    // Periodic room-scoped snapshot.
    StateSnapshot(StateSnapshotDto),
    // Cosmetic only; hits are resolved server-side.
    ShootEffect(ShootEffectDto),
    Hit(HitDto),
    Death(DeathDto),
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    // Enter a room; also used to switch rooms.
    Join(JoinPayload),
    // Latest key state and aim, replaces the previous one.
    Input(PlayerInputDto),
    Fire(FireDto),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JoinPayload {
    #[serde(default)]
    pub room: String,
    // Element wire name, e.g. "FEU".
    #[serde(default, rename = "type")]
    pub element: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyStateDto {
    #[serde(default, alias = "z")]
    pub up: bool,
    #[serde(default, alias = "s")]
    pub down: bool,
    #[serde(default, alias = "q")]
    pub left: bool,
    #[serde(default, alias = "d")]
    pub right: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AimDto {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerInputDto {
    #[serde(default)]
    pub keys: KeyStateDto,
    #[serde(default)]
    pub mouse: AimDto,
    // Accepted for compatibility; the server never trusts client time.
    #[serde(default)]
    pub timestamp: Option<f64>,
}

impl From<PlayerInputDto> for PlayerInput {
    fn from(input: PlayerInputDto) -> Self {
        Self {
            keys: KeyState {
                up: input.keys.up,
                down: input.keys.down,
                left: input.keys.left,
                right: input.keys.right,
            },
            aim_x: input.mouse.x,
            aim_y: input.mouse.y,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FireDto {
    pub angle: f32,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WelcomeDto {
    pub player_id: String,
    pub room: String,
    pub player_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterDto {
    pub room: String,
    pub players: Vec<PlayerStateDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshotDto {
    pub room: String,
    pub players: Vec<PlayerStateDto>,
    pub projectiles: Vec<ProjectileStateDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShootEffectDto {
    pub shooter_id: String,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    #[serde(rename = "type")]
    pub element: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HitDto {
    pub victim_id: String,
    pub damage: f32,
    pub hp: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeathDto {
    pub victim_id: String,
    pub killer_id: String,
}

/// Client-visible player projection.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerStateDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    #[serde(rename = "type")]
    pub element: &'static str,
    pub name: String,
    pub level: u32,
    pub hp: f32,
    pub max_hp: f32,
    pub radius: f32,
    pub alive: bool,
    pub room: String,
}

impl From<&PlayerSnapshot> for PlayerStateDto {
    fn from(p: &PlayerSnapshot) -> Self {
        Self {
            id: p.id.to_string(),
            x: p.x,
            y: p.y,
            vx: p.vx,
            vy: p.vy,
            element: p.element.wire_name(),
            name: p.name.clone(),
            level: p.level,
            hp: p.hp,
            max_hp: p.max_hp,
            radius: p.radius,
            alive: p.alive,
            room: p.room.clone(),
        }
    }
}

/// Client-visible projectile projection; no velocity or shooter.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectileStateDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    #[serde(rename = "type")]
    pub element: &'static str,
    pub color: &'static str,
    pub radius: f32,
}

impl From<&ProjectileSnapshot> for ProjectileStateDto {
    fn from(p: &ProjectileSnapshot) -> Self {
        Self {
            id: p.id.to_string(),
            x: p.x,
            y: p.y,
            angle: p.angle,
            element: p.element.wire_name(),
            color: p.color,
            radius: p.radius,
        }
    }
}

impl From<&ServerEvent> for ServerMessage {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::Welcome {
                player_id,
                room,
                player_count,
            } => ServerMessage::Welcome(WelcomeDto {
                player_id: player_id.to_string(),
                room: room.clone(),
                player_count: *player_count,
            }),
            ServerEvent::RosterUpdate { room, players } => ServerMessage::RosterUpdate(RosterDto {
                room: room.clone(),
                players: players.iter().map(PlayerStateDto::from).collect(),
            }),
            ServerEvent::StateSnapshot {
                room,
                players,
                projectiles,
            } => ServerMessage::StateSnapshot(StateSnapshotDto {
                room: room.clone(),
                players: players.iter().map(PlayerStateDto::from).collect(),
                projectiles: projectiles.iter().map(ProjectileStateDto::from).collect(),
            }),
            ServerEvent::ShootEffect {
                shooter_id,
                x,
                y,
                angle,
                element,
            } => ServerMessage::ShootEffect(ShootEffectDto {
                shooter_id: shooter_id.to_string(),
                x: *x,
                y: *y,
                angle: *angle,
                element: element.wire_name(),
            }),
            ServerEvent::Hit {
                victim_id,
                damage,
                hp,
            } => ServerMessage::Hit(HitDto {
                victim_id: victim_id.to_string(),
                damage: *damage,
                hp: *hp,
            }),
            ServerEvent::Death {
                victim_id,
                killer_id,
            } => ServerMessage::Death(DeathDto {
                victim_id: victim_id.to_string(),
                killer_id: killer_id.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Element;
    use serde_json::{Value, json};

    #[test]
    fn when_input_uses_azerty_aliases_then_keys_map_to_directions() {
        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "Input",
            "data": {
                "keys": { "z": true, "d": true },
                "mouse": { "x": 10.5, "y": -3.0 },
                "timestamp": 1234.0
            }
        }))
        .expect("valid input");

        let ClientMessage::Input(dto) = msg else {
            panic!("expected input");
        };
        let input = PlayerInput::from(dto);
        assert!(input.keys.up && input.keys.right);
        assert!(!input.keys.down && !input.keys.left);
        assert_eq!(input.aim_x, 10.5);
        assert_eq!(input.aim_y, -3.0);
    }

    #[test]
    fn when_join_omits_fields_then_defaults_are_empty() {
        let msg: ClientMessage =
            serde_json::from_value(json!({ "type": "Join", "data": { "type": "EAU" } }))
                .expect("valid join");

        let ClientMessage::Join(join) = msg else {
            panic!("expected join");
        };
        assert_eq!(join.element, "EAU");
        assert!(join.room.is_empty());
        assert!(join.name.is_empty());
    }

    #[test]
    fn when_fire_has_no_angle_then_parsing_fails() {
        let parsed =
            serde_json::from_value::<ClientMessage>(json!({ "type": "Fire", "data": {} }));
        assert!(parsed.is_err());
    }

    #[test]
    fn when_snapshot_is_serialized_then_envelope_and_wire_names_are_used() {
        let event = ServerEvent::StateSnapshot {
            room: "a".to_string(),
            players: vec![PlayerSnapshot {
                id: 5,
                x: 1.0,
                y: 2.0,
                vx: 0.0,
                vy: 0.0,
                element: Element::Earth,
                name: "Rock".to_string(),
                level: 1,
                hp: 100.0,
                max_hp: 100.0,
                radius: 20.0,
                alive: true,
                room: "a".to_string(),
            }],
            projectiles: vec![ProjectileSnapshot {
                id: 9,
                x: 3.0,
                y: 4.0,
                angle: 0.5,
                element: Element::Wind,
                color: Element::Wind.profile().color,
                radius: 10.0,
                room: "a".to_string(),
            }],
        };

        let value: Value =
            serde_json::to_value(ServerMessage::from(&event)).expect("serializable");

        assert_eq!(value["type"], "StateSnapshot");
        assert_eq!(value["data"]["players"][0]["id"], "5");
        assert_eq!(value["data"]["players"][0]["type"], "TERRE");
        assert_eq!(value["data"]["projectiles"][0]["type"], "VENT");
        assert_eq!(value["data"]["projectiles"][0]["color"], "#e0ffff");
        assert!(value["data"]["projectiles"][0].get("vx").is_none());
    }

    #[test]
    fn when_death_is_serialized_then_ids_are_strings() {
        let value: Value = serde_json::to_value(ServerMessage::from(&ServerEvent::Death {
            victim_id: 2,
            killer_id: 1,
        }))
        .expect("serializable");

        assert_eq!(
            value,
            json!({ "type": "Death", "data": { "victim_id": "2", "killer_id": "1" } })
        );
    }
}
