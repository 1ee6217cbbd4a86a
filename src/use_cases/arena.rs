// The arena engine: gateway mutations, the fixed-step tick and room snapshots.
//
// Every method runs to completion without awaiting, and the world task is the
// only caller, so no tick can observe a half-applied gateway event.

use super::types::{GameEvent, JoinRequest, Outbound, ServerEvent, StatusReport};
use crate::domain::systems::movement::{self, MovementConfig};
use crate::domain::systems::projectiles::{self, CombatEvent, ProjectileConfig};
use crate::domain::tuning::ArenaTuning;
use crate::domain::{
    Clock, DEFAULT_ROOM, EntityStore, PlayerId, PlayerInput, ProjectileSnapshot, RoomRegistry,
    SimPlayer,
};
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info};

const MAX_DISPLAY_NAME_LEN: usize = 24;
const NAME_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub struct Arena<C> {
    clock: C,
    rng: StdRng,
    tuning: ArenaTuning,
    movement: MovementConfig,
    projectile_cfg: ProjectileConfig,
    store: EntityStore,
    rooms: RoomRegistry,
    last_tick_ms: u64,
}

impl<C: Clock> Arena<C> {
    pub fn new(clock: C, rng: StdRng, tuning: ArenaTuning) -> Self {
        let now = clock.now_millis();
        let mut rooms = RoomRegistry::new();
        rooms.ensure_room(DEFAULT_ROOM, now);

        Self {
            clock,
            rng,
            movement: MovementConfig::new(&tuning.world, &tuning.player),
            projectile_cfg: ProjectileConfig::from(&tuning),
            tuning,
            store: EntityStore::new(),
            rooms,
            last_tick_ms: now,
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Applies one inbound gateway event.
    pub fn handle(&mut self, event: GameEvent) -> Vec<Outbound> {
        match event {
            GameEvent::Join { player_id, request } => self.join(player_id, request),
            GameEvent::Input { player_id, input } => {
                self.input(player_id, input);
                Vec::new()
            }
            GameEvent::Fire { player_id, angle } => self.fire(player_id, angle),
            GameEvent::Leave { player_id } => self.leave(player_id),
            GameEvent::Status { reply } => {
                // The requester may have given up; nothing to do then.
                let _ = reply.send(self.status());
                Vec::new()
            }
        }
    }

    /// Creates a player in the requested room (creating the room if needed).
    ///
    /// A connection that already owns a player leaves its current room first.
    pub fn join(&mut self, player_id: PlayerId, request: JoinRequest) -> Vec<Outbound> {
        let mut out = Vec::new();
        if self.store.player(player_id).is_some() {
            debug!(player_id, "player switching rooms");
            out.extend(self.leave(player_id));
        }

        let now = self.clock.now_millis();
        let room = resolve_room_name(&request.room);
        let name = resolve_display_name(&request.name, &mut self.rng);
        self.rooms.ensure_room(&room, now);

        let spawn = movement::random_spawn(
            &mut self.rng,
            self.tuning.world.size,
            self.tuning.player.spawn_margin,
        );
        info!(
            player_id,
            room = %room,
            name = %name,
            element = request.element.wire_name(),
            "player joined"
        );
        let player = SimPlayer::new(
            player_id,
            room.clone(),
            name,
            request.element,
            spawn,
            &self.tuning.player,
        );
        self.store.insert_player(player);
        self.rooms.add_player(&room, player_id);

        out.push(Outbound::to_player(
            player_id,
            ServerEvent::Welcome {
                player_id,
                room: room.clone(),
                player_count: self.rooms.player_count(&room),
            },
        ));
        out.push(self.roster_update(&room));
        out
    }

    /// Replaces the stored input snapshot. Unknown players are ignored.
    pub fn input(&mut self, player_id: PlayerId, input: PlayerInput) {
        if let Some(player) = self.store.player_mut(player_id) {
            player.last_input = input;
        }
    }

    /// Spawns a projectile from a living player. Dead or unknown players are ignored.
    pub fn fire(&mut self, player_id: PlayerId, angle: f32) -> Vec<Outbound> {
        if !self.store.player(player_id).is_some_and(|p| p.alive) {
            return Vec::new();
        }

        let now = self.clock.now_millis();
        let id = self.store.allocate_projectile_id();
        let Some(shooter) = self.store.player(player_id) else {
            return Vec::new();
        };
        let projectile =
            projectiles::spawn_projectile(id, shooter, angle, now, &self.tuning.projectile);
        let effect = ServerEvent::ShootEffect {
            shooter_id: player_id,
            x: shooter.x,
            y: shooter.y,
            angle,
            element: shooter.element,
        };
        let room = shooter.room.clone();

        self.store.push_projectile(projectile);
        self.rooms.mark_dirty(&room);

        vec![Outbound {
            recipients: self.rooms.members(&room),
            event: effect,
        }]
    }

    /// Removes the player from its room and the store. Safe to repeat.
    pub fn leave(&mut self, player_id: PlayerId) -> Vec<Outbound> {
        let Some(player) = self.store.remove_player(player_id) else {
            return Vec::new();
        };
        self.rooms.remove_player(&player.room, player_id);
        info!(
            player_id,
            room = %player.room,
            remaining = self.rooms.player_count(&player.room),
            "player left"
        );

        let roster = self.roster_update(&player.room);
        if roster.recipients.is_empty() {
            return Vec::new();
        }
        vec![roster]
    }

    /// Advances the simulation by one step, sized by wall-clock time since the
    /// previous step and capped to bound stalls.
    pub fn tick(&mut self) -> Vec<Outbound> {
        let now = self.clock.now_millis();
        let dt_ms = now
            .saturating_sub(self.last_tick_ms)
            .min(self.tuning.world.max_delta_ms) as f32;
        self.last_tick_ms = now;

        let Self {
            store,
            rooms,
            rng,
            movement: movement_cfg,
            projectile_cfg,
            ..
        } = &mut *self;
        let (players, live_projectiles) = store.split_mut();

        for p in players.iter_mut() {
            let changed = if p.alive {
                movement::tick_player(p, dt_ms, *movement_cfg)
            } else {
                movement::tick_respawn(p, dt_ms, *movement_cfg, rng)
            };
            if changed {
                rooms.mark_dirty(&p.room);
            }
        }

        // Every live projectile moves (or disappears) this tick.
        for p in live_projectiles.iter() {
            rooms.mark_dirty(&p.room);
        }

        let events =
            projectiles::tick_projectiles(players, live_projectiles, now, *projectile_cfg);

        events
            .into_iter()
            .map(|event| self.combat_outbound(event))
            .collect()
    }

    /// Builds one snapshot per room that changed since the previous call.
    pub fn broadcast(&mut self) -> Vec<Outbound> {
        self.rooms
            .take_dirty_rooms()
            .into_iter()
            .map(|room| {
                let players = self.rooms.snapshot(&room, &self.store);
                let projectiles = self
                    .store
                    .projectiles()
                    .iter()
                    .filter(|p| p.room == room)
                    .map(ProjectileSnapshot::from)
                    .collect();
                Outbound {
                    recipients: self.rooms.members(&room),
                    event: ServerEvent::StateSnapshot {
                        room,
                        players,
                        projectiles,
                    },
                }
            })
            .collect()
    }

    pub fn status(&self) -> StatusReport {
        let players = self.store.players();
        StatusReport {
            alive_players: players.iter().filter(|p| p.alive).count(),
            total_players: players.len(),
            rooms: self.rooms.names(),
        }
    }

    fn roster_update(&self, room: &str) -> Outbound {
        Outbound {
            recipients: self.rooms.members(room),
            event: ServerEvent::RosterUpdate {
                room: room.to_string(),
                players: self.rooms.snapshot(room, &self.store),
            },
        }
    }

    fn combat_outbound(&mut self, event: CombatEvent) -> Outbound {
        match event {
            CombatEvent::Hit {
                room,
                victim_id,
                damage,
                hp,
                ..
            } => {
                self.rooms.mark_dirty(&room);
                Outbound {
                    recipients: self.rooms.members(&room),
                    event: ServerEvent::Hit {
                        victim_id,
                        damage,
                        hp,
                    },
                }
            }
            CombatEvent::Death {
                room,
                victim_id,
                killer_id,
            } => Outbound {
                recipients: self.rooms.members(&room),
                event: ServerEvent::Death {
                    victim_id,
                    killer_id,
                },
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self, player_id: PlayerId) -> Option<&mut SimPlayer> {
        self.store.player_mut(player_id)
    }
}

// Room names are keys; only an empty name is rewritten.
fn resolve_room_name(raw: &str) -> String {
    if raw.is_empty() {
        return DEFAULT_ROOM.to_string();
    }
    raw.to_string()
}

fn resolve_display_name<R: Rng + ?Sized>(raw: &str, rng: &mut R) -> String {
    let trimmed: String = raw.trim().chars().take(MAX_DISPLAY_NAME_LEN).collect();
    if !trimmed.is_empty() {
        return trimmed;
    }
    let suffix: String = (0..4)
        .map(|_| NAME_SUFFIX_ALPHABET[rng.gen_range(0..NAME_SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("Mage_{suffix}")
}
