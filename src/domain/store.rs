// Canonical player and projectile records, independent of room grouping.

use crate::domain::state::{PlayerId, SimPlayer, SimProjectile};

/// Owns every entity in the arena.
///
/// Players are kept in insertion order; collision resolution relies on that
/// order for its first-match tie-break.
#[derive(Debug)]
pub struct EntityStore {
    players: Vec<SimPlayer>,
    projectiles: Vec<SimProjectile>,
    next_projectile_id: u64,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            projectiles: Vec::new(),
            next_projectile_id: 1,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&SimPlayer> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut SimPlayer> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Inserts a player, replacing any existing record with the same id.
    pub fn insert_player(&mut self, player: SimPlayer) {
        match self.players.iter_mut().find(|p| p.id == player.id) {
            Some(existing) => *existing = player,
            None => self.players.push(player),
        }
    }

    /// Removes and returns the player; `None` when already gone.
    pub fn remove_player(&mut self, id: PlayerId) -> Option<SimPlayer> {
        let index = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(index))
    }

    pub fn players(&self) -> &[SimPlayer] {
        &self.players
    }

    pub fn projectiles(&self) -> &[SimProjectile] {
        &self.projectiles
    }

    pub fn push_projectile(&mut self, projectile: SimProjectile) {
        self.projectiles.push(projectile);
    }

    pub fn allocate_projectile_id(&mut self) -> u64 {
        let id = self.next_projectile_id;
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        id
    }

    /// Split borrow used by the per-tick systems.
    pub fn split_mut(&mut self) -> (&mut [SimPlayer], &mut Vec<SimProjectile>) {
        (&mut self.players, &mut self.projectiles)
    }

    pub fn players_in_room(&self, room: &str) -> usize {
        self.players.iter().filter(|p| p.room == room).count()
    }
}
