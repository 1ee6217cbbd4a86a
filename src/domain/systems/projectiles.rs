use crate::domain::state::{PlayerId, SimPlayer, SimProjectile};
use crate::domain::tuning::{ArenaTuning, ProjectileTuning};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct ProjectileConfig {
    pub world_size: f32,
    pub life_time_ms: u64,
    pub respawn_ms: f32,
}

impl From<&ArenaTuning> for ProjectileConfig {
    fn from(tuning: &ArenaTuning) -> Self {
        Self {
            world_size: tuning.world.size,
            life_time_ms: tuning.projectile.life_time_ms,
            respawn_ms: tuning.player.respawn_ms,
        }
    }
}

/// Outcome of a resolved hit, scoped to the room it happened in.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    Hit {
        room: String,
        victim_id: PlayerId,
        shooter_id: PlayerId,
        damage: f32,
        hp: f32,
    },
    Death {
        room: String,
        victim_id: PlayerId,
        killer_id: PlayerId,
    },
}

/// Builds a projectile at the shooter's authoritative position.
///
/// Velocity and damage are fixed here for the projectile's whole lifetime.
pub fn spawn_projectile(
    id: u64,
    shooter: &SimPlayer,
    angle: f32,
    now_ms: u64,
    tuning: &ProjectileTuning,
) -> SimProjectile {
    let profile = shooter.element.profile();
    SimProjectile {
        id,
        shooter_id: shooter.id,
        room: shooter.room.clone(),
        x: shooter.x,
        y: shooter.y,
        angle,
        vx: angle.cos() * profile.projectile_speed,
        vy: angle.sin() * profile.projectile_speed,
        damage: tuning.base_damage * profile.damage_modifier,
        radius: tuning.radius,
        spawned_at_ms: now_ms,
        element: shooter.element,
    }
}

/// Moves every projectile one tick and resolves world exit, expiry and hits.
///
/// A projectile damages at most one player: the first living, non-shooter
/// player in the same room (in store order) whose circle overlaps it. Every
/// projectile that leaves this function's vector is gone for good.
pub fn tick_projectiles(
    players: &mut [SimPlayer],
    projectiles: &mut Vec<SimProjectile>,
    now_ms: u64,
    cfg: ProjectileConfig,
) -> Vec<CombatEvent> {
    let mut events = Vec::new();

    projectiles.retain_mut(|p| {
        p.x += p.vx;
        p.y += p.vy;

        if p.x < 0.0 || p.x > cfg.world_size || p.y < 0.0 || p.y > cfg.world_size {
            return false;
        }
        if now_ms.saturating_sub(p.spawned_at_ms) > cfg.life_time_ms {
            return false;
        }

        // Naive O(P*E); rooms are small.
        let Some(victim) = players.iter_mut().find(|e| {
            e.alive && e.id != p.shooter_id && e.room == p.room && overlaps(e, p)
        }) else {
            return true;
        };

        let died = victim.take_damage(p.damage, cfg.respawn_ms);
        debug!(
            victim_id = victim.id,
            shooter_id = p.shooter_id,
            projectile_id = p.id,
            victim_hp = victim.hp,
            "player hit"
        );
        events.push(CombatEvent::Hit {
            room: p.room.clone(),
            victim_id: victim.id,
            shooter_id: p.shooter_id,
            damage: p.damage,
            hp: victim.hp,
        });

        if died {
            info!(victim_id = victim.id, killer_id = p.shooter_id, room = %p.room, "player died");
            events.push(CombatEvent::Death {
                room: p.room.clone(),
                victim_id: victim.id,
                killer_id: p.shooter_id,
            });
        }

        false
    });

    events
}

fn overlaps(player: &SimPlayer, projectile: &SimProjectile) -> bool {
    let dx = projectile.x - player.x;
    let dy = projectile.y - player.y;
    let reach = projectile.radius + player.radius;
    dx * dx + dy * dy < reach * reach
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::element::Element;
    use crate::domain::tuning::PlayerTuning;

    fn cfg() -> ProjectileConfig {
        ProjectileConfig::from(&ArenaTuning::default())
    }

    fn player(id: PlayerId, room: &str, element: Element, x: f32, y: f32) -> SimPlayer {
        SimPlayer::new(
            id,
            room.to_string(),
            format!("Mage_{id}"),
            element,
            (x, y),
            &PlayerTuning::default(),
        )
    }

    fn shot(shooter: &SimPlayer, angle: f32, now_ms: u64) -> SimProjectile {
        spawn_projectile(1, shooter, angle, now_ms, &ProjectileTuning::default())
    }

    #[test]
    fn when_fire_mage_hits_default_target_then_hp_drops_to_88() {
        let shooter = player(1, "a", Element::Fire, 1000.0, 1000.0);
        let mut players = vec![
            shooter.clone(),
            player(2, "a", Element::Water, 1030.0, 1000.0),
        ];
        let mut projectiles = vec![shot(&shooter, 0.0, 0)];

        let events = tick_projectiles(&mut players, &mut projectiles, 16, cfg());

        assert!(projectiles.is_empty());
        assert_eq!(events.len(), 1);
        match &events[0] {
            CombatEvent::Hit {
                victim_id, damage, hp, ..
            } => {
                assert_eq!(*victim_id, 2);
                assert!((damage - 12.0).abs() < 1e-4);
                assert!((hp - 88.0).abs() < 1e-4);
            }
            other => panic!("expected hit, got {other:?}"),
        }
        assert!(players[1].alive);
    }

    #[test]
    fn when_projectile_leaves_the_world_then_it_is_removed_without_a_hit() {
        let world = cfg().world_size;
        let shooter = player(1, "a", Element::Fire, world - 20.0, 5000.0);
        // A target just past the edge overlap range still cannot be hit.
        let mut players = vec![shooter.clone(), player(2, "a", Element::Fire, world - 20.0, 5000.0)];
        let mut projectile = shot(&shooter, 0.0, 0);
        projectile.x = world;
        let mut projectiles = vec![projectile];

        let events = tick_projectiles(&mut players, &mut projectiles, 16, cfg());

        assert!(projectiles.is_empty());
        assert!(events.is_empty());
        assert_eq!(players[1].hp, 100.0);
    }

    #[test]
    fn when_projectile_is_older_than_its_lifetime_then_it_expires() {
        let shooter = player(1, "a", Element::Wind, 5000.0, 5000.0);
        let mut players = vec![shooter.clone()];
        let mut projectiles = vec![shot(&shooter, 1.0, 0)];

        tick_projectiles(&mut players, &mut projectiles, 2000, cfg());
        assert_eq!(projectiles.len(), 1);

        tick_projectiles(&mut players, &mut projectiles, 2001, cfg());
        assert!(projectiles.is_empty());
    }

    #[test]
    fn when_projectile_overlaps_two_players_then_only_the_first_in_store_order_is_hit() {
        let shooter = player(1, "a", Element::Water, 1000.0, 1000.0);
        // Player 3 is closer to the projectile, but player 2 comes first.
        let mut players = vec![
            shooter.clone(),
            player(2, "a", Element::Water, 1010.0, 1025.0),
            player(3, "a", Element::Water, 1010.0, 1000.0),
        ];
        let mut projectiles = vec![shot(&shooter, 0.0, 0)];

        let events = tick_projectiles(&mut players, &mut projectiles, 16, cfg());

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], CombatEvent::Hit { victim_id: 2, .. }));
        assert_eq!(players[2].hp, 100.0);
    }

    #[test]
    fn when_target_is_in_another_room_or_is_the_shooter_then_no_hit() {
        let shooter = player(1, "a", Element::Earth, 1000.0, 1000.0);
        let mut players = vec![
            shooter.clone(),
            player(2, "b", Element::Earth, 1010.0, 1000.0),
        ];
        let mut projectiles = vec![shot(&shooter, 0.0, 0)];

        let events = tick_projectiles(&mut players, &mut projectiles, 16, cfg());

        assert!(events.is_empty());
        assert_eq!(projectiles.len(), 1);
    }

    #[test]
    fn when_projectiles_hit_different_players_then_resolution_order_does_not_matter() {
        let shooter = player(1, "a", Element::Earth, 1000.0, 1000.0);
        let players = vec![
            shooter.clone(),
            player(2, "a", Element::Water, 1030.0, 1000.0),
            player(3, "a", Element::Water, 1000.0, 1030.0),
        ];
        let east = spawn_projectile(1, &shooter, 0.0, 0, &ProjectileTuning::default());
        let south = spawn_projectile(
            2,
            &shooter,
            std::f32::consts::FRAC_PI_2,
            0,
            &ProjectileTuning::default(),
        );

        let run = |order: Vec<SimProjectile>| {
            let mut players = players.clone();
            let mut projectiles = order;
            let events = tick_projectiles(&mut players, &mut projectiles, 16, cfg());
            let mut victims: Vec<PlayerId> = events
                .into_iter()
                .filter_map(|e| match e {
                    CombatEvent::Hit { victim_id, .. } => Some(victim_id),
                    CombatEvent::Death { .. } => None,
                })
                .collect();
            victims.sort_unstable();
            let hp: Vec<f32> = players.iter().map(|p| p.hp).collect();
            (victims, hp, projectiles.len())
        };

        let forward = run(vec![east.clone(), south.clone()]);
        let reverse = run(vec![south, east]);

        assert_eq!(forward, reverse);
        assert_eq!(forward.0, vec![2, 3]);
        assert_eq!(forward.2, 0);
    }

    #[test]
    fn when_lethal_hit_lands_then_exactly_one_death_is_reported() {
        let shooter = player(1, "a", Element::Fire, 1000.0, 1000.0);
        let mut target = player(2, "a", Element::Fire, 1030.0, 1000.0);
        target.hp = 5.0;
        let mut players = vec![shooter.clone(), target];
        let mut projectiles = vec![shot(&shooter, 0.0, 0), shot(&shooter, 0.0, 0)];

        let events = tick_projectiles(&mut players, &mut projectiles, 16, cfg());

        let deaths = events
            .iter()
            .filter(|e| matches!(e, CombatEvent::Death { .. }))
            .count();
        assert_eq!(deaths, 1);
        assert!(!players[1].alive);
        assert_eq!(players[1].hp, 0.0);
        assert_eq!(players[1].respawn_ms, 3000.0);
        // The second projectile passes through the dead player.
        assert_eq!(projectiles.len(), 1);
    }
}
