/// Population maintenance on wall-clock timers.
///
/// Two independent timers:
///   - **Food**: every `food_interval_ms`, add one apple if under `food_max`.
///     The timer restarts whether or not anything spawned.
///   - **Monsters**: every `monster_interval_ms`, top up chasers and
///     wanderers separately, one each at most. The timer restarts only if
///     something actually spawned, so a full population re-checks every
///     tick until a slot frees up.

use crate::domain::bestiary::Behavior;
use super::event::GameEvent;
use super::spawn;
use super::world::WorldState;
use crate::error::SimError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RespawnTimers {
    pub last_food_ms: u64,
    pub last_monster_ms: u64,
}

impl RespawnTimers {
    pub fn new(now_ms: u64) -> Self {
        RespawnTimers { last_food_ms: now_ms, last_monster_ms: now_ms }
    }
}

/// Run both timers against `now_ms`. Returns spawn events.
pub fn tick(world: &mut WorldState, now_ms: u64) -> Result<Vec<GameEvent>, SimError> {
    let mut events = vec![];
    let cfg = world.config.respawn.clone();

    // ── Food ──
    if now_ms.saturating_sub(world.respawn.last_food_ms) > cfg.food_interval_ms {
        if world.foods.len() < cfg.food_max {
            for id in spawn::create_food(world, 1)? {
                events.push(GameEvent::FoodSpawned { id });
            }
        }
        world.respawn.last_food_ms = now_ms;
    }

    // ── Monsters ──
    if now_ms.saturating_sub(world.respawn.last_monster_ms) > cfg.monster_interval_ms {
        let chasers = count_behavior(world, Behavior::Chase);
        let wanderers = count_behavior(world, Behavior::Wander);
        let mut spawned = vec![];

        if chasers < cfg.chaser_max {
            spawned.extend(spawn::create_monsters(world, 1)?);
        }
        if wanderers < cfg.wanderer_max {
            spawned.extend(spawn::create_wanderers(world, 1)?);
        }

        if !spawned.is_empty() {
            world.respawn.last_monster_ms = now_ms;
        }
        for id in spawned {
            if let Some(e) = world.enemies.iter().find(|e| e.id == id) {
                events.push(GameEvent::EnemySpawned { id, archetype: e.archetype, boss: e.boss });
            }
        }
    }

    Ok(events)
}

fn count_behavior(world: &WorldState, behavior: Behavior) -> usize {
    world.enemies.iter().filter(|e| e.behavior == behavior).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bestiary::Archetype;
    use crate::domain::entity::Enemy;
    use crate::sim::world::tests::{open_rows, sandbox};

    #[test]
    fn food_spawns_once_per_interval() {
        let mut w = sandbox(&open_rows());
        assert!(tick(&mut w, 3_000).unwrap().is_empty());
        let events = tick(&mut w, 3_001).unwrap();
        assert!(matches!(events[..], [GameEvent::FoodSpawned { .. }, ..]));
        assert_eq!(w.foods.len(), 1);
        assert_eq!(w.respawn.last_food_ms, 3_001);

        tick(&mut w, 5_000).unwrap();
        assert_eq!(w.foods.len(), 1);
    }

    #[test]
    fn food_cap_still_restarts_timer() {
        let mut w = sandbox(&open_rows());
        w.config.respawn.food_max = 0;
        tick(&mut w, 3_500).unwrap();
        assert!(w.foods.is_empty());
        assert_eq!(w.respawn.last_food_ms, 3_500);
    }

    #[test]
    fn monsters_top_up_both_populations() {
        let mut w = sandbox(&open_rows());
        w.config.respawn.food_max = 0;
        let events = tick(&mut w, 5_001).unwrap();
        let spawned = events.iter().filter(|e| matches!(e, GameEvent::EnemySpawned { .. })).count();
        assert_eq!(spawned, 2);
        assert_eq!(w.enemies.len(), 2);
        assert_eq!(w.respawn.last_monster_ms, 5_001);
    }

    #[test]
    fn full_population_keeps_monster_timer() {
        let mut w = sandbox(&open_rows());
        w.config.respawn.chaser_max = 1;
        w.config.respawn.wanderer_max = 1;
        let a = w.next_id();
        w.enemies.push(Enemy::spawn(a, Archetype::Ogre, false, 1.5, 1.5));
        let b = w.next_id();
        w.enemies.push(Enemy::spawn(b, Archetype::Fox, false, 4.5, 4.5));

        tick(&mut w, 6_000).unwrap();
        assert_eq!(w.enemies.len(), 2);
        assert_eq!(w.respawn.last_monster_ms, 0);

        // A freed slot is refilled on the very next tick.
        w.enemies.pop();
        tick(&mut w, 6_016).unwrap();
        assert_eq!(w.enemies.len(), 2);
        assert_eq!(w.enemies[1].archetype, Archetype::Fox);
        assert_eq!(w.respawn.last_monster_ms, 6_016);
    }

    #[test]
    fn rate_is_time_based_not_tick_based() {
        let mut w = sandbox(&open_rows());
        w.config.respawn.food_max = 100;
        // Many small ticks and a few big ones cover the same span.
        for t in (0..=9_100).step_by(7) {
            tick(&mut w, t).unwrap();
        }
        let fine = w.foods.len();

        let mut w = sandbox(&open_rows());
        w.config.respawn.food_max = 100;
        for t in [3_100, 6_200, 9_300] {
            tick(&mut w, t).unwrap();
        }
        assert_eq!(fine, 3);
        assert_eq!(w.foods.len(), fine);
    }
}
