/// Entity placement: rejection sampling onto passable cells, plus the
/// enemy/food factories used at session start and by the respawn timers.
///
/// Entities are placed at the centre of the chosen cell.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::bestiary::Archetype;
use crate::domain::entity::{Enemy, EntityId, Food};
use crate::domain::terrain::TerrainGrid;
use crate::error::SimError;
use super::world::WorldState;

/// Pick uniformly random cells until one is passable. Gives up after
/// `attempts` draws so a map that is (almost) all water or mountain
/// reports an error instead of spinning forever.
pub fn spawn_position<R: Rng + ?Sized>(
    terrain: &TerrainGrid,
    rng: &mut R,
    attempts: u32,
) -> Result<(usize, usize), SimError> {
    let (w, h) = (terrain.width(), terrain.height());
    if w == 0 || h == 0 {
        return Err(SimError::EmptyWorld { width: w, height: h });
    }
    for _ in 0..attempts {
        let col = rng.gen_range(0..w);
        let row = rng.gen_range(0..h);
        if terrain.get(col, row).is_some_and(|t| t.is_passable()) {
            return Ok((col, row));
        }
    }
    Err(SimError::PlacementExhausted { attempts })
}

fn cell_centre(world: &mut WorldState) -> Result<(f32, f32), SimError> {
    let attempts = world.config.world.placement_attempts;
    let (col, row) = spawn_position(&world.terrain, &mut world.rng, attempts)?;
    Ok((col as f32 + 0.5, row as f32 + 0.5))
}

/// Place one enemy of `archetype` on a random passable cell.
pub fn spawn_enemy(world: &mut WorldState, archetype: Archetype, boss: bool) -> Result<EntityId, SimError> {
    let (x, y) = cell_centre(world)?;
    let id = world.next_id();
    world.enemies.push(Enemy::spawn(id, archetype, boss, x, y));
    log::debug!(
        "spawned {}{} #{id} at ({x:.1}, {y:.1})",
        if boss { "boss " } else { "" },
        archetype.name(),
    );
    Ok(id)
}

/// Spawn `count` apples.
pub fn create_food(world: &mut WorldState, count: usize) -> Result<Vec<EntityId>, SimError> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let (x, y) = cell_centre(world)?;
        let id = world.next_id();
        world.foods.push(Food::apple(id, x, y));
        ids.push(id);
    }
    Ok(ids)
}

/// Spawn `count` foxes, the ambient wanderers.
pub fn create_wanderers(world: &mut WorldState, count: usize) -> Result<Vec<EntityId>, SimError> {
    (0..count).map(|_| spawn_enemy(world, Archetype::Fox, false)).collect()
}

/// Spawn up to `count` level-appropriate monsters.
///
/// Once the boss tier is unlocked, a `boss_chance` roll replaces the whole
/// batch with a single boss. Otherwise each spawn independently picks an
/// archetype uniformly from those unlocked at the player's level.
pub fn create_monsters(world: &mut WorldState, count: usize) -> Result<Vec<EntityId>, SimError> {
    if count == 0 {
        return Ok(vec![]);
    }
    let level = world.player.level;

    let boss_unlocked = level >= Archetype::BOSS.stats().min_level;
    if boss_unlocked && world.rng.gen_bool(world.config.enemies.boss_chance.clamp(0.0, 1.0)) {
        return Ok(vec![spawn_enemy(world, Archetype::BOSS, true)?]);
    }

    let pool = Archetype::available_at(level);
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(&archetype) = pool.choose(&mut world.rng) else { break };
        ids.push(spawn_enemy(world, archetype, false)?);
    }
    Ok(ids)
}
