/// The step function: advances the world by one frame.
///
/// Processing order:
///   1. Player movement + stamina
///   2. Enemy movement (knockback / wander / chase)
///   3. Melee attack (if requested this frame)
///   4. Enemy contact damage (cooldown-gated)
///   5. Food pickup
///   6. Respawn timers
///   7. Effect expiry
///
/// Every timer comparison in a frame uses the same `now_ms`.
/// Movement is scaled by `dt_ms`, so the result does not depend on frame rate.

use crate::domain::ai;
use crate::domain::entity::FrameInput;
use crate::error::SimError;
use super::event::GameEvent;
use super::respawn;
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(
    world: &mut WorldState,
    input: FrameInput,
    now_ms: u64,
    dt_ms: f32,
) -> Result<Vec<GameEvent>, SimError> {
    if world.phase != Phase::Playing { return Ok(vec![]); }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    if !world.message.is_empty() && now_ms >= world.message_until_ms {
        world.message.clear();
    }

    resolve_player_movement(world, input, dt_ms);
    resolve_enemy_movement(world, now_ms, dt_ms);
    if input.attack {
        resolve_attack(world, now_ms, &mut events);
    }
    if resolve_enemy_collision(world, now_ms, &mut events) { return Ok(events); }
    resolve_food_pickup(world, &mut events);
    events.extend(respawn::tick(world, now_ms)?);
    world.prune_effects(now_ms);

    let (w, h) = (world.terrain.width(), world.terrain.height());
    let (px, py) = (world.player.x as usize, world.player.y as usize);
    world.camera.follow(px, py, w, h);

    Ok(events)
}

// ══════════════════════════════════════════════════════════════
// Player movement
// ══════════════════════════════════════════════════════════════

/// Stamina regenerates on every frame that is not a sprint. A frame where
/// sprint is held while moving never regenerates, even if the stamina
/// check fails and the player only walks.
fn resolve_player_movement(world: &mut WorldState, input: FrameInput, dt_ms: f32) {
    let sprinting = input.sprint && input.movement.is_some();
    if let Some(dir) = input.movement {
        world.move_player(dir, input.sprint, dt_ms);
    }
    if !sprinting {
        world.regen_stamina();
    }
}

// ══════════════════════════════════════════════════════════════
// Enemy movement
// ══════════════════════════════════════════════════════════════

fn resolve_enemy_movement(world: &mut WorldState, now_ms: u64, dt_ms: f32) {
    let player = (world.player.x, world.player.y);
    ai::advance_enemies(
        &mut world.enemies,
        &world.terrain,
        player,
        dt_ms,
        now_ms,
        &world.config.enemies,
        &mut world.rng,
    );
}

// ══════════════════════════════════════════════════════════════
// Attack
// ══════════════════════════════════════════════════════════════

/// Swing along the player's facing. The swing effect sits one cell ahead.
fn resolve_attack(world: &mut WorldState, now_ms: u64, events: &mut Vec<GameEvent>) {
    let (px, py) = (world.player.x, world.player.y);
    let (fx, fy) = world.player.facing;
    let facing = world.player.facing_angle();
    let radius = world.config.combat.attack_radius;
    let duration = world.config.combat.swing_duration_ms;

    world.start_swing(px + fx, py + fy, duration, now_ms);
    let (outcome, leveled) = world.melee_attack(px, py, facing, radius, now_ms);

    for hit in &outcome.hits {
        events.push(GameEvent::EnemyHit { id: hit.id, damage: hit.damage });
    }
    for kill in &outcome.kills {
        events.push(GameEvent::EnemyKilled {
            id: kill.id,
            archetype: kill.archetype,
            boss: kill.boss,
            xp: kill.xp,
        });
    }
    if let Some(level) = leveled {
        events.push(GameEvent::LevelUp { level });
        let title = crate::domain::progression::level_title(level);
        world.set_message(&format!("Level {level}: {title}!"), now_ms, 2_000);
    }
}

// ══════════════════════════════════════════════════════════════
// Contact / pickup
// ══════════════════════════════════════════════════════════════

/// Returns true if the player died this frame.
fn resolve_enemy_collision(world: &mut WorldState, now_ms: u64, events: &mut Vec<GameEvent>) -> bool {
    let Some(hit) = world.check_collision(now_ms) else { return false };
    events.push(GameEvent::PlayerHurt { by: hit.enemy, damage: hit.damage });
    if hit.died {
        events.push(GameEvent::PlayerDied);
    }
    hit.died
}

fn resolve_food_pickup(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    for food in world.pickup_food() {
        events.push(GameEvent::FoodEaten { id: food.id, heal: food.heal });
    }
}
