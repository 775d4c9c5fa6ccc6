/// Enemy steering: knockback, wander, chase.
///
/// Per enemy, in priority order:
///   1. **Knockback**: while a knockback is active, slide along its vector
///      scaled by the remaining fraction. No other movement this tick.
///   2. **Wander**: keep a heading, occasionally re-roll it, bounce (turn
///      by π) off walls and map edges.
///   3. **Chase**: step toward the player, but never end a step closer
///      than the standoff distance.
///
/// All displacement is multiplied by `dt / 16.67` so speeds are expressed
/// per 60fps reference frame and behave the same at any frame rate.
/// Every destination is checked against terrain before it is committed;
/// a rejected move leaves the enemy where it was.

use std::f32::consts::{PI, TAU};

use rand::Rng;

use crate::config::EnemyConfig;
use super::bestiary::Behavior;
use super::entity::Enemy;
use super::terrain::TerrainGrid;

/// Reference frame length in milliseconds (60fps).
pub const REFERENCE_FRAME_MS: f32 = 16.67;

pub fn time_scale(dt_ms: f32) -> f32 {
    dt_ms.max(0.0) / REFERENCE_FRAME_MS
}

/// Advance every enemy by one tick.
pub fn advance_enemies<R: Rng + ?Sized>(
    enemies: &mut [Enemy],
    terrain: &TerrainGrid,
    player: (f32, f32),
    dt_ms: f32,
    now_ms: u64,
    cfg: &EnemyConfig,
    rng: &mut R,
) {
    let scale = time_scale(dt_ms);
    for enemy in enemies.iter_mut() {
        advance_enemy(enemy, terrain, player, scale, now_ms, cfg, rng);
    }
}

pub fn advance_enemy<R: Rng + ?Sized>(
    enemy: &mut Enemy,
    terrain: &TerrainGrid,
    player: (f32, f32),
    scale: f32,
    now_ms: u64,
    cfg: &EnemyConfig,
    rng: &mut R,
) {
    if let Some(kb) = enemy.knockback {
        if kb.is_active(now_ms) {
            let f = kb.remaining_fraction(now_ms) * scale;
            try_move(enemy, terrain, enemy.x + kb.dx * f, enemy.y + kb.dy * f);
            return;
        }
        enemy.knockback = None;
    }

    match enemy.behavior {
        Behavior::Wander => wander(enemy, terrain, scale, cfg, rng),
        Behavior::Chase => chase(enemy, terrain, player, scale, cfg),
    }
}

// ── Wander ──

fn wander<R: Rng + ?Sized>(
    enemy: &mut Enemy,
    terrain: &TerrainGrid,
    scale: f32,
    cfg: &EnemyConfig,
    rng: &mut R,
) {
    let mut heading = match enemy.heading {
        Some(h) => h,
        None => rng.gen_range(0.0..TAU),
    };
    if rng.gen_bool(cfg.wander_turn_chance) {
        heading = rng.gen_range(0.0..TAU);
    }

    let step = cfg.wander_speed * scale;
    let nx = enemy.x + heading.cos() * step;
    let ny = enemy.y + heading.sin() * step;

    if !try_move(enemy, terrain, nx, ny) {
        heading = (heading + PI).rem_euclid(TAU);
    }
    enemy.heading = Some(heading);
}

// ── Chase ──

fn chase(
    enemy: &mut Enemy,
    terrain: &TerrainGrid,
    (px, py): (f32, f32),
    scale: f32,
    cfg: &EnemyConfig,
) {
    let speed = if enemy.boss { cfg.boss_speed } else { cfg.chase_speed };

    let dx = px - enemy.x;
    let dy = py - enemy.y;
    let distance = dx.hypot(dy);
    if distance <= cfg.min_distance {
        return;
    }

    let step = speed * scale;
    let nx = enemy.x + dx / distance * step;
    let ny = enemy.y + dy / distance * step;

    // Refuse a step that would end inside the standoff ring.
    if (px - nx).hypot(py - ny) < cfg.min_distance {
        return;
    }
    try_move(enemy, terrain, nx, ny);
}

// ── Shared helpers ──

/// Commit the move if the destination cell is in bounds and passable.
fn try_move(enemy: &mut Enemy, terrain: &TerrainGrid, nx: f32, ny: f32) -> bool {
    if terrain.is_passable_at(nx, ny) {
        enemy.x = nx;
        enemy.y = ny;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bestiary::Archetype;
    use crate::domain::entity::Knockback;
    use crate::domain::terrain::tests::grid_from;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const FRAME: f32 = REFERENCE_FRAME_MS;

    fn open_field(n: usize) -> TerrainGrid {
        let row = ".".repeat(n);
        let rows: Vec<&str> = (0..n).map(|_| row.as_str()).collect();
        grid_from(&rows)
    }

    fn no_turns() -> EnemyConfig {
        EnemyConfig { wander_turn_chance: 0.0, ..EnemyConfig::default() }
    }

    #[test]
    fn chaser_closes_in_and_never_breaches_standoff() {
        let terrain = open_field(20);
        let cfg = EnemyConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let player = (10.5, 10.5);
        let mut enemies = vec![
            Enemy::spawn(1, Archetype::Ogre, false, 2.5, 3.5),
            Enemy::spawn(2, Archetype::Skull, true, 17.2, 10.5),
            Enemy::spawn(3, Archetype::Wolf, false, 10.5, 11.2),
        ];
        let start = enemies[0].distance_to(player.0, player.1);

        for tick in 0..2_000u64 {
            advance_enemies(&mut enemies, &terrain, player, FRAME, tick * 17, &cfg, &mut rng);
            for e in &enemies {
                assert!(e.distance_to(player.0, player.1) >= cfg.min_distance);
            }
        }
        assert!(enemies[0].distance_to(player.0, player.1) < start);
        assert!(enemies[0].distance_to(player.0, player.1) < cfg.min_distance + cfg.chase_speed + 1e-3);
    }

    #[test]
    fn boss_moves_at_boss_speed() {
        let terrain = open_field(20);
        let cfg = EnemyConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut boss = Enemy::spawn(1, Archetype::Skull, true, 2.5, 10.5);
        advance_enemy(&mut boss, &terrain, (15.5, 10.5), 1.0, 0, &cfg, &mut rng);
        assert!((boss.x - (2.5 + cfg.boss_speed)).abs() < 1e-5);

        let mut grunt = Enemy::spawn(2, Archetype::Skull, false, 2.5, 10.5);
        advance_enemy(&mut grunt, &terrain, (15.5, 10.5), 1.0, 0, &cfg, &mut rng);
        assert!((grunt.x - (2.5 + cfg.chase_speed)).abs() < 1e-5);
    }

    #[test]
    fn displacement_scales_with_delta_time() {
        let terrain = open_field(20);
        let cfg = EnemyConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut a = Enemy::spawn(1, Archetype::Ogre, false, 2.5, 10.5);
        let mut b = a.clone();
        advance_enemies(std::slice::from_mut(&mut a), &terrain, (15.5, 10.5), FRAME, 0, &cfg, &mut rng);
        advance_enemies(std::slice::from_mut(&mut b), &terrain, (15.5, 10.5), FRAME * 2.0, 0, &cfg, &mut rng);
        assert!(((b.x - 2.5) - 2.0 * (a.x - 2.5)).abs() < 1e-5);
    }

    #[test]
    fn chaser_does_not_enter_water() {
        let terrain = grid_from(&[".~.."]);
        let cfg = EnemyConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut e = Enemy::spawn(1, Archetype::Ogre, false, 0.99, 0.5);
        for _ in 0..100 {
            advance_enemy(&mut e, &terrain, (3.5, 0.5), 1.0, 0, &cfg, &mut rng);
        }
        assert!(e.x < 1.0);
    }

    #[test]
    fn wanderer_picks_heading_and_bounces() {
        let terrain = grid_from(&["^^^", "^.^", "^^^"]);
        let cfg = no_turns();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut fox = Enemy::spawn(1, Archetype::Fox, false, 1.5, 1.5);
        assert!(fox.heading.is_none());

        for _ in 0..500 {
            advance_enemy(&mut fox, &terrain, (0.0, 0.0), 1.0, 0, &cfg, &mut rng);
            assert!(terrain.is_passable_at(fox.x, fox.y));
            let h = fox.heading.unwrap();
            assert!((0.0..TAU).contains(&h));
        }
    }

    #[test]
    fn certain_turn_chance_rerolls_heading_every_tick() {
        let terrain = open_field(20);
        let cfg = EnemyConfig { wander_turn_chance: 1.0, ..EnemyConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut fox = Enemy::spawn(1, Archetype::Fox, false, 10.5, 10.5);
        fox.heading = Some(0.0);

        let mut prev = 0.0;
        for _ in 0..50 {
            advance_enemy(&mut fox, &terrain, (0.0, 0.0), 1.0, 0, &cfg, &mut rng);
            let h = fox.heading.unwrap();
            assert_ne!(h, prev);
            prev = h;
        }
    }

    #[test]
    fn zero_turn_chance_keeps_heading_in_open_field() {
        let terrain = open_field(20);
        let cfg = no_turns();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut fox = Enemy::spawn(1, Archetype::Fox, false, 10.5, 10.5);
        fox.heading = Some(1.0);
        for _ in 0..50 {
            advance_enemy(&mut fox, &terrain, (0.0, 0.0), 1.0, 0, &cfg, &mut rng);
            assert_eq!(fox.heading, Some(1.0));
        }
    }

    #[test]
    fn blocked_wanderer_reverses_heading() {
        let terrain = grid_from(&[".~"]);
        let cfg = no_turns();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut fox = Enemy::spawn(1, Archetype::Fox, false, 0.99, 0.5);
        fox.heading = Some(0.0);
        advance_enemy(&mut fox, &terrain, (0.0, 0.0), 1.0, 0, &cfg, &mut rng);
        assert_eq!(fox.x, 0.99);
        assert!((fox.heading.unwrap() - PI).abs() < 1e-6);
        advance_enemy(&mut fox, &terrain, (0.0, 0.0), 1.0, 0, &cfg, &mut rng);
        assert!(fox.x < 0.99);
    }

    #[test]
    fn knockback_overrides_chase_and_expires() {
        let terrain = open_field(20);
        let cfg = EnemyConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut e = Enemy::spawn(1, Archetype::Ogre, false, 10.5, 10.5);
        e.knockback = Some(Knockback { dx: 0.5, dy: 0.0, until_ms: 1200, duration_ms: 200 });

        // Player is to the west, knockback pushes east: moving east means
        // the knockback branch ran instead of chase.
        advance_enemy(&mut e, &terrain, (5.5, 10.5), 1.0, 1000, &cfg, &mut rng);
        assert!((e.x - 11.0).abs() < 1e-5);

        advance_enemy(&mut e, &terrain, (5.5, 10.5), 1.0, 1100, &cfg, &mut rng);
        assert!((e.x - 11.25).abs() < 1e-5);

        advance_enemy(&mut e, &terrain, (5.5, 10.5), 1.0, 1200, &cfg, &mut rng);
        assert!(e.knockback.is_none());
        assert!(e.x < 11.25);
    }

    #[test]
    fn knockback_into_wall_is_rejected() {
        let terrain = grid_from(&["..^"]);
        let cfg = EnemyConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut e = Enemy::spawn(1, Archetype::Ogre, false, 1.8, 0.5);
        e.knockback = Some(Knockback { dx: 0.5, dy: 0.0, until_ms: 200, duration_ms: 200 });
        advance_enemy(&mut e, &terrain, (0.0, 0.5), 1.0, 0, &cfg, &mut rng);
        assert_eq!(e.x, 1.8);
    }
}
