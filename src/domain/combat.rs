/// Melee combat: arc hit test, damage, knockback, kill resolution.
///
/// Pure with respect to the player: this module only touches enemies and
/// reports what happened. The session layer turns the outcome into XP,
/// level-ups and effects.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::config::CombatConfig;
use super::bestiary::Archetype;
use super::entity::{Enemy, EntityId, Knockback};

/// Full width of the sword arc (radians), centred on the facing angle.
pub const ATTACK_ARC: f32 = FRAC_PI_2;

/// One swing, fully described.
#[derive(Clone, Copy, Debug)]
pub struct Swing {
    pub origin_x: f32,
    pub origin_y: f32,
    pub facing: f32,
    pub radius: f32,
    pub level: u32,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Hit {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub damage: i32,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Kill {
    pub id: EntityId,
    pub archetype: Archetype,
    pub boss: bool,
    /// Base reward; boss doubling happens when XP is granted.
    pub xp: u32,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SwingOutcome {
    pub hits: Vec<Hit>,
    pub kills: Vec<Kill>,
}

/// `base + (level - 1) * per_level`.
pub fn sword_damage(level: u32, cfg: &CombatConfig) -> i32 {
    cfg.sword_damage + level.saturating_sub(1) as i32 * cfg.damage_per_level
}

/// Knockback magnitude grows 10% per level above 1.
pub fn recoil_strength(level: u32, cfg: &CombatConfig) -> f32 {
    cfg.recoil_strength * (1.0 + level.saturating_sub(1) as f32 * 0.1)
}

/// Reduce an angle to `(-π, π]`.
pub fn normalize_angle(angle: f32) -> f32 {
    let a = (angle + PI).rem_euclid(TAU) - PI;
    if a <= -PI { a + TAU } else { a }
}

/// Is `(tx, ty)` inside the swing's radius and angular sector?
pub fn in_arc(swing: &Swing, tx: f32, ty: f32) -> bool {
    let dx = tx - swing.origin_x;
    let dy = ty - swing.origin_y;
    if dx.hypot(dy) > swing.radius {
        return false;
    }
    let diff = normalize_angle(dy.atan2(dx) - swing.facing).abs();
    diff <= ATTACK_ARC / 2.0
}

/// Resolve one swing against every enemy. Hit enemies take damage and get
/// a knockback pointing away from the origin; enemies at or below zero
/// health are removed and reported as kills.
pub fn resolve_swing(
    enemies: &mut Vec<Enemy>,
    swing: &Swing,
    now_ms: u64,
    cfg: &CombatConfig,
) -> SwingOutcome {
    let damage = sword_damage(swing.level, cfg);
    let strength = recoil_strength(swing.level, cfg);
    let mut out = SwingOutcome::default();

    // Reverse so removal by index is safe.
    for i in (0..enemies.len()).rev() {
        let target = &mut enemies[i];
        if !in_arc(swing, target.x, target.y) {
            continue;
        }

        target.health -= damage;
        out.hits.push(Hit { id: target.id, x: target.x, y: target.y, damage });

        let dx = target.x - swing.origin_x;
        let dy = target.y - swing.origin_y;
        let distance = dx.hypot(dy);
        // An enemy exactly on the origin has no "away"; push along the facing.
        let (ux, uy) = if distance > f32::EPSILON {
            (dx / distance, dy / distance)
        } else {
            (swing.facing.cos(), swing.facing.sin())
        };
        target.knockback = Some(Knockback {
            dx: ux * strength,
            dy: uy * strength,
            until_ms: now_ms + cfg.recoil_duration_ms,
            duration_ms: cfg.recoil_duration_ms,
        });

        if target.health <= 0 {
            let dead = enemies.remove(i);
            out.kills.push(Kill {
                id: dead.id,
                archetype: dead.archetype,
                boss: dead.boss,
                xp: dead.xp_reward(),
                x: dead.x,
                y: dead.y,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swing_at(facing: f32, radius: f32) -> Swing {
        Swing { origin_x: 5.0, origin_y: 5.0, facing, radius, level: 1 }
    }

    #[test]
    fn normalize_wraps_into_half_open_range() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(2.5 * PI) - FRAC_PI_2).abs() < 1e-5);
        assert!(normalize_angle(0.0).abs() < 1e-6);
        for k in -20..20 {
            let a = normalize_angle(k as f32 * 0.7);
            assert!(a > -PI - 1e-5 && a <= PI + 1e-5);
        }
    }

    #[test]
    fn straight_ahead_hits_directly_behind_misses() {
        for facing in [0.0, 1.0, -2.5, PI, 3.0] {
            let s = swing_at(facing, 1.5);
            let ahead = (5.0 + facing.cos(), 5.0 + facing.sin());
            let behind = (5.0 + (facing + PI).cos(), 5.0 + (facing + PI).sin());
            assert!(in_arc(&s, ahead.0, ahead.1), "facing {facing}");
            assert!(!in_arc(&s, behind.0, behind.1), "facing {facing}");
        }
    }

    #[test]
    fn arc_handles_wraparound_at_pi() {
        // Facing west (π); a target just across the ±π seam is still ahead.
        let s = swing_at(PI, 2.0);
        let a = -PI + 0.1;
        assert!(in_arc(&s, 5.0 + a.cos(), 5.0 + a.sin()));
    }

    #[test]
    fn edges_of_arc_and_radius() {
        let s = swing_at(0.0, 1.0);
        let inside = FRAC_PI_2 / 2.0 - 0.01;
        let outside = FRAC_PI_2 / 2.0 + 0.01;
        assert!(in_arc(&s, 5.0 + 0.9 * inside.cos(), 5.0 + 0.9 * inside.sin()));
        assert!(!in_arc(&s, 5.0 + 0.9 * outside.cos(), 5.0 + 0.9 * outside.sin()));
        assert!(!in_arc(&s, 6.01, 5.0));
    }

    #[test]
    fn damage_and_recoil_scale_with_level() {
        let cfg = CombatConfig::default();
        assert_eq!(sword_damage(1, &cfg), 35);
        assert_eq!(sword_damage(4, &cfg), 50);
        assert!((recoil_strength(1, &cfg) - 0.5).abs() < 1e-6);
        assert!((recoil_strength(3, &cfg) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn hit_applies_damage_and_knockback_away_from_origin() {
        let cfg = CombatConfig::default();
        let mut enemies = vec![Enemy::spawn(7, Archetype::Ogre, false, 6.0, 5.0)];
        let out = resolve_swing(&mut enemies, &swing_at(0.0, 1.5), 1_000, &cfg);

        assert_eq!(out.hits.len(), 1);
        assert!(out.kills.is_empty());
        assert_eq!(enemies[0].health, 65);
        let kb = enemies[0].knockback.unwrap();
        assert!((kb.dx - 0.5).abs() < 1e-6);
        assert!(kb.dy.abs() < 1e-6);
        assert_eq!(kb.until_ms, 1_200);
    }

    #[test]
    fn lethal_hit_removes_enemy_and_reports_xp() {
        let cfg = CombatConfig::default();
        let mut enemies = vec![
            Enemy::spawn(1, Archetype::Fox, false, 3.0, 5.0), // behind
            Enemy::spawn(2, Archetype::Fox, false, 6.0, 5.0),
        ];
        enemies[1].health = 30;
        let out = resolve_swing(&mut enemies, &swing_at(0.0, 1.5), 0, &cfg);

        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].id, 1);
        assert_eq!(enemies[0].health, 50);
        assert_eq!(out.kills.len(), 1);
        assert_eq!(out.kills[0].id, 2);
        assert_eq!(out.kills[0].xp, 10);
        assert!(!out.kills[0].boss);
    }

    #[test]
    fn multiple_kills_in_one_swing() {
        let cfg = CombatConfig::default();
        let mut enemies: Vec<Enemy> = (0..4)
            .map(|i| {
                let mut e = Enemy::spawn(i, Archetype::Fox, false, 6.0, 4.8 + i as f32 * 0.1);
                e.health = 1;
                e
            })
            .collect();
        let out = resolve_swing(&mut enemies, &swing_at(0.0, 1.5), 0, &cfg);
        assert!(enemies.is_empty());
        assert_eq!(out.kills.len(), 4);
    }
}
