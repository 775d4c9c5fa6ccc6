/// Player progression and resources: XP/levels, health, stamina.
///
/// Pure functions over `Player` plus config; they never touch the rest of
/// the world. Effects and events are the session layer's job.

use crate::config::{PlayerConfig, ProgressionConfig};
use super::entity::Player;

const LEVEL_TITLES: [&str; 10] = [
    "Novice",
    "Apprentice",
    "Fighter",
    "Warrior",
    "Veteran",
    "Elite",
    "Master",
    "Champion",
    "Hero",
    "Legend",
];

const ATTACK_GLYPHS: [&str; 10] = ["💢", "💥", "⚡", "🔥", "✨", "💫", "🌟", "☄️", "🌈", "⭐"];

/// `maxHealth(level) = base + (level - 1) * per_level`.
pub fn max_health(level: u32, cfg: &PlayerConfig) -> i32 {
    cfg.base_health + (level.saturating_sub(1) as i32) * cfg.health_per_level
}

/// Level implied by a lifetime XP total, capped at the max level.
pub fn level_for_xp(xp: u32, cfg: &ProgressionConfig) -> u32 {
    (xp / cfg.xp_per_level + 1).min(cfg.max_level)
}

/// Award XP (doubled for boss kills). On level-up the player is fully
/// healed to the new cap. Returns the new level if it changed.
pub fn gain_xp(
    player: &mut Player,
    amount: u32,
    boss_kill: bool,
    progression: &ProgressionConfig,
    stats: &PlayerConfig,
) -> Option<u32> {
    let amount = if boss_kill { amount.saturating_mul(2) } else { amount };
    player.xp = player.xp.saturating_add(amount);

    let new_level = level_for_xp(player.xp, progression);
    if new_level > player.level {
        player.level = new_level;
        player.health = max_health(new_level, stats);
        Some(new_level)
    } else {
        None
    }
}

/// Subtract damage, never going below zero. Returns true iff the player is
/// now at exactly 0 health.
pub fn apply_damage(player: &mut Player, amount: i32) -> bool {
    player.health = (player.health - amount.max(0)).max(0);
    player.health == 0
}

/// Heal up to the level's cap. Never lowers health.
pub fn heal(player: &mut Player, amount: i32, stats: &PlayerConfig) {
    let cap = max_health(player.level, stats);
    player.health = player.health.saturating_add(amount.max(0)).min(cap).max(player.health);
}

/// Set health directly, clamped to `[0, max_health]`.
pub fn set_health(player: &mut Player, health: i32, stats: &PlayerConfig) {
    player.health = health.clamp(0, max_health(player.level, stats));
}

/// Deduct stamina only if there is enough; otherwise no side effect.
pub fn use_stamina(player: &mut Player, amount: f32) -> bool {
    if player.stamina >= amount {
        player.stamina = (player.stamina - amount).max(0.0);
        true
    } else {
        false
    }
}

/// One tick of regeneration, capped at max.
pub fn regen_stamina(player: &mut Player, stats: &PlayerConfig) {
    player.stamina = (player.stamina + stats.stamina_regen_per_tick).min(stats.max_stamina);
}

pub fn level_title(level: u32) -> &'static str {
    LEVEL_TITLES[tier_index(level, LEVEL_TITLES.len())]
}

/// Attack glyph for the player's level.
pub fn attack_glyph(level: u32) -> &'static str {
    ATTACK_GLYPHS[tier_index(level, ATTACK_GLYPHS.len())]
}

/// Swing effect scale: +20% per level above 1.
pub fn swing_scale(level: u32) -> f32 {
    1.0 + level.saturating_sub(1) as f32 * 0.2
}

fn tier_index(level: u32, len: usize) -> usize {
    (level.max(1) as usize - 1).min(len - 1)
}
