/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to the built-in balance values if the file is missing or
/// incomplete. Every tunable number of the simulation lives here so the
/// domain code never hard-codes balance.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Public Config Structs ──

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub combat: CombatConfig,
    pub progression: ProgressionConfig,
    pub enemies: EnemyConfig,
    pub respawn: RespawnConfig,
    pub general: GeneralConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    pub initial_wanderers: usize,
    pub initial_monsters: usize,
    pub initial_food: usize,
    /// Retry budget for rejection-sampled placement.
    pub placement_attempts: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    pub base_health: i32,
    pub health_per_level: i32,
    pub max_stamina: f32,
    pub sprint_cost_per_sec: f32,
    pub stamina_regen_per_tick: f32,
    /// Cells per millisecond.
    pub base_speed: f32,
    pub sprint_multiplier: f32,
    pub pickup_radius: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CombatConfig {
    pub sword_damage: i32,
    pub damage_per_level: i32,
    pub attack_radius: f32,
    pub recoil_strength: f32,
    pub recoil_duration_ms: u64,
    pub collision_radius: f32,
    pub damage_cooldown_ms: u64,
    pub effect_duration_ms: u64,
    pub swing_duration_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProgressionConfig {
    pub xp_per_level: u32,
    pub max_level: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyConfig {
    // cells per 16.67ms reference frame
    pub wander_speed: f32,
    pub chase_speed: f32,
    pub boss_speed: f32,
    pub min_distance: f32,
    pub wander_turn_chance: f64,
    pub boss_chance: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RespawnConfig {
    pub food_interval_ms: u64,
    pub food_max: usize,
    pub monster_interval_ms: u64,
    pub chaser_max: usize,
    pub wanderer_max: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneralConfig {
    /// `None` = seed from OS entropy.
    pub seed: Option<u64>,
    pub tick_rate_ms: u64,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    world: TomlWorld,
    #[serde(default)]
    player: TomlPlayer,
    #[serde(default)]
    combat: TomlCombat,
    #[serde(default)]
    progression: TomlProgression,
    #[serde(default)]
    enemies: TomlEnemies,
    #[serde(default)]
    respawn: TomlRespawn,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlWorld {
    #[serde(default = "default_world_width")]
    width: usize,
    #[serde(default = "default_world_height")]
    height: usize,
    #[serde(default = "default_initial_wanderers")]
    initial_wanderers: usize,
    #[serde(default = "default_initial_monsters")]
    initial_monsters: usize,
    #[serde(default = "default_initial_food")]
    initial_food: usize,
    #[serde(default = "default_placement_attempts")]
    placement_attempts: u32,
}

#[derive(Deserialize, Debug)]
struct TomlPlayer {
    #[serde(default = "default_base_health")]
    base_health: i32,
    #[serde(default = "default_health_per_level")]
    health_per_level: i32,
    #[serde(default = "default_max_stamina")]
    max_stamina: f32,
    #[serde(default = "default_sprint_cost")]
    sprint_cost_per_sec: f32,
    #[serde(default = "default_stamina_regen")]
    stamina_regen_per_tick: f32,
    #[serde(default = "default_base_speed")]
    base_speed: f32,
    #[serde(default = "default_sprint_multiplier")]
    sprint_multiplier: f32,
    #[serde(default = "default_pickup_radius")]
    pickup_radius: f32,
}

#[derive(Deserialize, Debug)]
struct TomlCombat {
    #[serde(default = "default_sword_damage")]
    sword_damage: i32,
    #[serde(default = "default_damage_per_level")]
    damage_per_level: i32,
    #[serde(default = "default_attack_radius")]
    attack_radius: f32,
    #[serde(default = "default_recoil_strength")]
    recoil_strength: f32,
    #[serde(default = "default_recoil_duration")]
    recoil_duration_ms: u64,
    #[serde(default = "default_collision_radius")]
    collision_radius: f32,
    #[serde(default = "default_damage_cooldown")]
    damage_cooldown_ms: u64,
    #[serde(default = "default_effect_duration")]
    effect_duration_ms: u64,
    #[serde(default = "default_swing_duration")]
    swing_duration_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlProgression {
    #[serde(default = "default_xp_per_level")]
    xp_per_level: u32,
    #[serde(default = "default_max_level")]
    max_level: u32,
}

#[derive(Deserialize, Debug)]
struct TomlEnemies {
    #[serde(default = "default_wander_speed")]
    wander_speed: f32,
    #[serde(default = "default_chase_speed")]
    chase_speed: f32,
    #[serde(default = "default_boss_speed")]
    boss_speed: f32,
    #[serde(default = "default_min_distance")]
    min_distance: f32,
    #[serde(default = "default_wander_turn_chance")]
    wander_turn_chance: f64,
    #[serde(default = "default_boss_chance")]
    boss_chance: f64,
}

#[derive(Deserialize, Debug)]
struct TomlRespawn {
    #[serde(default = "default_food_interval")]
    food_interval_ms: u64,
    #[serde(default = "default_food_max")]
    food_max: usize,
    #[serde(default = "default_monster_interval")]
    monster_interval_ms: u64,
    #[serde(default = "default_chaser_max")]
    chaser_max: usize,
    #[serde(default = "default_wanderer_max")]
    wanderer_max: usize,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

// ── Defaults ──

fn default_world_width() -> usize { 100 }
fn default_world_height() -> usize { 100 }
fn default_initial_wanderers() -> usize { 10 }
fn default_initial_monsters() -> usize { 3 }
fn default_initial_food() -> usize { 15 }
fn default_placement_attempts() -> u32 { 10_000 }

fn default_base_health() -> i32 { 100 }
fn default_health_per_level() -> i32 { 25 }
fn default_max_stamina() -> f32 { 100.0 }
fn default_sprint_cost() -> f32 { 30.0 }      // per second of sprinting
fn default_stamina_regen() -> f32 { 0.8 }     // per tick while not sprinting
fn default_base_speed() -> f32 { 0.004 }
fn default_sprint_multiplier() -> f32 { 3.5 }
fn default_pickup_radius() -> f32 { 0.5 }

fn default_sword_damage() -> i32 { 35 }
fn default_damage_per_level() -> i32 { 5 }
fn default_attack_radius() -> f32 { 1.5 }
fn default_recoil_strength() -> f32 { 0.5 }
fn default_recoil_duration() -> u64 { 200 }
fn default_collision_radius() -> f32 { 0.4 }
fn default_damage_cooldown() -> u64 { 500 }
fn default_effect_duration() -> u64 { 200 }
fn default_swing_duration() -> u64 { 200 }

fn default_xp_per_level() -> u32 { 100 }
fn default_max_level() -> u32 { 10 }

fn default_wander_speed() -> f32 { 0.03 }     // very slow drift
fn default_chase_speed() -> f32 { 0.06 }
fn default_boss_speed() -> f32 { 0.04 }       // slower but relentless
fn default_min_distance() -> f32 { 0.6 }
fn default_wander_turn_chance() -> f64 { 0.02 }
fn default_boss_chance() -> f64 { 0.1 }

fn default_food_interval() -> u64 { 3_000 }
fn default_food_max() -> usize { 15 }
fn default_monster_interval() -> u64 { 5_000 }
fn default_chaser_max() -> usize { 3 }
fn default_wanderer_max() -> usize { 10 }

fn default_tick_rate() -> u64 { 16 }

impl Default for TomlWorld {
    fn default() -> Self {
        TomlWorld {
            width: default_world_width(),
            height: default_world_height(),
            initial_wanderers: default_initial_wanderers(),
            initial_monsters: default_initial_monsters(),
            initial_food: default_initial_food(),
            placement_attempts: default_placement_attempts(),
        }
    }
}

impl Default for TomlPlayer {
    fn default() -> Self {
        TomlPlayer {
            base_health: default_base_health(),
            health_per_level: default_health_per_level(),
            max_stamina: default_max_stamina(),
            sprint_cost_per_sec: default_sprint_cost(),
            stamina_regen_per_tick: default_stamina_regen(),
            base_speed: default_base_speed(),
            sprint_multiplier: default_sprint_multiplier(),
            pickup_radius: default_pickup_radius(),
        }
    }
}

impl Default for TomlCombat {
    fn default() -> Self {
        TomlCombat {
            sword_damage: default_sword_damage(),
            damage_per_level: default_damage_per_level(),
            attack_radius: default_attack_radius(),
            recoil_strength: default_recoil_strength(),
            recoil_duration_ms: default_recoil_duration(),
            collision_radius: default_collision_radius(),
            damage_cooldown_ms: default_damage_cooldown(),
            effect_duration_ms: default_effect_duration(),
            swing_duration_ms: default_swing_duration(),
        }
    }
}

impl Default for TomlProgression {
    fn default() -> Self {
        TomlProgression {
            xp_per_level: default_xp_per_level(),
            max_level: default_max_level(),
        }
    }
}

impl Default for TomlEnemies {
    fn default() -> Self {
        TomlEnemies {
            wander_speed: default_wander_speed(),
            chase_speed: default_chase_speed(),
            boss_speed: default_boss_speed(),
            min_distance: default_min_distance(),
            wander_turn_chance: default_wander_turn_chance(),
            boss_chance: default_boss_chance(),
        }
    }
}

impl Default for TomlRespawn {
    fn default() -> Self {
        TomlRespawn {
            food_interval_ms: default_food_interval(),
            food_max: default_food_max(),
            monster_interval_ms: default_monster_interval(),
            chaser_max: default_chaser_max(),
            wanderer_max: default_wanderer_max(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            seed: None,
            tick_rate_ms: default_tick_rate(),
        }
    }
}

// Public defaults are derived from the TOML defaults so the two never drift.

impl Default for WorldConfig {
    fn default() -> Self { TomlWorld::default().into() }
}

impl Default for PlayerConfig {
    fn default() -> Self { TomlPlayer::default().into() }
}

impl Default for CombatConfig {
    fn default() -> Self { TomlCombat::default().into() }
}

impl Default for ProgressionConfig {
    fn default() -> Self { TomlProgression::default().into() }
}

impl Default for EnemyConfig {
    fn default() -> Self { TomlEnemies::default().into() }
}

impl Default for RespawnConfig {
    fn default() -> Self { TomlRespawn::default().into() }
}

impl Default for GeneralConfig {
    fn default() -> Self { TomlGeneral::default().into() }
}

// ── TOML → public mapping ──

impl From<TomlWorld> for WorldConfig {
    fn from(t: TomlWorld) -> Self {
        WorldConfig {
            width: t.width,
            height: t.height,
            initial_wanderers: t.initial_wanderers,
            initial_monsters: t.initial_monsters,
            initial_food: t.initial_food,
            placement_attempts: t.placement_attempts,
        }
    }
}

impl From<TomlPlayer> for PlayerConfig {
    fn from(t: TomlPlayer) -> Self {
        PlayerConfig {
            base_health: t.base_health,
            health_per_level: t.health_per_level,
            max_stamina: t.max_stamina,
            sprint_cost_per_sec: t.sprint_cost_per_sec,
            stamina_regen_per_tick: t.stamina_regen_per_tick,
            base_speed: t.base_speed,
            sprint_multiplier: t.sprint_multiplier,
            pickup_radius: t.pickup_radius,
        }
    }
}

impl From<TomlCombat> for CombatConfig {
    fn from(t: TomlCombat) -> Self {
        CombatConfig {
            sword_damage: t.sword_damage,
            damage_per_level: t.damage_per_level,
            attack_radius: t.attack_radius,
            recoil_strength: t.recoil_strength,
            recoil_duration_ms: t.recoil_duration_ms,
            collision_radius: t.collision_radius,
            damage_cooldown_ms: t.damage_cooldown_ms,
            effect_duration_ms: t.effect_duration_ms,
            swing_duration_ms: t.swing_duration_ms,
        }
    }
}

impl From<TomlProgression> for ProgressionConfig {
    fn from(t: TomlProgression) -> Self {
        ProgressionConfig {
            xp_per_level: t.xp_per_level.max(1),
            max_level: t.max_level.max(1),
        }
    }
}

impl From<TomlEnemies> for EnemyConfig {
    fn from(t: TomlEnemies) -> Self {
        EnemyConfig {
            wander_speed: t.wander_speed,
            chase_speed: t.chase_speed,
            boss_speed: t.boss_speed,
            min_distance: t.min_distance,
            wander_turn_chance: probability(t.wander_turn_chance, default_wander_turn_chance()),
            boss_chance: probability(t.boss_chance, default_boss_chance()),
        }
    }
}

/// Clamp into `[0, 1]`; NaN and infinities fall back to the default.
fn probability(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value.clamp(0.0, 1.0) } else { fallback }
}

impl From<TomlRespawn> for RespawnConfig {
    fn from(t: TomlRespawn) -> Self {
        RespawnConfig {
            food_interval_ms: t.food_interval_ms,
            food_max: t.food_max,
            monster_interval_ms: t.monster_interval_ms,
            chaser_max: t.chaser_max,
            wanderer_max: t.wanderer_max,
        }
    }
}

impl From<TomlGeneral> for GeneralConfig {
    fn from(t: TomlGeneral) -> Self {
        GeneralConfig {
            seed: t.seed,
            tick_rate_ms: t.tick_rate_ms.max(1),
        }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            world: t.world.into(),
            player: t.player.into(),
            combat: t.combat.into(),
            progression: t.progression.into(),
            enemies: t.enemies.into(),
            respawn: t.respawn.into(),
            general: t.general.into(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        load_toml(&candidate_dirs()).into()
    }

    /// Parse a config document. Unknown keys are ignored, missing keys default.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from)
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            return read_toml(&path);
        }
    }
    log::debug!("no config.toml found, using built-in defaults");
    TomlConfig::default()
}

fn read_toml(path: &Path) -> TomlConfig {
    match std::fs::read_to_string(path) {
        Ok(text) => match toml::from_str::<TomlConfig>(&text) {
            Ok(cfg) => {
                log::debug!("loaded {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("config.toml parse error: {e}; using default settings");
                TomlConfig::default()
            }
        },
        Err(e) => {
            log::warn!("could not read {}: {e}; using default settings", path.display());
            TomlConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_matches_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.world.width, 100);
        assert_eq!(cfg.respawn.food_max, 15);
        assert_eq!(cfg.general.seed, None);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[combat]\nsword_damage = 50\n\n[general]\nseed = 7\n",
        ).unwrap();
        assert_eq!(cfg.combat.sword_damage, 50);
        assert_eq!(cfg.combat.damage_per_level, 5);
        assert_eq!(cfg.general.seed, Some(7));
        assert_eq!(cfg.player.base_health, 100);
    }

    #[test]
    fn probabilities_are_clamped() {
        let cfg = GameConfig::from_toml_str("[enemies]\nboss_chance = 4.0\n").unwrap();
        assert_eq!(cfg.enemies.boss_chance, 1.0);

        let cfg = GameConfig::from_toml_str("[enemies]\nwander_turn_chance = nan\nboss_chance = -inf\n").unwrap();
        assert_eq!(cfg.enemies.wander_turn_chance, 0.02);
        assert_eq!(cfg.enemies.boss_chance, 0.1);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(GameConfig::from_toml_str("[world]\nwidth = \"wide\"\n").is_err());
    }
}
