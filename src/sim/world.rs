/// WorldState: the complete snapshot of a running session.
///
/// Everything mutable in a session lives here, random generator included,
/// so sessions are independent values and tests can run several side by side.
///
/// ## Time
///
/// No method reads the wall clock. Callers pass `now_ms` (a session clock
/// they own, read once per frame) and, for movement, `dt_ms`.
///
/// ## Camera / Viewport
///
/// World coordinates and screen coordinates are separate:
///   - `camera`: viewport into the world (top-left corner + size)
///   - Renderer maps: `screen(sx, sy) = world(camera.x + sx, camera.y + sy)`
///   - Camera follows the player with a dead-zone approach

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::GameConfig;
use crate::domain::combat::{self, Swing, SwingOutcome};
use crate::domain::entity::{Effect, EffectKind, Enemy, EntityId, Food, MoveDir, Player};
use crate::domain::progression;
use crate::domain::terrain::TerrainGrid;
use crate::domain::worldgen;
use crate::error::SimError;
use super::respawn::RespawnTimers;
use super::spawn;

pub const HIT_SYMBOL: &str = "💥";
pub const ENEMY_HIT_COLOR: (u8, u8, u8) = (0xff, 0x00, 0x00);
pub const PLAYER_HIT_COLOR: (u8, u8, u8) = (0xff, 0x66, 0x66);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    GameOver,
}

/// Camera: a viewport into the world.
///
/// `(x, y)` is the world coordinate of the top-left visible cell.
/// `(view_w, view_h)` is how many world cells fit in the viewport.
/// These are computed from terminal size and set during `render()`.
#[derive(Clone, Debug, Default)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
    pub view_w: usize,
    pub view_h: usize,
}

impl Camera {
    pub fn new() -> Self {
        Camera::default()
    }

    /// Follow a target, scrolling only when it leaves the inner dead zone.
    pub fn follow(&mut self, target_x: usize, target_y: usize, world_w: usize, world_h: usize) {
        if self.view_w == 0 || self.view_h == 0 { return; }
        self.x = follow_axis(self.x, target_x as i32, self.view_w as i32, world_w as i32);
        self.y = follow_axis(self.y, target_y as i32, self.view_h as i32, world_h as i32);
    }

    /// Snap directly onto a position (no dead zone). Used on session start.
    pub fn center_on(&mut self, target_x: usize, target_y: usize, world_w: usize, world_h: usize) {
        if self.view_w == 0 || self.view_h == 0 { return; }
        self.x = center_axis(target_x as i32, self.view_w as i32, world_w as i32);
        self.y = center_axis(target_y as i32, self.view_h as i32, world_h as i32);
    }

    /// Convert world cell to viewport cell, `None` if not visible.
    pub fn world_to_view(&self, wx: i32, wy: i32) -> Option<(usize, usize)> {
        let vx = wx - self.x;
        let vy = wy - self.y;
        if vx >= 0 && vx < self.view_w as i32 && vy >= 0 && vy < self.view_h as i32 {
            Some((vx as usize, vy as usize))
        } else {
            None
        }
    }
}

fn follow_axis(pos: i32, target: i32, view: i32, world: i32) -> i32 {
    // Map fits: center it.
    if world <= view {
        return -((view - world) / 2);
    }
    // Dead zone: inner 60% of the viewport.
    let margin = view / 5;
    let mut pos = pos;
    if target < pos + margin {
        pos = target - margin;
    } else if target > pos + view - margin - 1 {
        pos = target - view + margin + 1;
    }
    pos.clamp(0, world - view)
}

fn center_axis(target: i32, view: i32, world: i32) -> i32 {
    if world <= view {
        return -((view - world) / 2);
    }
    (target - view / 2).clamp(0, world - view)
}

/// Result of a collision check that landed a hit.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ContactHit {
    pub enemy: EntityId,
    pub damage: i32,
    pub died: bool,
}

pub struct WorldState {
    pub config: GameConfig,

    // ── Terrain ──
    /// Generated once per session; read-only afterwards.
    pub terrain: TerrainGrid,

    // ── Entities ──
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub foods: Vec<Food>,
    pub effects: Vec<Effect>,

    // ── Timers ──
    pub respawn: RespawnTimers,

    // ── Meta ──
    pub phase: Phase,
    pub tick: u64,
    pub rng: ChaCha8Rng,
    next_entity_id: EntityId,
    next_effect_id: u32,

    // ── UI ──
    pub camera: Camera,
    pub message: String,
    pub message_until_ms: u64,
}

// ── Construction / session control ──

impl WorldState {
    /// Build a session and populate it at `now_ms = 0`.
    /// Seeded from `config.general.seed`, or OS entropy when unset.
    pub fn new(config: GameConfig) -> Result<Self, SimError> {
        let rng = match config.general.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut world = WorldState::empty(config, rng);
        world.start_session(0)?;
        Ok(world)
    }

    /// An unpopulated session on an all-grass map. Handy for tests and for
    /// callers that want to supply their own terrain.
    pub fn empty(config: GameConfig, rng: ChaCha8Rng) -> Self {
        let terrain = TerrainGrid::filled(
            config.world.width.max(1),
            config.world.height.max(1),
            Default::default(),
        );
        let player = Player::new(0.0, 0.0, config.player.base_health, config.player.max_stamina);
        WorldState {
            terrain,
            player,
            enemies: vec![],
            foods: vec![],
            effects: vec![],
            respawn: RespawnTimers::new(0),
            phase: Phase::Playing,
            tick: 0,
            rng,
            next_entity_id: 0,
            next_effect_id: 0,
            camera: Camera::new(),
            message: String::new(),
            message_until_ms: 0,
            config,
        }
    }

    /// Fresh terrain, fresh population, player on a safe start cell.
    pub fn start_session(&mut self, now_ms: u64) -> Result<(), SimError> {
        let (w, h) = (self.config.world.width, self.config.world.height);
        self.terrain = worldgen::generate_world(w, h, &mut self.rng)?;
        self.reset_game(now_ms);

        let counts = (
            self.config.world.initial_wanderers,
            self.config.world.initial_monsters,
            self.config.world.initial_food,
        );
        spawn::create_wanderers(self, counts.0)?;
        spawn::create_monsters(self, counts.1)?;
        spawn::create_food(self, counts.2)?;

        let (x, y) = self.find_safe_start_position()?;
        self.player.x = x;
        self.player.y = y;
        self.camera.center_on(x as usize, y as usize, w, h);

        log::info!(
            "session started: {} enemies, {} food, player at ({x:.1}, {y:.1})",
            self.enemies.len(),
            self.foods.len(),
        );
        Ok(())
    }

    /// Reset all mutable session state to defaults in one go. Terrain is
    /// kept; collections are emptied (repopulating is `start_session`'s job).
    pub fn reset_game(&mut self, now_ms: u64) {
        let cfg = &self.config.player;
        let (x, y) = (self.player.x, self.player.y);
        self.player = Player::new(x, y, cfg.base_health, cfg.max_stamina);
        self.enemies.clear();
        self.foods.clear();
        self.effects.clear();
        self.respawn = RespawnTimers::new(now_ms);
        self.phase = Phase::Playing;
        self.tick = 0;
        self.next_entity_id = 0;
        self.next_effect_id = 0;
        self.message.clear();
        self.message_until_ms = 0;
        log::debug!("session reset at {now_ms}ms");
    }

    /// Rejection-sample a start cell that is passable and has at least one
    /// passable 4-neighbour. Keeps a 10-cell margin from the edges when the
    /// map is big enough. Returns the cell centre.
    pub fn find_safe_start_position(&mut self) -> Result<(f32, f32), SimError> {
        const MARGIN: usize = 10;
        let (w, h) = (self.terrain.width(), self.terrain.height());
        let (x_lo, x_hi) = if w > 2 * MARGIN { (MARGIN, w - MARGIN) } else { (0, w) };
        let (y_lo, y_hi) = if h > 2 * MARGIN { (MARGIN, h - MARGIN) } else { (0, h) };
        let attempts = self.config.world.placement_attempts;

        for _ in 0..attempts {
            let cx = self.rng.gen_range(x_lo..x_hi);
            let cy = self.rng.gen_range(y_lo..y_hi);
            let (c, r) = (cx as i64, cy as i64);
            if !self.terrain.is_passable_cell(c, r) { continue; }
            let has_exit = [(0, -1), (0, 1), (-1, 0), (1, 0)]
                .iter()
                .any(|(dc, dr)| self.terrain.is_passable_cell(c + dc, r + dr));
            if has_exit {
                return Ok((cx as f32 + 0.5, cy as f32 + 0.5));
            }
        }
        Err(SimError::PlacementExhausted { attempts })
    }

    pub(crate) fn next_id(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    fn push_effect(&mut self, mut fx: Effect) {
        fx.id = self.next_effect_id;
        self.next_effect_id += 1;
        self.effects.push(fx);
    }

    pub fn set_message(&mut self, msg: &str, now_ms: u64, duration_ms: u64) {
        self.message = msg.to_string();
        self.message_until_ms = now_ms.saturating_add(duration_ms);
    }
}

// ── Player resources ──

impl WorldState {
    pub fn max_health(&self) -> i32 {
        progression::max_health(self.player.level, &self.config.player)
    }

    /// Apply damage (clamped at zero) and flash the player. Returns true iff
    /// health reached 0; the session then moves to `Phase::GameOver`.
    pub fn damage_player(&mut self, amount: i32, now_ms: u64) -> bool {
        let died = progression::apply_damage(&mut self.player, amount);
        self.push_effect(Effect {
            id: 0,
            kind: EffectKind::PlayerHit,
            x: self.player.x,
            y: self.player.y,
            start_ms: now_ms,
            duration_ms: self.config.combat.effect_duration_ms,
            symbol: HIT_SYMBOL,
            rotation: None,
            scale: None,
            color: Some(PLAYER_HIT_COLOR),
        });
        if died {
            self.player.alive = false;
            self.phase = Phase::GameOver;
            log::info!("player died at level {} with {} xp", self.player.level, self.player.xp);
        }
        died
    }

    pub fn heal_player(&mut self, amount: i32) {
        progression::heal(&mut self.player, amount, &self.config.player);
    }

    pub fn set_player_health(&mut self, health: i32) {
        progression::set_health(&mut self.player, health, &self.config.player);
    }

    pub fn use_stamina(&mut self, amount: f32) -> bool {
        progression::use_stamina(&mut self.player, amount)
    }

    pub fn regen_stamina(&mut self) {
        progression::regen_stamina(&mut self.player, &self.config.player);
    }

    /// Returns the new level on level-up.
    pub fn gain_xp(&mut self, amount: u32, boss_kill: bool) -> Option<u32> {
        let leveled = progression::gain_xp(
            &mut self.player,
            amount,
            boss_kill,
            &self.config.progression,
            &self.config.player,
        );
        if let Some(level) = leveled {
            log::debug!("level up: {} ({})", level, progression::level_title(level));
        }
        leveled
    }

    /// Move the player along `dir` for `dt_ms`. Sprinting multiplies speed
    /// only if the stamina cost for this frame could be paid in full; a
    /// denied sprint moves at base speed and costs nothing. The move is
    /// dropped if the destination is off-map or impassable. Facing updates
    /// either way. Returns true if the player moved.
    pub fn move_player(&mut self, dir: MoveDir, sprint: bool, dt_ms: f32) -> bool {
        let (dx, dy) = dir.vector();
        self.player.facing = (dx, dy);

        let cfg = &self.config.player;
        let mut speed = cfg.base_speed * dt_ms.max(0.0);
        if sprint {
            let cost = cfg.sprint_cost_per_sec * dt_ms.max(0.0) / 1000.0;
            let multiplier = cfg.sprint_multiplier;
            if self.use_stamina(cost) {
                speed *= multiplier;
            }
        }

        let nx = self.player.x + dx * speed;
        let ny = self.player.y + dy * speed;
        if self.terrain.is_passable_at(nx, ny) {
            self.player.x = nx;
            self.player.y = ny;
            true
        } else {
            false
        }
    }
}

// ── Combat / contact ──

impl WorldState {
    /// Swing the sword from `(x, y)` toward `facing` (radians). Hit enemies
    /// flash and get knocked back; kills pay out XP (doubled for bosses).
    pub fn melee_attack(&mut self, x: f32, y: f32, facing: f32, radius: f32, now_ms: u64) -> (SwingOutcome, Option<u32>) {
        let swing = Swing { origin_x: x, origin_y: y, facing, radius, level: self.player.level };
        let outcome = combat::resolve_swing(&mut self.enemies, &swing, now_ms, &self.config.combat);

        for hit in &outcome.hits {
            self.push_effect(Effect {
                id: 0,
                kind: EffectKind::Hit,
                x: hit.x,
                y: hit.y,
                start_ms: now_ms,
                duration_ms: self.config.combat.effect_duration_ms,
                symbol: HIT_SYMBOL,
                rotation: None,
                scale: None,
                color: Some(ENEMY_HIT_COLOR),
            });
        }

        let mut leveled = None;
        for kill in &outcome.kills {
            log::debug!("killed {} #{} (boss: {})", kill.archetype.name(), kill.id, kill.boss);
            if let Some(level) = self.gain_xp(kill.xp, kill.boss) {
                leveled = Some(level);
            }
        }
        (outcome, leveled)
    }

    /// Show the swing at `(x, y)`. Only one swing effect is alive at a time;
    /// its rotation points from the player toward `(x, y)` and it grows
    /// with level.
    pub fn start_swing(&mut self, x: f32, y: f32, duration_ms: u64, now_ms: u64) {
        self.effects.retain(|fx| fx.kind != EffectKind::Swing);
        let level = self.player.level;
        self.push_effect(Effect {
            id: 0,
            kind: EffectKind::Swing,
            x,
            y,
            start_ms: now_ms,
            duration_ms,
            symbol: progression::attack_glyph(level),
            rotation: Some((y - self.player.y).atan2(x - self.player.x)),
            scale: Some(progression::swing_scale(level)),
            color: None,
        });
    }

    /// At most one contact hit per cooldown window, no matter how many
    /// enemies overlap. Inside the window nothing is checked at all.
    pub fn check_collision(&mut self, now_ms: u64) -> Option<ContactHit> {
        if let Some(last) = self.player.last_hit_ms {
            if now_ms.saturating_sub(last) < self.config.combat.damage_cooldown_ms {
                return None;
            }
        }

        let (px, py) = (self.player.x, self.player.y);
        let radius = self.config.combat.collision_radius;
        let (enemy, damage) = self.enemies
            .iter()
            .find(|e| e.distance_to(px, py) < radius)
            .map(|e| (e.id, e.damage))?;

        self.player.last_hit_ms = Some(now_ms);
        let died = self.damage_player(damage, now_ms);
        Some(ContactHit { enemy, damage, died })
    }

    /// Eat every food item within pickup radius. Returns what was eaten.
    pub fn pickup_food(&mut self) -> Vec<Food> {
        let (px, py) = (self.player.x, self.player.y);
        let radius = self.config.player.pickup_radius;
        let mut eaten = vec![];
        let mut i = 0;
        while i < self.foods.len() {
            let f = &self.foods[i];
            if (f.x - px).hypot(f.y - py) <= radius {
                eaten.push(self.foods.remove(i));
            } else {
                i += 1;
            }
        }
        for food in &eaten {
            self.heal_player(food.heal);
        }
        eaten
    }

    /// Drop effects whose lifetime has elapsed.
    pub fn prune_effects(&mut self, now_ms: u64) {
        self.effects.retain(|fx| !fx.is_expired(now_ms));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::bestiary::Archetype;
    use crate::domain::terrain::tests::grid_from;

    /// Empty session on a small all-grass map, seeded.
    pub(crate) fn sandbox(rows: &[&str]) -> WorldState {
        let mut w = WorldState::empty(GameConfig::default(), ChaCha8Rng::seed_from_u64(42));
        w.terrain = grid_from(rows);
        w.player.x = 2.5;
        w.player.y = 2.5;
        w
    }

    pub(crate) fn open_rows() -> Vec<&'static str> {
        vec!["......"; 6]
    }

    fn seeded_config(seed: u64) -> GameConfig {
        let mut cfg = GameConfig::default();
        cfg.general.seed = Some(seed);
        cfg
    }

    #[test]
    fn new_session_is_populated_on_legal_cells() {
        let w = WorldState::new(seeded_config(3)).unwrap();
        assert_eq!(w.enemies.len(), 13);
        assert!(w.enemies.iter().all(|e| !e.boss));
        assert_eq!(w.foods.len(), 15);
        for e in &w.enemies {
            assert!(w.terrain.is_passable_at(e.x, e.y));
        }
        for f in &w.foods {
            assert!(w.terrain.is_passable_at(f.x, f.y));
        }
        assert!(w.terrain.is_passable_at(w.player.x, w.player.y));
    }

    #[test]
    fn same_seed_same_session() {
        let a = WorldState::new(seeded_config(9)).unwrap();
        let b = WorldState::new(seeded_config(9)).unwrap();
        assert_eq!(a.terrain, b.terrain);
        assert_eq!(a.enemies, b.enemies);
        assert_eq!(a.player, b.player);
    }

    #[test]
    fn safe_start_needs_a_passable_neighbour() {
        let mut w = sandbox(&["~~~", "~.~", "~~."]);
        assert_eq!(
            w.find_safe_start_position(),
            Err(SimError::PlacementExhausted { attempts: 10_000 }),
        );
        let mut w = sandbox(&["~~~", "~..", "~~~"]);
        let (x, y) = w.find_safe_start_position().unwrap();
        assert!(x > 1.0 && y > 1.0 && y < 2.0);
    }

    #[test]
    fn reset_after_death_restores_defaults() {
        let mut w = WorldState::new(seeded_config(4)).unwrap();
        w.gain_xp(250, false);
        w.player.stamina = 12.0;
        w.damage_player(10_000, 500);
        assert_eq!(w.phase, Phase::GameOver);

        w.reset_game(9_000);
        assert_eq!(w.player.health, 100);
        assert_eq!(w.player.stamina, 100.0);
        assert_eq!(w.player.xp, 0);
        assert_eq!(w.player.level, 1);
        assert!(w.player.alive);
        assert_eq!(w.player.last_hit_ms, None);
        assert!(w.enemies.is_empty());
        assert!(w.foods.is_empty());
        assert!(w.effects.is_empty());
        assert_eq!(w.respawn, RespawnTimers::new(9_000));
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn damage_flashes_and_signals_death() {
        let mut w = sandbox(&open_rows());
        assert!(!w.damage_player(60, 10));
        assert_eq!(w.effects.len(), 1);
        assert_eq!(w.effects[0].kind, EffectKind::PlayerHit);
        assert!(w.damage_player(60, 20));
        assert_eq!(w.player.health, 0);
        assert_eq!(w.phase, Phase::GameOver);
    }

    #[test]
    fn collision_cooldown_allows_one_hit_per_window() {
        let mut w = sandbox(&open_rows());
        for i in 0..5 {
            let id = w.next_id();
            w.enemies.push(Enemy::spawn(id, Archetype::Fox, false, 2.5 + i as f32 * 0.01, 2.5));
        }

        let mut hits = 0;
        for now in (1_000..1_500).step_by(10) {
            if w.check_collision(now).is_some() { hits += 1; }
        }
        assert_eq!(hits, 1);
        assert_eq!(w.player.health, 85);

        assert!(w.check_collision(1_500).is_some());
        assert_eq!(w.player.health, 70);
    }

    #[test]
    fn collision_ignores_enemies_outside_radius() {
        let mut w = sandbox(&open_rows());
        let id = w.next_id();
        w.enemies.push(Enemy::spawn(id, Archetype::Ogre, false, 3.0, 2.5));
        assert_eq!(w.check_collision(0), None);
        assert_eq!(w.player.health, 100);
    }

    #[test]
    fn adjacent_lowest_tier_kill_pays_exact_xp() {
        let mut w = sandbox(&open_rows());
        let id = w.next_id();
        w.enemies.push(Enemy::spawn(id, Archetype::Fox, false, 3.5, 2.5));
        w.enemies[0].health = 35;

        let (outcome, leveled) = w.melee_attack(2.5, 2.5, 0.0, 1.5, 100);
        assert!(w.enemies.is_empty());
        assert_eq!(outcome.kills.len(), 1);
        assert_eq!(w.player.xp, Archetype::Fox.stats().xp);
        assert_eq!(leveled, None);
        assert!(w.effects.iter().any(|fx| fx.kind == EffectKind::Hit));
    }

    #[test]
    fn boss_kill_pays_double() {
        let mut w = sandbox(&open_rows());
        let id = w.next_id();
        w.enemies.push(Enemy::spawn(id, Archetype::Skull, true, 3.0, 2.5));
        w.enemies[0].health = 1;
        w.melee_attack(2.5, 2.5, 0.0, 1.5, 0);
        assert_eq!(w.player.xp, 300);
        assert_eq!(w.player.level, 4);
        assert_eq!(w.player.health, w.max_health());
    }

    #[test]
    fn only_one_swing_effect_alive() {
        let mut w = sandbox(&open_rows());
        w.start_swing(3.5, 2.5, 200, 0);
        w.start_swing(2.5, 3.5, 200, 50);
        let swings: Vec<_> = w.effects.iter().filter(|fx| fx.kind == EffectKind::Swing).collect();
        assert_eq!(swings.len(), 1);
        assert!((swings[0].rotation.unwrap() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_eq!(swings[0].scale, Some(1.0));
    }

    #[test]
    fn effects_are_pruned_after_duration() {
        let mut w = sandbox(&open_rows());
        w.damage_player(1, 0);
        w.start_swing(3.5, 2.5, 400, 0);
        w.prune_effects(199);
        assert_eq!(w.effects.len(), 2);
        w.prune_effects(200);
        assert_eq!(w.effects.len(), 1);
        w.prune_effects(400);
        assert!(w.effects.is_empty());
    }

    #[test]
    fn pickup_heals_and_removes_food() {
        let mut w = sandbox(&open_rows());
        w.player.health = 50;
        let id = w.next_id();
        w.foods.push(Food::apple(id, 2.8, 2.5));
        let id = w.next_id();
        w.foods.push(Food::apple(id, 5.5, 5.5));
        let eaten = w.pickup_food();
        assert_eq!(eaten.len(), 1);
        assert_eq!(w.foods.len(), 1);
        assert_eq!(w.player.health, 75);
    }

    #[test]
    fn set_player_health_clamps_to_level_cap() {
        let mut w = sandbox(&open_rows());
        w.set_player_health(10_000);
        assert_eq!(w.player.health, w.max_health());
        w.set_player_health(-5);
        assert_eq!(w.player.health, 0);
        w.set_player_health(42);
        assert_eq!(w.player.health, 42);
    }

    #[test]
    fn heal_player_saturates_on_huge_amounts() {
        let mut w = sandbox(&open_rows());
        w.player.health = 50;
        w.heal_player(i32::MAX);
        assert_eq!(w.player.health, w.max_health());
    }

    #[test]
    fn movement_is_blocked_by_water_and_edges() {
        let mut w = sandbox(&["...", "..~", "..."]);
        w.player.x = 1.9;
        w.player.y = 1.5;
        assert!(!w.move_player(MoveDir::Right, false, 100.0));
        assert_eq!(w.player.x, 1.9);
        assert_eq!(w.player.facing, (1.0, 0.0));
        w.player.x = 0.1;
        assert!(!w.move_player(MoveDir::Left, false, 100.0));
        assert!(w.move_player(MoveDir::Up, false, 100.0));
        assert!((w.player.y - 1.1).abs() < 1e-5);
    }

    #[test]
    fn sprint_denied_without_enough_stamina() {
        let mut w = sandbox(&open_rows());
        w.player.stamina = 0.2;
        // 16ms of sprint costs 0.48 stamina.
        assert!(w.move_player(MoveDir::Right, true, 16.0));
        assert!((w.player.x - (2.5 + 0.004 * 16.0)).abs() < 1e-5);
        assert_eq!(w.player.stamina, 0.2);
    }

    #[test]
    fn sprint_applies_multiplier_and_drains() {
        let mut w = sandbox(&open_rows());
        assert!(w.move_player(MoveDir::Right, true, 100.0));
        assert!((w.player.x - (2.5 + 0.004 * 100.0 * 3.5)).abs() < 1e-4);
        assert!((w.player.stamina - 97.0).abs() < 1e-4);
    }

    #[test]
    fn camera_follow_clamps_to_world() {
        let mut cam = Camera { x: 0, y: 0, view_w: 10, view_h: 10 };
        cam.follow(95, 3, 100, 100);
        assert_eq!(cam.x, 88);
        assert_eq!(cam.y, 0);
        cam.center_on(50, 50, 100, 100);
        assert_eq!((cam.x, cam.y), (45, 45));
        assert_eq!(cam.world_to_view(45, 54), Some((0, 9)));
        assert_eq!(cam.world_to_view(44, 50), None);
    }
}
