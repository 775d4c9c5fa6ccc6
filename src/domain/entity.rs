/// Entities: Player, Enemy, Food, and transient combat effects.
/// Positions are continuous (sub-cell); terrain checks floor them to a cell.

use super::bestiary::{boss_damage, boss_health, Archetype, Behavior};

/// Stable id handed out by the session; never reused within a session.
pub type EntityId = u32;

/// Movement direction (continuous while key held).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    /// Unit vector in world space (y grows downward).
    pub fn vector(self) -> (f32, f32) {
        match self {
            MoveDir::Left => (-1.0, 0.0),
            MoveDir::Right => (1.0, 0.0),
            MoveDir::Up => (0.0, -1.0),
            MoveDir::Down => (0.0, 1.0),
        }
    }
}

/// Frame input: movement is continuous (held key), attack is edge-triggered.
/// A frame with neither is a "wait": the world still advances.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub movement: Option<MoveDir>,
    pub sprint: bool,
    pub attack: bool,
}

/// Transient push applied to an enemy after a hit.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Knockback {
    pub dx: f32,
    pub dy: f32,
    pub until_ms: u64,
    pub duration_ms: u64,
}

impl Knockback {
    pub fn is_active(&self, now_ms: u64) -> bool {
        now_ms < self.until_ms
    }

    /// 1.0 right after the hit, falling to 0.0 at expiry.
    pub fn remaining_fraction(&self, now_ms: u64) -> f32 {
        if self.duration_ms == 0 || now_ms >= self.until_ms { return 0.0; }
        (self.until_ms - now_ms) as f32 / self.duration_ms as f32
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub archetype: Archetype,
    pub behavior: Behavior,
    pub health: i32,
    pub damage: i32,
    pub boss: bool,
    /// Wander heading in radians; picked lazily on the first wander tick.
    pub heading: Option<f32>,
    pub knockback: Option<Knockback>,
}

impl Enemy {
    /// Fresh enemy at full health for its archetype (doubled for bosses).
    pub fn spawn(id: EntityId, archetype: Archetype, boss: bool, x: f32, y: f32) -> Self {
        let stats = archetype.stats();
        Enemy {
            id, x, y,
            archetype,
            behavior: stats.behavior,
            health: if boss { boss_health(stats.health) } else { stats.health },
            damage: if boss { boss_damage(stats.damage) } else { stats.damage },
            boss,
            heading: None,
            knockback: None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        self.archetype.stats().symbol
    }

    /// Base XP for killing this enemy (boss doubling is applied by progression).
    pub fn xp_reward(&self) -> u32 {
        self.archetype.stats().xp
    }

    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        (self.x - x).hypot(self.y - y)
    }
}

pub const APPLE_SYMBOL: &str = "🍎";
pub const APPLE_HEAL: i32 = 25;

#[derive(Clone, Debug, PartialEq)]
pub struct Food {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub symbol: &'static str,
    pub heal: i32,
}

impl Food {
    pub fn apple(id: EntityId, x: f32, y: f32) -> Self {
        Food { id, x, y, symbol: APPLE_SYMBOL, heal: APPLE_HEAL }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub health: i32,
    pub stamina: f32,
    pub xp: u32,
    pub level: u32,
    /// Time of the last collision damage, for the cooldown window.
    pub last_hit_ms: Option<u64>,
    /// Last movement direction (unit vector); attacks aim along it.
    pub facing: (f32, f32),
    pub alive: bool,
}

impl Player {
    pub fn new(x: f32, y: f32, health: i32, stamina: f32) -> Self {
        Player {
            x, y,
            health,
            stamina,
            xp: 0,
            level: 1,
            last_hit_ms: None,
            facing: (1.0, 0.0),
            alive: true,
        }
    }

    /// Facing as an angle in radians.
    pub fn facing_angle(&self) -> f32 {
        self.facing.1.atan2(self.facing.0)
    }
}

// ── Effects ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EffectKind {
    /// Sword swing / attack arc around the player.
    Swing,
    /// Flash on an enemy that was hit.
    Hit,
    /// Flash on the player after taking damage.
    PlayerHit,
}

/// Short-lived presentational record. Created by combat, pruned once
/// `now - start_ms >= duration_ms`. Renderers only read these.
#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    pub id: u32,
    pub kind: EffectKind,
    pub x: f32,
    pub y: f32,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub symbol: &'static str,
    pub rotation: Option<f32>,
    pub scale: Option<f32>,
    pub color: Option<(u8, u8, u8)>,
}

impl Effect {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    /// 0.0 at start → 1.0 at expiry. Renderers derive opacity/scale from it.
    pub fn progress(&self, now_ms: u64) -> f32 {
        if self.duration_ms == 0 { return 1.0; }
        let elapsed = now_ms.saturating_sub(self.start_ms) as f32;
        (elapsed / self.duration_ms as f32).min(1.0)
    }
}
