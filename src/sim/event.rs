/// Events emitted during a simulation step.
/// The presentation layer consumes these for messages and feedback.

use crate::domain::bestiary::Archetype;
use crate::domain::entity::EntityId;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    EnemyHit { id: EntityId, damage: i32 },
    EnemyKilled { id: EntityId, archetype: Archetype, boss: bool, xp: u32 },
    LevelUp { level: u32 },
    PlayerHurt { by: EntityId, damage: i32 },
    PlayerDied,
    FoodEaten { id: EntityId, heal: i32 },
    FoodSpawned { id: EntityId },
    EnemySpawned { id: EntityId, archetype: Archetype, boss: bool },
}
