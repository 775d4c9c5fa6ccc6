//! Wildlands simulation core.
//!
//! Terrain generation, enemy AI, melee combat, player resources and the
//! respawn loop. Renderers (the bundled terminal front-end, or any other)
//! read `WorldState` and drive it through `sim::step`.

pub mod config;
pub mod domain;
pub mod error;
pub mod sim;

pub use config::GameConfig;
pub use error::SimError;
pub use sim::world::WorldState;
