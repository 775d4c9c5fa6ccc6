pub mod event;
pub mod respawn;
pub mod spawn;
pub mod step;
pub mod world;
