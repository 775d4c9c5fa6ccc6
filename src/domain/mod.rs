pub mod ai;
pub mod bestiary;
pub mod combat;
pub mod entity;
pub mod progression;
pub mod terrain;
pub mod worldgen;
