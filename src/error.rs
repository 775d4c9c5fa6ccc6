/// Fatal setup errors.
///
/// Everything else the simulation guards against (blocked moves, stamina
/// underflow, health underflow, unknown archetypes) is recovered locally and
/// never reaches the caller as an error.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// The rejection sampler gave up: the map has (almost) no passable cells.
    #[error("no passable cell found after {attempts} attempts; map is unplayable")]
    PlacementExhausted { attempts: u32 },

    #[error("world must be at least 1x1 (got {width}x{height})")]
    EmptyWorld { width: usize, height: usize },
}
