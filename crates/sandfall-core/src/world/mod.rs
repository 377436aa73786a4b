//! World management - grid storage, movement and the tick engine

mod ca_update;
mod grid;
mod movement;
mod neighbor_queries;
pub mod rng_trait;
pub mod stats;
#[allow(clippy::module_inception)]
mod world;
mod world_config;

pub use ca_update::CellularAutomataUpdater;
pub use grid::{Grid, SwapListener};
pub use movement::MovementResolver;
pub use neighbor_queries::NeighborQueries;
#[cfg(feature = "seeded")]
pub use rng_trait::seeded;
pub use rng_trait::{FixedRng, WorldRng};
pub use stats::{NoopStats, SimStats, TickStats};
pub use world::World;
pub use world_config::{ScanOrder, WorldConfig};
