//! Grid update engine for the Sandfall falling-sand simulator
//!
//! The core owns the cell grid and advances it one tick at a time. Rendering
//! and input live elsewhere and talk to [`world::World`] through its
//! mutation/query API and swap listeners.

pub mod error;
pub mod simulation;
pub mod world;

pub use error::SimError;
