//! # Sandfall - falling sand grid simulation
//!
//! Command-line runner around `sandfall-core`: layered configuration,
//! scripted scenarios, and text or PNG output of the grid.

pub mod config;
pub mod render;
pub mod scenario;

// Re-export core modules for convenience
pub use sandfall_core::simulation;
pub use sandfall_core::world;
