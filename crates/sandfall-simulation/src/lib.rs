//! Cell model and material rule table for Sandfall
//!
//! This crate provides the foundational data types for the grid engine:
//! - Cell values (Cell)
//! - Material definitions (MaterialId, MaterialDef, Materials)
//! - Per-material behavior policy (MaterialRule)
//! - The user-configurable custom material (CustomMaterialConfig)

mod cell;
mod materials;

pub use cell::Cell;
pub use materials::{
    CustomMaterialConfig, GRAVITY, MAX_MOVEMENT, MaterialDef, MaterialError, MaterialId, MaterialRule,
    Materials,
};
