//! Scenario actions - grid edits run before ticking

use sandfall_core::simulation::CustomMaterialConfig;
use serde::{Deserialize, Serialize};

/// One edit applied to the world during setup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScenarioAction {
    /// Place a single cell (only into an empty slot, or empty to clear)
    Place { x: i32, y: i32, material: u16 },

    /// Fill an inclusive rectangle
    Fill {
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
        material: u16,
    },

    /// Paint a filled disc
    Paint {
        x: i32,
        y: i32,
        radius: i32,
        material: u16,
    },

    /// Empty the whole grid
    Clear,

    /// Replace the custom material for later placements
    SetCustom { config: CustomMaterialConfig },

    /// Place one custom cell without touching the registered custom material
    PlaceCustom {
        x: i32,
        y: i32,
        config: CustomMaterialConfig,
    },

    /// Advance the simulation in the middle of setup
    Tick { count: u64 },

    /// Write a message to the execution log
    Log { message: String },
}
