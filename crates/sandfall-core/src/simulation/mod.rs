//! Material data used by the engine

// Re-export from sandfall-simulation so engine code has one import path
pub use sandfall_simulation::{
    Cell, CustomMaterialConfig, GRAVITY, MAX_MOVEMENT, MaterialDef, MaterialError, MaterialId, MaterialRule,
    Materials,
};
