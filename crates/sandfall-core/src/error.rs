//! Construction-time errors
//!
//! Per-tick code never fails: bad coordinates read as empty and writes
//! outside the grid are ignored.

use sandfall_simulation::MaterialError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("grid of {width}x{height} cells does not fit in memory")]
    GridTooLarge { width: i32, height: i32 },

    #[error("invalid custom material: {0}")]
    Material(#[from] MaterialError),
}
