//! Cell values stored in the grid
//!
//! A cell is copied out of its material prototype on placement. Only
//! `is_falling` changes afterwards.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::MaterialId;

/// A single cell in the grid
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Material type (0 = empty)
    pub material_id: u16,
    /// Denser cells displace lighter ones
    pub density: i32,
    /// Max cells moved per tick: x is the spread factor, y is gravity
    pub movement: IVec2,
    /// In free-fall (set and cleared by the tick engine)
    pub is_falling: bool,
    /// Chance threshold for a falling cell to settle instead of sliding
    pub inertia_resistance: f32,
    /// Spreads sideways whenever it can
    pub is_fluid: bool,
    /// Falls toward +y
    pub is_anti_gravity: bool,
}

impl Cell {
    pub const EMPTY: Cell = Cell::new(MaterialId::EMPTY, 0);

    /// A cell that never moves on its own
    pub const fn new(material_id: u16, density: i32) -> Self {
        Self {
            material_id,
            density,
            movement: IVec2::ZERO,
            is_falling: false,
            inertia_resistance: 0.0,
            is_fluid: false,
            is_anti_gravity: false,
        }
    }

    /// Add movement parameters to a cell
    pub const fn with_motion(
        mut self,
        movement: IVec2,
        is_falling: bool,
        inertia_resistance: f32,
    ) -> Self {
        self.movement = movement;
        self.is_falling = is_falling;
        self.inertia_resistance = inertia_resistance;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.material_id == MaterialId::EMPTY
    }

    /// Vertical step direction of this cell's gravity
    pub fn gravity(&self) -> i32 {
        if self.is_anti_gravity { 1 } else { -1 }
    }

    /// Whether a uniform draw in [0, 1) lets a falling cell slide sideways
    pub fn is_released(&self, draw: f32) -> bool {
        draw > self.inertia_resistance
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}
