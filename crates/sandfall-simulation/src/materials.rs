//! Material definitions and registry

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Cell;

/// Vertical movement of every built-in falling material
pub const GRAVITY: i32 = 1;

/// Largest accepted custom movement component
pub const MAX_MOVEMENT: i32 = u16::MAX as i32;

/// Built-in material IDs
pub struct MaterialId;

impl MaterialId {
    pub const EMPTY: u16 = 0;
    pub const SAND: u16 = 1;
    pub const STONE: u16 = 2;
    pub const WATER: u16 = 3;
    pub const DIRT: u16 = 4;
    pub const COAL: u16 = 5;

    /// User-configurable material
    pub const CUSTOM: u16 = 100;
}

/// How the tick engine updates a material
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialRule {
    /// Falls, slides off piles while falling, then settles (sand, dirt, coal)
    Granular,
    /// Falls and seeks level (water)
    Liquid,
    /// Never moves (stone, empty)
    Rigid,
    /// Granular or fluid depending on the cell's own flags
    Custom,
}

impl MaterialRule {
    /// Rigid materials are skipped by the tick engine
    pub fn is_static(self) -> bool {
        self == MaterialRule::Rigid
    }
}

/// Invalid custom material parameters
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MaterialError {
    #[error("movement must not be negative, got ({x}, {y})")]
    NegativeMovement { x: i32, y: i32 },

    #[error("movement components must not exceed {max}, got ({x}, {y})")]
    MovementTooLarge { x: i32, y: i32, max: i32 },

    #[error("inertia resistance must lie in [0, 1], got {0}")]
    ResistanceOutOfRange(f32),

    #[error("density must not be negative, got {0}")]
    NegativeDensity(i32),
}

/// Definition of a material's prototype and presentation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaterialDef {
    pub id: u16,
    pub name: String,
    pub rule: MaterialRule,

    /// Base color (RGBA)
    pub color: [u8; 4],

    /// Cell copied into the grid when this material is placed
    pub prototype: Cell,
}

/// Parameters of the custom material (id 100)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomMaterialConfig {
    pub density: i32,
    /// Spread factor (x) and gravity (y)
    pub movement: IVec2,
    pub inertia_resistance: f32,
    pub fluid: bool,
    pub anti_gravity: bool,
    pub color: [u8; 4],
}

impl Default for CustomMaterialConfig {
    fn default() -> Self {
        Self {
            density: 8,
            movement: IVec2::new(1, GRAVITY),
            inertia_resistance: 0.3,
            fluid: false,
            anti_gravity: false,
            color: [200, 60, 160, 255],
        }
    }
}

impl CustomMaterialConfig {
    pub fn validate(&self) -> Result<(), MaterialError> {
        if self.movement.x < 0 || self.movement.y < 0 {
            return Err(MaterialError::NegativeMovement {
                x: self.movement.x,
                y: self.movement.y,
            });
        }
        if self.movement.x > MAX_MOVEMENT || self.movement.y > MAX_MOVEMENT {
            return Err(MaterialError::MovementTooLarge {
                x: self.movement.x,
                y: self.movement.y,
                max: MAX_MOVEMENT,
            });
        }
        if !(0.0..=1.0).contains(&self.inertia_resistance) {
            return Err(MaterialError::ResistanceOutOfRange(self.inertia_resistance));
        }
        if self.density < 0 {
            return Err(MaterialError::NegativeDensity(self.density));
        }
        Ok(())
    }

    /// Custom cells start out falling
    pub fn prototype(&self) -> Cell {
        let mut cell = Cell::new(MaterialId::CUSTOM, self.density).with_motion(
            self.movement,
            true,
            self.inertia_resistance,
        );
        cell.is_fluid = self.fluid;
        cell.is_anti_gravity = self.anti_gravity;
        cell
    }
}

/// Registry of all materials
#[derive(Clone, Debug)]
pub struct Materials {
    materials: Vec<Option<MaterialDef>>,
    custom: CustomMaterialConfig,
}

impl Materials {
    pub fn new() -> Self {
        let mut materials = Self {
            materials: Vec::new(),
            custom: CustomMaterialConfig::default(),
        };
        materials.register_defaults();
        materials.register_custom();
        materials
    }

    /// Registry whose custom material uses `custom`
    pub fn with_custom(custom: CustomMaterialConfig) -> Result<Self, MaterialError> {
        let mut materials = Self::new();
        materials.set_custom(custom)?;
        Ok(materials)
    }

    fn register_defaults(&mut self) {
        self.register(MaterialDef {
            id: MaterialId::EMPTY,
            name: "empty".to_string(),
            rule: MaterialRule::Rigid,
            color: [69, 69, 69, 255],
            prototype: Cell::EMPTY,
        });

        self.register(MaterialDef {
            id: MaterialId::SAND,
            name: "sand".to_string(),
            rule: MaterialRule::Granular,
            color: [191, 174, 124, 255],
            prototype: Cell::new(MaterialId::SAND, 10).with_motion(
                IVec2::new(1, GRAVITY),
                true,
                0.1,
            ),
        });

        self.register(MaterialDef {
            id: MaterialId::STONE,
            name: "stone".to_string(),
            rule: MaterialRule::Rigid,
            color: [140, 138, 133, 255],
            prototype: Cell::new(MaterialId::STONE, 100),
        });

        self.register(MaterialDef {
            id: MaterialId::WATER,
            name: "water".to_string(),
            rule: MaterialRule::Liquid,
            color: [72, 144, 175, 255],
            prototype: Cell::new(MaterialId::WATER, 5).with_motion(
                IVec2::new(2, GRAVITY),
                false,
                0.0,
            ),
        });

        self.register(MaterialDef {
            id: MaterialId::DIRT,
            name: "dirt".to_string(),
            rule: MaterialRule::Granular,
            color: [83, 70, 61, 255],
            prototype: Cell::new(MaterialId::DIRT, 10).with_motion(
                IVec2::new(1, GRAVITY),
                true,
                0.5,
            ),
        });

        self.register(MaterialDef {
            id: MaterialId::COAL,
            name: "coal".to_string(),
            rule: MaterialRule::Granular,
            color: [17, 19, 19, 255],
            prototype: Cell::new(MaterialId::COAL, 10).with_motion(
                IVec2::new(1, GRAVITY),
                true,
                0.75,
            ),
        });
    }

    fn register_custom(&mut self) {
        self.register(MaterialDef {
            id: MaterialId::CUSTOM,
            name: "custom".to_string(),
            rule: MaterialRule::Custom,
            color: self.custom.color,
            prototype: self.custom.prototype(),
        });
    }

    fn register(&mut self, material: MaterialDef) {
        let id = material.id as usize;

        // Ids are sparse (0-5, then 100)
        if self.materials.len() <= id {
            self.materials.resize(id + 1, None);
        }

        self.materials[id] = Some(material);
    }

    /// Replace the custom material prototype
    ///
    /// Cells already in the grid keep the parameters they were placed with.
    pub fn set_custom(&mut self, custom: CustomMaterialConfig) -> Result<(), MaterialError> {
        custom.validate()?;
        log::info!(
            "Custom material: density {}, movement ({}, {}), resistance {}, fluid {}, anti-gravity {}",
            custom.density,
            custom.movement.x,
            custom.movement.y,
            custom.inertia_resistance,
            custom.fluid,
            custom.anti_gravity
        );
        self.custom = custom;
        self.register_custom();
        Ok(())
    }

    pub fn custom(&self) -> &CustomMaterialConfig {
        &self.custom
    }

    /// Get material definition by ID
    pub fn get(&self, id: u16) -> Option<&MaterialDef> {
        self.materials.get(id as usize).and_then(Option::as_ref)
    }

    /// Prototype cell for a material, `None` for unknown ids
    pub fn prototype(&self, id: u16) -> Option<Cell> {
        self.get(id).map(|def| def.prototype)
    }

    /// Update rule for a material; unknown ids never move
    pub fn rule(&self, id: u16) -> MaterialRule {
        self.get(id).map_or(MaterialRule::Rigid, |def| def.rule)
    }

    /// Get color for a material (magenta for unknown ids)
    pub fn get_color(&self, id: u16) -> [u8; 4] {
        self.get(id).map_or([255, 0, 255, 255], |def| def.color)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialDef> {
        self.materials.iter().flatten()
    }
}

impl Default for Materials {
    fn default() -> Self {
        Self::new()
    }
}
