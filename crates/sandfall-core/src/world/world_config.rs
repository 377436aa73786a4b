//! World configuration - serializable grid parameters
//!
//! Loaded from RON by the CLI and validated once by [`super::World::new`].

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::simulation::CustomMaterialConfig;

/// Order in which one tick visits grid positions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanOrder {
    /// x outer, y inner (bottom to top within each column)
    #[default]
    ColumnMajor,
    /// y outer, x inner (rows from the bottom up)
    RowMajor,
}

impl ScanOrder {
    /// Every position of a `width` x `height` grid in this order
    pub fn positions(self, width: i32, height: i32) -> Box<dyn Iterator<Item = IVec2>> {
        match self {
            ScanOrder::ColumnMajor => {
                Box::new((0..width).flat_map(move |x| (0..height).map(move |y| IVec2::new(x, y))))
            }
            ScanOrder::RowMajor => {
                Box::new((0..height).flat_map(move |y| (0..width).map(move |x| IVec2::new(x, y))))
            }
        }
    }
}

/// Grid parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: i32,
    pub height: i32,
    pub scan_order: ScanOrder,

    /// Parameters of the custom material (id 100)
    pub custom: CustomMaterialConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            scan_order: ScanOrder::default(),
            custom: CustomMaterialConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Default config with a different size
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}
