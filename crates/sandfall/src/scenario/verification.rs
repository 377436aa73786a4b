//! Verification conditions and state checks for scenarios

use glam::IVec2;
use sandfall_core::simulation::MaterialId;
use sandfall_core::world::{TickStats, World};
use serde::{Deserialize, Serialize};

/// Conditions that can be verified against world state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VerificationCondition {
    // === MATERIAL CHECKS ===
    /// Assert exact material count in region
    MaterialCount {
        material: u16,
        region: Region,
        expected: usize,
        tolerance: Option<usize>, // Allow ±N variance
    },

    /// Assert material count within range
    MaterialCountRange {
        material: u16,
        region: Region,
        min: usize,
        max: usize,
    },

    /// Assert material exists at specific cell
    MaterialAt { x: i32, y: i32, expected: u16 },

    /// Assert no material in region (all empty)
    RegionEmpty { region: Region },

    /// Assert region is filled (no empty cells)
    RegionFilled { region: Region },

    // === MOTION CHECKS ===
    /// Assert the falling flag of one cell
    FallingAt { x: i32, y: i32, expected: bool },

    /// Assert the last tick committed no swap
    Settled,

    /// Assert the number of swaps reported to listeners over the whole run
    SwapCount { min: u64, max: Option<u64> },

    // === LOGICAL OPERATORS ===
    /// All conditions must pass
    All {
        conditions: Vec<VerificationCondition>,
    },

    /// Any condition must pass
    Any {
        conditions: Vec<VerificationCondition>,
    },

    /// Condition must NOT pass
    Not {
        condition: Box<VerificationCondition>,
    },
}

/// Spatial region for verification
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Region {
    /// Rectangular region (inclusive)
    Rect {
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
    },

    /// Circular region
    Circle {
        center_x: i32,
        center_y: i32,
        radius: u32,
    },

    /// Entire grid
    Whole,
}

impl Region {
    /// Positions of the region that lie inside the grid
    pub fn positions(&self, world: &World) -> Vec<IVec2> {
        let mut positions = Vec::new();
        match *self {
            Region::Rect {
                min_x,
                min_y,
                max_x,
                max_y,
            } => {
                for x in min_x..=max_x {
                    for y in min_y..=max_y {
                        positions.push(IVec2::new(x, y));
                    }
                }
            }
            Region::Circle {
                center_x,
                center_y,
                radius,
            } => {
                let r = radius as i32;
                for x in (center_x - r)..=(center_x + r) {
                    for y in (center_y - r)..=(center_y + r) {
                        let dx = x - center_x;
                        let dy = y - center_y;
                        if dx * dx + dy * dy <= r * r {
                            positions.push(IVec2::new(x, y));
                        }
                    }
                }
            }
            Region::Whole => {
                return world.grid().iter().map(|(pos, _)| pos).collect();
            }
        }
        positions.retain(|pos| world.contains(pos.x, pos.y));
        positions
    }
}

/// What the executor observed while ticking
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunObservation {
    /// Counters of the final tick only
    pub last_tick: TickStats,
    /// Swaps reported through the world's swap listener
    pub swaps_observed: u64,
}

/// Result of a verification check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub passed: bool,
    pub message: String,
    pub actual_value: Option<String>, // For debugging
}

impl VerificationCondition {
    /// Evaluate condition against world state
    pub fn evaluate(&self, world: &World, run: &RunObservation) -> VerificationResult {
        match self {
            VerificationCondition::MaterialCount {
                material,
                region,
                expected,
                tolerance,
            } => {
                let actual = count_material_in_region(world, *material, region);
                let tol = tolerance.unwrap_or(0);
                let passed = actual >= expected.saturating_sub(tol) && actual <= expected + tol;

                VerificationResult {
                    passed,
                    message: format!(
                        "Material {} count in {:?}: expected {}±{}, got {}",
                        material, region, expected, tol, actual
                    ),
                    actual_value: Some(actual.to_string()),
                }
            }

            VerificationCondition::MaterialCountRange {
                material,
                region,
                min,
                max,
            } => {
                let actual = count_material_in_region(world, *material, region);
                let passed = actual >= *min && actual <= *max;

                VerificationResult {
                    passed,
                    message: format!(
                        "Material {} count in {:?}: expected {}-{}, got {}",
                        material, region, min, max, actual
                    ),
                    actual_value: Some(actual.to_string()),
                }
            }

            VerificationCondition::MaterialAt { x, y, expected } => {
                let actual = world.get_material(*x, *y);
                let passed = actual == *expected;

                VerificationResult {
                    passed,
                    message: format!(
                        "Material at ({}, {}): expected {}, got {}",
                        x, y, expected, actual
                    ),
                    actual_value: Some(actual.to_string()),
                }
            }

            VerificationCondition::RegionEmpty { region } => {
                let empty = count_material_in_region(world, MaterialId::EMPTY, region);
                let total = region.positions(world).len();
                let passed = empty == total;

                VerificationResult {
                    passed,
                    message: format!(
                        "Region {:?} empty: {} empty / {} total cells",
                        region, empty, total
                    ),
                    actual_value: Some(format!("{}/{}", empty, total)),
                }
            }

            VerificationCondition::RegionFilled { region } => {
                let empty = count_material_in_region(world, MaterialId::EMPTY, region);
                let passed = empty == 0;

                VerificationResult {
                    passed,
                    message: format!("Region {:?} filled: {} empty cells", region, empty),
                    actual_value: Some(empty.to_string()),
                }
            }

            VerificationCondition::FallingAt { x, y, expected } => {
                let cell = world.get_cell(*x, *y);
                let passed = !cell.is_empty() && cell.is_falling == *expected;

                VerificationResult {
                    passed,
                    message: format!(
                        "Falling at ({}, {}): expected {}, got {} (material {})",
                        x, y, expected, cell.is_falling, cell.material_id
                    ),
                    actual_value: Some(cell.is_falling.to_string()),
                }
            }

            VerificationCondition::Settled => {
                let moved = run.last_tick.cells_moved;

                VerificationResult {
                    passed: moved == 0,
                    message: format!("Settled: last tick moved {} cells", moved),
                    actual_value: Some(moved.to_string()),
                }
            }

            VerificationCondition::SwapCount { min, max } => {
                let actual = run.swaps_observed;
                let passed = actual >= *min && max.is_none_or(|max| actual <= max);

                VerificationResult {
                    passed,
                    message: format!(
                        "Swap count: expected {}-{}, got {}",
                        min,
                        max.map_or("any".to_string(), |m| m.to_string()),
                        actual
                    ),
                    actual_value: Some(actual.to_string()),
                }
            }

            VerificationCondition::All { conditions } => {
                let mut all_passed = true;
                let mut messages = Vec::new();

                for cond in conditions {
                    let result = cond.evaluate(world, run);
                    if !result.passed {
                        all_passed = false;
                    }
                    messages.push(format!("  - {}", result.message));
                }

                VerificationResult {
                    passed: all_passed,
                    message: format!("All conditions:\n{}", messages.join("\n")),
                    actual_value: None,
                }
            }

            VerificationCondition::Any { conditions } => {
                let mut any_passed = false;
                let mut messages = Vec::new();

                for cond in conditions {
                    let result = cond.evaluate(world, run);
                    if result.passed {
                        any_passed = true;
                    }
                    messages.push(format!("  - {}", result.message));
                }

                VerificationResult {
                    passed: any_passed,
                    message: format!("Any condition:\n{}", messages.join("\n")),
                    actual_value: None,
                }
            }

            VerificationCondition::Not { condition } => {
                let result = condition.evaluate(world, run);

                VerificationResult {
                    passed: !result.passed,
                    message: format!("NOT ({})", result.message),
                    actual_value: result.actual_value,
                }
            }
        }
    }
}

/// Count material in region
fn count_material_in_region(world: &World, material: u16, region: &Region) -> usize {
    region
        .positions(world)
        .into_iter()
        .filter(|pos| world.get_material(pos.x, pos.y) == material)
        .count()
}
