//! Simulation statistics collection trait

use serde::{Deserialize, Serialize};

/// Trait for collecting tick statistics
///
/// The engine reports through this trait so callers decide whether counting
/// is worth the cost.
pub trait SimStats {
    /// A cell was swapped into a new slot
    fn record_cell_moved(&mut self);

    /// A cell found no move and stopped falling
    fn record_cell_settled(&mut self);

    /// Resting cells were switched back to falling by a neighbor's move
    fn record_cells_woken(&mut self, count: usize);
}

/// A no-op implementation for when stats collection is not needed
#[derive(Default)]
pub struct NoopStats;

impl SimStats for NoopStats {
    fn record_cell_moved(&mut self) {}
    fn record_cell_settled(&mut self) {}
    fn record_cells_woken(&mut self, _count: usize) {}
}

/// Running totals over one or more ticks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickStats {
    pub cells_moved: u64,
    pub cells_settled: u64,
    pub cells_woken: u64,
}

impl TickStats {
    /// Add another batch of counters to this one
    pub fn merge(&mut self, other: &TickStats) {
        self.cells_moved += other.cells_moved;
        self.cells_settled += other.cells_settled;
        self.cells_woken += other.cells_woken;
    }

    /// No cell moved
    pub fn is_idle(&self) -> bool {
        self.cells_moved == 0
    }
}

impl SimStats for TickStats {
    fn record_cell_moved(&mut self) {
        self.cells_moved += 1;
    }

    fn record_cell_settled(&mut self) {
        self.cells_settled += 1;
    }

    fn record_cells_woken(&mut self, count: usize) {
        self.cells_woken += count as u64;
    }
}
