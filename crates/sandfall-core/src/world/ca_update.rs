//! Cellular automata update logic - material movement rules

use glam::IVec2;

use super::movement::MovementResolver;
use super::neighbor_queries::NeighborQueries;
use super::{Grid, SimStats, WorldRng};
use crate::simulation::{Cell, MaterialRule, Materials};

/// Cellular automata updater - applies one material rule to one cell
pub struct CellularAutomataUpdater;

impl CellularAutomataUpdater {
    /// Look up the rule for the cell at `pos` and run it
    ///
    /// Commits at most one swap.
    pub fn update_cell<R: WorldRng>(
        grid: &mut Grid,
        materials: &Materials,
        pos: IVec2,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) {
        let cell = grid.get(pos.x, pos.y);
        if cell.is_empty() {
            return;
        }

        match materials.rule(cell.material_id) {
            MaterialRule::Granular => Self::update_granular(grid, pos, cell, stats, rng),
            MaterialRule::Liquid => Self::update_liquid(grid, pos, cell, stats, rng),
            MaterialRule::Custom => Self::update_custom(grid, pos, cell, stats, rng),
            MaterialRule::Rigid => {}
        }
    }

    /// Update granular material (falls, slides off piles while falling, settles)
    pub fn update_granular<R: WorldRng>(
        grid: &mut Grid,
        pos: IVec2,
        cell: Cell,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) {
        Self::fall_or_settle(grid, pos, cell, false, stats, rng);
    }

    /// Update custom material (granular, plus sideways spread when fluid)
    pub fn update_custom<R: WorldRng>(
        grid: &mut Grid,
        pos: IVec2,
        cell: Cell,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) {
        Self::fall_or_settle(grid, pos, cell, cell.is_fluid, stats, rng);
    }

    /// Update liquid material (falls, flows diagonally, then levels out)
    ///
    /// Liquids leave falling flags alone.
    pub fn update_liquid<R: WorldRng>(
        grid: &mut Grid,
        pos: IVec2,
        cell: Cell,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) {
        let down = MovementResolver::resolve(grid, pos, IVec2::new(0, cell.gravity()), &cell);
        if down != pos {
            Self::commit(grid, pos, down, stats);
            return;
        }

        if Self::try_diagonals(grid, pos, &cell, false, stats) {
            return;
        }

        Self::try_spread(grid, pos, &cell, false, stats, rng);
    }

    fn fall_or_settle<R: WorldRng>(
        grid: &mut Grid,
        pos: IVec2,
        cell: Cell,
        spreads: bool,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) {
        // One draw per cell per tick, taken before any move is tried
        let released = cell.is_released(rng.gen_f32());

        let down = MovementResolver::resolve(grid, pos, IVec2::new(0, cell.gravity()), &cell);
        if down != pos {
            grid.set_falling(pos.x, pos.y, true);
            Self::propagate_falling(grid, pos, stats);
            Self::commit(grid, pos, down, stats);
            return;
        }

        if (cell.is_falling && released) || spreads {
            if Self::try_diagonals(grid, pos, &cell, true, stats) {
                return;
            }
            if spreads && Self::try_spread(grid, pos, &cell, true, stats, rng) {
                return;
            }
        }

        if cell.is_falling {
            grid.set_falling(pos.x, pos.y, false);
            stats.record_cell_settled();
        }
    }

    /// Try down-right, then down-left (relative to the cell's gravity)
    fn try_diagonals(
        grid: &mut Grid,
        pos: IVec2,
        cell: &Cell,
        propagate: bool,
        stats: &mut dyn SimStats,
    ) -> bool {
        for dx in [1, -1] {
            let dest = MovementResolver::resolve(grid, pos, IVec2::new(dx, cell.gravity()), cell);
            if dest != pos {
                if propagate {
                    Self::propagate_falling(grid, pos, stats);
                }
                Self::commit(grid, pos, dest, stats);
                return true;
            }
        }
        false
    }

    /// Flow sideways; a coin flip picks the side when both are open
    fn try_spread<R: WorldRng>(
        grid: &mut Grid,
        pos: IVec2,
        cell: &Cell,
        propagate: bool,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) -> bool {
        let left = MovementResolver::resolve(grid, pos, IVec2::new(-1, 0), cell);
        let right = MovementResolver::resolve(grid, pos, IVec2::new(1, 0), cell);

        let dest = match (left != pos, right != pos) {
            (true, true) => {
                if rng.gen_bool() {
                    right
                } else {
                    left
                }
            }
            (false, true) => right,
            (true, false) => left,
            (false, false) => return false,
        };

        if propagate {
            Self::propagate_falling(grid, pos, stats);
        }
        Self::commit(grid, pos, dest, stats);
        true
    }

    /// Mark every occupied cell around `origin` (and `origin` itself) as falling
    ///
    /// Runs before the swap, so a pile resting on a cell that is about to
    /// leave gets re-evaluated next tick.
    pub fn propagate_falling(grid: &mut Grid, origin: IVec2, stats: &mut dyn SimStats) {
        let mut woken = 0;

        for pos in NeighborQueries::moore_block(grid, origin) {
            let neighbor = grid.get(pos.x, pos.y);
            if neighbor.is_empty() || neighbor.is_falling {
                continue;
            }
            grid.set_falling(pos.x, pos.y, true);
            woken += 1;
        }

        if woken > 0 {
            stats.record_cells_woken(woken);
        }
    }

    fn commit(grid: &mut Grid, from: IVec2, to: IVec2, stats: &mut dyn SimStats) {
        if grid.swap(from.x, from.y, to.x, to.y) {
            stats.record_cell_moved();
            log::trace!("swap ({}, {}) -> ({}, {})", from.x, from.y, to.x, to.y);
        }
    }
}
