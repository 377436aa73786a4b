//! Movement resolver - how far a cell can travel in one direction

use glam::IVec2;

use super::Grid;
use crate::simulation::Cell;

/// Stateless ray cast over the grid
pub struct MovementResolver;

impl MovementResolver {
    /// Whether `mover` may take the slot at `target`
    ///
    /// The grid border is a wall. Inside the grid only density matters: an
    /// occupied slot is taken when its cell is strictly lighter.
    pub fn can_swap(grid: &Grid, target: IVec2, mover: &Cell) -> bool {
        grid.contains(target.x, target.y) && grid.get(target.x, target.y).density < mover.density
    }

    /// Destination of `mover` at `origin` walking along `direction`
    ///
    /// Probes `origin + direction * (i, j)` with `i` in `1..=movement.x + 1`
    /// (outer) and `j` in `1..=movement.y + 1` (inner). The first blocked probe
    /// ends the walk and the last free probe is returned, or `origin` if the
    /// very first probe is blocked. When nothing blocks, the destination is
    /// `origin + direction * movement`.
    ///
    /// A zero direction component repeats the same probes, so that loop runs
    /// once. A non-zero one leaves the grid within `extent + 1` steps, so the
    /// walk is bounded by the grid size whatever the movement.
    pub fn resolve(grid: &Grid, origin: IVec2, direction: IVec2, mover: &Cell) -> IVec2 {
        let movement = mover.movement;
        let mut previous = origin;

        let outer = Self::steps(movement.x, direction.x, grid.width());
        let inner = Self::steps(movement.y, direction.y, grid.height());

        for i in 1..=outer {
            for j in 1..=inner {
                let probe = IVec2::new(origin.x + direction.x * i, origin.y + direction.y * j);
                if !Self::can_swap(grid, probe, mover) {
                    return previous;
                }
                previous = probe;
            }
        }

        origin + direction * movement
    }

    fn steps(movement: i32, direction: i32, extent: i32) -> i32 {
        let steps = movement.saturating_add(1);
        if direction == 0 {
            steps.min(1)
        } else {
            steps.min(extent.saturating_add(1))
        }
    }
}
