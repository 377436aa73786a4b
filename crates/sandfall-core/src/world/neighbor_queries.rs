//! Neighborhood queries

use glam::IVec2;

use super::Grid;

/// Neighbor collection utilities - stateless methods over a grid
pub struct NeighborQueries;

impl NeighborQueries {
    /// Positions of the 3x3 block centred on `center`, clipped to the grid
    ///
    /// Includes `center` itself. Order: x outer, y inner.
    pub fn moore_block(grid: &Grid, center: IVec2) -> Vec<IVec2> {
        let mut positions = Vec::with_capacity(9);

        for x in center.x - 1..=center.x + 1 {
            for y in center.y - 1..=center.y + 1 {
                if grid.contains(x, y) {
                    positions.push(IVec2::new(x, y));
                }
            }
        }

        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_in_interior() {
        let grid = Grid::new(5, 5).unwrap();
        let block = NeighborQueries::moore_block(&grid, IVec2::new(2, 2));
        assert_eq!(block.len(), 9);
        assert_eq!(block[0], IVec2::new(1, 1));
        assert_eq!(block[1], IVec2::new(1, 2));
        assert_eq!(block[8], IVec2::new(3, 3));
    }

    #[test]
    fn test_block_clipped_at_corner() {
        let grid = Grid::new(5, 5).unwrap();
        let block = NeighborQueries::moore_block(&grid, IVec2::new(0, 0));
        assert_eq!(
            block,
            vec![
                IVec2::new(0, 0),
                IVec2::new(0, 1),
                IVec2::new(1, 0),
                IVec2::new(1, 1)
            ]
        );
    }
}
