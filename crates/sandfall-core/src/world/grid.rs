//! Grid store - flat cell storage addressed by (x, y)

use glam::IVec2;
use std::fmt;

use crate::SimError;
use crate::simulation::Cell;

/// Receives every swap committed on a grid
///
/// Renderers use this to move their per-cell handles in lockstep with the
/// cell data. Called synchronously, once per swap.
pub trait SwapListener {
    fn on_swap(&mut self, from: IVec2, to: IVec2);
}

impl<F: FnMut(IVec2, IVec2)> SwapListener for F {
    fn on_swap(&mut self, from: IVec2, to: IVec2) {
        self(from, to)
    }
}

/// Fixed-size 2D array of cells
///
/// Cells are stored column by column: `index = x * height + y`. The origin is
/// the bottom-left corner and y grows upward.
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    listeners: Vec<Box<dyn SwapListener>>,
}

impl Grid {
    /// Create a grid with every cell empty
    pub fn new(width: i32, height: i32) -> Result<Self, SimError> {
        if width <= 0 || height <= 0 {
            return Err(SimError::InvalidDimensions { width, height });
        }
        let too_large = SimError::GridTooLarge { width, height };
        let area = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| too_large.clone())?;

        // Capacity overflow and refused allocations are reported, not aborted on
        let mut cells = Vec::new();
        cells.try_reserve_exact(area).map_err(|_| too_large)?;
        cells.resize(area, Cell::EMPTY);

        Ok(Self {
            width,
            height,
            cells,
            listeners: Vec::new(),
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.contains(x, y)
            .then(|| x as usize * self.height as usize + y as usize)
    }

    /// Cell at (x, y)
    ///
    /// Reads outside the grid return the empty cell instead of failing.
    /// Movement checks bounds separately, so the border still acts as a wall.
    pub fn get(&self, x: i32, y: i32) -> Cell {
        self.index(x, y).map_or(Cell::EMPTY, |i| self.cells[i])
    }

    /// Overwrite the cell at (x, y); ignored outside the grid
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Set the per-instance falling flag; ignored outside the grid
    pub fn set_falling(&mut self, x: i32, y: i32, falling: bool) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i].is_falling = falling;
                true
            }
            None => false,
        }
    }

    /// Exchange two cells and notify swap listeners
    ///
    /// Returns false (and notifies nobody) when either position is outside the
    /// grid or both positions are the same.
    pub fn swap(&mut self, x: i32, y: i32, x2: i32, y2: i32) -> bool {
        let (Some(a), Some(b)) = (self.index(x, y), self.index(x2, y2)) else {
            return false;
        };
        if a == b {
            return false;
        }

        self.cells.swap(a, b);

        let from = IVec2::new(x, y);
        let to = IVec2::new(x2, y2);
        for listener in &mut self.listeners {
            listener.on_swap(from, to);
        }
        true
    }

    pub fn add_swap_listener(&mut self, listener: Box<dyn SwapListener>) {
        self.listeners.push(listener);
    }

    /// Reset every cell to empty; listeners stay registered
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Raw cell storage in index order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate positions and cells in storage order (x outer, y inner)
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, &Cell)> + '_ {
        let height = self.height as usize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let pos = IVec2::new((i / height) as i32, (i % height) as i32);
            (pos, cell)
        })
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
