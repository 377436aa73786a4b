//! World - owns the grid and advances it one tick at a time

use std::collections::BTreeMap;

use glam::IVec2;

use super::ca_update::CellularAutomataUpdater;
use super::{Grid, NoopStats, ScanOrder, SimStats, SwapListener, WorldConfig, WorldRng};
use crate::SimError;
use crate::simulation::{Cell, CustomMaterialConfig, MaterialId, Materials};

/// The simulated grid plus the material table it is updated with
#[derive(Debug)]
pub struct World {
    grid: Grid,

    /// Material definitions
    materials: Materials,

    /// Visiting order of a tick
    scan_order: ScanOrder,

    /// Completed ticks since creation
    tick_count: u64,
}

impl World {
    /// Create an empty world, validating the configuration once
    pub fn new(config: &WorldConfig) -> Result<Self, SimError> {
        let grid = Grid::new(config.width, config.height)?;
        let materials = Materials::with_custom(config.custom.clone())?;

        log::info!(
            "World created: {}x{} cells, {:?} scan",
            config.width,
            config.height,
            config.scan_order
        );

        Ok(Self {
            grid,
            materials,
            scan_order: config.scan_order,
            tick_count: 0,
        })
    }

    /// Create an empty world with default settings
    pub fn with_size(width: i32, height: i32) -> Result<Self, SimError> {
        Self::new(&WorldConfig::with_size(width, height))
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.grid.contains(x, y)
    }

    pub fn materials(&self) -> &Materials {
        &self.materials
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Raw cells in storage order (`index = x * height + y`)
    pub fn cells(&self) -> &[Cell] {
        self.grid.cells()
    }

    pub fn scan_order(&self) -> ScanOrder {
        self.scan_order
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Replace the custom material used by later placements
    ///
    /// Custom cells already in the grid keep their old parameters.
    pub fn set_custom_material(&mut self, config: CustomMaterialConfig) -> Result<(), SimError> {
        self.materials
            .set_custom(config)
            .inspect_err(|e| log::warn!("Rejected custom material: {}", e))?;
        Ok(())
    }

    /// Place a material's prototype at (x, y)
    ///
    /// Placement only succeeds into an empty slot, except that placing
    /// [`MaterialId::EMPTY`] always clears. Out-of-range positions and unknown
    /// ids are ignored. Returns whether the grid changed.
    pub fn set_cell(&mut self, x: i32, y: i32, material_id: u16) -> bool {
        if !self.grid.contains(x, y) {
            return false;
        }
        let Some(prototype) = self.materials.prototype(material_id) else {
            log::debug!("Ignoring unknown material {} at ({}, {})", material_id, x, y);
            return false;
        };
        self.place(x, y, prototype)
    }

    /// Place a one-off custom cell built from `config`
    ///
    /// The registered custom material is left untouched.
    pub fn set_cell_custom(
        &mut self,
        x: i32,
        y: i32,
        config: &CustomMaterialConfig,
    ) -> Result<bool, SimError> {
        config.validate()?;
        Ok(self.grid.contains(x, y) && self.place(x, y, config.prototype()))
    }

    fn place(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if !cell.is_empty() && !self.grid.get(x, y).is_empty() {
            return false;
        }
        self.grid.set(x, y, cell)
    }

    /// Cell at (x, y); the empty cell outside the grid
    pub fn get_cell(&self, x: i32, y: i32) -> Cell {
        self.grid.get(x, y)
    }

    pub fn get_material(&self, x: i32, y: i32) -> u16 {
        self.grid.get(x, y).material_id
    }

    /// Exchange two cells, notifying swap listeners
    pub fn swap(&mut self, x: i32, y: i32, x2: i32, y2: i32) -> bool {
        self.grid.swap(x, y, x2, y2)
    }

    /// Register a callback fired once per committed swap
    pub fn on_swap<F>(&mut self, callback: F)
    where
        F: FnMut(IVec2, IVec2) + 'static,
    {
        self.grid.add_swap_listener(Box::new(callback));
    }

    pub fn add_swap_listener(&mut self, listener: Box<dyn SwapListener>) {
        self.grid.add_swap_listener(listener);
    }

    /// Run one full pass over the grid
    pub fn advance_tick<R: WorldRng>(&mut self, rng: &mut R) {
        self.advance_tick_with_stats(&mut NoopStats, rng);
    }

    /// Run one full pass over the grid, reporting to `stats`
    ///
    /// Single forward pass with no double buffering: a cell moved into a slot
    /// that is scanned later is visited again in the same tick.
    pub fn advance_tick_with_stats<R: WorldRng>(
        &mut self,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) {
        for pos in self.scan_order.positions(self.grid.width(), self.grid.height()) {
            CellularAutomataUpdater::update_cell(&mut self.grid, &self.materials, pos, stats, rng);
        }
        self.tick_count += 1;
        log::trace!("Tick {} complete", self.tick_count);
    }

    /// Fill a disc of `radius` around (cx, cy) through [`World::set_cell`]
    ///
    /// Returns the number of cells placed.
    pub fn paint_circle(&mut self, cx: i32, cy: i32, radius: i32, material_id: u16) -> usize {
        if radius < 0 {
            return 0;
        }

        let mut placed = 0;
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius
                    && self.set_cell(cx + dx, cy + dy, material_id)
                {
                    placed += 1;
                }
            }
        }

        log::debug!(
            "Painted {} cells of material {} at ({}, {}) r={}",
            placed,
            material_id,
            cx,
            cy,
            radius
        );
        placed
    }

    /// Fill the inclusive rectangle between two corners
    pub fn fill_rect(&mut self, a: IVec2, b: IVec2, material_id: u16) -> usize {
        let min = a.min(b);
        let max = a.max(b);

        let mut placed = 0;
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                if self.set_cell(x, y, material_id) {
                    placed += 1;
                }
            }
        }
        placed
    }

    /// Empty every cell; listeners and the tick counter are kept
    pub fn clear(&mut self) {
        self.grid.clear();
        log::debug!("World cleared");
    }

    /// Number of cells per material id, empty included
    pub fn material_counts(&self) -> BTreeMap<u16, usize> {
        let mut counts = BTreeMap::new();
        for cell in self.grid.cells() {
            *counts.entry(cell.material_id).or_insert(0) += 1;
        }
        counts
    }

    /// Number of non-empty cells
    pub fn occupied_count(&self) -> usize {
        self.grid
            .cells()
            .iter()
            .filter(|cell| cell.material_id != MaterialId::EMPTY)
            .count()
    }
}
