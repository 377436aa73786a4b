//! Text renderer for terminals and logs

use sandfall_core::simulation::MaterialId;
use sandfall_core::world::World;

/// Character used for a material
pub fn glyph(material_id: u16) -> char {
    match material_id {
        MaterialId::EMPTY => '.',
        MaterialId::SAND => 's',
        MaterialId::STONE => '#',
        MaterialId::WATER => '~',
        MaterialId::DIRT => 'd',
        MaterialId::COAL => 'c',
        MaterialId::CUSTOM => '*',
        _ => '?',
    }
}

/// Renders one glyph per cell, top row first (y grows upward)
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiRenderer {
    /// Upper-case glyphs for cells that are falling
    pub mark_falling: bool,
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_falling(mut self, mark_falling: bool) -> Self {
        self.mark_falling = mark_falling;
        self
    }

    pub fn render(&self, world: &World) -> String {
        let width = world.width().max(0) as usize;
        let mut out = String::with_capacity((width + 1) * world.height().max(0) as usize);

        for y in (0..world.height()).rev() {
            for x in 0..world.width() {
                let cell = world.get_cell(x, y);
                let c = glyph(cell.material_id);
                if self.mark_falling && cell.is_falling {
                    out.push(c.to_ascii_uppercase());
                } else {
                    out.push(c);
                }
            }
            out.push('\n');
        }
        out
    }
}
