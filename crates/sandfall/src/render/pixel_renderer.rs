//! CPU-based pixel buffer renderer for headless PNG capture
//!
//! Renders the world to a pixel buffer without GPU dependencies.

use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageBuffer, Rgba};
use sandfall_core::simulation::MaterialId;
use sandfall_core::world::{World, WorldRng, seeded};

/// Default darkening range of per-cell shading
const DEFAULT_SHADE_VARIATION: f32 = 0.15;

/// CPU-based renderer that outputs to a pixel buffer
pub struct PixelRenderer {
    /// Screen pixels per cell edge
    pub scale: usize,
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Largest fraction a cell is darkened by (0 = flat material colors)
    pub shade_variation: f32,
    /// RGBA pixel buffer (4 bytes per pixel)
    pub buffer: Vec<u8>,
}

impl PixelRenderer {
    /// Create a renderer sized for `world`, drawing each cell as a square
    pub fn for_world(world: &World, scale: usize) -> Self {
        let scale = scale.max(1);
        let width = world.width().max(0) as usize * scale;
        let height = world.height().max(0) as usize * scale;
        Self {
            scale,
            width,
            height,
            shade_variation: DEFAULT_SHADE_VARIATION,
            buffer: vec![0u8; width * height * 4],
        }
    }

    pub fn with_shade_variation(mut self, variation: f32) -> Self {
        self.shade_variation = variation.clamp(0.0, 1.0);
        self
    }

    /// Draw every cell with its material color
    ///
    /// Occupied cells get a brightness jitter seeded by their position, so
    /// the same grid always renders the same image.
    pub fn render(&mut self, world: &World) {
        let materials = world.materials();

        for (pos, cell) in world.grid().iter() {
            let mut color = materials.get_color(cell.material_id);
            if cell.material_id != MaterialId::EMPTY && self.shade_variation > 0.0 {
                let seed = ((pos.x as u32 as u64) << 32) | pos.y as u32 as u64;
                let brightness = 1.0 - self.shade_variation * seeded(seed).gen_f32();
                for channel in &mut color[..3] {
                    *channel = (*channel as f32 * brightness).round() as u8;
                }
            }

            // Flip Y for screen coordinates (world Y increases upward)
            let screen_x = pos.x as usize * self.scale;
            let screen_y = (world.height() - 1 - pos.y) as usize * self.scale;
            self.fill_block(screen_x, screen_y, color);
        }
    }

    fn fill_block(&mut self, x0: usize, y0: usize, color: [u8; 4]) {
        for y in y0..(y0 + self.scale).min(self.height) {
            for x in x0..(x0 + self.scale).min(self.width) {
                let idx = (y * self.width + x) * 4;
                self.buffer[idx..idx + 4].copy_from_slice(&color);
            }
        }
    }

    /// Convert RGBA buffer to RGB
    pub fn get_rgb_buffer(&self) -> Vec<u8> {
        self.buffer
            .chunks_exact(4)
            .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
            .collect()
    }

    /// Save the buffer as a PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let img: ImageBuffer<Rgba<u8>, _> =
            ImageBuffer::from_raw(self.width as u32, self.height as u32, self.buffer.clone())
                .context("Failed to create image from buffer")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        img.save(path)
            .with_context(|| format!("Failed to save snapshot: {}", path.display()))?;

        Ok(())
    }
}
