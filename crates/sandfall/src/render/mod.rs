//! Headless frame output
//!
//! The engine core has no rendering; these renderers read the grid after a
//! tick and produce text or image frames.

mod ascii;
mod pixel_renderer;

pub use ascii::{AsciiRenderer, glyph};
pub use pixel_renderer::PixelRenderer;
