//! Per-cell color grid derived from a heightmap and a biome table.

use super::{BiomeTable, Rgba8};
use crate::heightmap::Heightmap;

/// A row-major RGBA8 image with the same dimensions as its source heightmap.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorMap {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl ColorMap {
    /// Classify every cell of `heightmap` through `table`.
    pub fn from_heightmap(heightmap: &Heightmap, table: &BiomeTable) -> Self {
        let pixels = heightmap
            .samples()
            .iter()
            .map(|&h| table.classify(h))
            .collect();
        Self {
            width: heightmap.width(),
            height: heightmap.height(),
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color of column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get(&self, x: u32, y: u32) -> Rgba8 {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Raw RGBA bytes, `width * height * 4` long.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Number of distinct colors (alpha included) present in the map.
    pub fn unique_color_count(&self) -> usize {
        let mut colors: Vec<Rgba8> = self.pixels.clone();
        colors.sort_unstable_by_key(|c| c.to_array());
        colors.dedup();
        colors.len()
    }
}
