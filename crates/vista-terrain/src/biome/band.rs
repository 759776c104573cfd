//! Terrain band: a height threshold paired with the color it paints.

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA color, laid out for direct texture upload.
#[repr(C)]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    bytemuck::Pod,
    bytemuck::Zeroable,
)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// A fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

const _: () = assert!(std::mem::size_of::<Rgba8>() == 4);

/// One row of a [`BiomeTable`](super::BiomeTable).
///
/// Covers every normalized height up to and including `threshold` that no
/// earlier band already claimed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainBand {
    /// Human-readable band name (e.g., "shallow_water").
    pub name: String,
    /// Inclusive upper bound on normalized height.
    pub threshold: f32,
    /// Color painted for heights in this band.
    pub color: Rgba8,
}

impl TerrainBand {
    pub fn new(name: impl Into<String>, threshold: f32, color: Rgba8) -> Self {
        Self {
            name: name.into(),
            threshold,
            color,
        }
    }
}
