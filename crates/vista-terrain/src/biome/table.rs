//! Biome table: ordered height-threshold lookup from normalized height to color.

use serde::{Deserialize, Serialize};

use super::{Rgba8, TerrainBand};

/// Errors that make a biome table unusable. All are configuration errors,
/// reported once at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BiomeTableError {
    #[error("biome table has no bands")]
    Empty,

    #[error("band '{name}' has non-finite threshold {threshold}")]
    NonFiniteThreshold { name: String, threshold: f32 },

    #[error("band '{name}' threshold {threshold} does not exceed the previous threshold {previous}")]
    NotIncreasing {
        name: String,
        threshold: f32,
        previous: f32,
    },

    #[error("last band '{name}' ends at {threshold}; some band must cover height 1.0")]
    DoesNotCoverMax { name: String, threshold: f32 },
}

/// A validated, ascending sequence of [`TerrainBand`]s.
///
/// Thresholds are strictly increasing and the last one is at least `1.0`, so
/// every normalized height resolves to exactly one band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TerrainBand>", into = "Vec<TerrainBand>")]
pub struct BiomeTable {
    bands: Vec<TerrainBand>,
}

impl BiomeTable {
    /// Validate and wrap a list of bands.
    ///
    /// # Errors
    ///
    /// Returns [`BiomeTableError`] if the list is empty, a threshold is not
    /// finite, thresholds are not strictly increasing, or the last threshold
    /// is below `1.0`.
    pub fn new(bands: Vec<TerrainBand>) -> Result<Self, BiomeTableError> {
        let mut previous: Option<f32> = None;
        for band in &bands {
            if !band.threshold.is_finite() {
                return Err(BiomeTableError::NonFiniteThreshold {
                    name: band.name.clone(),
                    threshold: band.threshold,
                });
            }
            if let Some(previous) = previous
                && band.threshold <= previous
            {
                return Err(BiomeTableError::NotIncreasing {
                    name: band.name.clone(),
                    threshold: band.threshold,
                    previous,
                });
            }
            previous = Some(band.threshold);
        }

        let last = bands.last().ok_or(BiomeTableError::Empty)?;
        if last.threshold < 1.0 {
            return Err(BiomeTableError::DoesNotCoverMax {
                name: last.name.clone(),
                threshold: last.threshold,
            });
        }

        Ok(Self { bands })
    }

    /// The first band whose threshold is at or above `height`, if any.
    pub fn band_for(&self, height: f32) -> Option<&TerrainBand> {
        self.bands.iter().find(|band| height <= band.threshold)
    }

    /// Color for a normalized height.
    ///
    /// Heights are clamped to `[0, 1]` first (NaN counts as `0.0`), so a
    /// validated table always resolves.
    pub fn classify(&self, height: f32) -> Rgba8 {
        let height = if height.is_nan() {
            0.0
        } else {
            height.clamp(0.0, 1.0)
        };
        self.band_for(height)
            .unwrap_or_else(|| self.catch_all())
            .color
    }

    /// The last band, which covers normalized height `1.0`.
    pub fn catch_all(&self) -> &TerrainBand {
        &self.bands[self.bands.len() - 1]
    }

    /// All bands in ascending threshold order.
    pub fn bands(&self) -> &[TerrainBand] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Always `false`; a validated table has at least one band.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

impl TryFrom<Vec<TerrainBand>> for BiomeTable {
    type Error = BiomeTableError;

    fn try_from(bands: Vec<TerrainBand>) -> Result<Self, Self::Error> {
        Self::new(bands)
    }
}

impl From<BiomeTable> for Vec<TerrainBand> {
    fn from(table: BiomeTable) -> Self {
        table.bands
    }
}

impl Default for BiomeTable {
    /// Water, beach, grass, rock and snow, from lowest to highest.
    fn default() -> Self {
        Self {
            bands: vec![
                TerrainBand::new("deep_water", 0.3, Rgba8::opaque(10, 20, 150)),
                TerrainBand::new("shallow_water", 0.5, Rgba8::opaque(10, 50, 250)),
                TerrainBand::new("sand", 0.53, Rgba8::opaque(255, 255, 153)),
                TerrainBand::new("grass", 0.6, Rgba8::opaque(100, 170, 40)),
                TerrainBand::new("grass_dark", 0.65, Rgba8::opaque(100, 140, 30)),
                TerrainBand::new("rock", 0.8, Rgba8::opaque(153, 102, 10)),
                TerrainBand::new("rock_dark", 0.85, Rgba8::opaque(51, 26, 0)),
                TerrainBand::new("snow", 1.0, Rgba8::opaque(200, 190, 210)),
            ],
        }
    }
}
