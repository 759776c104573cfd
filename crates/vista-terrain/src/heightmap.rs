//! Heightmap construction: fractal noise sampled over a grid, renormalized to `[0, 1]`.

use serde::{Deserialize, Serialize};

use crate::fractal::{Noise2D, NoiseSampler, max_amplitude};

/// Grid size and fractal parameters for heightmap generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightmapParams {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Grid cells per unit of noise space. Larger values zoom in on the noise field.
    pub scale: f32,
    /// Number of noise octaves summed per sample.
    pub octaves: u32,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f32,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f32,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            scale: 100.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// What to do when every sample in the grid has the same value, leaving no
/// range to normalize over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum DegeneratePolicy {
    /// Reject the heightmap with [`HeightmapError::DegenerateRange`].
    #[default]
    Fail,
    /// Fill every cell with this value, clamped to `[0, 1]`.
    Fill(f32),
}

/// Errors produced while building or constructing a heightmap.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HeightmapError {
    #[error("heightmap dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("noise scale must be finite and positive, got {0}")]
    InvalidScale(f32),

    #[error("noise field is constant ({value}) over the whole grid and cannot be normalized")]
    DegenerateRange { value: f32 },

    #[error("noise range [{min}, {max}] is too wide to normalize")]
    RangeOverflow { min: f32, max: f32 },

    #[error("noise produced a non-finite sample at ({x}, {y})")]
    NonFiniteSample { x: u32, y: u32 },

    #[error("expected {expected} samples for the grid, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },

    #[error("sample {index} is {value}, outside [0, 1]")]
    NotNormalized { index: usize, value: f32 },
}

/// Linearly remap `value` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// No clamping is applied. The input range must not be empty.
pub fn map_range(in_min: f32, in_max: f32, out_min: f32, out_max: f32, value: f32) -> f32 {
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

/// A row-major grid of normalized heights in `[0, 1]`.
///
/// Immutable once built. For a heightmap normalized from a non-degenerate
/// noise field the smallest sample is exactly `0.0` and the largest exactly `1.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightmap {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl Heightmap {
    /// Wrap samples that are already normalized.
    ///
    /// # Errors
    ///
    /// Fails if the sample count doesn't match `width * height`, if either
    /// dimension is zero, or if any sample lies outside `[0, 1]`.
    pub fn from_normalized(
        width: u32,
        height: u32,
        samples: Vec<f32>,
    ) -> Result<Self, HeightmapError> {
        validate_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(HeightmapError::SampleCountMismatch {
                expected,
                actual: samples.len(),
            });
        }
        if let Some((index, &value)) = samples
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(HeightmapError::NotNormalized { index, value });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Renormalize raw samples whose extremes are `min` and `max` into `[0, 1]`.
    fn normalize(
        width: u32,
        height: u32,
        mut samples: Vec<f32>,
        min: f32,
        max: f32,
        policy: DegeneratePolicy,
    ) -> Result<Self, HeightmapError> {
        if max <= min {
            match policy {
                DegeneratePolicy::Fail => {
                    return Err(HeightmapError::DegenerateRange { value: min });
                }
                DegeneratePolicy::Fill(value) => {
                    let fill = if value.is_nan() {
                        0.0
                    } else {
                        value.clamp(0.0, 1.0)
                    };
                    tracing::warn!(value = min, fill, "constant noise field; filling heightmap");
                    samples.fill(fill);
                }
            }
        } else if !(max - min).is_finite() {
            return Err(HeightmapError::RangeOverflow { min, max });
        } else {
            for sample in &mut samples {
                *sample = map_range(min, max, 0.0, 1.0, *sample);
            }
        }

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Height at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        self.samples[(y * self.width + x) as usize]
    }

    /// All samples in row-major order.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Smallest and largest sample.
    pub fn min_max(&self) -> (f32, f32) {
        self.samples
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

fn validate_dimensions(width: u32, height: u32) -> Result<(), HeightmapError> {
    if width == 0 || height == 0 {
        return Err(HeightmapError::ZeroDimensions { width, height });
    }
    Ok(())
}

/// Samples a [`NoiseSampler`] over a grid and normalizes the result.
pub struct HeightmapBuilder<N> {
    sampler: NoiseSampler<N>,
    policy: DegeneratePolicy,
}

impl<N: Noise2D> HeightmapBuilder<N> {
    /// Create a builder that applies `policy` to constant noise fields.
    pub fn new(sampler: NoiseSampler<N>, policy: DegeneratePolicy) -> Self {
        Self { sampler, policy }
    }

    /// Build a normalized heightmap.
    ///
    /// Cell `(x, y)` samples the fractal noise at `(x / scale, y / scale)`.
    /// Identical parameters always yield bit-identical output.
    ///
    /// # Errors
    ///
    /// Returns [`HeightmapError`] for zero dimensions, a non-positive scale,
    /// non-finite noise, a sample range too wide for `f32`, or a constant
    /// field under [`DegeneratePolicy::Fail`].
    pub fn build(&self, params: &HeightmapParams) -> Result<Heightmap, HeightmapError> {
        let HeightmapParams {
            width,
            height,
            scale,
            octaves,
            persistence,
            lacunarity,
        } = *params;

        validate_dimensions(width, height)?;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(HeightmapError::InvalidScale(scale));
        }

        let _span = tracing::debug_span!("build_heightmap", width, height, octaves).entered();

        let mut samples = Vec::with_capacity(width as usize * height as usize);
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;

        for y in 0..height {
            for x in 0..width {
                let value = self.sampler.sample_fractal(
                    x as f32 / scale,
                    y as f32 / scale,
                    octaves,
                    persistence,
                    lacunarity,
                );
                if !value.is_finite() {
                    return Err(HeightmapError::NonFiniteSample { x, y });
                }
                min = min.min(value);
                max = max.max(value);
                samples.push(value);
            }
        }

        tracing::debug!(
            min,
            max,
            bound = max_amplitude(octaves, persistence),
            "sampled noise field"
        );

        Heightmap::normalize(width, height, samples, min, max, self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractal::{GradientNoise, NoiseKind};

    struct ConstantNoise(f32);

    impl Noise2D for ConstantNoise {
        fn noise2(&self, _x: f32, _y: f32) -> f32 {
            self.0
        }
    }

    /// Looks up a fixed value per integer grid coordinate.
    struct GridNoise {
        width: usize,
        values: Vec<f32>,
    }

    impl Noise2D for GridNoise {
        fn noise2(&self, x: f32, y: f32) -> f32 {
            self.values[y as usize * self.width + x as usize]
        }
    }

    fn perlin_builder(seed: u32) -> HeightmapBuilder<GradientNoise> {
        HeightmapBuilder::new(
            NoiseSampler::new(GradientNoise::new(NoiseKind::Perlin, seed)),
            DegeneratePolicy::Fail,
        )
    }

    fn small_params() -> HeightmapParams {
        HeightmapParams {
            width: 64,
            height: 48,
            scale: 17.3,
            ..Default::default()
        }
    }

    #[test]
    fn test_normalized_range_is_exactly_unit() {
        let map = perlin_builder(1).build(&small_params()).unwrap();
        let (min, max) = map.min_max();
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
        assert!(map.samples().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_build_is_bitwise_deterministic() {
        let params = small_params();
        let a = perlin_builder(99).build(&params).unwrap();
        let b = perlin_builder(99).build(&params).unwrap();
        let bits_a: Vec<u32> = a.samples().iter().map(|v| v.to_bits()).collect();
        let bits_b: Vec<u32> = b.samples().iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits_a, bits_b);
    }

    #[test]
    fn test_dimensions_and_row_major_layout() {
        let params = HeightmapParams {
            width: 3,
            height: 3,
            scale: 1.0,
            octaves: 1,
            ..Default::default()
        };
        let builder = HeightmapBuilder::new(
            NoiseSampler::new(GridNoise {
                width: 3,
                values: vec![0.0, 0.5, 1.0, 0.2, 0.4, 0.6, 0.8, 0.3, 0.1],
            }),
            DegeneratePolicy::Fail,
        );
        let map = builder.build(&params).unwrap();
        assert_eq!(map.dimensions(), (3, 3));
        // Raw range is already [0, 1], so normalization is the identity.
        assert_eq!(map.get(1, 0), 0.5);
        assert_eq!(map.get(2, 0), 1.0);
        assert_eq!(map.get(0, 2), 0.8);
        assert_eq!(map.get(2, 2), 0.1);
    }

    #[test]
    fn test_normalization_maps_min_and_max() {
        let params = HeightmapParams {
            width: 2,
            height: 2,
            scale: 1.0,
            octaves: 1,
            ..Default::default()
        };
        let builder = HeightmapBuilder::new(
            NoiseSampler::new(GridNoise {
                width: 2,
                values: vec![-2.0, 0.0, 2.0, 1.0],
            }),
            DegeneratePolicy::Fail,
        );
        let map = builder.build(&params).unwrap();
        assert_eq!(map.samples(), &[0.0, 0.5, 1.0, 0.75]);
    }

    #[test]
    fn test_first_cell_minimum_is_tracked() {
        // The global minimum sits in the very first cell.
        let params = HeightmapParams {
            width: 3,
            height: 1,
            scale: 1.0,
            octaves: 1,
            ..Default::default()
        };
        let builder = HeightmapBuilder::new(
            NoiseSampler::new(GridNoise {
                width: 3,
                values: vec![-1.0, 0.5, 0.25],
            }),
            DegeneratePolicy::Fail,
        );
        let map = builder.build(&params).unwrap();
        assert_eq!(map.get(0, 0), 0.0);
        assert_eq!(map.get(1, 0), 1.0);
    }

    #[test]
    fn test_constant_field_fails_by_default() {
        let params = HeightmapParams {
            width: 4,
            height: 4,
            ..Default::default()
        };
        let builder = HeightmapBuilder::new(
            NoiseSampler::new(ConstantNoise(0.3)),
            DegeneratePolicy::Fail,
        );
        let err = builder.build(&params).unwrap_err();
        // Four octaves of 0.3 at persistence 0.5.
        match err {
            HeightmapError::DegenerateRange { value } => {
                assert!((value - 0.5625).abs() < 1e-6, "got {value}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_constant_field_fill_policy() {
        let params = HeightmapParams {
            width: 4,
            height: 4,
            ..Default::default()
        };
        let builder = HeightmapBuilder::new(
            NoiseSampler::new(ConstantNoise(0.3)),
            DegeneratePolicy::Fill(0.5),
        );
        let map = builder.build(&params).unwrap();
        assert_eq!(map.samples().len(), 16);
        assert!(map.samples().iter().all(|&v| v == 0.5));
        assert!(map.samples().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_fill_value_is_clamped() {
        let params = HeightmapParams {
            width: 2,
            height: 2,
            ..Default::default()
        };
        let builder = HeightmapBuilder::new(
            NoiseSampler::new(ConstantNoise(0.0)),
            DegeneratePolicy::Fill(3.0),
        );
        let map = builder.build(&params).unwrap();
        assert!(map.samples().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let params = HeightmapParams {
            width: 0,
            height: 8,
            ..Default::default()
        };
        assert_eq!(
            perlin_builder(0).build(&params),
            Err(HeightmapError::ZeroDimensions {
                width: 0,
                height: 8
            })
        );
    }

    #[test]
    fn test_invalid_scale_rejected() {
        for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let params = HeightmapParams {
                width: 4,
                height: 4,
                scale,
                ..Default::default()
            };
            let result = perlin_builder(0).build(&params);
            assert!(
                matches!(result, Err(HeightmapError::InvalidScale(_))),
                "scale {scale} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_finite_noise_rejected() {
        let params = HeightmapParams {
            width: 2,
            height: 2,
            octaves: 1,
            ..Default::default()
        };
        let builder = HeightmapBuilder::new(
            NoiseSampler::new(ConstantNoise(f32::NAN)),
            DegeneratePolicy::Fill(0.0),
        );
        assert_eq!(
            builder.build(&params),
            Err(HeightmapError::NonFiniteSample { x: 0, y: 0 })
        );
    }

    /// Alternates between two finite extremes whose difference overflows `f32`.
    struct ExtremeNoise;

    impl Noise2D for ExtremeNoise {
        fn noise2(&self, x: f32, _y: f32) -> f32 {
            if x < 0.5 { -3.0e38 } else { 3.0e38 }
        }
    }

    #[test]
    fn test_overflowing_range_rejected() {
        let params = HeightmapParams {
            width: 2,
            height: 1,
            scale: 1.0,
            octaves: 1,
            ..Default::default()
        };
        let builder =
            HeightmapBuilder::new(NoiseSampler::new(ExtremeNoise), DegeneratePolicy::Fail);
        assert!(matches!(
            builder.build(&params),
            Err(HeightmapError::RangeOverflow { .. })
        ));
    }

    #[test]
    fn test_huge_persistence_never_yields_nan() {
        let params = HeightmapParams {
            width: 32,
            height: 32,
            scale: 8.0,
            octaves: 2,
            persistence: 3.0e38,
            ..Default::default()
        };
        match perlin_builder(5).build(&params) {
            Ok(map) => assert!(map.samples().iter().all(|v| (0.0..=1.0).contains(v))),
            Err(err) => assert!(matches!(
                err,
                HeightmapError::RangeOverflow { .. } | HeightmapError::NonFiniteSample { .. }
            )),
        }
    }

    #[test]
    fn test_from_normalized_validation() {
        assert!(Heightmap::from_normalized(2, 2, vec![0.0, 0.5, 1.0, 0.25]).is_ok());
        assert_eq!(
            Heightmap::from_normalized(2, 2, vec![0.0; 3]),
            Err(HeightmapError::SampleCountMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            Heightmap::from_normalized(2, 1, vec![0.0, 1.5]),
            Err(HeightmapError::NotNormalized {
                index: 1,
                value: 1.5
            })
        );
    }

    #[test]
    fn test_map_range() {
        assert_eq!(map_range(0.0, 1.0, 1.0, 10.0, 0.0), 1.0);
        assert_eq!(map_range(0.0, 1.0, 1.0, 10.0, 1.0), 10.0);
        assert_eq!(map_range(-1.0, 1.0, 0.0, 1.0, 0.0), 0.5);
    }

    #[test]
    fn test_params_default_matches_demo_constants() {
        let params = HeightmapParams::default();
        assert_eq!((params.width, params.height), (512, 512));
        assert_eq!(params.scale, 100.0);
        assert_eq!(params.octaves, 4);
        assert_eq!(params.persistence, 0.5);
        assert_eq!(params.lacunarity, 2.0);
    }
}
