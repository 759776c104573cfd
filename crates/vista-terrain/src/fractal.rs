//! Multi-octave fractal noise over a 2D coherent-noise primitive.
//!
//! [`NoiseSampler`] sums successive octaves of a [`Noise2D`] source, each one
//! sampled at a higher frequency and a lower amplitude than the last, which
//! gives terrain its self-similar detail at several spatial scales.

use noise::{NoiseFn, Perlin, Simplex};
use serde::{Deserialize, Serialize};

/// A deterministic 2D coherent-noise function.
///
/// Implementations must be total over all finite inputs and return values
/// roughly in `[-1, 1]`. The same `(x, y)` must always produce the same value.
pub trait Noise2D {
    /// Sample the noise field at `(x, y)`.
    fn noise2(&self, x: f32, y: f32) -> f32;
}

impl Noise2D for Perlin {
    fn noise2(&self, x: f32, y: f32) -> f32 {
        self.get([x as f64, y as f64]) as f32
    }
}

impl Noise2D for Simplex {
    fn noise2(&self, x: f32, y: f32) -> f32 {
        self.get([x as f64, y as f64]) as f32
    }
}

impl<N: Noise2D + ?Sized> Noise2D for &N {
    fn noise2(&self, x: f32, y: f32) -> f32 {
        (**self).noise2(x, y)
    }
}

/// Which gradient-noise primitive backs terrain generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseKind {
    /// Classic Perlin gradient noise.
    #[default]
    Perlin,
    /// Simplex noise.
    Simplex,
}

/// A seeded gradient-noise primitive chosen at runtime from a [`NoiseKind`].
#[derive(Clone, Debug)]
pub enum GradientNoise {
    Perlin(Perlin),
    Simplex(Simplex),
}

impl GradientNoise {
    /// Create the primitive of the given kind with a fixed seed.
    pub fn new(kind: NoiseKind, seed: u32) -> Self {
        match kind {
            NoiseKind::Perlin => Self::Perlin(Perlin::new(seed)),
            NoiseKind::Simplex => Self::Simplex(Simplex::new(seed)),
        }
    }

    /// The kind of primitive wrapped by this value.
    pub fn kind(&self) -> NoiseKind {
        match self {
            Self::Perlin(_) => NoiseKind::Perlin,
            Self::Simplex(_) => NoiseKind::Simplex,
        }
    }
}

impl Noise2D for GradientNoise {
    fn noise2(&self, x: f32, y: f32) -> f32 {
        match self {
            Self::Perlin(p) => p.noise2(x, y),
            Self::Simplex(s) => s.noise2(x, y),
        }
    }
}

/// Produces fractal (multi-octave) noise values from a [`Noise2D`] primitive.
///
/// Stateless apart from the primitive itself: every call is a pure function of
/// its arguments.
#[derive(Clone, Debug)]
pub struct NoiseSampler<N> {
    noise: N,
}

impl<N: Noise2D> NoiseSampler<N> {
    /// Wrap a noise primitive.
    pub fn new(noise: N) -> Self {
        Self { noise }
    }

    /// Sum `octaves` layers of noise at `(x, y)`.
    ///
    /// Layer `i` is sampled at frequency `lacunarity^i` and weighted by
    /// `persistence^i`. The result is not clamped; its range depends on the
    /// parameters (see [`max_amplitude`]).
    pub fn sample_fractal(
        &self,
        x: f32,
        y: f32,
        octaves: u32,
        persistence: f32,
        lacunarity: f32,
    ) -> f32 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;

        for _ in 0..octaves {
            total += self.noise.noise2(x * frequency, y * frequency) * amplitude;

            amplitude *= persistence;
            frequency *= lacunarity;
        }

        total
    }

    /// The wrapped primitive.
    pub fn noise(&self) -> &N {
        &self.noise
    }
}

/// Geometric sum of the octave amplitudes.
///
/// For a primitive bounded by `[-1, 1]` this bounds the absolute value of
/// [`NoiseSampler::sample_fractal`].
pub fn max_amplitude(octaves: u32, persistence: f32) -> f32 {
    let mut sum = 0.0_f32;
    let mut amp = 1.0_f32;
    for _ in 0..octaves {
        sum += amp.abs();
        amp *= persistence;
    }
    sum
}
