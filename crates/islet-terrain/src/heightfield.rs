//! Edge-clamped heightfield lookups over a read-back noise buffer.
//!
//! The backing array is whatever the noise pass produced: single-channel or
//! RGBA, 8-bit or floating point. Only the first channel of each texel is
//! read. 8-bit storage is normalized by `1/255`, floating-point storage is
//! used as-is.

use std::hash::Hasher;

use rustc_hash::FxHasher;

use crate::error::TerrainError;

/// Anything the mesh builder can read heights from.
///
/// Implementors must clamp out-of-range coordinates to the nearest edge
/// texel rather than wrapping or panicking.
pub trait HeightSource {
    /// Number of samples along X.
    fn width(&self) -> usize;
    /// Number of samples along Y.
    fn height(&self) -> usize;
    /// Height at `(x, y)` in `[0, 1]`, edge-clamped.
    fn sample(&self, x: isize, y: isize) -> f32;
}

/// Backing storage of a heightfield, tagged by element type.
#[derive(Clone, Debug, PartialEq)]
pub enum Samples {
    /// Floating-point render target, already in `[0, 1]`.
    F32(Vec<f32>),
    /// 8-bit render target in `0..=255`.
    U8(Vec<u8>),
}

impl Samples {
    fn len(&self) -> usize {
        match self {
            Samples::F32(v) => v.len(),
            Samples::U8(v) => v.len(),
        }
    }

    /// Normalization factor implied by the element type.
    fn scale(&self) -> f32 {
        match self {
            Samples::F32(_) => 1.0,
            Samples::U8(_) => 1.0 / 255.0,
        }
    }
}

/// A 2D grid of scalar height samples, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightfield {
    width: usize,
    height: usize,
    channels: usize,
    samples: Samples,
    scale: f32,
}

impl Heightfield {
    /// Wrap a backing array with `channels` interleaved elements per texel.
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        samples: Samples,
    ) -> Result<Self, TerrainError> {
        if width == 0 || height == 0 || channels == 0 {
            return Err(TerrainError::InvalidDimensions { width, height });
        }
        let expected = width
            .checked_mul(height)
            .and_then(|texels| texels.checked_mul(channels))
            .ok_or(TerrainError::DimensionsOverflow { width, height })?;
        if samples.len() != expected {
            return Err(TerrainError::DataLength {
                expected,
                actual: samples.len(),
            });
        }
        let scale = samples.scale();
        Ok(Self {
            width,
            height,
            channels,
            samples,
            scale,
        })
    }

    /// Single-channel floating-point heights.
    pub fn from_f32(width: usize, height: usize, data: Vec<f32>) -> Result<Self, TerrainError> {
        Self::new(width, height, 1, Samples::F32(data))
    }

    /// Single-channel 8-bit heights.
    pub fn from_u8(width: usize, height: usize, data: Vec<u8>) -> Result<Self, TerrainError> {
        Self::new(width, height, 1, Samples::U8(data))
    }

    /// RGBA floating-point texels; height is the red channel.
    pub fn from_rgba_f32(
        width: usize,
        height: usize,
        data: Vec<f32>,
    ) -> Result<Self, TerrainError> {
        Self::new(width, height, 4, Samples::F32(data))
    }

    /// RGBA 8-bit texels; height is the red channel.
    pub fn from_rgba_u8(width: usize, height: usize, data: Vec<u8>) -> Result<Self, TerrainError> {
        Self::new(width, height, 4, Samples::U8(data))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `1.0` for floating-point storage, `1/255` for 8-bit storage.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Clamp `(x, y)` into the grid, then return the scaled first channel.
    pub fn sample(&self, x: isize, y: isize) -> f32 {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        let index = (x + y * self.width) * self.channels;
        let raw = match &self.samples {
            Samples::F32(v) => v[index],
            Samples::U8(v) => f32::from(v[index]),
        };
        raw * self.scale
    }

    /// Hash of the dimensions and every stored element.
    ///
    /// Two heightfields with equal hashes are treated as the same terrain
    /// input by the frame orchestrator.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write_usize(self.width);
        hasher.write_usize(self.height);
        hasher.write_usize(self.channels);
        match &self.samples {
            Samples::F32(v) => {
                hasher.write_u8(0);
                for s in v {
                    hasher.write_u32(s.to_bits());
                }
            }
            Samples::U8(v) => {
                hasher.write_u8(1);
                hasher.write(v);
            }
        }
        hasher.finish()
    }
}

impl HeightSource for Heightfield {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn sample(&self, x: isize, y: isize) -> f32 {
        Heightfield::sample(self, x, y)
    }
}
