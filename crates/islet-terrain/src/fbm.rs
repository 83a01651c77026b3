//! Multi-octave fractal Brownian motion (fBm) heightfield generator.
//!
//! CPU rendition of the noise pass that feeds the terrain: composites octaves
//! of simplex noise over a pannable, zoomable window and writes the result
//! into a floating-point [`Heightfield`] in `[0, 1]`.

use noise::{NoiseFn, Simplex};

use crate::error::TerrainError;
use crate::heightfield::Heightfield;

/// Octave parameters for the fBm sum.
#[derive(Clone, Debug, PartialEq)]
pub struct FbmParams {
    /// Seed for the simplex permutation table.
    pub seed: u32,
    /// Number of octaves to composite.
    pub octaves: u32,
    /// Frequency multiplier between successive octaves. Default: 2.0.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves. Default: 0.5.
    pub persistence: f64,
    /// Frequency of the first octave, in cycles per noise-space unit.
    pub base_frequency: f64,
}

impl Default for FbmParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 6,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 0.35,
        }
    }
}

/// What region of noise space to render, and at what resolution.
///
/// Two equal requests always render the same heightfield, so the frame
/// orchestrator compares requests to decide whether to regenerate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseRequest {
    /// Output width in texels.
    pub width: usize,
    /// Output height in texels.
    pub height: usize,
    /// Centre of the window in noise space.
    pub offset: [f32; 2],
    /// Extent of the window in noise-space units.
    pub zoom: f32,
}

impl NoiseRequest {
    /// Noise-space coordinate of the centre of texel `(x, y)`.
    pub fn texel_to_noise(&self, x: usize, y: usize) -> [f64; 2] {
        let u = (x as f64 + 0.5) / self.width as f64 - 0.5;
        let v = (y as f64 + 0.5) / self.height as f64 - 0.5;
        [
            f64::from(self.offset[0]) + f64::from(self.zoom) * u,
            f64::from(self.offset[1]) + f64::from(self.zoom) * v,
        ]
    }
}

/// Renders fBm heightfields.
pub struct FbmGenerator {
    noise: Simplex,
    params: FbmParams,
}

impl FbmGenerator {
    pub fn new(params: FbmParams) -> Self {
        let noise = Simplex::new(params.seed);
        Self { noise, params }
    }

    /// Raw fBm sum at a noise-space point, in `[-max_amplitude, max_amplitude]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.params.base_frequency;
        let mut amplitude = 1.0;

        for _ in 0..self.params.octaves {
            total += self.noise.get([x * frequency, y * frequency]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        total
    }

    /// Geometric sum of the octave amplitudes.
    pub fn max_amplitude(&self) -> f64 {
        let mut sum = 0.0;
        let mut amp = 1.0;
        for _ in 0..self.params.octaves {
            sum += amp;
            amp *= self.params.persistence;
        }
        sum
    }

    /// fBm remapped to `[0, 1]`. Zero octaves yield the mid level `0.5`.
    pub fn sample_normalized(&self, x: f64, y: f64) -> f32 {
        let max_amp = self.max_amplitude();
        if max_amp == 0.0 {
            return 0.5;
        }
        ((self.sample(x, y) / max_amp + 1.0) * 0.5).clamp(0.0, 1.0) as f32
    }

    /// Render a single-channel floating-point heightfield for `request`.
    pub fn render(&self, request: &NoiseRequest) -> Result<Heightfield, TerrainError> {
        if request.width == 0 || request.height == 0 {
            return Err(TerrainError::InvalidDimensions {
                width: request.width,
                height: request.height,
            });
        }

        let texels = request.width.checked_mul(request.height).ok_or(
            TerrainError::DimensionsOverflow {
                width: request.width,
                height: request.height,
            },
        )?;
        let mut data = Vec::with_capacity(texels);
        for y in 0..request.height {
            for x in 0..request.width {
                let [nx, ny] = request.texel_to_noise(x, y);
                data.push(self.sample_normalized(nx, ny));
            }
        }

        tracing::debug!(
            width = request.width,
            height = request.height,
            zoom = request.zoom,
            "rendered fbm heightfield"
        );
        Heightfield::from_f32(request.width, request.height, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn request(width: usize, height: usize) -> NoiseRequest {
        NoiseRequest {
            width,
            height,
            offset: [0.0, 0.0],
            zoom: 10.0,
        }
    }

    #[test]
    fn test_determinism_same_seed_same_request() {
        let a = FbmGenerator::new(FbmParams {
            seed: 42,
            ..Default::default()
        });
        let b = FbmGenerator::new(FbmParams {
            seed: 42,
            ..Default::default()
        });
        let req = request(16, 12);
        assert_eq!(a.render(&req).unwrap(), b.render(&req).unwrap());
    }

    #[test]
    fn test_different_seeds_produce_different_heights() {
        let a = FbmGenerator::new(FbmParams {
            seed: 1,
            ..Default::default()
        });
        let b = FbmGenerator::new(FbmParams {
            seed: 999,
            ..Default::default()
        });
        let ha = a.render(&request(16, 16)).unwrap();
        let hb = b.render(&request(16, 16)).unwrap();
        assert_ne!(ha.content_hash(), hb.content_hash());
    }

    #[test]
    fn test_rendered_heights_in_unit_range() {
        let generator = FbmGenerator::new(FbmParams::default());
        let hf = generator.render(&request(32, 32)).unwrap();
        for y in 0..32 {
            for x in 0..32 {
                let h = hf.sample(x, y);
                assert!((0.0..=1.0).contains(&h), "height {h} at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_render_matches_requested_size() {
        let generator = FbmGenerator::new(FbmParams::default());
        let hf = generator.render(&request(7, 5)).unwrap();
        assert_eq!(hf.width(), 7);
        assert_eq!(hf.height(), 5);
        assert_eq!(hf.scale(), 1.0);
    }

    #[test]
    fn test_zero_sized_request_rejected() {
        let generator = FbmGenerator::new(FbmParams::default());
        assert!(matches!(
            generator.render(&request(0, 8)),
            Err(TerrainError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_overflowing_request_rejected() {
        let generator = FbmGenerator::new(FbmParams::default());
        assert!(matches!(
            generator.render(&request(usize::MAX, 2)),
            Err(TerrainError::DimensionsOverflow { .. })
        ));
    }

    #[test]
    fn test_offset_pans_the_window() {
        let generator = FbmGenerator::new(FbmParams::default());
        let base = generator.render(&request(8, 8)).unwrap();
        let panned = generator
            .render(&NoiseRequest {
                offset: [3.0, -2.0],
                ..request(8, 8)
            })
            .unwrap();
        assert_ne!(base.content_hash(), panned.content_hash());
    }

    #[test]
    fn test_texel_centres_span_zoom_window() {
        let req = NoiseRequest {
            width: 4,
            height: 2,
            offset: [1.0, 2.0],
            zoom: 8.0,
        };
        let [x0, y0] = req.texel_to_noise(0, 0);
        let [x3, y1] = req.texel_to_noise(3, 1);
        assert!((x0 - (1.0 - 3.0)).abs() < EPSILON);
        assert!((x3 - (1.0 + 3.0)).abs() < EPSILON);
        assert!((y0 - (2.0 - 2.0)).abs() < EPSILON);
        assert!((y1 - (2.0 + 2.0)).abs() < EPSILON);
    }

    #[test]
    fn test_max_amplitude_calculation() {
        let generator = FbmGenerator::new(FbmParams {
            octaves: 4,
            persistence: 0.5,
            ..Default::default()
        });
        assert!((generator.max_amplitude() - 1.875).abs() < EPSILON);
    }

    #[test]
    fn test_zero_octaves_is_mid_level() {
        let generator = FbmGenerator::new(FbmParams {
            octaves: 0,
            ..Default::default()
        });
        assert_eq!(generator.sample_normalized(12.0, -3.0), 0.5);
    }

    #[test]
    fn test_smooth_gradient_no_discontinuities() {
        let generator = FbmGenerator::new(FbmParams {
            seed: 42,
            ..Default::default()
        });
        let step = 0.001;
        for i in 0..5_000 {
            let x = i as f64 * step;
            let a = generator.sample_normalized(x, 0.0);
            let b = generator.sample_normalized(x + step, 0.0);
            assert!((a - b).abs() < 0.05, "discontinuity at x={x}: {a} vs {b}");
        }
    }
}
