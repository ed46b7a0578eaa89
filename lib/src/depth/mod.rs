//! Depth field resolution.
//!
//! A depth field is the bridge between image space and mesh space: a square
//! grid of normalized samples in `[0, 1]`, one per mesh vertex, resampled
//! from whatever raster the caller supplied.
//!
//! Decoding is deliberately fail-soft. A missing, corrupt, or unsupported
//! depth payload never surfaces as an error; the resolver logs a warning
//! and substitutes a uniform field at [`FALLBACK_DEPTH`]. Mesh generation
//! must never fail solely because depth input was unusable.

use crate::{CoordF, Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::imageops::FilterType;
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Depth value substituted when a payload is missing or unreadable.
pub const FALLBACK_DEPTH: CoordF = 0.5;

/// A square grid of normalized depth samples.
///
/// Stores `(grid_size + 1)²` values in `[0, 1]`, row-major with row 0 at
/// the top edge of the source raster. Every entry is defined; the fallback
/// constructor guarantees this when no real depth data is available.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepthField {
    grid_size: u32,
    samples: Vec<CoordF>,
}

impl DepthField {
    /// Create a field with every sample set to `value`.
    pub fn uniform(grid_size: u32, value: CoordF) -> Self {
        let side = grid_size as usize + 1;
        Self {
            grid_size,
            samples: vec![value; side * side],
        }
    }

    /// Create a field from explicit row-major samples.
    ///
    /// The sample count must be exactly `(grid_size + 1)²`.
    pub fn from_samples(grid_size: u32, samples: Vec<CoordF>) -> Result<Self> {
        let side = grid_size as usize + 1;
        if samples.len() != side * side {
            return Err(Error::Validation {
                field: "samples".into(),
                message: format!(
                    "expected {} samples for grid size {}, got {}",
                    side * side,
                    grid_size,
                    samples.len()
                ),
            });
        }
        Ok(Self { grid_size, samples })
    }

    /// Resample a grayscale raster down to `(grid_size + 1)²` samples.
    ///
    /// Uses bilinear filtering for a deterministic resample at any source
    /// resolution, then maps byte luminance into `[0, 1]`.
    pub fn from_luma(luma: &GrayImage, grid_size: u32) -> Self {
        let side = grid_size + 1;
        let resized = image::imageops::resize(luma, side, side, FilterType::Triangle);
        let samples = resized
            .pixels()
            .map(|p| p.0[0] as CoordF / 255.0)
            .collect();
        Self { grid_size, samples }
    }

    /// Resolve an optional depth payload into a usable field.
    ///
    /// This is the fail-soft composition of [`decode_depth_payload`] and
    /// [`DepthField::from_luma`]: any decode failure or absent payload
    /// yields `uniform(grid_size, FALLBACK_DEPTH)`.
    pub fn resolve(payload: Option<&str>, grid_size: u32) -> Self {
        match payload.and_then(decode_depth_payload) {
            Some(luma) => Self::from_luma(&luma, grid_size),
            None => Self::uniform(grid_size, FALLBACK_DEPTH),
        }
    }

    /// Grid size this field was sampled for.
    #[inline]
    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    /// Samples per side (`grid_size + 1`).
    #[inline]
    pub fn side(&self) -> u32 {
        self.grid_size + 1
    }

    /// Sample at grid row `i`, column `j`.
    #[inline]
    pub fn sample(&self, i: u32, j: u32) -> CoordF {
        self.samples[(i * self.side() + j) as usize]
    }

    /// All samples in row-major order.
    #[inline]
    pub fn samples(&self) -> &[CoordF] {
        &self.samples
    }
}

/// Decode a base64 depth raster into a grayscale image.
///
/// Accepts bare base64 or a `data:image/...;base64,` URI; the scheme marker
/// up to the first comma is stripped before decoding. Every failure path
/// logs one warning and returns `None` so callers can substitute the
/// uniform fallback.
pub fn decode_depth_payload(payload: &str) -> Option<GrayImage> {
    let encoded = match payload.split_once(',') {
        Some((_, rest)) => rest,
        None => payload,
    };

    let bytes = match STANDARD.decode(encoded.trim()) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("depth payload is not valid base64: {err}");
            return None;
        }
    };

    match image::load_from_memory(&bytes) {
        Ok(img) => Some(img.to_luma8()),
        Err(err) => {
            log::warn!("depth payload did not decode as an image: {err}");
            None
        }
    }
}
