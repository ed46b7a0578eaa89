//! Object segmentation and depth-map preparation.
//!
//! Derives two rasters from an uploaded image: a cutout of the dominant
//! bright object with everything else fully transparent, and a smoothed
//! grayscale depth map that later drives relief displacement. The mask is
//! produced by a fixed sequence of independent filters: contrast stretch,
//! threshold, morphological close, Gaussian soften, binarize.

pub mod filters;

use image::imageops;
use image::{GrayImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// Cutoff for the final mask binarize after softening.
const BINARIZE_CUTOFF: u8 = 127;

/// Parameters for the segmentation pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentParams {
    /// Contrast stretch factor applied before masking.
    pub contrast: f32,
    /// Strict luminance cutoff separating object from background.
    pub mask_cutoff: u8,
    /// Window size of the morphological close that heals mask speckle.
    pub close_kernel: u32,
    /// Gaussian sigma softening the mask edge before the final binarize.
    pub mask_blur_sigma: f32,
    /// Gaussian sigma for the derived depth map.
    pub depth_blur_sigma: f32,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            contrast: 2.0,
            mask_cutoff: 80,
            close_kernel: 5,
            mask_blur_sigma: 3.0,
            depth_blur_sigma: 5.0,
        }
    }
}

/// Product of one segmentation pass.
#[derive(Clone, Debug)]
pub struct Segmentation {
    /// Input image with everything outside the mask fully transparent.
    pub cutout: RgbaImage,
    /// The binary object mask (0 or 255 per pixel).
    pub mask: GrayImage,
    /// Smoothed grayscale raster used as a depth estimate.
    pub depth_map: GrayImage,
}

/// Run the full segmentation pipeline on a decoded image.
pub fn segment(img: &RgbaImage, params: &SegmentParams) -> Segmentation {
    let gray = imageops::grayscale(img);
    let mask = build_mask(&gray, params);
    let cutout = apply_mask(img, &mask);
    let depth_map = imageops::blur(&gray, params.depth_blur_sigma);
    Segmentation {
        cutout,
        mask,
        depth_map,
    }
}

/// Build the binary object mask for a grayscale image.
pub fn build_mask(gray: &GrayImage, params: &SegmentParams) -> GrayImage {
    let boosted = filters::stretch_contrast(gray, params.contrast);
    let binary = filters::threshold(&boosted, params.mask_cutoff);
    let closed = filters::close(&binary, params.close_kernel);
    let softened = imageops::blur(&closed, params.mask_blur_sigma);
    filters::threshold(&softened, BINARIZE_CUTOFF)
}

/// Copy pixels selected by the mask, leaving the rest fully transparent.
///
/// The mask is treated as binary: any nonzero value selects the source
/// pixel. Mask dimensions must match the image.
pub fn apply_mask(img: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    debug_assert_eq!(img.dimensions(), mask.dimensions());
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        if mask.get_pixel(x, y).0[0] > 0 {
            *img.get_pixel(x, y)
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}
