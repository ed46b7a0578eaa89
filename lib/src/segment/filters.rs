//! Composable grayscale filters.
//!
//! Each filter is a pure input to output transform over a byte raster, so
//! pipelines can be reordered, swapped, and tested independently. Window
//! filters clamp coordinates at the borders rather than shrinking the
//! output.

use image::{GrayImage, Luma};
use std::collections::VecDeque;

/// Stretch contrast linearly about the image mean.
///
/// Each value moves away from (factor > 1) or toward (factor < 1) the mean
/// luminance, clamped to the byte range. The mean is rounded to an integer
/// before interpolation.
pub fn stretch_contrast(img: &GrayImage, factor: f32) -> GrayImage {
    let count = img.width() as u64 * img.height() as u64;
    if count == 0 {
        return img.clone();
    }
    let sum: u64 = img.pixels().map(|p| p.0[0] as u64).sum();
    let mean = (sum as f32 / count as f32 + 0.5).floor();

    let mut out = img.clone();
    for p in out.pixels_mut() {
        let v = p.0[0] as f32;
        p.0[0] = (mean + (v - mean) * factor).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Binarize with a strict cutoff: values above `cutoff` become 255,
/// everything else 0.
pub fn threshold(img: &GrayImage, cutoff: u8) -> GrayImage {
    let mut out = img.clone();
    for p in out.pixels_mut() {
        p.0[0] = if p.0[0] > cutoff { 255 } else { 0 };
    }
    out
}

/// Grow bright regions by taking the window maximum.
///
/// `kernel` is the window side length; even values behave like the next
/// odd size down plus one trailing row/column of reach.
pub fn dilate(img: &GrayImage, kernel: u32) -> GrayImage {
    rank_window(img, kernel, true)
}

/// Shrink bright regions by taking the window minimum.
pub fn erode(img: &GrayImage, kernel: u32) -> GrayImage {
    rank_window(img, kernel, false)
}

/// Morphological close: dilate then erode.
///
/// Heals pinholes and hairline gaps in a mask without growing its overall
/// footprint.
pub fn close(img: &GrayImage, kernel: u32) -> GrayImage {
    erode(&dilate(img, kernel), kernel)
}

/// Morphological open: erode then dilate.
///
/// Removes specks smaller than the window without shrinking the surviving
/// regions.
pub fn open(img: &GrayImage, kernel: u32) -> GrayImage {
    dilate(&erode(img, kernel), kernel)
}

/// Keep only the largest 4-connected foreground region of a binary mask.
///
/// Nonzero pixels count as foreground; the surviving component is written
/// as 255 and everything else as 0. Ties keep the component reached first
/// in scan order. An all-zero mask stays all zero.
pub fn largest_component(img: &GrayImage) -> GrayImage {
    let (w, h) = img.dimensions();
    let mut labels = vec![0u32; (w as usize) * (h as usize)];
    let mut next_label = 0u32;
    let mut best_label = 0u32;
    let mut best_size = 0usize;
    let mut queue = VecDeque::new();

    for start_y in 0..h {
        for start_x in 0..w {
            let start_idx = (start_y * w + start_x) as usize;
            if img.get_pixel(start_x, start_y).0[0] == 0 || labels[start_idx] != 0 {
                continue;
            }
            next_label += 1;
            labels[start_idx] = next_label;
            queue.push_back((start_x, start_y));
            let mut size = 0usize;
            while let Some((x, y)) = queue.pop_front() {
                size += 1;
                for (dx, dy) in [(-1i64, 0i64), (1, 0), (0, -1), (0, 1)] {
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                        continue;
                    }
                    let (nx, ny) = (nx as u32, ny as u32);
                    let nidx = (ny * w + nx) as usize;
                    if img.get_pixel(nx, ny).0[0] != 0 && labels[nidx] == 0 {
                        labels[nidx] = next_label;
                        queue.push_back((nx, ny));
                    }
                }
            }
            if size > best_size {
                best_size = size;
                best_label = next_label;
            }
        }
    }

    GrayImage::from_fn(w, h, |x, y| {
        if best_label != 0 && labels[(y * w + x) as usize] == best_label {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Edge response via an 8-neighbor Laplacian kernel, clamped to the byte
/// range. Flat regions map to 0; intensity steps light up on their bright
/// side.
pub fn edge_magnitude(img: &GrayImage) -> GrayImage {
    let (w, h) = img.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        let mut acc = 8 * img.get_pixel(x, y).0[0] as i32;
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let sx = (x as i64 + dx).clamp(0, w as i64 - 1) as u32;
                let sy = (y as i64 + dy).clamp(0, h as i64 - 1) as u32;
                acc -= img.get_pixel(sx, sy).0[0] as i32;
            }
        }
        Luma([acc.clamp(0, 255) as u8])
    })
}

fn rank_window(img: &GrayImage, kernel: u32, pick_max: bool) -> GrayImage {
    let (w, h) = img.dimensions();
    let r = (kernel / 2) as i64;
    GrayImage::from_fn(w, h, |x, y| {
        let mut best = if pick_max { u8::MIN } else { u8::MAX };
        for dy in -r..=r {
            for dx in -r..=r {
                let sx = (x as i64 + dx).clamp(0, w as i64 - 1) as u32;
                let sy = (y as i64 + dy).clamp(0, h as i64 - 1) as u32;
                let v = img.get_pixel(sx, sy).0[0];
                best = if pick_max { best.max(v) } else { best.min(v) };
            }
        }
        Luma([best])
    })
}
