//! The process-image operation.
//!
//! Decodes a client-supplied image, segments the foreground object, and
//! returns the transparent cutout plus its blurred depth map as PNG data
//! URIs ready for a browser preview.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{GrayImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use super::api::{dispatch, ApiRequest, ApiResponse};
use crate::segment::{segment, SegmentParams};
use crate::{CoordF, Error, Result};

/// Wire request for image segmentation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessRequest {
    /// Source image as base64 PNG or JPEG, with or without a data-URI
    /// prefix. Required.
    pub image: Option<String>,
}

/// Pixel dimensions of the processed image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: CoordF,
}

/// Wire response with the cutout and its depth map as PNG data URIs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub segmented_image: String,
    pub depth_map: String,
    pub dimensions: ImageDimensions,
}

/// Segment the request image and derive its depth map.
pub fn process(request: &ProcessRequest) -> Result<ProcessResponse> {
    let payload = request
        .image
        .as_deref()
        .filter(|payload| !payload.trim().is_empty())
        .ok_or_else(|| Error::Validation {
            field: "image".into(),
            message: "no image provided".into(),
        })?;
    let image = decode_image_payload(payload)?;
    let (width, height) = image.dimensions();

    let segmentation = segment(&image, &SegmentParams::default());
    log::info!("segmented {width}x{height} image");

    Ok(ProcessResponse {
        segmented_image: rgba_png_data_uri(&segmentation.cutout)?,
        depth_map: gray_png_data_uri(&segmentation.depth_map)?,
        dimensions: ImageDimensions {
            width,
            height,
            aspect_ratio: width as CoordF / height as CoordF,
        },
    })
}

/// Serve one process-image call from its transport envelope.
pub fn handle_process(request: &ApiRequest) -> ApiResponse {
    dispatch(request, |body| {
        let parsed: ProcessRequest = serde_json::from_str(body)?;
        let response = process(&parsed)?;
        Ok(serde_json::to_string(&response)?)
    })
}

/// Decode a base64 image payload, stripping any data-URI prefix.
///
/// Unlike depth maps this has no fallback; a payload that does not decode
/// is a client error.
fn decode_image_payload(payload: &str) -> Result<RgbaImage> {
    let encoded = match payload.split_once(',') {
        Some((_, data)) => data,
        None => payload,
    };
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|err| Error::Image(format!("invalid base64 image payload: {err}")))?;
    let image = image::load_from_memory(&bytes)
        .map_err(|err| Error::Image(format!("unsupported image data: {err}")))?;
    Ok(image.to_rgba8())
}

fn rgba_png_data_uri(image: &RgbaImage) -> Result<String> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|err| Error::Image(format!("PNG encoding failed: {err}")))?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&bytes)))
}

fn gray_png_data_uri(image: &GrayImage) -> Result<String> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|err| Error::Image(format!("PNG encoding failed: {err}")))?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&bytes)))
}
