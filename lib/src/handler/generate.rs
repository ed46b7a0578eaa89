//! The generate-3d operation.
//!
//! Turns an optional depth map plus target dimensions into a relief mesh
//! and returns the raw arrays alongside a base64-packed OBJ export. With a
//! readable depth map the full walled, textured variant is built; without
//! one the response falls back to a flat 20x20 preview slab.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::api::{dispatch, ApiRequest, ApiResponse};
use crate::depth::{decode_depth_payload, DepthField, FALLBACK_DEPTH};
use crate::grid::{validate_dimension, GridBuilder, GridParams};
use crate::mesh::obj_to_string;
use crate::{CoordF, Error, Result};

/// Target dimensions of the source image, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: CoordF,
    pub height: CoordF,
}

/// Wire request for mesh generation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateRequest {
    /// Source image dimensions. Required.
    pub dimensions: Option<Dimensions>,
    /// Grayscale depth map as a base64 PNG, with or without a data-URI
    /// prefix. Unreadable payloads fall back to the flat variant.
    pub depth_map: Option<String>,
}

/// Wire response with the mesh arrays and the packed OBJ text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub vertices: Vec<[CoordF; 3]>,
    pub faces: Vec<[u32; 3]>,
    pub normals: Vec<[CoordF; 3]>,
    /// Base64-encoded OBJ document.
    pub obj_file: String,
    pub stats: MeshStats,
}

/// Summary counters for the generated mesh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshStats {
    pub vertex_count: usize,
    pub face_count: usize,
    pub format: String,
}

/// Build a relief mesh for the request.
///
/// Dimension validation happens before the depth payload is touched, so a
/// bad request fails without decoding a potentially large image.
pub fn generate(request: &GenerateRequest) -> Result<GenerateResponse> {
    let dimensions = request.dimensions.ok_or_else(|| Error::Validation {
        field: "dimensions".into(),
        message: "width and height are required".into(),
    })?;
    validate_dimension(dimensions.width, "width")?;
    validate_dimension(dimensions.height, "height")?;

    let decoded = request.depth_map.as_deref().and_then(decode_depth_payload);
    let params = if decoded.is_some() {
        GridParams::default()
    } else {
        GridParams::flat()
    };
    let field = match &decoded {
        Some(image) => DepthField::from_luma(image, params.grid_size),
        None => DepthField::uniform(params.grid_size, FALLBACK_DEPTH),
    };

    let mesh = GridBuilder::new(params).build(&field, dimensions.width, dimensions.height)?;
    let obj = obj_to_string(&mesh)?;
    log::info!(
        "generated {} for {}x{} source",
        mesh,
        dimensions.width,
        dimensions.height
    );

    Ok(GenerateResponse {
        vertices: mesh.vertices().iter().map(|&v| v.into()).collect(),
        faces: mesh.faces().iter().map(|face| face.indices).collect(),
        normals: mesh.normals().iter().map(|&n| n.into()).collect(),
        obj_file: STANDARD.encode(obj),
        stats: MeshStats {
            vertex_count: mesh.vertex_count(),
            face_count: mesh.face_count(),
            format: "OBJ".to_string(),
        },
    })
}

/// Serve one generate-3d call from its transport envelope.
pub fn handle_generate(request: &ApiRequest) -> ApiResponse {
    dispatch(request, |body| {
        let parsed: GenerateRequest = serde_json::from_str(body)?;
        let response = generate(&parsed)?;
        Ok(serde_json::to_string(&response)?)
    })
}
