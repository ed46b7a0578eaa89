//! Grid construction parameters.
//!
//! This module provides the GridParams type containing all configuration
//! for turning a depth field into a relief mesh: grid resolution, depth
//! displacement, back-surface offset, and the optional side-wall, UV, and
//! normal-mode features.

use crate::CoordF;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normal generation strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NormalMode {
    /// One fixed direction per mesh layer: front `(0,0,1)`, back `(0,0,-1)`,
    /// left wall `(-1,0,0)`, right wall `(1,0,0)`. A deliberate
    /// simplification: normals encode which layer a vertex belongs to, not
    /// the local slope of the relief.
    #[default]
    Layer,
    /// Average of adjacent face normals per vertex, oriented to agree with
    /// the layer direction. Follows the actual displaced surface.
    Averaged,
}

/// Parameters controlling relief mesh construction.
///
/// The grid spans a centered `[-1, 1]²` square in x/y regardless of the
/// requested output dimensions; `z` displacement comes from the depth
/// field scaled by `depth_scale`, with the back surface shifted by
/// `back_offset`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    /// Cells per grid side; each layer has `(grid_size + 1)²` vertices.
    pub grid_size: u32,

    /// Multiplier applied to normalized depth for the front surface `z`.
    pub depth_scale: CoordF,

    /// Constant `z` shift of the back surface relative to the front.
    /// Negative values place the back behind the front.
    pub back_offset: CoordF,

    /// Whether to stitch left/right side walls between the layers.
    /// Top and bottom edges stay open either way.
    pub side_walls: bool,

    /// Whether to emit one texture coordinate per vertex.
    pub uvs: bool,

    /// Normal generation strategy.
    pub normal_mode: NormalMode,
}

impl GridParams {
    /// Create parameters with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for the reduced variant used without real depth data:
    /// a coarser grid, no side walls, no texture coordinates.
    pub fn flat() -> Self {
        Self {
            grid_size: 20,
            side_walls: false,
            uvs: false,
            ..Default::default()
        }
    }

    /// Check if parameters are valid.
    pub fn is_valid(&self) -> bool {
        self.grid_size >= 1 && self.depth_scale.is_finite() && self.back_offset.is_finite()
    }

    /// Get the number of vertices in one grid layer.
    pub fn vertices_per_layer(&self) -> usize {
        let side = self.grid_size as usize + 1;
        side * side
    }

    /// Builder method: set grid size.
    pub fn grid_size(mut self, grid_size: u32) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Builder method: set depth scale.
    pub fn depth_scale(mut self, scale: CoordF) -> Self {
        self.depth_scale = scale;
        self
    }

    /// Builder method: set back offset.
    pub fn back_offset(mut self, offset: CoordF) -> Self {
        self.back_offset = offset;
        self
    }

    /// Builder method: enable or disable side walls.
    pub fn side_walls(mut self, side_walls: bool) -> Self {
        self.side_walls = side_walls;
        self
    }

    /// Builder method: enable or disable texture coordinates.
    pub fn uvs(mut self, uvs: bool) -> Self {
        self.uvs = uvs;
        self
    }

    /// Builder method: set the normal generation strategy.
    pub fn normal_mode(mut self, mode: NormalMode) -> Self {
        self.normal_mode = mode;
        self
    }
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            grid_size: 40,
            depth_scale: 0.5,
            back_offset: -0.15,
            side_walls: true,
            uvs: true,
            normal_mode: NormalMode::Layer,
        }
    }
}

impl fmt::Display for GridParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GridParams(grid={}, depth_scale={:.2}, back_offset={:.2}, walls={}, uvs={})",
            self.grid_size, self.depth_scale, self.back_offset, self.side_walls, self.uvs
        )
    }
}
