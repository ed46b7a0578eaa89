//! Grid mesh construction.
//!
//! The algorithmic core: converts a depth field plus target dimensions
//! into a closed relief mesh. The front layer follows the depth field, the
//! back layer repeats the same relief shifted by a constant offset with
//! mirrored normals and reversed winding, and optional side walls stitch
//! the left and right boundary columns. Vertex identity is
//! (position, normal, UV), so wall vertices are fresh entries even where
//! they coincide with layer vertices in space.

use super::params::{GridParams, NormalMode};
use crate::depth::DepthField;
use crate::geometry::{Vec2, Vec3};
use crate::mesh::ReliefMesh;
use crate::{CoordF, Error, Result};

/// Validate one target dimension (width or height).
///
/// Dimensions carry the client's aspect context and must be present,
/// positive, and finite; they do not change the generated `[-1,1]` span.
pub(crate) fn validate_dimension(value: CoordF, field: &str) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::Validation {
            field: field.into(),
            message: format!("must be a positive finite number, got {value}"),
        });
    }
    Ok(())
}

/// Builds relief meshes from depth fields.
#[derive(Clone, Debug)]
pub struct GridBuilder {
    params: GridParams,
}

impl GridBuilder {
    /// Create a builder with the given parameters.
    pub fn new(params: GridParams) -> Self {
        Self { params }
    }

    /// Get the builder's parameters.
    #[inline]
    pub fn params(&self) -> &GridParams {
        &self.params
    }

    /// Build a relief mesh from a depth field and target dimensions.
    ///
    /// The depth field must be sampled at this builder's grid size. Output
    /// order is fixed: front layer vertices, back layer vertices, then wall
    /// vertices; front faces, back faces, then wall faces. Identical inputs
    /// produce identical meshes.
    pub fn build(&self, field: &DepthField, width: CoordF, height: CoordF) -> Result<ReliefMesh> {
        if !self.params.is_valid() {
            return Err(Error::Validation {
                field: "grid".into(),
                message: format!("invalid parameters: {}", self.params),
            });
        }
        validate_dimension(width, "width")?;
        validate_dimension(height, "height")?;
        if field.grid_size() != self.params.grid_size {
            return Err(Error::Validation {
                field: "depth_map".into(),
                message: format!(
                    "depth field sampled for grid {}, expected {}",
                    field.grid_size(),
                    self.params.grid_size
                ),
            });
        }

        let g = self.params.grid_size;
        let layer = self.params.vertices_per_layer();
        let mut vertex_capacity = 2 * layer;
        let mut face_capacity = 4 * (g as usize) * (g as usize);
        if self.params.side_walls {
            vertex_capacity += 4 * (g as usize + 1);
            face_capacity += 4 * g as usize;
        }
        let mut mesh = ReliefMesh::with_capacity(vertex_capacity, face_capacity);

        // Front layer follows the depth field directly
        self.emit_layer(&mut mesh, field, 0.0, Vec3::new(0.0, 0.0, 1.0));
        self.emit_layer_faces(&mut mesh, 0, false);

        // Back layer repeats the relief shifted back, facing away
        let back_base = mesh.vertex_count() as u32;
        self.emit_layer(
            &mut mesh,
            field,
            self.params.back_offset,
            Vec3::new(0.0, 0.0, -1.0),
        );
        self.emit_layer_faces(&mut mesh, back_base, true);

        if self.params.side_walls {
            self.emit_wall(&mut mesh, field, 0, Vec3::new(-1.0, 0.0, 0.0));
            self.emit_wall(&mut mesh, field, g, Vec3::new(1.0, 0.0, 0.0));
        }

        if self.params.normal_mode == NormalMode::Averaged {
            mesh.recompute_vertex_normals();
        }

        debug_assert!(mesh.validate().is_ok());
        Ok(mesh)
    }

    /// Map grid indices to the centered x/y square.
    ///
    /// Row 0 is the top edge (`y = 1`), column 0 the left edge (`x = -1`).
    fn grid_position(&self, i: u32, j: u32) -> (CoordF, CoordF) {
        let g = self.params.grid_size as CoordF;
        let x = (j as CoordF / g - 0.5) * 2.0;
        let y = (0.5 - i as CoordF / g) * 2.0;
        (x, y)
    }

    /// Texture coordinate for a grid position.
    fn grid_uv(&self, i: u32, j: u32) -> Vec2 {
        let g = self.params.grid_size as CoordF;
        Vec2::new(j as CoordF / g, i as CoordF / g)
    }

    /// Append one full layer of vertices at the given z shift.
    fn emit_layer(&self, mesh: &mut ReliefMesh, field: &DepthField, z_shift: CoordF, normal: Vec3) {
        let g = self.params.grid_size;
        for i in 0..=g {
            for j in 0..=g {
                let (x, y) = self.grid_position(i, j);
                let z = field.sample(i, j) * self.params.depth_scale + z_shift;
                let position = Vec3::new(x, y, z);
                if self.params.uvs {
                    mesh.add_vertex_with_uv(position, normal, self.grid_uv(i, j));
                } else {
                    mesh.add_vertex(position, normal);
                }
            }
        }
    }

    /// Append the two triangles per cell for one layer.
    ///
    /// Each cell `(i, j)` spans corners `v1` (top-left), `v2` (top-right),
    /// `v3` (bottom-left), `v4` (bottom-right). The front layer emits
    /// `(v1,v2,v3)` and `(v2,v4,v3)`; the back layer reverses to
    /// `(v1,v3,v2)` and `(v2,v3,v4)` so the two surfaces face away from
    /// each other.
    fn emit_layer_faces(&self, mesh: &mut ReliefMesh, base: u32, reversed: bool) {
        let g = self.params.grid_size;
        let side = g + 1;
        for i in 0..g {
            for j in 0..g {
                let idx = base + i * side + j;
                let v1 = idx;
                let v2 = idx + 1;
                let v3 = idx + side;
                let v4 = idx + side + 1;
                if reversed {
                    mesh.add_face_indices(v1, v3, v2);
                    mesh.add_face_indices(v2, v3, v4);
                } else {
                    mesh.add_face_indices(v1, v2, v3);
                    mesh.add_face_indices(v2, v4, v3);
                }
            }
        }
    }

    /// Append one side wall along a boundary column.
    ///
    /// Emits the column's front-edge vertices, then its back-edge vertices,
    /// all carrying the wall normal, and stitches one quad per row wound so
    /// the wall's geometric orientation agrees with that normal.
    fn emit_wall(&self, mesh: &mut ReliefMesh, field: &DepthField, column: u32, normal: Vec3) {
        let g = self.params.grid_size;
        let side = g + 1;
        let base = mesh.vertex_count() as u32;

        for z_shift in [0.0, self.params.back_offset] {
            for i in 0..=g {
                let (x, y) = self.grid_position(i, column);
                let z = field.sample(i, column) * self.params.depth_scale + z_shift;
                let position = Vec3::new(x, y, z);
                if self.params.uvs {
                    mesh.add_vertex_with_uv(position, normal, self.grid_uv(i, column));
                } else {
                    mesh.add_vertex(position, normal);
                }
            }
        }

        let left = column == 0;
        for i in 0..g {
            let f0 = base + i;
            let f1 = f0 + 1;
            let b0 = base + side + i;
            let b1 = b0 + 1;
            if left {
                mesh.add_face_indices(f0, b0, f1);
                mesh.add_face_indices(b0, b1, f1);
            } else {
                mesh.add_face_indices(f0, f1, b0);
                mesh.add_face_indices(b0, f1, b1);
            }
        }
    }
}
