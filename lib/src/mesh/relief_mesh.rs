//! Relief mesh data structure.
//!
//! This module provides the ReliefMesh type, an indexed triangle set with
//! one normal per vertex and optional texture coordinates. Faces reference
//! vertices by position in the vertex sequence; a vertex's ordinal also
//! selects its normal (and UV, when present), so the three arrays stay in
//! lock step by construction.

use crate::geometry::{Vec2, Vec3};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single triangle defined by three vertex indices.
///
/// Winding order is meaningful: it selects the outward-facing side and
/// must agree with the normals of the layer the face belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Face {
    /// Indices into the vertex array for the three corners.
    pub indices: [u32; 3],
}

impl Face {
    /// Create a new face from vertex indices.
    #[inline]
    pub const fn new(v0: u32, v1: u32, v2: u32) -> Self {
        Self {
            indices: [v0, v1, v2],
        }
    }

    /// Check if this face is degenerate (has duplicate vertices).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.indices[0] == self.indices[1]
            || self.indices[1] == self.indices[2]
            || self.indices[2] == self.indices[0]
    }
}

impl fmt::Debug for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Face({}, {}, {})",
            self.indices[0], self.indices[1], self.indices[2]
        )
    }
}

/// An indexed triangle mesh with per-vertex normals and optional UVs.
///
/// Vertices, normals, and UVs are parallel arrays: `normals[i]` is the
/// normal of `vertices[i]`, and when texture coordinates are present,
/// `uvs[i]` belongs to the same vertex. Vertices are never deduplicated;
/// positions may repeat when grid layers need distinct normals at the
/// same point.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ReliefMesh {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    /// Empty when the mesh carries no texture coordinates.
    uvs: Vec<Vec2>,
    faces: Vec<Face>,
}

impl ReliefMesh {
    /// Create a new empty mesh.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with preallocated capacity.
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            uvs: Vec::new(),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Get the vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Get the per-vertex normals.
    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Get the texture coordinates (empty when the mesh has none).
    #[inline]
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// Get the faces.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Get the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Check if the mesh carries texture coordinates.
    #[inline]
    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    /// Add a vertex with its normal and return its index.
    pub fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let idx = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        idx
    }

    /// Add a vertex with its normal and texture coordinate, returning its index.
    pub fn add_vertex_with_uv(&mut self, position: Vec3, normal: Vec3, uv: Vec2) -> u32 {
        let idx = self.add_vertex(position, normal);
        self.uvs.push(uv);
        idx
    }

    /// Add a face.
    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// Add a face from vertex indices.
    pub fn add_face_indices(&mut self, v0: u32, v1: u32, v2: u32) {
        self.faces.push(Face::new(v0, v1, v2));
    }

    /// Get a vertex position by index.
    #[inline]
    pub fn vertex(&self, idx: u32) -> Vec3 {
        self.vertices[idx as usize]
    }

    /// Get a vertex normal by index.
    #[inline]
    pub fn normal(&self, idx: u32) -> Vec3 {
        self.normals[idx as usize]
    }

    /// Get the three corner positions of a face.
    #[inline]
    pub fn face_vertices(&self, face_idx: usize) -> [Vec3; 3] {
        let face = &self.faces[face_idx];
        [
            self.vertices[face.indices[0] as usize],
            self.vertices[face.indices[1] as usize],
            self.vertices[face.indices[2] as usize],
        ]
    }

    /// Calculate the geometric normal of a face from its winding.
    pub fn face_normal(&self, face_idx: usize) -> Vec3 {
        let [v0, v1, v2] = self.face_vertices(face_idx);
        let e1 = v1 - v0;
        let e2 = v2 - v0;
        e1.cross(&e2).normalize()
    }

    /// Replace stored normals with the average of adjacent face normals.
    ///
    /// Face contributions are area-weighted (unnormalized cross products)
    /// and flipped where they point against the vertex's stored normal, so
    /// each layer keeps its orientation regardless of winding handedness.
    /// A vertex referenced by no face, or whose incident faces cancel out,
    /// keeps its stored normal.
    pub fn recompute_vertex_normals(&mut self) {
        let mut accum = vec![Vec3::zero(); self.vertices.len()];
        for face in &self.faces {
            let [v0, v1, v2] = [
                self.vertices[face.indices[0] as usize],
                self.vertices[face.indices[1] as usize],
                self.vertices[face.indices[2] as usize],
            ];
            let weighted = (v1 - v0).cross(&(v2 - v0));
            for &idx in &face.indices {
                let idx = idx as usize;
                if weighted.dot(&self.normals[idx]) < 0.0 {
                    accum[idx] = accum[idx] - weighted;
                } else {
                    accum[idx] = accum[idx] + weighted;
                }
            }
        }
        for (normal, sum) in self.normals.iter_mut().zip(accum) {
            if sum.length_squared() > 0.0 {
                *normal = sum.normalize();
            }
        }
    }

    /// Get the axis-aligned bounds as a (min, max) corner pair.
    ///
    /// Returns `None` for a mesh with no vertices.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;
        for v in &self.vertices[1..] {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }
        Some((min, max))
    }

    /// Validate the mesh structure.
    ///
    /// Checks that every face index is in range, that normals stay parallel
    /// to vertices, and that UVs (when present) cover every vertex. A
    /// violation here is a construction bug, not a recoverable input error.
    pub fn validate(&self) -> Result<()> {
        if self.normals.len() != self.vertices.len() {
            return Err(Error::Mesh(format!(
                "Mesh has {} vertices but {} normals",
                self.vertices.len(),
                self.normals.len()
            )));
        }
        if !self.uvs.is_empty() && self.uvs.len() != self.vertices.len() {
            return Err(Error::Mesh(format!(
                "Mesh has {} vertices but {} texture coordinates",
                self.vertices.len(),
                self.uvs.len()
            )));
        }
        let vertex_count = self.vertices.len() as u32;
        for (i, face) in self.faces.iter().enumerate() {
            for &idx in &face.indices {
                if idx >= vertex_count {
                    return Err(Error::Mesh(format!(
                        "Face {} has invalid vertex index {} (only {} vertices)",
                        i, idx, vertex_count
                    )));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ReliefMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ReliefMesh({} vertices, {} faces)",
            self.vertices.len(),
            self.faces.len()
        )
    }
}

impl fmt::Display for ReliefMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ReliefMesh: {} vertices, {} faces",
            self.vertices.len(),
            self.faces.len()
        )?;
        if self.has_uvs() {
            write!(f, ", textured")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> ReliefMesh {
        let mut mesh = ReliefMesh::new();
        mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        mesh.add_face_indices(0, 1, 2);
        mesh
    }

    #[test]
    fn test_face_new() {
        let face = Face::new(0, 1, 2);
        assert_eq!(face.indices, [0, 1, 2]);
    }

    #[test]
    fn test_face_degenerate() {
        assert!(!Face::new(0, 1, 2).is_degenerate());
        assert!(Face::new(0, 0, 2).is_degenerate());
        assert!(Face::new(0, 1, 1).is_degenerate());
        assert!(Face::new(2, 1, 2).is_degenerate());
    }

    #[test]
    fn test_mesh_new() {
        let mesh = ReliefMesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.face_count(), 0);
        assert!(!mesh.has_uvs());
    }

    #[test]
    fn test_mesh_add_vertex() {
        let mut mesh = ReliefMesh::new();
        let a = mesh.add_vertex(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, 1.0));
        let b = mesh.add_vertex(Vec3::new(4.0, 5.0, 6.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.normals().len(), 2);
        assert!(mesh.vertex(1).approx_eq(&Vec3::new(4.0, 5.0, 6.0), 1e-12));
        assert!(mesh.normal(1).approx_eq(&Vec3::new(0.0, 0.0, -1.0), 1e-12));
    }

    #[test]
    fn test_mesh_add_vertex_with_uv() {
        let mut mesh = ReliefMesh::new();
        mesh.add_vertex_with_uv(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec2::new(0.25, 0.75),
        );
        assert!(mesh.has_uvs());
        assert!(mesh.uvs()[0].approx_eq(&Vec2::new(0.25, 0.75), 1e-12));
    }

    #[test]
    fn test_mesh_validate_ok() {
        let mesh = triangle_mesh();
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_mesh_validate_rejects_bad_index() {
        let mut mesh = triangle_mesh();
        mesh.add_face_indices(0, 1, 100);
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_mesh_validate_rejects_uv_mismatch() {
        let mut mesh = triangle_mesh();
        // One UV for three vertices is incoherent
        mesh.add_vertex_with_uv(
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec2::new(1.0, 1.0),
        );
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_face_normal_ccw_faces_up() {
        let mesh = triangle_mesh();
        let n = mesh.face_normal(0);
        assert!(n.approx_eq(&Vec3::new(0.0, 0.0, 1.0), 1e-9));
    }

    #[test]
    fn test_recompute_vertex_normals() {
        let mut mesh = triangle_mesh();
        // Stored normals orthogonal to the face keep the face's own direction
        for i in 0..3 {
            mesh.normals[i] = Vec3::new(1.0, 0.0, 0.0);
        }
        // Unreferenced vertex keeps whatever it carries
        mesh.add_vertex(Vec3::new(9.0, 9.0, 9.0), Vec3::new(0.0, 1.0, 0.0));
        mesh.recompute_vertex_normals();
        for i in 0..3 {
            assert!(mesh.normal(i).approx_eq(&Vec3::new(0.0, 0.0, 1.0), 1e-9));
        }
        assert!(mesh.normal(3).approx_eq(&Vec3::new(0.0, 1.0, 0.0), 1e-12));
    }

    #[test]
    fn test_recompute_vertex_normals_keeps_orientation() {
        // Winding says +z, stored normals say -z; orientation wins
        let mut mesh = triangle_mesh();
        for i in 0..3 {
            mesh.normals[i] = Vec3::new(0.0, 0.0, -1.0);
        }
        mesh.recompute_vertex_normals();
        for i in 0..3 {
            assert!(mesh.normal(i).approx_eq(&Vec3::new(0.0, 0.0, -1.0), 1e-9));
        }
    }

    #[test]
    fn test_mesh_bounds() {
        assert!(ReliefMesh::new().bounds().is_none());

        let mut mesh = ReliefMesh::new();
        mesh.add_vertex(Vec3::new(-1.0, 2.0, 0.5), Vec3::new(0.0, 0.0, 1.0));
        mesh.add_vertex(Vec3::new(3.0, -4.0, 0.25), Vec3::new(0.0, 0.0, 1.0));
        let (min, max) = mesh.bounds().unwrap();
        assert!(min.approx_eq(&Vec3::new(-1.0, -4.0, 0.25), 1e-12));
        assert!(max.approx_eq(&Vec3::new(3.0, 2.0, 0.5), 1e-12));
    }

    #[test]
    fn test_mesh_display() {
        let mesh = triangle_mesh();
        assert_eq!(format!("{mesh}"), "ReliefMesh: 3 vertices, 1 faces");
        assert_eq!(format!("{mesh:?}"), "ReliefMesh(3 vertices, 1 faces)");
    }
}
