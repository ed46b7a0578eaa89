//! Mesh representation and serialization.
//!
//! This module provides the types and functions for finished relief meshes:
//! - [`ReliefMesh`] - Indexed triangle set with per-vertex normals and UVs
//! - [`Face`] - A single triangle
//! - OBJ text writing and reading

mod obj;
mod relief_mesh;

pub use obj::{load_obj, obj_to_string, save_obj, write_obj};
pub use relief_mesh::{Face, ReliefMesh};
