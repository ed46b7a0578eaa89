//! Geometric primitives for mesh construction.
//!
//! This module provides the vector types the rest of the crate builds on:
//! - [`Vec3`] - 3D positions and normals
//! - [`Vec2`] - 2D texture coordinates

mod vector;

pub use vector::{Vec2, Vec3};
