//! Depth-field to mesh conversion.
//!
//! This module provides the grid construction pipeline:
//! - [`GridParams`] - Resolution, displacement, and feature configuration
//! - [`GridBuilder`] - Builds a relief mesh from a depth field
//! - [`NormalMode`] - Per-layer or averaged normal generation

mod builder;
mod params;

pub(crate) use builder::validate_dimension;
pub use builder::GridBuilder;
pub use params::{GridParams, NormalMode};
