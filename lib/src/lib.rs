//! # relief
//!
//! Converts a 2D image plus a per-pixel depth estimate into a closed 3D
//! triangle mesh exported as Wavefront OBJ text.
//!
//! The pipeline has three stages, executed in sequence per request:
//!
//! 1. [`depth`] resolves an optional depth raster into a normalized
//!    `(grid+1)²` sample field, falling back to a uniform constant when the
//!    payload is missing or unreadable.
//! 2. [`grid`] builds the mesh: a depth-displaced front layer, a back layer
//!    offset behind it, and optional side walls stitching the two together.
//! 3. [`mesh`] holds the indexed mesh aggregate and serializes it to OBJ.
//!
//! [`segment`] provides the image-side preprocessing (object masking and
//! proxy depth derivation) and [`handler`] the stateless request adapters
//! that tie everything to a JSON boundary.
//!
//! ```
//! use relief::mesh::obj_to_string;
//! use relief::{DepthField, GridBuilder, GridParams, FALLBACK_DEPTH};
//!
//! let params = GridParams::flat();
//! let field = DepthField::uniform(params.grid_size, FALLBACK_DEPTH);
//! let mesh = GridBuilder::new(params).build(&field, 100.0, 100.0)?;
//! let obj = obj_to_string(&mesh)?;
//! assert!(obj.starts_with('#'));
//! # Ok::<(), relief::Error>(())
//! ```

pub mod depth;
pub mod geometry;
pub mod grid;
pub mod handler;
pub mod mesh;
pub mod segment;

/// Floating-point coordinate type used throughout the crate.
pub type CoordF = f64;

/// Errors surfaced by mesh construction and the request handlers.
///
/// Depth decoding failures never appear here: the resolver recovers them
/// locally with a uniform fallback field (see [`depth`]).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO failure while reading or writing a mesh file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in a request or response body.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A request field is missing or invalid.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending request field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// Mesh state violated a structural invariant.
    #[error("Mesh error: {0}")]
    Mesh(String),

    /// Raster encode failure outside the fail-soft depth path.
    #[error("Image error: {0}")]
    Image(String),

    /// The handlers only serve POST (and the OPTIONS preflight).
    #[error("Method not allowed")]
    MethodNotAllowed,
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

pub use depth::{DepthField, FALLBACK_DEPTH};
pub use grid::{GridBuilder, GridParams, NormalMode};
pub use mesh::{Face, ReliefMesh};
