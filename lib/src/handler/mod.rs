//! Stateless request handlers.
//!
//! Each operation is exposed twice: as a typed function over request and
//! response structs, and as a `handle_*` adapter that wraps it in the
//! transport-free [`ApiRequest`]/[`ApiResponse`] envelope with method
//! dispatch, CORS headers, and JSON error mapping.

mod api;
mod generate;
mod process;

pub use api::{ApiRequest, ApiResponse};
pub use generate::{
    generate, handle_generate, Dimensions, GenerateRequest, GenerateResponse, MeshStats,
};
pub use process::{handle_process, process, ImageDimensions, ProcessRequest, ProcessResponse};
