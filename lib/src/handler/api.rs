//! Transport-free request and response envelopes.
//!
//! A hosting shim owns the actual HTTP framing; it hands each call over as
//! an [`ApiRequest`] and sends back whatever [`ApiResponse`] comes out.
//! Method dispatch, CORS headers, and the JSON error shape live here so
//! the operation handlers stay pure.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

const ALLOW_ORIGIN: (&str, &str) = ("Access-Control-Allow-Origin", "*");
const CONTENT_TYPE_JSON: (&str, &str) = ("Content-Type", "application/json");

/// A parsed, transport-free request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiRequest {
    /// HTTP-style method name ("POST", "OPTIONS", ...).
    pub method: String,
    /// Raw request body, usually JSON.
    pub body: String,
}

impl ApiRequest {
    /// Create a POST request with the given body.
    pub fn post(body: impl Into<String>) -> Self {
        Self {
            method: "POST".into(),
            body: body.into(),
        }
    }

    /// Create an OPTIONS preflight request.
    pub fn options() -> Self {
        Self {
            method: "OPTIONS".into(),
            body: String::new(),
        }
    }
}

/// A transport-free response envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// Response headers in emission order.
    pub headers: Vec<(String, String)>,
    /// Response body, empty for preflight.
    pub body: String,
}

impl ApiResponse {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The CORS preflight response.
    fn preflight() -> Self {
        Self {
            status: 200,
            headers: vec![
                own(ALLOW_ORIGIN),
                own(("Access-Control-Allow-Methods", "POST, OPTIONS")),
                own(("Access-Control-Allow-Headers", "Content-Type")),
                own(("Access-Control-Max-Age", "86400")),
            ],
            body: String::new(),
        }
    }

    /// A JSON response with the standard header pair.
    fn json(status: u16, body: String) -> Self {
        Self {
            status,
            headers: vec![own(CONTENT_TYPE_JSON), own(ALLOW_ORIGIN)],
            body,
        }
    }
}

fn own(header: (&str, &str)) -> (String, String) {
    (header.0.to_string(), header.1.to_string())
}

/// Machine-readable error body.
#[derive(Debug, Serialize, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

/// Run one operation behind method dispatch and CORS handling.
///
/// OPTIONS short-circuits to the preflight response and anything other
/// than POST is rejected with 405. An empty body is treated as an empty
/// JSON object, matching lenient clients that omit it entirely.
pub(crate) fn dispatch<F>(request: &ApiRequest, op: F) -> ApiResponse
where
    F: FnOnce(&str) -> Result<String>,
{
    if request.method.eq_ignore_ascii_case("OPTIONS") {
        return ApiResponse::preflight();
    }
    if !request.method.eq_ignore_ascii_case("POST") {
        log::warn!("rejected {} request", request.method);
        let err = Error::MethodNotAllowed;
        return ApiResponse::json(status_code(&err), error_body(&err));
    }

    let body = if request.body.trim().is_empty() {
        "{}"
    } else {
        &request.body
    };
    match op(body) {
        Ok(body) => ApiResponse::json(200, body),
        Err(err) => {
            log::warn!("request failed: {err}");
            ApiResponse::json(status_code(&err), error_body(&err))
        }
    }
}

/// HTTP-style status for an error.
fn status_code(err: &Error) -> u16 {
    match err {
        Error::Validation { .. } | Error::Json(_) | Error::Image(_) => 400,
        Error::MethodNotAllowed => 405,
        Error::Mesh(_) | Error::Io(_) => 500,
    }
}

/// Serialize an error into the JSON error shape.
fn error_body(err: &Error) -> String {
    let body = ErrorBody {
        error: err.to_string(),
        field: match err {
            Error::Validation { field, .. } => Some(field.clone()),
            _ => None,
        },
    };
    serde_json::to_string(&body).unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string())
}
