//! Image Processing Integration Tests
//!
//! These tests drive the process-image pipeline through the public handler
//! surface: payload decoding, foreground segmentation, depth-map
//! derivation, and the data-URI response shape. The final test chains the
//! two operations the way a client does, feeding a processed depth map
//! straight into mesh generation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, Rgba, RgbaImage};
use relief::handler::{handle_generate, handle_process, ApiRequest, GenerateResponse, ProcessResponse};
use std::io::Cursor;

/// Dark background with a bright centered square object.
fn scene(width: u32, height: u32, object: u32) -> RgbaImage {
    let lo_x = (width - object) / 2;
    let lo_y = (height - object) / 2;
    RgbaImage::from_fn(width, height, |x, y| {
        if (lo_x..lo_x + object).contains(&x) && (lo_y..lo_y + object).contains(&y) {
            Rgba([220, 220, 220, 255])
        } else {
            Rgba([10, 10, 10, 255])
        }
    })
}

fn scene_uri(width: u32, height: u32, object: u32) -> String {
    let image = scene(width, height, object);
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(&bytes))
}

fn process_body(width: u32, height: u32, object: u32) -> String {
    format!(r#"{{"image":"{}"}}"#, scene_uri(width, height, object))
}

/// POST a body and parse the expected 200 response.
fn post_process(body: &str) -> ProcessResponse {
    let _ = env_logger::builder().is_test(true).try_init();
    let response = handle_process(&ApiRequest::post(body));
    assert_eq!(response.status, 200, "unexpected failure: {}", response.body);
    serde_json::from_str(&response.body).unwrap()
}

fn decode_data_uri(uri: &str) -> Vec<u8> {
    let (_, data) = uri.split_once(',').unwrap();
    STANDARD.decode(data).unwrap()
}

// ============================================================================
// Response shape
// ============================================================================

#[test]
fn test_process_scene_response_shape() {
    let response = post_process(&process_body(64, 64, 24));

    assert!(response.segmented_image.starts_with("data:image/png;base64,"));
    assert!(response.depth_map.starts_with("data:image/png;base64,"));
    assert_eq!(response.dimensions.width, 64);
    assert_eq!(response.dimensions.height, 64);
    assert!((response.dimensions.aspect_ratio - 1.0).abs() < 1e-12);
}

#[test]
fn test_process_nonsquare_aspect_ratio() {
    let response = post_process(&process_body(80, 40, 16));

    assert_eq!(response.dimensions.width, 80);
    assert_eq!(response.dimensions.height, 40);
    assert!((response.dimensions.aspect_ratio - 2.0).abs() < 1e-12);

    // Output rasters keep the source resolution
    let cutout = image::load_from_memory(&decode_data_uri(&response.segmented_image))
        .unwrap()
        .to_rgba8();
    assert_eq!(cutout.dimensions(), (80, 40));
}

// ============================================================================
// Cutout and depth content
// ============================================================================

#[test]
fn test_process_cutout_preserves_object_pixels() {
    let response = post_process(&process_body(64, 64, 24));
    let cutout = image::load_from_memory(&decode_data_uri(&response.segmented_image))
        .unwrap()
        .to_rgba8();

    // Object center keeps its original color and stays opaque
    assert_eq!(cutout.get_pixel(32, 32).0, [220, 220, 220, 255]);

    // All four background corners are cleared to transparent
    for (x, y) in [(1, 1), (62, 1), (1, 62), (62, 62)] {
        assert_eq!(cutout.get_pixel(x, y).0[3], 0, "corner ({x},{y}) not cleared");
    }
}

#[test]
fn test_process_depth_map_is_blurred_brightness() {
    let response = post_process(&process_body(64, 64, 24));
    let depth = image::load_from_memory(&decode_data_uri(&response.depth_map))
        .unwrap()
        .to_luma8();

    let center = depth.get_pixel(32, 32).0[0];
    let corner = depth.get_pixel(1, 1).0[0];
    assert!(center > 150, "object center too dark: {center}");
    assert!(corner < 50, "background corner too bright: {corner}");

    // The object edge bleeds outward instead of stepping, so a pixel just
    // outside the square sits strictly between the two plateaus
    let transition = depth.get_pixel(17, 32).0[0];
    assert!(
        transition > corner + 10 && transition < center - 10,
        "no blur gradient at the object edge: {transition}"
    );
}

// ============================================================================
// Error handling
// ============================================================================

#[test]
fn test_process_missing_image_is_client_error() {
    let response = handle_process(&ApiRequest::post("{}"));
    assert_eq!(response.status, 400);
    let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["field"], "image");
}

#[test]
fn test_process_undecodable_image_is_client_error() {
    let response = handle_process(&ApiRequest::post(r#"{"image":"@@@"}"#));
    assert_eq!(response.status, 400);
    assert!(response.body.contains("error"));
}

#[test]
fn test_process_method_dispatch() {
    let get = ApiRequest {
        method: "GET".into(),
        body: String::new(),
    };
    let response = handle_process(&get);
    assert_eq!(response.status, 405);
    assert_eq!(response.body, r#"{"error":"Method not allowed"}"#);

    let preflight = handle_process(&ApiRequest::options());
    assert_eq!(preflight.status, 200);
    assert_eq!(
        preflight.header("Access-Control-Allow-Methods"),
        Some("POST, OPTIONS")
    );
    assert_eq!(preflight.header("Access-Control-Max-Age"), Some("86400"));
}

// ============================================================================
// Chained operations
// ============================================================================

#[test]
fn test_process_depth_feeds_generate() {
    let processed = post_process(&process_body(64, 64, 24));

    // Feed the derived depth map into generation, as the client does
    let body = format!(
        r#"{{"dimensions":{{"width":{},"height":{}}},"depth_map":"{}"}}"#,
        processed.dimensions.width, processed.dimensions.height, processed.depth_map
    );
    let response = handle_generate(&ApiRequest::post(&body));
    assert_eq!(response.status, 200);

    let generated: GenerateResponse = serde_json::from_str(&response.body).unwrap();
    assert_eq!(generated.stats.vertex_count, 3526);
    assert_eq!(generated.stats.face_count, 6560);

    // The bright object raises the grid center, the dark background stays low
    let center = generated.vertices[20 * 41 + 20][2];
    let corner = generated.vertices[0][2];
    assert!(center > 0.3, "object should displace the surface: {center}");
    assert!(corner < 0.1, "background should stay near the base: {corner}");
}
