//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a valid PNG image
pub fn assert_png(response: &TestResponse) {
    assert_ok(response);
    assert!(
        response.is_png(),
        "Expected PNG image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..8.min(response.body.len())]
    );
    assert_eq!(
        response.header("content-type"),
        Some("image/png"),
        "Expected Content-Type: image/png"
    );
}

/// Assert an error body carries the given status and user-facing message
pub fn assert_error(response: &TestResponse, expected: StatusCode, message: &str) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"].as_u64(), Some(expected.as_u16() as u64));
    assert_eq!(json["error"].as_str(), Some(message));
}

/// Bounding box and size of the pixels that differ between two PNGs
#[derive(Debug, Clone, Copy)]
pub struct ChangedRegion {
    pub pixels: usize,
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

/// Compare two same-sized PNGs; `None` when they are pixel-identical
pub fn changed_region(before: &[u8], after: &[u8]) -> Option<ChangedRegion> {
    let before = image::load_from_memory(before).expect("decode PNG").to_rgba8();
    let after = image::load_from_memory(after).expect("decode PNG").to_rgba8();
    assert_eq!(before.dimensions(), after.dimensions());

    let mut region: Option<ChangedRegion> = None;
    for (x, y, pixel) in after.enumerate_pixels() {
        let old = before.get_pixel(x, y);
        let differs = pixel
            .0
            .iter()
            .zip(old.0.iter())
            .any(|(a, b)| a.abs_diff(*b) > 8);
        if !differs {
            continue;
        }
        region = Some(match region {
            None => ChangedRegion {
                pixels: 1,
                min_x: x,
                max_x: x,
                min_y: y,
                max_y: y,
            },
            Some(r) => ChangedRegion {
                pixels: r.pixels + 1,
                min_x: r.min_x.min(x),
                max_x: r.max_x.max(x),
                min_y: r.min_y.min(y),
                max_y: r.max_y.max(y),
            },
        });
    }
    region
}
