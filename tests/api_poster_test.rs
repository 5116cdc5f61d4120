//! Integration tests for poster retrieval.

mod common;

use axum::http::StatusCode;
use common::{assert_error, assert_ok, assert_png, fixtures, TestApp};
use pretty_assertions::assert_eq;
use serde_json::Value;

#[tokio::test]
async fn test_poster_before_generation_is_not_found() {
    let app = TestApp::small();
    let response = app.get("/api/poster").await;
    assert_error(&response, StatusCode::NOT_FOUND, "No poster has been rendered yet");

    let preview = app.get("/api/poster/preview").await;
    assert_status_not_found(&preview);
}

fn assert_status_not_found(response: &common::app::TestResponse) {
    common::assert_status(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_poster_download_is_named_png() {
    let app = TestApp::small();
    let generated = app
        .generate_poster(
            fixtures::product_shot_png(),
            fixtures::PRODUCT_NAME,
            fixtures::ECO_DESCRIPTION,
        )
        .await;
    assert_ok(&generated);

    let response = app.get("/api/poster").await;
    assert_png(&response);
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"lumen-arc-smart-lamp.png\"")
    );

    let decoded = image::load_from_memory(&response.body).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (216, 270));
}

#[tokio::test]
async fn test_blank_name_uses_default_download_name() {
    let app = TestApp::small();
    app.generate_poster(fixtures::solid_png(8, 8, [5, 5, 5]), "Orbit", "sport")
        .await;
    app.patch_json("/api/copy", serde_json::json!({ "product_name": "  " }))
        .await;

    let response = app.get("/api/poster").await;
    assert_png(&response);
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"adcraft-poster.png\"")
    );
}

#[tokio::test]
async fn test_preview_is_data_url_of_download() {
    let app = TestApp::small();
    app.generate_poster(fixtures::solid_png(8, 8, [5, 5, 5]), "Orbit", "sport")
        .await;

    let preview = app.get("/api/poster/preview").await;
    assert_ok(&preview);
    let json: Value = preview.json();
    assert_eq!(json["file_name"], "orbit.png");

    let data_url = json["data_url"].as_str().unwrap();
    let encoded = data_url.strip_prefix("data:image/png;base64,").unwrap();

    use base64::Engine;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .unwrap();
    let download = app.get("/api/poster").await;
    assert_eq!(bytes, download.body);
}

/// Generate a full-size poster, apply `edit`, and return the poster PNG
async fn poster_after_edit(app: &TestApp, edit: Value) -> Vec<u8> {
    let response = app.patch_json("/api/copy", edit).await;
    assert_ok(&response);
    let poster = app.get("/api/poster").await;
    assert_png(&poster);
    poster.body
}

#[tokio::test]
async fn test_tagline_text_is_drawn_inside_its_column() {
    let app = TestApp::new();
    let generated = app
        .generate_poster(
            fixtures::product_shot_png(),
            fixtures::PRODUCT_NAME,
            fixtures::ECO_DESCRIPTION,
        )
        .await;
    assert_ok(&generated);

    let short = poster_after_edit(&app, serde_json::json!({ "tagline": "." })).await;
    let long = poster_after_edit(
        &app,
        serde_json::json!({
            "tagline": "Crafted for makers who sketch and ship every single day"
        }),
    )
    .await;

    let region = common::changed_region(&short, &long).expect("tagline text should be drawn");
    assert!(region.pixels > 1500, "only {} pixels changed", region.pixels);

    // tagline column: x from 0.12w, 0.76w wide, starting at 0.76h
    let (w, h) = (1080.0_f32, 1350.0_f32);
    assert!(region.min_x as f32 >= w * 0.12 - 2.0, "{region:?}");
    assert!(region.max_x as f32 <= w * 0.88 + 2.0, "{region:?}");
    assert!(region.min_y as f32 >= h * 0.76 - 48.0, "{region:?}");
    // wrapped lines stay above the feature caption
    assert!((region.max_y as f32) < h * 0.88, "{region:?}");
}

#[tokio::test]
async fn test_headline_text_wraps_inside_its_column() {
    let app = TestApp::new();
    let generated = app
        .generate_poster(fixtures::product_shot_png(), "Lumen", fixtures::ECO_DESCRIPTION)
        .await;
    assert_ok(&generated);
    let before = app.get("/api/poster").await;
    assert_png(&before);

    let after = poster_after_edit(
        &app,
        serde_json::json!({ "product_name": "Lumen Arc Smart Lamp Studio Edition" }),
    )
    .await;

    let region =
        common::changed_region(&before.body, &after).expect("headline text should be drawn");
    assert!(region.pixels > 1500, "only {} pixels changed", region.pixels);

    // headline column: x from 0.12w, 0.74w wide
    let (w, h) = (1080.0_f32, 1350.0_f32);
    assert!(region.min_x as f32 >= w * 0.12 - 2.0, "{region:?}");
    assert!(region.max_x as f32 <= w * 0.86 + 2.0, "{region:?}");
    // the longer name needs a second line
    assert!(region.max_y as f32 > h * 0.12 + 59.0, "{region:?}");
    assert!((region.max_y as f32) < h * 0.76, "{region:?}");
}
