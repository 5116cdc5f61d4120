//! End-to-end flow tests covering complete user scenarios.

mod common;

use adcraft::services::GenerationOutcome;
use common::{assert_ok, assert_png, fixtures, TestApp};
use pretty_assertions::assert_eq;
use serde_json::Value;

#[tokio::test]
async fn test_full_size_poster_flow() {
    let app = TestApp::new();

    let response = app
        .generate_poster(
            fixtures::product_shot_png(),
            fixtures::PRODUCT_NAME,
            fixtures::ECO_DESCRIPTION,
        )
        .await;
    assert_ok(&response);

    let json: Value = response.json();
    let palette = json["session"]["palette"].as_array().unwrap();
    assert!(!palette.is_empty() && palette.len() <= 5);
    // the white backdrop dominates the shot
    assert!(palette[0].as_str().unwrap().starts_with("#F"));

    let poster = app.get("/api/poster").await;
    assert_png(&poster);

    let decoded = image::load_from_memory(&poster.body).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (1080, 1350));
    // the canvas is fully painted
    assert_eq!(decoded.get_pixel(2, 2).0[3], 255);
    assert_eq!(decoded.get_pixel(1077, 1347).0[3], 255);

    assert!(
        poster.body.len() > 1000,
        "Poster should be > 1KB, got {} bytes",
        poster.body.len()
    );
}

#[tokio::test]
async fn test_studio_export_to_file() {
    let app = TestApp::small();
    app.studio
        .upload_image(fixtures::split_png(60, 20, 40, [240, 240, 240], [30, 30, 30]), None)
        .await
        .unwrap();
    app.studio
        .set_brief("Orbit Bottle".to_string(), "sport hydration".to_string())
        .await
        .unwrap();

    let outcome = app.studio.generate(Some(11)).await.unwrap();
    assert!(matches!(outcome, GenerationOutcome::Completed(_)));

    let download = app.studio.download().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(&download.file_name);
    std::fs::write(&path, &download.png).unwrap();

    assert_eq!(path.file_name().unwrap(), "orbit-bottle.png");
    let reread = image::open(&path).unwrap();
    assert_eq!((reread.width(), reread.height()), (216, 270));

    let snapshot = app.studio.snapshot().await;
    assert!(snapshot.palette.len() >= 2);
    // the lighter half covers twice the area
    assert!(snapshot.palette[0].starts_with("#E") || snapshot.palette[0].starts_with("#F"));
}
