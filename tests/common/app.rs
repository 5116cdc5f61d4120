//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use adcraft::assets::AssetLoader;
use adcraft::models::{AppConfig, CanvasConfig, CopyConfig};
use adcraft::rendering::SvgRenderer;
use adcraft::server::{build_app_state, build_router, AppState};
use adcraft::services::Studio;

/// Test application with router and direct access to the studio
pub struct TestApp {
    router: axum::Router,
    pub studio: Arc<Studio>,
}

impl TestApp {
    /// Full-size 1080x1350 poster, embedded defaults
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Reduced canvas for tests that only care about the flow
    pub fn small() -> Self {
        Self::with_config(AppConfig {
            canvas: CanvasConfig {
                width: 216,
                height: 270,
            },
            copy: CopyConfig { seed: Some(7) },
            ..Default::default()
        })
    }

    pub fn with_config(config: AppConfig) -> Self {
        let state = Self::create_state(config);
        let studio = state.studio.clone();
        let router = build_router(state);

        Self { router, studio }
    }

    /// Create state without building the router
    pub fn create_state(config: AppConfig) -> AppState {
        // embedded poster fonts, as the server loads them
        let svg_renderer = Arc::new(SvgRenderer::with_fonts(
            AssetLoader::new(None, None).get_fonts(),
        ));
        build_app_state(config, svg_renderer).expect("Failed to create app state")
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// POST raw bytes with an optional Content-Type
    pub async fn post_bytes(
        &self,
        path: &str,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) -> TestResponse {
        let mut builder = Request::post(path);
        if let Some(content_type) = content_type {
            builder = builder.header("Content-Type", content_type);
        }
        self.request(builder.body(Body::from(body)).unwrap()).await
    }

    /// POST with an empty body
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request(Request::post(path).body(Body::empty()).unwrap())
            .await
    }

    /// PUT a JSON body
    pub async fn put_json(&self, path: &str, body: serde_json::Value) -> TestResponse {
        self.json_request(Request::put(path), body).await
    }

    /// PATCH a JSON body
    pub async fn patch_json(&self, path: &str, body: serde_json::Value) -> TestResponse {
        self.json_request(Request::patch(path), body).await
    }

    async fn json_request(
        &self,
        builder: axum::http::request::Builder,
        body: serde_json::Value,
    ) -> TestResponse {
        let request = builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Upload an image, set the brief and generate with a fixed seed
    pub async fn generate_poster(&self, image: Vec<u8>, name: &str, description: &str) -> TestResponse {
        let upload = self.post_bytes("/api/image", Some("image/png"), image).await;
        assert_eq!(upload.status, StatusCode::OK, "{}", upload.text());

        let brief = self
            .put_json(
                "/api/brief",
                serde_json::json!({ "product_name": name, "description": description }),
            )
            .await;
        assert_eq!(brief.status, StatusCode::OK, "{}", brief.text());

        self.post("/api/generate?seed=42").await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get a header as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }
}
