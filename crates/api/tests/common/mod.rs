#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use openpaws_ai::types::{ChatCompletion, ChatRequest};
use openpaws_ai::{AiConfig, AiError, AiService, CompletionProvider};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use openpaws_api::config::{min_request_timeout_secs, ServerConfig};
use openpaws_api::router::build_app_router;
use openpaws_api::state::AppState;
use openpaws_api::storage::ImageStore;

pub const BASE_URL: &str = "http://localhost:3005";

/// A minimal PNG header; enough for format sniffing.
pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

pub const GENERATED_PROFILE: &str = "Meet Whiskers, a gentle grey cat who loves sunny windowsills.";

// ---------------------------------------------------------------------------
// Stub completion provider
// ---------------------------------------------------------------------------

/// Answers vision requests (those with a response format) with a fixed
/// analysis and everything else with [`GENERATED_PROFILE`].
pub struct StubProvider {
    pub analysis: serde_json::Value,
}

impl StubProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            analysis: analysis_json(8.0),
        })
    }

    pub fn with_analysis(analysis: serde_json::Value) -> Arc<Self> {
        Arc::new(Self { analysis })
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, AiError> {
        let content = if request.response_format.is_some() {
            self.analysis.to_string()
        } else {
            format!("  {GENERATED_PROFILE}\n")
        };
        Ok(serde_json::from_value(json!({
            "id": "chatcmpl-stub",
            "model": request.model,
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        }))
        .unwrap())
    }
}

/// Takes `delay` to answer each request, then answers like [`StubProvider`].
pub struct SlowProvider {
    pub delay: std::time::Duration,
    pub inner: StubProvider,
}

impl SlowProvider {
    pub fn new(delay: std::time::Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            inner: StubProvider {
                analysis: analysis_json(8.0),
            },
        })
    }
}

#[async_trait]
impl CompletionProvider for SlowProvider {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, AiError> {
        tokio::time::sleep(self.delay).await;
        self.inner.complete(request).await
    }
}

/// Fails every request the way the API does on a bad key.
pub struct FailingProvider;

#[async_trait]
impl CompletionProvider for FailingProvider {
    async fn complete(&self, _request: &ChatRequest) -> Result<ChatCompletion, AiError> {
        Err(AiError::Api {
            status: 401,
            body: "invalid api key".into(),
        })
    }
}

pub fn analysis_json(score: f64) -> serde_json::Value {
    json!({
        "keywords": ["cat", "calm"],
        "features": ["long whiskers"],
        "colors": ["grey"],
        "distinctiveFeatures": ["notched ear"],
        "breed": ["Domestic Shorthair"],
        "coat": { "type": "short", "texture": "soft" },
        "physicalCharacteristics": { "eyeColor": "green", "earType": "upright" },
        "healthIndicators": { "appearanceScore": score, "visibleConditions": [], "generalHealth": "healthy" }
    })
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// A router plus the temporary public directory it writes uploads into.
pub struct TestApp {
    pub router: Router,
    pub public_dir: TempDir,
}

impl TestApp {
    pub fn uploads_dir(&self) -> PathBuf {
        self.public_dir.path().join("uploads")
    }

    /// Number of files currently in the uploads directory.
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(self.uploads_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(public_dir: PathBuf) -> ServerConfig {
    let ai = AiConfig::default();
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: min_request_timeout_secs(ai.timeout),
        public_dir,
        base_url: BASE_URL.to_string(),
        database_url: String::new(),
        db_max_connections: 1,
        ai,
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// around the given pool and completion provider.
pub async fn build_test_app(pool: PgPool, provider: Arc<dyn CompletionProvider>) -> TestApp {
    let public_dir = tempfile::tempdir().unwrap();
    let config = test_config(public_dir.path().to_path_buf());
    build_app_with(pool, provider, config, public_dir).await
}

/// Like [`build_test_app`] but with a caller-supplied configuration; its
/// public directory is replaced by a temporary one.
pub async fn build_test_app_with_config(
    pool: PgPool,
    provider: Arc<dyn CompletionProvider>,
    mut config: ServerConfig,
) -> TestApp {
    let public_dir = tempfile::tempdir().unwrap();
    config.public_dir = public_dir.path().to_path_buf();
    config.base_url = BASE_URL.to_string();
    build_app_with(pool, provider, config, public_dir).await
}

async fn build_app_with(
    pool: PgPool,
    provider: Arc<dyn CompletionProvider>,
    config: ServerConfig,
    public_dir: TempDir,
) -> TestApp {
    let images = ImageStore::new(config.uploads_dir(), config.base_url.clone());
    images.ensure_dir().await.unwrap();

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ai: Arc::new(AiService::new(provider, "vision-model", "profile-model")),
        images: Arc::new(images),
    };

    TestApp {
        router: build_app_router(state, &config).unwrap(),
        public_dir,
    }
}

/// A pool that never connects, for requests rejected before any database
/// access.
pub fn offline_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://openpaws@127.0.0.1:1/unreachable")
        .unwrap()
}

pub async fn build_offline_app(provider: Arc<dyn CompletionProvider>) -> TestApp {
    build_test_app(offline_pool(), provider).await
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// One multipart file part.
pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

impl<'a> FilePart<'a> {
    pub fn png(file_name: &'a str) -> Self {
        Self {
            field: "images",
            file_name,
            content_type: "image/png",
            data: PNG,
        }
    }
}

const BOUNDARY: &str = "openpaws-test-boundary";

/// Encode a `multipart/form-data` body with an optional raw `data` field.
pub fn multipart_body(data: Option<&str>, files: &[FilePart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(data) = data {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"data\"\r\n\r\n{data}\r\n"
            )
            .as_bytes(),
        );
    }
    for file in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.field, file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(
    app: Router,
    uri: &str,
    data: Option<&str>,
    files: &[FilePart<'_>],
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(data, files)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// A valid `data` field for a cat.
pub fn whiskers_json() -> serde_json::Value {
    json!({
        "name": "Whiskers",
        "type": "Cat",
        "age": "2 years",
        "gender": "Female",
        "temperament": "Gentle and curious",
        "keywords": ["indoor"],
        "breed": ["Domestic Shorthair"]
    })
}
