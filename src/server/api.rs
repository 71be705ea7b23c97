//! HTTP API server implementation

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::core::client::TranslateClient;
use crate::core::config::CloudConfig;
use crate::core::errors::TranslationError;
use crate::core::models::{Engine, MultiTranslationResult, SingleTranslationResult};
use crate::core::translator::TranslatorFactory;

/// Application state
pub struct AppState {
    config_path: PathBuf,
    factory: Arc<dyn TranslatorFactory>,
    current: RwLock<Current>,
}

struct Current {
    config: CloudConfig,
    client: TranslateClient,
}

impl AppState {
    pub fn new(config_path: PathBuf, config: CloudConfig, factory: Arc<dyn TranslatorFactory>) -> Self {
        let client = TranslateClient::from_config(&config, factory.as_ref());
        Self {
            config_path,
            factory,
            current: RwLock::new(Current { config, client }),
        }
    }
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

/// Single-engine translation request
#[derive(Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    #[serde(default)]
    pub source: String,
    pub target: String,
    /// Defaults to the configured engine
    pub engine: Option<String>,
}

/// Multi-engine translation request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiTranslateRequest {
    pub text: String,
    #[serde(default)]
    pub source: String,
    pub target: String,
    /// Defaults to the configured compare engines
    pub engines: Option<Vec<String>>,
    pub pick_best: Option<bool>,
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub code: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn error_response(status: StatusCode, code: &str, message: String) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: ErrorDetail {
                message,
                code: code.to_string(),
            },
        }),
    )
}

fn translation_error(e: TranslationError) -> (StatusCode, Json<ErrorResponse>) {
    warn!("Translation failed: {}", e);
    let (status, code) = match &e {
        TranslationError::UnknownEngine { .. } => (StatusCode::BAD_REQUEST, "unknown_engine"),
        TranslationError::LanguageIdentification { .. } => {
            (StatusCode::BAD_GATEWAY, "language_identification_failed")
        }
        _ => (StatusCode::BAD_GATEWAY, "translation_error"),
    };
    error_response(status, code, e.to_string())
}

fn require_text(text: &str) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    if text.trim().is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "text cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Health check handler
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn list_engines() -> Json<Vec<Engine>> {
    Json(Engine::ALL.to_vec())
}

/// Single-engine translation handler
async fn translate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TranslateRequest>,
) -> ApiResult<SingleTranslationResult> {
    require_text(&payload.text)?;

    let (client, engine) = {
        let current = state.current.read().await;
        let engine = payload
            .engine
            .unwrap_or_else(|| current.config.default_engine().to_string());
        (current.client.clone(), engine)
    };

    client
        .translate(&payload.text, &payload.source, &payload.target, &engine)
        .await
        .map(Json)
        .map_err(translation_error)
}

/// Multi-engine translation handler
async fn translate_multi(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MultiTranslateRequest>,
) -> ApiResult<MultiTranslationResult> {
    require_text(&payload.text)?;

    let (client, engines, pick_best) = {
        let current = state.current.read().await;
        (
            current.client.clone(),
            payload
                .engines
                .unwrap_or_else(|| current.config.compare_engines.clone()),
            payload.pick_best.unwrap_or(current.config.pick_best),
        )
    };

    client
        .translate_multi(
            &payload.text,
            &payload.source,
            &payload.target,
            engines.as_slice(),
            pick_best,
        )
        .await
        .map(Json)
        .map_err(translation_error)
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<CloudConfig> {
    Json(state.current.read().await.config.redacted())
}

/// Save the config and rebuild every engine from it
async fn put_config(
    State(state): State<Arc<AppState>>,
    Json(mut config): Json<CloudConfig>,
) -> ApiResult<CloudConfig> {
    let mut current = state.current.write().await;
    config.unmask_from(&current.config);

    config.save(&state.config_path).map_err(|e| {
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "config_error", e.to_string())
    })?;

    current.client = TranslateClient::from_config(&config, state.factory.as_ref());
    current.config = config;
    info!("Engines rebuilt from updated config");

    Ok(Json(current.config.redacted()))
}

/// Build the API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/engines", get(list_engines))
        .route("/translate", post(translate))
        .route("/translate/multi", post(translate_multi))
        .route("/config", get(get_config).put(put_config))
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(host: String, port: u16, state: AppState) -> anyhow::Result<()> {
    let app = router(Arc::new(state));

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
