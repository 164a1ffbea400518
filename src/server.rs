//! HTTP API.
//!
//! Routes:
//! - `GET /` endpoint documentation
//! - `GET /api/health` liveness probe
//! - `GET /api/search?q=&max_results=` meta-search backend
//! - `GET /search?q=&engine=&num=` scraped engines, per-engine breakdown
//! - `GET /google|/bing|/baidu?q=&num=` a single scraped engine

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, MethodRouter};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use url::form_urlencoded;

use crate::config::ServerConfig;
use crate::engines::{Baidu, DuckDuckGo, Google, HtmlScrapeProvider};
use crate::{
    AggregateResponse, Aggregator, EngineKind, EngineSelector, Provider, Query, ResultRecord,
    SearchError,
};

/// Default `max_results` for `/api/search`.
pub const API_DEFAULT_RESULTS: i64 = 20;

/// Default `num` for the engine routes.
pub const ENGINE_DEFAULT_RESULTS: i64 = 10;

/// Errors surfaced to HTTP clients as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required parameter: q (search query)")]
    MissingQuery,

    #[error("Invalid value for parameter '{name}': expected an integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("Unknown engine '{0}': expected google, bing, baidu or all")]
    UnknownEngine(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Search failed: {0}")]
    Backend(String),

    #[error("Not found")]
    NotFound,

    /// Detail is logged, never returned.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingQuery
            | ApiError::InvalidNumber { .. }
            | ApiError::UnknownEngine(_)
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Backend(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Backend(..) => ApiError::Backend(err.to_string()),
            SearchError::InvalidQuery(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(detail) => error!("Internal error: {}", detail),
            ApiError::Backend(detail) => warn!("Backend error: {}", detail),
            other => debug!("Rejected request: {}", other),
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<Aggregator>,
    meta: Arc<dyn Provider>,
}

impl AppState {
    /// Creates state from an aggregator and the meta-search provider.
    pub fn new(aggregator: Aggregator, meta: impl Provider + 'static) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            meta: Arc::new(meta),
        }
    }

    /// Builds every provider with its own HTTP session.
    pub fn from_config(config: &ServerConfig) -> crate::Result<Self> {
        let timeout = config.timeout();

        let mut aggregator = Aggregator::new();
        aggregator.register(EngineKind::Baidu, Baidu::provider(timeout));
        aggregator.register(EngineKind::Bing, HtmlScrapeProvider::bing(timeout)?);
        aggregator.register(EngineKind::Google, Google::provider(timeout));

        Ok(Self::new(aggregator, DuckDuckGo::provider(timeout)?))
    }

    /// Returns the aggregator.
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }
}

/// Decodes a query string, keeping the first value of a repeated key.
fn first_values(raw: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

/// Query string of `/api/search`.
#[derive(Debug, Default)]
pub struct ApiSearchParams {
    pub q: Option<String>,
    pub max_results: Option<String>,
}

impl ApiSearchParams {
    /// Reads the parameters from a raw query string.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut params = first_values(raw);
        Self {
            q: params.remove("q"),
            max_results: params.remove("max_results"),
        }
    }
}

/// Query string of `/search` and the single-engine routes.
#[derive(Debug, Default)]
pub struct EngineParams {
    pub q: Option<String>,
    pub engine: Option<String>,
    pub num: Option<String>,
}

impl EngineParams {
    /// Reads the parameters from a raw query string.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut params = first_values(raw);
        Self {
            q: params.remove("q"),
            engine: params.remove("engine"),
            num: params.remove("num"),
        }
    }
}

/// Body of `/api/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSearchResponse {
    pub query: String,
    pub max_results: usize,
    pub results_count: usize,
    pub results: Vec<ResultRecord>,
}

/// Body of the single-engine routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineResponse {
    pub query: String,
    pub engine: String,
    pub count: usize,
    pub results: Vec<ResultRecord>,
}

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/api/health", get(health_handler))
        .route("/api/search", get(api_search_handler))
        .route("/search", get(search_handler))
        .route("/google", engine_route(EngineKind::Google))
        .route("/bing", engine_route(EngineKind::Bing))
        .route("/baidu", engine_route(EngineKind::Baidu))
        .fallback(|| async { ApiError::NotFound })
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `config.bind_address()` and serves until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Search API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Cannot listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}

fn engine_route(kind: EngineKind) -> MethodRouter<AppState> {
    get(move |state: State<AppState>, query: RawQuery| {
        engine_only_handler(kind, state, query)
    })
}

fn require_query(q: Option<String>) -> Result<String, ApiError> {
    q.filter(|q| !q.trim().is_empty()).ok_or(ApiError::MissingQuery)
}

fn parse_number(name: &'static str, value: Option<&str>, default: i64) -> Result<i64, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ApiError::InvalidNumber {
            name,
            value: raw.to_string(),
        }),
    }
}

async fn home_handler() -> Json<Value> {
    Json(json!({
        "message": "Search API - No API Key Required",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/api/search": {
                "method": "GET",
                "params": {
                    "q": "search query (required)",
                    "max_results": "number of results (default: 20, max: 50)"
                },
                "example": "/api/search?q=Elon+Musk&max_results=5"
            },
            "/api/health": {
                "method": "GET",
                "example": "/api/health"
            },
            "/search": {
                "method": "GET",
                "params": {
                    "q": "search query (required)",
                    "engine": "google, bing, baidu, or all (default: all)",
                    "num": "number of results (default: 10, max: 50)"
                },
                "example": "/search?q=python&engine=all&num=5"
            },
            "/google": {
                "method": "GET",
                "params": { "q": "search query (required)", "num": "number of results (default: 10)" },
                "example": "/google?q=python&num=5"
            },
            "/bing": {
                "method": "GET",
                "params": { "q": "search query (required)", "num": "number of results (default: 10)" },
                "example": "/bing?q=python&num=5"
            },
            "/baidu": {
                "method": "GET",
                "params": { "q": "search query (required)", "num": "number of results (default: 10)" },
                "example": "/baidu?q=python&num=5"
            }
        }
    }))
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "Search API" }))
}

async fn api_search_handler(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ApiSearchResponse>, ApiError> {
    let params = ApiSearchParams::from_query(raw.as_deref());
    let text = require_query(params.q)?;
    let limit = parse_number(
        "max_results",
        params.max_results.as_deref(),
        API_DEFAULT_RESULTS,
    )?;
    let query = Query::new(text, limit)?;

    let results = state.meta.perform_search(&query.text, query.limit).await?;

    info!(
        "Meta search complete: {} results for '{}'",
        results.len(),
        query.text
    );

    Ok(Json(ApiSearchResponse {
        query: query.text,
        max_results: query.limit,
        results_count: results.len(),
        results,
    }))
}

async fn search_handler(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<AggregateResponse>, ApiError> {
    let params = EngineParams::from_query(raw.as_deref());
    let text = require_query(params.q)?;
    let engines = match params.engine.as_deref().map(str::trim) {
        None | Some("") => EngineSelector::All,
        Some(raw) => raw
            .parse::<EngineSelector>()
            .map_err(|_| ApiError::UnknownEngine(raw.to_string()))?,
    };
    let limit = parse_number("num", params.num.as_deref(), ENGINE_DEFAULT_RESULTS)?;
    let query = Query::new(text, limit)?.with_engines(engines);

    Ok(Json(state.aggregator.search(&query).await))
}

async fn engine_only_handler(
    kind: EngineKind,
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<EngineResponse>, ApiError> {
    let params = EngineParams::from_query(raw.as_deref());
    let text = require_query(params.q)?;
    let limit = parse_number("num", params.num.as_deref(), ENGINE_DEFAULT_RESULTS)?;
    let query = Query::new(text, limit)?;

    let results = state.aggregator.search_engine(kind, &query).await?;

    Ok(Json(EngineResponse {
        query: query.text,
        engine: kind.as_str().to_string(),
        count: results.len(),
        results,
    }))
}
