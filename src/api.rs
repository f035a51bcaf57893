//! REST API server for regtest-box
//!
//! Binds the orchestration components into named HTTP operations with
//! validated inputs and uniform error translation. Lifecycle, funding and
//! introspection endpoints mirror the regtest sandbox control plane.

use axum::{
    extract::{Path, Request, State},
    http::{self, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::error::ServiceError;
use crate::nodes::NodeId;
use crate::orchestrator::Orchestrator;
use crate::status::StatusAll;

pub const SERVICE_NAME: &str = "regtest-box";

/// Shared API state: the orchestrator plus request statistics.
#[derive(Clone)]
pub struct Service {
    pub orchestrator: Arc<Orchestrator>,
    api_stats: Arc<RwLock<ApiStats>>,
}

impl Service {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            api_stats: Arc::new(RwLock::new(ApiStats::new())),
        }
    }

    pub async fn get_stats(&self) -> ApiStatsResponse {
        let stats = self.api_stats.read().await;
        let uptime = stats.start_time.map(|t| t.elapsed().as_secs()).unwrap_or(0);

        ApiStatsResponse {
            total_requests: stats.total_requests,
            successful_requests: stats.successful_requests,
            failed_requests: stats.failed_requests,
            node_starts: stats.node_starts,
            node_stops: stats.node_stops,
            blocks_generated: stats.blocks_generated,
            coins_sent: stats.coins_sent,
            uptime_seconds: uptime,
        }
    }
}

/// API statistics and monitoring
#[derive(Debug, Default)]
struct ApiStats {
    total_requests: u64,
    successful_requests: u64,
    failed_requests: u64,
    node_starts: u64,
    node_stops: u64,
    blocks_generated: u64,
    coins_sent: u64,
    start_time: Option<Instant>,
}

impl ApiStats {
    fn new() -> Self {
        ApiStats {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    fn record_request(&mut self, success: bool) {
        self.total_requests += 1;
        if success {
            self.successful_requests += 1;
        } else {
            self.failed_requests += 1;
        }
    }
}

// ============================================================================
// API Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    InvalidInput(String),
    Precondition(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Precondition(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Configuration(msg) => ApiError::Precondition(msg),
            ServiceError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct GenerateRequest {
    #[serde(default = "default_blocks")]
    pub blocks: i64,
}

fn default_blocks() -> i64 {
    1
}

#[derive(Deserialize)]
pub struct SendRequest {
    pub address: String,
    pub amount: f64,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct GenerateResponse {
    message: String,
    hashes: Vec<String>,
}

#[derive(Serialize)]
struct AddressResponse {
    address: String,
}

#[derive(Serialize)]
struct SendResponse {
    txid: String,
}

#[derive(Serialize)]
pub struct ApiStatsResponse {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub node_starts: u64,
    pub node_stops: u64,
    pub blocks_generated: u64,
    pub coins_sent: u64,
    pub uptime_seconds: u64,
}

// ============================================================================
// Middleware
// ============================================================================

/// Request statistics middleware
async fn stats_middleware(State(service): State<Arc<Service>>, req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let success = response.status().is_success();
    let mut stats = service.api_stats.write().await;
    stats.record_request(success);

    response
}

/// Request logging middleware. Logs method, path, status and duration.
async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        path = %path,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "api.request"
    );

    response
}

// ============================================================================
// API Server
// ============================================================================

/// Build the API router with all endpoints (also used by tests)
pub fn build_router(service: Arc<Service>) -> Router {
    // CORS configuration - allow all origins with credentials
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::OPTIONS,
        ])
        .allow_headers(vec![http::header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        // System endpoints
        .route("/", get(read_root))
        .route("/health", get(health_check))
        .route("/stats", get(get_api_stats))
        // Lifecycle endpoints
        .route("/start", post(start_nodes))
        .route("/stop", post(stop_nodes))
        // Introspection
        .route("/info", get(get_info))
        // Funding endpoints
        .route("/generate", post(generate_blocks))
        .route("/wallet/address/:node", get(get_new_address))
        .route("/send", post(send_coins))
        // logging before stats so we always record timing
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(
            service.clone(),
            stats_middleware,
        ))
        .with_state(service)
        .layer(cors)
}

/// Run the API server bound to all interfaces on `port`.
pub async fn run_server(
    service: Arc<Service>,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(service);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn read_root() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME
    }))
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn start_nodes(
    State(service): State<Arc<Service>>,
) -> Result<Json<MessageResponse>, ApiError> {
    service.orchestrator.start_nodes()?;

    {
        let mut stats = service.api_stats.write().await;
        stats.node_starts += 1;
    }

    Ok(Json(MessageResponse {
        message: "Nodes started".to_string(),
    }))
}

/// Always succeeds: stop failures (typically "already stopped") are folded
/// into the message text rather than propagated as hard errors.
async fn stop_nodes(State(service): State<Arc<Service>>) -> Json<MessageResponse> {
    let report = service.orchestrator.stop_nodes().await;

    {
        let mut stats = service.api_stats.write().await;
        stats.node_stops += 1;
    }

    Json(MessageResponse {
        message: report.message(),
    })
}

/// Never hard-fails: unreachable nodes degrade to offline snapshots.
async fn get_info(State(service): State<Arc<Service>>) -> Json<StatusAll> {
    Json(service.orchestrator.status_all().await)
}

async fn generate_blocks(
    State(service): State<Arc<Service>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    if req.blocks < 0 {
        return Err(ApiError::InvalidInput(format!(
            "blocks must be >= 0, got {}",
            req.blocks
        )));
    }

    let result = service.orchestrator.generate_blocks(req.blocks as u64).await?;

    {
        let mut stats = service.api_stats.write().await;
        stats.blocks_generated += result.count;
    }

    Ok(Json(GenerateResponse {
        message: format!("Generated {} blocks", result.count),
        hashes: result.hashes,
    }))
}

async fn get_new_address(
    State(service): State<Arc<Service>>,
    Path(node): Path<u8>,
) -> Result<Json<AddressResponse>, ApiError> {
    let id = NodeId::from_number(node)
        .ok_or_else(|| ApiError::InvalidInput(format!("node must be 1 or 2, got {}", node)))?;

    let address = service.orchestrator.new_address(id).await?;

    Ok(Json(AddressResponse { address }))
}

async fn send_coins(
    State(service): State<Arc<Service>>,
    Json(req): Json<SendRequest>,
) -> Result<Json<SendResponse>, ApiError> {
    let txid = service
        .orchestrator
        .send_coins(&req.address, req.amount)
        .await?;

    {
        let mut stats = service.api_stats.write().await;
        stats.coins_sent += 1;
    }

    Ok(Json(SendResponse { txid }))
}

async fn get_api_stats(State(service): State<Arc<Service>>) -> impl IntoResponse {
    Json(service.get_stats().await)
}
