//! REST API server for the Chronicle ledger
//!
//! Exposes the two ledger operations over HTTP - appending a message block
//! and reading the chain - plus health, stats and integrity endpoints.

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

use crate::error::LedgerError;
use crate::ledger::{validate_chain, Block, Ledger};

/// Shared API state: the ledger behind a single read-write lock.
///
/// Appends take the write lock, which serializes the read-tip/digest/push
/// sequence; snapshots take the read lock and may run concurrently.
#[derive(Clone)]
pub struct Node {
    pub ledger: Arc<RwLock<Ledger>>,
    max_message_len: usize,
    api_stats: Arc<RwLock<ApiStats>>,
}

/// API statistics and monitoring
#[derive(Debug, Default)]
struct ApiStats {
    total_requests: u64,
    successful_requests: u64,
    failed_requests: u64,
    blocks_appended: u64,
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

impl Node {
    /// Create a node owning a fresh lock around the given ledger.
    pub fn new(ledger: Ledger, max_message_len: usize) -> Self {
        Self::new_shared(Arc::new(RwLock::new(ledger)), max_message_len)
    }

    /// Create a node that shares an existing ledger handle. Useful when
    /// another part of the process also appends to the same chain.
    pub fn new_shared(ledger: Arc<RwLock<Ledger>>, max_message_len: usize) -> Self {
        Self {
            ledger,
            max_message_len,
            api_stats: Arc::new(RwLock::new(ApiStats::new())),
        }
    }

    /// Get API statistics
    pub async fn get_stats(&self) -> ApiStatsResponse {
        // Lock order is ledger before stats, everywhere. Holding one lock
        // while awaiting the other in the opposite order would deadlock
        // against concurrent appends.
        let chain_length = self.ledger.read().await.len() as u64;
        let stats = self.api_stats.read().await;
        let uptime = stats.start_time.map(|t| t.elapsed().as_secs()).unwrap_or(0);

        ApiStatsResponse {
            total_requests: stats.total_requests,
            successful_requests: stats.successful_requests,
            failed_requests: stats.failed_requests,
            blocks_appended: stats.blocks_appended,
            uptime_seconds: uptime,
            chain_length,
        }
    }
}

// ============================================================================
// API Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    LedgerError(LedgerError),
    InvalidInput(String),
    NotFound(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::LedgerError(e) => {
                let status = match e {
                    LedgerError::EmptyMessage | LedgerError::MessageTooLong { .. } => {
                        StatusCode::BAD_REQUEST
                    }
                    // Integrity violations are server-side conditions: the
                    // stored chain, not the request, is at fault.
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::LedgerError(err)
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
pub struct AddMessageRequest {
    /// Optional so an absent field maps to a clean 400, not a decode error.
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ApiStatsResponse {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub blocks_appended: u64,
    pub uptime_seconds: u64,
    pub chain_length: u64,
}

#[derive(Serialize)]
struct ValidateResponse {
    valid: bool,
}

// ============================================================================
// Middleware
// ============================================================================

/// Request statistics middleware
async fn stats_middleware(State(node): State<Arc<Node>>, req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let success = response.status().is_success();
    let mut stats = node.api_stats.write().await;
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
pub fn build_api_router(node: Arc<Node>) -> Router {
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

    let api_routes = Router::new()
        // Ledger endpoints (paths preserved from the original consumers)
        .route("/blockchain", get(get_chain))
        .route("/blockchain/add", post(add_message))
        // Supplemental read endpoints
        .route("/blockchain/height", get(get_chain_height))
        .route("/blockchain/block/{index}", get(get_block_by_index))
        .route("/blockchain/validate", get(validate_ledger))
        // System endpoints
        .route("/health", get(health_check))
        .route("/stats", get(get_api_stats))
        // logging before stats so we always record timing
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(
            node.clone(),
            stats_middleware,
        ))
        .with_state(node);

    Router::new().nest("/api", api_routes).layer(cors)
}

/// Run the API server on the given address until shutdown
pub async fn run_api_server(
    node: Arc<Node>,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_api_router(node);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn get_chain(State(node): State<Arc<Node>>) -> Json<Vec<Block>> {
    let ledger = node.ledger.read().await;
    Json(ledger.snapshot())
}

async fn get_chain_height(State(node): State<Arc<Node>>) -> impl IntoResponse {
    let ledger = node.ledger.read().await;
    Json(ledger.len() as u64)
}

async fn get_block_by_index(
    State(node): State<Arc<Node>>,
    Path(index): Path<u64>,
) -> Result<Json<Block>, ApiError> {
    let ledger = node.ledger.read().await;

    ledger
        .blocks()
        .get(index as usize)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Block at index {} not found", index)))
        .map(Json)
}

async fn add_message(
    State(node): State<Arc<Node>>,
    Json(req): Json<AddMessageRequest>,
) -> Result<Json<Block>, ApiError> {
    let message = req
        .message
        .ok_or_else(|| ApiError::InvalidInput("Message is required".to_string()))?;

    // Content policy is a boundary concern; the ledger core only rejects
    // empty messages.
    let len = message.chars().count();
    if len > node.max_message_len {
        return Err(ApiError::LedgerError(LedgerError::MessageTooLong {
            limit: node.max_message_len,
            actual: len,
        }));
    }

    // Release the ledger write guard before touching the stats lock.
    let block = {
        let mut ledger = node.ledger.write().await;
        ledger.append(&message)?
    };

    {
        let mut stats = node.api_stats.write().await;
        stats.blocks_appended += 1;
    }

    Ok(Json(block))
}

async fn validate_ledger(State(node): State<Arc<Node>>) -> Result<Json<ValidateResponse>, ApiError> {
    let ledger = node.ledger.read().await;
    validate_chain(ledger.blocks())?;
    Ok(Json(ValidateResponse { valid: true }))
}

async fn get_api_stats(State(node): State<Arc<Node>>) -> impl IntoResponse {
    let stats = node.get_stats().await;
    Json(stats)
}
