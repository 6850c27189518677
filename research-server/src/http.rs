//! Product-research HTTP REST API
//!
//! Axum-based HTTP server that exposes search, record CRUD, and export over
//! HTTP. Runs alongside the Unix socket IPC server.
//!
//! Architecture: each endpoint has a thin axum handler that delegates to a
//! directly-testable inner function returning `(StatusCode, Value)`.
//!
//! Endpoints:
//! - GET    /health                — health check with DB status
//! - GET    /version               — server version info
//! - POST   /search                — heuristic product analysis
//! - POST   /research              — create a record
//! - GET    /research              — list records, newest first
//! - GET    /research/:id          — fetch one record
//! - PATCH  /research/:id          — partial update
//! - DELETE /research/:id          — delete, reports the boolean outcome
//! - GET    /research/:id/export   — render as ?format=json|csv|pdf

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use research_core::models::{CreateResearchInput, ExportFormat, UpdateResearchInput};
use research_core::ResearchError;
use serde::Deserialize;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::router::AppContext;

/// Shared state for all HTTP handlers. The pool is only used by the health
/// endpoint; it is absent when the server runs on a non-Postgres store.
#[derive(Clone)]
pub struct HttpState {
    pub ctx: AppContext,
    pub pool: Option<PgPool>,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/search", post(search_handler))
        .route("/research", post(create_handler).get(list_handler))
        .route(
            "/research/:id",
            get(get_handler).patch(update_handler).delete(delete_handler),
        )
        .route("/research/:id/export", get(export_handler))
        .with_state(state)
}

/// Start the HTTP server on the given address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    addr: String,
    state: Arc<HttpState>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Research HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub product_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

fn error_body(msg: impl Into<String>) -> serde_json::Value {
    serde_json::json!({
        "error": msg.into(),
        "status": "error",
    })
}

fn status_for(err: &ResearchError) -> StatusCode {
    match err {
        ResearchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Inner health check — queries DB (when pooled) and returns
/// (status_code, json_body).
pub async fn health_inner(pool: Option<&PgPool>) -> (StatusCode, serde_json::Value) {
    let postgres = match pool {
        Some(pool) => match research_core::db::health_check(pool).await {
            Ok(v) => serde_json::Value::String(v),
            Err(e) => {
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    serde_json::json!({
                        "status": "unhealthy",
                        "error": e.to_string(),
                    }),
                );
            }
        },
        None => serde_json::Value::Null,
    };

    (
        StatusCode::OK,
        serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "postgresql": postgres,
        }),
    )
}

/// Inner version — returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "research/1",
    })
}

/// Inner search — validates the name and runs the catalog analysis.
pub async fn search_inner(ctx: &AppContext, body: SearchBody) -> (StatusCode, serde_json::Value) {
    let product_name = match body.product_name {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                error_body("product_name field is required"),
            );
        }
    };

    match crate::router::search(&product_name, ctx).await {
        Ok(analysis) => match serde_json::to_value(&analysis) {
            Ok(data) => (StatusCode::OK, data),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())),
        },
        Err(e) => (status_for(&e), error_body(e.to_string())),
    }
}

/// Inner create — rejects empty names, persists, returns the new record.
pub async fn create_inner(
    ctx: &AppContext,
    input: CreateResearchInput,
) -> (StatusCode, serde_json::Value) {
    if input.product_name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            error_body("product_name must not be empty"),
        );
    }

    match ctx.store.create(input).await {
        Ok(record) => match serde_json::to_value(&record) {
            Ok(data) => (StatusCode::CREATED, data),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())),
        },
        Err(e) => (status_for(&e), error_body(e.to_string())),
    }
}

/// Inner list — all records, newest first.
pub async fn list_inner(ctx: &AppContext) -> (StatusCode, serde_json::Value) {
    match ctx.store.list().await {
        Ok(records) => {
            let count = records.len();
            match serde_json::to_value(&records) {
                Ok(data) => (
                    StatusCode::OK,
                    serde_json::json!({ "records": data, "count": count }),
                ),
                Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())),
            }
        }
        Err(e) => (status_for(&e), error_body(e.to_string())),
    }
}

/// Inner get — 404 when the id is unknown.
pub async fn get_inner(ctx: &AppContext, id: i32) -> (StatusCode, serde_json::Value) {
    match ctx.store.get_by_id(id).await {
        Ok(Some(record)) => match serde_json::to_value(&record) {
            Ok(data) => (StatusCode::OK, data),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())),
        },
        Ok(None) => (
            StatusCode::NOT_FOUND,
            error_body(format!("research record {} not found", id)),
        ),
        Err(e) => (status_for(&e), error_body(e.to_string())),
    }
}

/// Inner update — applies only present fields; 404 when the id is unknown.
pub async fn update_inner(
    ctx: &AppContext,
    id: i32,
    input: UpdateResearchInput,
) -> (StatusCode, serde_json::Value) {
    match ctx.store.update(id, input).await {
        Ok(Some(record)) => match serde_json::to_value(&record) {
            Ok(data) => (StatusCode::OK, data),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())),
        },
        Ok(None) => (
            StatusCode::NOT_FOUND,
            error_body(format!("research record {} not found", id)),
        ),
        Err(e) => (status_for(&e), error_body(e.to_string())),
    }
}

/// Inner delete — reports the boolean outcome, 200 either way.
pub async fn delete_inner(ctx: &AppContext, id: i32) -> (StatusCode, serde_json::Value) {
    match ctx.store.delete(id).await {
        Ok(deleted) => (StatusCode::OK, serde_json::json!({ "deleted": deleted })),
        Err(e) => (status_for(&e), error_body(e.to_string())),
    }
}

/// Inner export — parses the format, resolves the record, renders.
/// Returns the rendered file on success, or (status, error body).
pub async fn export_inner(
    ctx: &AppContext,
    id: i32,
    query: ExportQuery,
) -> Result<research_core::ExportFile, (StatusCode, serde_json::Value)> {
    let format = match query.format.as_deref() {
        Some(raw) => match ExportFormat::from_str(raw) {
            Ok(f) => f,
            Err(e) => return Err((StatusCode::BAD_REQUEST, error_body(e.to_string()))),
        },
        None => return Err((StatusCode::BAD_REQUEST, error_body("format query parameter is required"))),
    };

    match crate::router::export(id, format, ctx).await {
        Ok(Some(file)) => Ok(file),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            error_body(format!("research record {} not found", id)),
        )),
        Err(e) => Err((status_for(&e), error_body(e.to_string()))),
    }
}

// ============================================================================
// Axum handler wrappers (thin — delegate to inner functions)
// ============================================================================

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(state.pool.as_ref()).await;
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn search_handler(
    State(state): State<Arc<HttpState>>,
    Json(body): Json<SearchBody>,
) -> impl IntoResponse {
    let (status, body) = search_inner(&state.ctx, body).await;
    (status, Json(body))
}

pub async fn create_handler(
    State(state): State<Arc<HttpState>>,
    Json(input): Json<CreateResearchInput>,
) -> impl IntoResponse {
    let (status, body) = create_inner(&state.ctx, input).await;
    (status, Json(body))
}

pub async fn list_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = list_inner(&state.ctx).await;
    (status, Json(body))
}

pub async fn get_handler(
    State(state): State<Arc<HttpState>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let (status, body) = get_inner(&state.ctx, id).await;
    (status, Json(body))
}

pub async fn update_handler(
    State(state): State<Arc<HttpState>>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateResearchInput>,
) -> impl IntoResponse {
    let (status, body) = update_inner(&state.ctx, id, input).await;
    (status, Json(body))
}

pub async fn delete_handler(
    State(state): State<Arc<HttpState>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let (status, body) = delete_inner(&state.ctx, id).await;
    (status, Json(body))
}

/// Export responds with the rendered file body and download headers rather
/// than a JSON envelope.
pub async fn export_handler(
    State(state): State<Arc<HttpState>>,
    Path(id): Path<i32>,
    Query(query): Query<ExportQuery>,
) -> Response {
    match export_inner(&state.ctx, id, query).await {
        Ok(file) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, file.mime_type.clone()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file.filename),
                ),
            ],
            file.content,
        )
            .into_response(),
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}
