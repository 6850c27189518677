use std::sync::Arc;
use std::time::Duration;

use research_core::config::SearchConfig;
use research_core::ipc::{ResearchRequest, ResearchResponse};
use research_core::models::{CreateResearchInput, ExportFormat};
use research_core::{Catalog, ResearchAnalysis, ResearchError, ResearchStore};

/// Shared dependencies for request dispatch. The catalog is immutable and
/// the store is the only stateful collaborator.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn ResearchStore>,
    pub catalog: Arc<Catalog>,
    pub search: SearchConfig,
}

impl AppContext {
    pub fn new(store: Arc<dyn ResearchStore>, catalog: Arc<Catalog>, search: SearchConfig) -> Self {
        Self {
            store,
            catalog,
            search,
        }
    }
}

pub async fn handle_request(request: ResearchRequest, ctx: &AppContext) -> ResearchResponse {
    match request {
        ResearchRequest::Ping => ResearchResponse::pong(),
        ResearchRequest::Health => ResearchResponse::ok(serde_json::json!({
            "status": "healthy",
        })),
        ResearchRequest::Search { product_name } => match search(&product_name, ctx).await {
            Ok(analysis) => match serde_json::to_value(&analysis) {
                Ok(data) => ResearchResponse::ok(data),
                Err(e) => ResearchResponse::err(e.to_string()),
            },
            Err(e) => ResearchResponse::err(e.to_string()),
        },
        ResearchRequest::Create { input } => match create(input, ctx).await {
            Ok(data) => ResearchResponse::ok(data),
            Err(e) => ResearchResponse::err(e.to_string()),
        },
        ResearchRequest::Get { id } => match ctx.store.get_by_id(id).await {
            Ok(Some(record)) => record_response(&record),
            Ok(None) => ResearchResponse::not_found(format!("research record {}", id)),
            Err(e) => ResearchResponse::err(e.to_string()),
        },
        ResearchRequest::List => match ctx.store.list().await {
            Ok(records) => match serde_json::to_value(&records) {
                Ok(data) => ResearchResponse::ok(serde_json::json!({
                    "records": data,
                    "count": records.len(),
                })),
                Err(e) => ResearchResponse::err(e.to_string()),
            },
            Err(e) => ResearchResponse::err(e.to_string()),
        },
        ResearchRequest::Update { id, input } => match ctx.store.update(id, input).await {
            Ok(Some(record)) => record_response(&record),
            Ok(None) => ResearchResponse::not_found(format!("research record {}", id)),
            Err(e) => ResearchResponse::err(e.to_string()),
        },
        ResearchRequest::Delete { id } => match ctx.store.delete(id).await {
            Ok(deleted) => ResearchResponse::ok(serde_json::json!({ "deleted": deleted })),
            Err(e) => ResearchResponse::err(e.to_string()),
        },
        ResearchRequest::Export { id, format } => match export(id, format, ctx).await {
            Ok(Some(file)) => ResearchResponse::ok(serde_json::json!({
                "filename": file.filename,
                "content": file.content,
                "mime_type": file.mime_type,
            })),
            Ok(None) => ResearchResponse::not_found(format!("research record {}", id)),
            Err(e) => ResearchResponse::err(e.to_string()),
        },
    }
}

/// Search path: validate, simulate the remote-lookup latency, analyze.
/// The sleep is bounded under a second and has no effect on the result.
pub async fn search(product_name: &str, ctx: &AppContext) -> Result<ResearchAnalysis, ResearchError> {
    if product_name.trim().is_empty() {
        return Err(ResearchError::InvalidInput(
            "product_name must not be empty".to_string(),
        ));
    }

    tokio::time::sleep(Duration::from_millis(ctx.search.latency_ms())).await;

    Ok(ctx.catalog.analyze(product_name))
}

async fn create(
    input: CreateResearchInput,
    ctx: &AppContext,
) -> Result<serde_json::Value, ResearchError> {
    if input.product_name.trim().is_empty() {
        return Err(ResearchError::InvalidInput(
            "product_name must not be empty".to_string(),
        ));
    }
    let record = ctx.store.create(input).await?;
    serde_json::to_value(&record).map_err(|e| ResearchError::Other(e.to_string()))
}

/// Resolve the record, then render. `None` when the id is unknown.
pub async fn export(
    id: i32,
    format: ExportFormat,
    ctx: &AppContext,
) -> Result<Option<research_core::ExportFile>, ResearchError> {
    match ctx.store.get_by_id(id).await? {
        Some(record) => Ok(Some(research_core::export::render(&record, format))),
        None => Ok(None),
    }
}

/// Convenience used by Get/Update arms.
fn record_response(record: &research_core::ResearchRecord) -> ResearchResponse {
    match serde_json::to_value(record) {
        Ok(data) => ResearchResponse::ok(data),
        Err(e) => ResearchResponse::err(e.to_string()),
    }
}
