//! HTTP facade tests: drive the Axum router directly with `tower::oneshot`
//! over the in-memory store. No external services required.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use research_core::config::SearchConfig;
use research_core::{Catalog, MemoryResearchStore, ResearchStore};
use research_server::http::{build_router, HttpState};
use research_server::router::AppContext;
use tower::ServiceExt;

fn test_app() -> Router {
    let store: Arc<dyn ResearchStore> = Arc::new(MemoryResearchStore::new());
    let ctx = AppContext::new(
        store,
        Arc::new(Catalog::builtin()),
        SearchConfig {
            simulated_latency_ms: 1,
        },
    );
    build_router(Arc::new(HttpState { ctx, pool: None }))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Create a record through the API and return its JSON representation.
async fn create_record(app: &Router, name: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/research",
            serde_json::json!({
                "product_name": name,
                "advantages": ["fast"],
                "disadvantages": ["new"],
                "market_analysis": "niche",
                "sources": ["https://example.com"],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn health_without_pool_reports_healthy() {
    let response = test_app().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["postgresql"].is_null());
}

#[tokio::test]
async fn version_reports_protocol() {
    let response = test_app().oneshot(get_request("/version")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["protocol"], "research/1");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn search_returns_analysis_for_valid_name() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/search",
            serde_json::json!({"product_name": "react"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["product_name"], "react");
    assert!(body["confidence_score"].as_f64().unwrap() > 0.8);
}

#[tokio::test]
async fn search_rejects_empty_and_missing_names() {
    for body in [
        serde_json::json!({"product_name": "   "}),
        serde_json::json!({}),
    ] {
        let response = test_app()
            .oneshot(json_request("POST", "/search", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
    }
}

#[tokio::test]
async fn create_rejects_empty_product_name() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/research",
            serde_json::json!({"product_name": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_defaults_lists_and_assigns_id() {
    let app = test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/research",
            serde_json::json!({"product_name": "redis"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["advantages"], serde_json::json!([]));
    assert_eq!(body["sources"], serde_json::json!([]));
    assert!(body["description"].is_null());
}

#[tokio::test]
async fn get_and_list_roundtrip() {
    let app = test_app();
    let created = create_record(&app, "redis").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/research/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["product_name"], "redis");

    let response = app.clone().oneshot(get_request("/research")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);

    let response = app.oneshot(get_request("/research/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_updates_only_present_fields_and_null_clears() {
    let app = test_app();
    let created = create_record(&app, "redis").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/research/{}", id),
            serde_json::json!({"product_name": "valkey", "market_analysis": null}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["product_name"], "valkey");
    assert!(body["market_analysis"].is_null());
    // untouched fields survive
    assert_eq!(body["advantages"], created["advantages"]);
    assert_eq!(body["sources"], created["sources"]);

    let response = app
        .oneshot(json_request(
            "PATCH",
            "/research/999",
            serde_json::json!({"product_name": "x"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_reports_boolean_outcome() {
    let app = test_app();
    let created = create_record(&app, "redis").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/research/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["deleted"], true);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/research/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["deleted"], false);
}

#[tokio::test]
async fn export_streams_file_with_download_headers() {
    let app = test_app();
    let created = create_record(&app, "redis").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/research/{}/export?format=csv", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "text/csv"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"redis_research_"));
    assert!(disposition.ends_with(".csv\""));

    let content = body_text(response).await;
    assert!(content.starts_with("Field,Value"));
    assert!(content.contains(r#"Product Name,"redis""#));
}

#[tokio::test]
async fn export_pdf_label_is_nominal_plain_text() {
    let app = test_app();
    let created = create_record(&app, "redis").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .oneshot(get_request(&format!("/research/{}/export?format=pdf", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "application/pdf"
    );
    let content = body_text(response).await;
    assert!(content.starts_with("PRODUCT RESEARCH REPORT"));
}

#[tokio::test]
async fn export_rejects_bad_format_and_unknown_id() {
    let app = test_app();
    let created = create_record(&app, "redis").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/research/{}/export?format=docx", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/research/{}/export", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get_request("/research/999/export?format=json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn exported_json_round_trips_the_record() {
    let app = test_app();
    let created = create_record(&app, "redis").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .oneshot(get_request(&format!("/research/{}/export?format=json", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let exported: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(exported["id"], created["id"]);
    assert_eq!(exported["product_name"], created["product_name"]);
    assert_eq!(exported["advantages"], created["advantages"]);
    assert_eq!(exported["disadvantages"], created["disadvantages"]);
    assert_eq!(exported["sources"], created["sources"]);
    // timestamps keep full precision through the export
    assert_eq!(exported["research_date"], created["research_date"]);
    assert_eq!(exported["created_at"], created["created_at"]);
    assert_eq!(exported["updated_at"], created["updated_at"]);
}
