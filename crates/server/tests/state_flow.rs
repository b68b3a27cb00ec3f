use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use service::file::tenant_state::FileTenantStore;
use tower::ServiceExt;
use uuid::Uuid;

use server::routes::{self, SharedStore};

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

fn temp_state_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("state_flow_{}.json", Uuid::new_v4()))
}

async fn build_app(data_file: &std::path::Path) -> Router {
    let store: SharedStore = FileTenantStore::new(data_file).await;
    routes::build_router(store, cors(), "frontend")
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().method(Method::GET).uri(uri).body(Body::empty()).expect("request")
}

async fn decode_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

#[tokio::test]
async fn health_reports_ok() -> anyhow::Result<()> {
    let tmp = temp_state_path();
    let app = build_app(&tmp).await;

    let resp = app.oneshot(get_request("/api/health")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(decode_json(resp).await, json!({"ok": true}));

    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn put_then_get_shares_the_sanitized_bucket() -> anyhow::Result<()> {
    let tmp = temp_state_path();
    let app = build_app(&tmp).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/state?tenant=acme",
            json!({"customers": [{"id": 1, "name": "Ann"}], "jobs": []}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(decode_json(resp).await, json!({"ok": true}));

    // "ACME%20" decodes to "ACME ", which normalizes to the same bucket
    let resp = app.clone().oneshot(get_request("/api/state?tenant=ACME%20")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = decode_json(resp).await;
    assert_eq!(body["customers"], json!([{"id": 1, "name": "Ann"}]));
    assert_eq!(body["jobs"], json!([]));

    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn missing_tenant_param_means_default() -> anyhow::Result<()> {
    let tmp = temp_state_path();
    let app = build_app(&tmp).await;

    let resp = app.clone().oneshot(get_request("/api/state")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(decode_json(resp).await, json!({"customers": [], "jobs": []}));

    // the lazy create put the default bucket on disk
    let raw = tokio::fs::read(&tmp).await?;
    let doc: Value = serde_json::from_slice(&raw)?;
    assert!(doc["tenants"]["default"].is_object());

    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn non_sequence_payload_fields_become_empty_lists() -> anyhow::Result<()> {
    let tmp = temp_state_path();
    let app = build_app(&tmp).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/state?tenant=acme",
            json!({"customers": "not-a-list"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.clone().oneshot(get_request("/api/state?tenant=acme")).await?;
    assert_eq!(decode_json(resp).await, json!({"customers": [], "jobs": []}));

    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn tenants_do_not_leak_into_each_other() -> anyhow::Result<()> {
    let tmp = temp_state_path();
    let app = build_app(&tmp).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/state?tenant=acme",
            json!({"customers": [{"id": 1}], "jobs": [{"id": 5}]}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/state?tenant=rival",
            json!({"customers": [{"id": 2}], "jobs": []}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.clone().oneshot(get_request("/api/state?tenant=acme")).await?;
    let body = decode_json(resp).await;
    assert_eq!(body["customers"], json!([{"id": 1}]));
    assert_eq!(body["jobs"], json!([{"id": 5}]));

    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn failed_write_maps_to_server_error() -> anyhow::Result<()> {
    // A directory in place of the state file makes every save fail.
    let tmp = std::env::temp_dir().join(format!("state_flow_dir_{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(&tmp).await?;
    let app = build_app(&tmp).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/state?tenant=acme",
            json!({"customers": [], "jobs": []}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = decode_json(resp).await;
    assert!(body["error"].is_string());

    let _ = tokio::fs::remove_dir_all(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn unknown_paths_fall_back_to_the_index_page() -> anyhow::Result<()> {
    let tmp = temp_state_path();
    let frontend = std::env::temp_dir().join(format!("state_flow_frontend_{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(&frontend).await?;
    tokio::fs::write(frontend.join("index.html"), "<!doctype html><title>dispatch</title>")
        .await?;

    let store: SharedStore = FileTenantStore::new(&tmp).await;
    let app = routes::build_router(store, cors(), frontend.to_str().expect("utf8 path"));

    let resp = app.clone().oneshot(get_request("/customers")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    assert!(String::from_utf8(bytes.to_vec())?.contains("dispatch"));

    let _ = tokio::fs::remove_file(&tmp).await;
    let _ = tokio::fs::remove_dir_all(&frontend).await;
    Ok(())
}
