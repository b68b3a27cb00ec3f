use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Ack;
use service::state::store::{TenantStateInput, TenantStateStore};
use service::storage::document_store::TenantState;
use service::tenant::DEFAULT_TENANT;

use crate::errors::ApiError;

/// Shared handler state: the tenant-state store behind the API.
pub type SharedStore = Arc<dyn TenantStateStore>;

#[derive(Debug, Deserialize)]
pub struct StateQuery {
    /// Raw tenant identifier from the query string. Resolved to the default
    /// tenant here, once, when absent; normalization happens in the store.
    pub tenant: Option<String>,
}

pub async fn health() -> Json<Ack> {
    Json(Ack { ok: true })
}

/// 读取租户状态；首次访问会落盘一个空桶
async fn get_state(
    State(store): State<SharedStore>,
    Query(query): Query<StateQuery>,
) -> Result<Json<TenantState>, ApiError> {
    let tenant = query.tenant.as_deref().unwrap_or(DEFAULT_TENANT);
    let state = store.get_state(tenant).await?;
    Ok(Json(state))
}

/// 整体替换租户状态
async fn put_state(
    State(store): State<SharedStore>,
    Query(query): Query<StateQuery>,
    Json(payload): Json<TenantStateInput>,
) -> Result<Json<Ack>, ApiError> {
    let tenant = query.tenant.as_deref().unwrap_or(DEFAULT_TENANT);
    store.put_state(tenant, payload).await?;
    Ok(Json(Ack { ok: true }))
}

/// Build the full application router: the state API plus the static frontend
pub fn build_router(store: SharedStore, cors: CorsLayer, frontend_dir: &str) -> Router {
    let index = format!("{frontend_dir}/index.html");
    let static_dir = ServeDir::new(frontend_dir).fallback(ServeFile::new(index));

    Router::new()
        .route("/api/health", get(health))
        .route("/api/state", get(get_state).put(put_state))
        .with_state(store)
        // 非 API 路径全部交给静态资源，未命中时回退到 index.html
        .fallback_service(static_dir)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                ),
        )
}
