use std::{env, net::SocketAddr, path::Path};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, SharedStore};
use service::{file::tenant_state::FileTenantStore, runtime};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Bind address from env vars with sensible fallbacks, for runs without a
/// config file
fn bind_addr_from_env() -> anyhow::Result<SocketAddr> {
    let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Effective bind address and storage settings for this process.
///
/// A present config file already passed validation and drives both; a
/// missing one falls back to `SERVER_HOST`/`SERVER_PORT` and storage
/// defaults.
fn effective_settings(
    config: Option<configs::AppConfig>,
) -> anyhow::Result<(SocketAddr, configs::StorageConfig)> {
    match config {
        Some(cfg) => {
            let addr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
            Ok((addr, cfg.storage))
        }
        None => Ok((bind_addr_from_env()?, configs::StorageConfig::default())),
    }
}

/// Directory the state file lives in, for the startup environment check.
fn data_dir_of(data_file: &str) -> String {
    Path::new(data_file)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ".".to_string())
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // 配置文件缺失时回退到环境变量与默认值；存在但非法则中止启动
    let (addr, storage) = effective_settings(configs::load_if_present()?)?;

    runtime::ensure_env(&storage.frontend_dir, &data_dir_of(&storage.data_file)).await?;

    // 租户状态存储（文件持久化 data/state.json）
    let store: SharedStore = FileTenantStore::new(&storage.data_file).await;

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(store, cors, &storage.frontend_dir);

    // Bind and serve
    info!(%addr, data_file = %storage.data_file, "starting dispatch state server");
    println!("dispatch state server (multi-tenant) listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
