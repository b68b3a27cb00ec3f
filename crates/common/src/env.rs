//! Environment/runtime helpers
//!
//! Startup sanity checks for the directories the server expects.

use std::path::Path;

use tracing::warn;

/// Ensure the runtime directories exist.
///
/// The data directory is created if missing since state cannot be persisted
/// without it. A missing frontend directory only warns; the API stays up.
pub async fn ensure_env(frontend_dir: &str, data_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(frontend_dir).await.is_err() {
        warn!(%frontend_dir, "frontend assets directory not found; static assets may 404");
    }
    if !Path::new(data_dir).as_os_str().is_empty() {
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create data directory {data_dir}: {e}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_data_dir() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("dispatch_env_{}", std::process::id()));
        let nested = dir.join("data");
        ensure_env("frontend", nested.to_str().unwrap()).await?;
        assert!(tokio::fs::metadata(&nested).await.is_ok());
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
