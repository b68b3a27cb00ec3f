use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 3000, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// JSON document holding every tenant's state.
    #[serde(default = "default_data_file")]
    pub data_file: String,
    /// Directory served as static assets, with index.html as the fallback.
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: default_data_file(), frontend_dir: default_frontend_dir() }
    }
}

fn default_data_file() -> String {
    "data/state.json".to_string()
}

fn default_frontend_dir() -> String {
    "frontend".to_string()
}

/// Load the config file named by `CONFIG_PATH` (default `config.toml`).
///
/// A missing file is not an error: callers fall back to environment
/// variables and built-in defaults. A file that exists but cannot be read,
/// parsed, or validated is an error and should abort startup instead of
/// being silently replaced by defaults.
pub fn load_if_present() -> Result<Option<AppConfig>> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_if_present_from(&path)
}

pub fn load_if_present_from(path: &str) -> Result<Option<AppConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(anyhow!("config file {path} is unreadable: {err}")),
    };
    let mut cfg: AppConfig =
        toml::from_str(&content).map_err(|err| anyhow!("config file {path} is invalid: {err}"))?;
    cfg.normalize_and_validate()
        .map_err(|err| anyhow!("config file {path} is invalid: {err}"))?;
    Ok(Some(cfg))
}

impl AppConfig {
    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        // 归一化 storage（支持从环境变量填充文件路径）
        self.storage.normalize_from_env();
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads.unwrap_or(0) == 0 {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        if self.data_file.trim().is_empty() {
            if let Ok(path) = std::env::var("DATA_FILE") {
                self.data_file = path;
            }
        }
        if self.data_file.trim().is_empty() {
            self.data_file = default_data_file();
        }
        if self.frontend_dir.trim().is_empty() {
            self.frontend_dir = default_frontend_dir();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_file.ends_with('/') {
            return Err(anyhow!("storage.data_file must name a file, not a directory"));
        }
        Ok(())
    }
}
