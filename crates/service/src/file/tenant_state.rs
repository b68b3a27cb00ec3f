use std::sync::Arc;

use tokio::sync::Mutex;

use crate::errors::ServiceError;
use crate::state::store::{TenantStateInput, TenantStateStore};
use crate::storage::document_store::{DocumentStore, TenantState};
use crate::tenant::sanitize_tenant;

/// File-backed tenant-state store over the shared JSON document.
///
/// Every operation is a load, modify, save cycle against the whole document.
/// The mutex serializes those cycles so one tenant's rewrite can no longer
/// silently drop another's concurrent update.
#[derive(Clone)]
pub struct FileTenantStore {
    store: DocumentStore,
    cycle: Arc<Mutex<()>>,
}

impl FileTenantStore {
    /// Initialize the store from the given file path. The parent directory
    /// is created if missing; the file appears with the first write.
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Arc<Self> {
        let store = DocumentStore::new(path).await;
        Arc::new(Self { store, cycle: Arc::new(Mutex::new(())) })
    }

    /// Fetch the bucket for a raw tenant identifier, normalizing it first.
    /// A tenant seen for the first time gets an empty bucket written to disk
    /// before it is handed out.
    pub async fn get_state(&self, tenant: &str) -> Result<TenantState, ServiceError> {
        let key = sanitize_tenant(tenant);
        let _guard = self.cycle.lock().await;
        let mut doc = self.store.load().await;
        if let Some(state) = doc.tenants.get(&key) {
            return Ok(state.clone());
        }
        let state = TenantState::default();
        doc.tenants.insert(key, state.clone());
        self.store.save(&doc).await?;
        Ok(state)
    }

    /// Replace the bucket for a raw tenant identifier, normalizing it first.
    /// The current document is loaded before the rewrite so every other
    /// tenant's bucket survives.
    pub async fn put_state(&self, tenant: &str, next: TenantStateInput) -> Result<(), ServiceError> {
        let key = sanitize_tenant(tenant);
        let _guard = self.cycle.lock().await;
        let mut doc = self.store.load().await;
        doc.tenants.insert(key, next.into_state());
        self.store.save(&doc).await
    }
}

#[async_trait::async_trait]
impl TenantStateStore for FileTenantStore {
    async fn get_state(&self, tenant: &str) -> Result<TenantState, ServiceError> {
        self.get_state(tenant).await
    }

    async fn put_state(&self, tenant: &str, next: TenantStateInput) -> Result<(), ServiceError> {
        self.put_state(tenant, next).await
    }
}
