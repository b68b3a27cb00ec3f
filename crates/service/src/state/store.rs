use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ServiceError;
use crate::storage::document_store::TenantState;

/// Incoming replacement state for one tenant.
///
/// Both fields arrive as raw JSON so absent or non-sequence values can be
/// coerced instead of rejected; clients that send garbage get an empty list
/// stored, not an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TenantStateInput {
    #[serde(default)]
    pub customers: Value,
    #[serde(default)]
    pub jobs: Value,
}

impl TenantStateInput {
    /// Coerce both fields to sequences. Anything that is not a JSON array,
    /// including an absent field, becomes empty. List elements are kept as
    /// opaque values with no deeper validation.
    pub fn into_state(self) -> TenantState {
        TenantState {
            customers: seq_or_default(self.customers),
            jobs: seq_or_default(self.jobs),
        }
    }
}

fn seq_or_default(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// Trait abstraction for tenant-state storage.
/// Implementations can be file-backed, database-backed, or remote KV.
#[async_trait]
pub trait TenantStateStore: Send + Sync {
    /// Fetch a tenant's bucket, creating and persisting an empty one the
    /// first time the tenant is seen.
    async fn get_state(&self, tenant: &str) -> Result<TenantState, ServiceError>;

    /// Replace a tenant's bucket wholesale.
    async fn put_state(&self, tenant: &str, next: TenantStateInput) -> Result<(), ServiceError>;
}
