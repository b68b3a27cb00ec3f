use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tokio::fs;
use tracing::{error, warn};

use crate::errors::ServiceError;

/// One tenant's bucket: two lists that are replaced wholesale on every write.
///
/// Records inside the lists are opaque JSON; nothing beyond "is a sequence"
/// is enforced. Unknown fields on a stored bucket disappear on the next
/// rewrite because only these two are serialized back.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantState {
    #[serde(default, deserialize_with = "seq_or_empty")]
    pub customers: Vec<Value>,
    #[serde(default, deserialize_with = "seq_or_empty")]
    pub jobs: Vec<Value>,
}

/// The entire persisted document: canonical tenant key to bucket.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Document {
    pub tenants: HashMap<String, TenantState>,
}

/// A bucket field that should be a sequence but holds something else (for
/// example after a hand edit) loads as empty instead of poisoning the parse
/// of the whole document.
fn seq_or_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

/// File-backed store for the shared tenant document.
///
/// There is no in-memory cache: every [`load`](DocumentStore::load) re-reads
/// the file and every [`save`](DocumentStore::save) rewrites it in full, so
/// each caller operation is a read-modify-write over the whole document.
#[derive(Clone)]
pub struct DocumentStore {
    file_path: PathBuf,
}

impl DocumentStore {
    /// Initialize the store from a path. Creates the parent directory if
    /// missing; the file itself only appears with the first save.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Self {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }
        Self { file_path }
    }

    /// Read the whole document.
    ///
    /// Total over file contents: a missing file yields an empty document
    /// silently, and unreadable or malformed content (including a missing
    /// `tenants` mapping) degrades to an empty document after a warning.
    /// Whatever was on disk is then effectively reset by the next save.
    pub async fn load(&self) -> Document {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Document::default();
            }
            Err(err) => {
                warn!(
                    path = %self.file_path.display(),
                    error = %err,
                    "state file unreadable, starting from an empty document"
                );
                return Document::default();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(doc) => doc,
            Err(err) => {
                warn!(
                    path = %self.file_path.display(),
                    error = %err,
                    "state file malformed, starting from an empty document"
                );
                Document::default()
            }
        }
    }

    /// Rewrite the whole document, pretty-printed for hand inspection.
    ///
    /// Unlike loads, a failed save is surfaced to the caller: success must
    /// not be reported when nothing was durably written.
    pub async fn save(&self, doc: &Document) -> Result<(), ServiceError> {
        let data =
            serde_json::to_vec_pretty(doc).map_err(|e| ServiceError::Persistence(e.to_string()))?;
        if let Err(err) = fs::write(&self.file_path, data).await {
            error!(path = %self.file_path.display(), error = %err, "state file rewrite failed");
            return Err(ServiceError::Persistence(err.to_string()));
        }
        Ok(())
    }
}
