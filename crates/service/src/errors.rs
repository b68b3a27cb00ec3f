use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The state document could not be durably rewritten.
    #[error("persistence failure: {0}")]
    Persistence(String),
}
