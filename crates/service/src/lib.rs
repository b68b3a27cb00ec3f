//! Service layer for multi-tenant dispatch state.
//! - Normalizes raw tenant identifiers into canonical bucket keys.
//! - Owns the shared JSON document on disk and the accessor over it.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod file;
pub mod runtime;
pub mod state;
pub mod storage;
pub mod tenant;
