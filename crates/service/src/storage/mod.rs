//! Storage abstractions for the service layer
//!
//! Owns the single JSON document that holds every tenant's state and the
//! helpers to read it tolerantly and rewrite it in full.

pub mod document_store;
