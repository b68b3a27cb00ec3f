//! Tenant-state access contracts.

pub mod store;
