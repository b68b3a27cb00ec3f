//! Canonical tenant keys.
//!
//! Raw tenant identifiers arrive from query strings and are reduced to a
//! canonical key before they touch storage, so lookalike spellings of the
//! same name land in the same bucket.

/// Key used when the caller does not name a tenant, or names one that is
/// empty after normalization.
pub const DEFAULT_TENANT: &str = "default";

/// Normalize a raw tenant identifier into a canonical bucket key.
///
/// Trims surrounding whitespace, lowercases, then strips every character
/// outside `a-z`, `0-9`, `_` and `-`. An identifier that is empty after
/// stripping maps to [`DEFAULT_TENANT`]. Distinct raw inputs may normalize
/// to the same key; such inputs address the same tenant.
pub fn sanitize_tenant(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let canonical: String = lowered
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-'))
        .collect();
    if canonical.is_empty() {
        DEFAULT_TENANT.to_string()
    } else {
        canonical
    }
}
