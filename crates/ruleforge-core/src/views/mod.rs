// crates/ruleforge-core/src/views/mod.rs
// ============================================================================
// Module: Derived View State
// Description: Pure projections of fetched records for each console page.
// Purpose: Recompute filters, summaries, and chart geometry on every read.
// Dependencies: regex, serde, serde_json
// ============================================================================

//! ## Overview
//! Nothing here is cached. Each function takes fetched records plus the
//! current selections and returns a fresh projection, so there is no derived
//! state to invalidate when a page reloads.

pub mod audit;
pub mod dashboard;
pub mod live;
pub mod pagination;
pub mod vault;
pub mod violations;

/// Case-insensitive substring match; an empty needle matches everything.
pub(crate) fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}
