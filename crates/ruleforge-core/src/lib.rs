// crates/ruleforge-core/src/lib.rs
// ============================================================================
// Module: RuleForge Core Library
// Description: Data model and pure logic for the RuleForge compliance console.
// Purpose: Single source of truth for backend record shapes and view logic.
// Dependencies: regex, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `ruleforge-core` holds everything in the console that does not touch the
//! network: backend record types, the severity classifier, the fingerprint
//! version diff, route resolution against the gate, and derived view state.
//! All functions are deterministic and side-effect free.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod diff;
pub mod model;
pub mod phase;
pub mod routes;
pub mod severity;
pub mod views;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use diff::Diff;
pub use diff::RuleDiff;
pub use diff::diff_by_key;
pub use diff::diff_rules;
pub use diff::diff_snapshots;
pub use model::*;
pub use phase::Phase;
pub use phase::UnknownPhase;
pub use routes::GateStatus;
pub use routes::Route;
pub use routes::RouteView;
pub use severity::SeverityLevel;
pub use severity::classify;
