// crates/ruleforge-config/src/lib.rs
// ============================================================================
// Module: RuleForge Config Library
// Description: Canonical console configuration model and validation.
// Purpose: Single source of truth for ruleforge.toml semantics.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! `ruleforge-config` defines the configuration model shared by the client
//! library and the CLI: backend origin, poll cadence, analyst identity, list
//! limits, and logging defaults.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
