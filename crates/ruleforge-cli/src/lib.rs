// crates/ruleforge-cli/src/lib.rs
// ============================================================================
// Module: RuleForge CLI Library
// Description: Shared helpers for the RuleForge CLI binary.
// Purpose: Expose the message catalog and text rendering to the binary and tests.
// Dependencies: ruleforge-core
// ============================================================================

//! ## Overview
//! Library surface of the `ruleforge` binary. The message catalog lives in
//! [`i18n`] and page rendering in [`render`].

pub mod i18n;
pub mod render;
