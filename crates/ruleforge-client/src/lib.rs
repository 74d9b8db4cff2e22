// crates/ruleforge-client/src/lib.rs
// ============================================================================
// Module: RuleForge Client Library
// Description: REST client, gate state, run controller, and live poller.
// Purpose: Everything in the console that talks to the backend.
// Dependencies: reqwest, tokio, async-trait, sha2, tracing
// ============================================================================

//! ## Overview
//! `ruleforge-client` wraps the compliance backend's REST API in
//! [`ApiClient`] and builds the stateful pieces of the console on top of it:
//! the [`Gate`], the pipeline [`RunController`], and the [`LiveMonitor`].
//! Stateful pieces depend on the narrow traits in [`backend`] so they can be
//! driven by scripted backends in tests.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod api;
pub mod backend;
pub mod document;
pub mod gate;
pub mod live;
pub mod pipeline;
pub mod poll;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use api::ApiClient;
pub use api::ApiError;
pub use api::MAX_RESPONSE_BYTES;
pub use backend::LiveSource;
pub use backend::PipelineBackend;
pub use backend::StatsSource;
pub use document::DocumentId;
pub use document::PdfDocument;
pub use gate::Gate;
pub use live::LiveFeed;
pub use live::LiveMonitor;
pub use live::LiveUpdate;
pub use pipeline::ActiveRun;
pub use pipeline::RunController;
pub use pipeline::RunError;
pub use pipeline::RunEvent;
pub use pipeline::RunOutcome;
pub use pipeline::RunSettings;
pub use pipeline::RunSnapshot;
pub use pipeline::RunState;
pub use poll::PollHandle;
