// crates/ruleforge-client/src/backend.rs
// ============================================================================
// Module: Backend Interfaces
// Description: Narrow async traits over the backend operations used by pollers.
// Purpose: Let the gate, run controller, and live monitor run against scripted
//          backends as well as the HTTP client.
// Dependencies: async-trait
// ============================================================================

use async_trait::async_trait;
use ruleforge_core::AuditLogPage;
use ruleforge_core::LiveStatus;
use ruleforge_core::PipelineStatus;
use ruleforge_core::RunAck;
use ruleforge_core::RunRequest;
use ruleforge_core::Stats;
use ruleforge_core::UploadReceipt;

use crate::api::ApiClient;
use crate::api::ApiError;
use crate::document::PdfDocument;

/// Source of aggregate stats for the gate.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetches aggregate counts.
    async fn stats(&self) -> Result<Stats, ApiError>;
}

/// Operations driven by the pipeline run controller.
#[async_trait]
pub trait PipelineBackend: Send + Sync {
    /// Uploads a source document.
    async fn upload(&self, document: &PdfDocument) -> Result<UploadReceipt, ApiError>;

    /// Requests a run.
    async fn start_run(&self, request: &RunRequest) -> Result<RunAck, ApiError>;

    /// Fetches log lines after `offset` plus the process state.
    async fn pipeline_status(&self, offset: usize) -> Result<PipelineStatus, ApiError>;

    /// Fetches the audit log used for the recent-runs listing.
    async fn audit_log(&self, limit: u32) -> Result<AuditLogPage, ApiError>;
}

/// Source of live monitoring snapshots.
#[async_trait]
pub trait LiveSource: Send + Sync {
    /// Fetches live ingestion status.
    async fn live_status(&self) -> Result<LiveStatus, ApiError>;
}

#[async_trait]
impl StatsSource for ApiClient {
    async fn stats(&self) -> Result<Stats, ApiError> {
        Self::stats(self).await
    }
}

#[async_trait]
impl PipelineBackend for ApiClient {
    async fn upload(&self, document: &PdfDocument) -> Result<UploadReceipt, ApiError> {
        Self::upload(self, document).await
    }

    async fn start_run(&self, request: &RunRequest) -> Result<RunAck, ApiError> {
        Self::start_run(self, request).await
    }

    async fn pipeline_status(&self, offset: usize) -> Result<PipelineStatus, ApiError> {
        Self::pipeline_status(self, offset).await
    }

    async fn audit_log(&self, limit: u32) -> Result<AuditLogPage, ApiError> {
        Self::audit_log(self, limit).await
    }
}

#[async_trait]
impl LiveSource for ApiClient {
    async fn live_status(&self) -> Result<LiveStatus, ApiError> {
        Self::live_status(self).await
    }
}
