// crates/ruleforge-client/src/api.rs
// ============================================================================
// Module: RuleForge API Client
// Description: Typed async client for the compliance backend REST API.
// Purpose: Issue one request per operation and normalize failures.
// Dependencies: reqwest, serde, serde_json, tracing
// ============================================================================

//! ## Overview
//! Every operation issues exactly one HTTP request against the configured
//! base URL and either returns the parsed JSON body or fails with a single
//! [`ApiError`]. There are no retries and no caching. A request timeout is
//! applied only when one is configured.
//!
//! Non-2xx responses are normalized the same way for every endpoint: the
//! `error` field of a JSON body when present, otherwise the HTTP reason phrase
//! when the body is not JSON, otherwise `HTTP <code>`.
//!
//! Security posture: server responses are untrusted; bodies are read with a
//! hard size limit and fail closed on parsing errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::multipart::Form;
use reqwest::multipart::Part;
use reqwest::redirect::Policy;
use ruleforge_config::ApiConfig;
use ruleforge_config::normalize_base_url;
use ruleforge_core::AuditLogPage;
use ruleforge_core::HitlDecision;
use ruleforge_core::LiveStatus;
use ruleforge_core::PipelineStatus;
use ruleforge_core::RulesPage;
use ruleforge_core::RunAck;
use ruleforge_core::RunRequest;
use ruleforge_core::Stats;
use ruleforge_core::UploadReceipt;
use ruleforge_core::VersionIndex;
use ruleforge_core::VersionRules;
use ruleforge_core::ViolationsPage;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::document::PdfDocument;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum response body size accepted from the backend.
pub const MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

/// Multipart field name carrying the uploaded document.
const UPLOAD_FIELD: &str = "file";

/// CSV export path.
const EXPORT_VIOLATIONS_PATH: &str = "/api/export/violations";

/// Compliance report path.
const EXPORT_REPORT_PATH: &str = "/api/export/report";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// API client errors.
///
/// # Invariants
/// - Variants are stable for CLI error mapping and tests.
/// - String payloads are user-facing and may include untrusted server text.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client configuration error.
    #[error("api client config error: {0}")]
    Config(String),
    /// Network or protocol failure before a response was received.
    #[error("api transport error: {0}")]
    Transport(String),
    /// Non-2xx response.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Normalized server message.
        message: String,
    },
    /// Response body was not the expected JSON.
    #[error("api json error: {0}")]
    Json(String),
    /// Response size exceeds limits.
    #[error("api response exceeds size limit ({actual} > {limit})")]
    ResponseTooLarge {
        /// Actual size in bytes.
        actual: usize,
        /// Maximum size in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Backend REST client.
///
/// # Invariants
/// - `base_url` is an absolute http(s) URL without a trailing slash.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Underlying HTTP client.
    client: Client,
    /// Backend origin.
    base_url: String,
}

impl ApiClient {
    /// Builds a client from validated API settings.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url =
            normalize_base_url(&config.base_url).map_err(|err| ApiError::Config(err.to_string()))?;
        let mut builder = Client::builder().redirect(Policy::none());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
        })
    }

    /// Returns the backend origin.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the CSV export download link.
    #[must_use]
    pub fn violations_export_url(&self) -> String {
        format!("{}{EXPORT_VIOLATIONS_PATH}", self.base_url)
    }

    /// Returns the compliance report download link.
    #[must_use]
    pub fn report_url(&self) -> String {
        format!("{}{EXPORT_REPORT_PATH}", self.base_url)
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Fetches aggregate counts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.get_json("/api/stats").await
    }

    /// Fetches the current rule set, forwarding optional query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn rules(&self, params: &[(&str, &str)]) -> Result<RulesPage, ApiError> {
        let url = self.url_with_query("/api/rules", params)?;
        self.fetch(Method::GET, "/api/rules", self.client.get(url)).await
    }

    /// Fetches violations, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn violations(&self) -> Result<ViolationsPage, ApiError> {
        self.get_json("/api/violations?sort=desc").await
    }

    /// Fetches AI-generated explanations as raw JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn explanations(&self) -> Result<Value, ApiError> {
        self.get_json("/api/explanations").await
    }

    /// Fetches up to `limit` audit entries plus summary stats.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn audit_log(&self, limit: u32) -> Result<AuditLogPage, ApiError> {
        self.get_json(&format!("/api/audit-log?limit={limit}")).await
    }

    /// Fetches the archived version index.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn versions(&self) -> Result<VersionIndex, ApiError> {
        self.get_json("/api/versions").await
    }

    /// Fetches the rule set archived as `version`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn version(&self, version: u64) -> Result<VersionRules, ApiError> {
        self.get_json(&format!("/api/versions/{version}")).await
    }

    /// Fetches live ingestion status.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn live_status(&self) -> Result<LiveStatus, ApiError> {
        self.get_json("/api/live-status").await
    }

    /// Fetches log lines after `offset` plus the process state.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn pipeline_status(&self, offset: usize) -> Result<PipelineStatus, ApiError> {
        self.get_json(&format!("/api/pipeline-status?offset={offset}")).await
    }

    // ------------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------------

    /// Records a HITL decision; the response body is returned verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn submit_hitl_decision(&self, decision: &HitlDecision) -> Result<Value, ApiError> {
        self.post_json("/api/hitl-decision", decision).await
    }

    /// Starts a pipeline run.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn start_run(&self, request: &RunRequest) -> Result<RunAck, ApiError> {
        self.post_json("/api/run", request).await
    }

    /// Uploads a PDF as multipart form data.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn upload(&self, document: &PdfDocument) -> Result<UploadReceipt, ApiError> {
        let part = Part::bytes(document.bytes().to_vec())
            .file_name(document.file_name().to_string())
            .mime_str("application/pdf")
            .map_err(|err| ApiError::Config(err.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD, part);
        let request = self.client.post(self.url("/api/upload")).multipart(form);
        self.fetch(Method::POST, "/api/upload", request).await
    }

    // ------------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------------

    /// Joins `path` onto the base URL.
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Builds a URL with form-encoded query parameters.
    fn url_with_query(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.url(path)).map_err(|err| ApiError::Config(err.to_string()))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    /// Issues a GET request.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.fetch(Method::GET, path, self.client.get(self.url(path))).await
    }

    /// Issues a POST request with a JSON body.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let payload =
            serde_json::to_vec(body).map_err(|err| ApiError::Json(format!("serialization failed: {err}")))?;
        let request = self
            .client
            .post(self.url(path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload);
        self.fetch(Method::POST, path, request).await
    }

    /// Sends a request and decodes a JSON success body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, oversized
    /// bodies, or undecodable JSON.
    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|err| {
            debug!(%method, path, error = %err, "api request failed");
            ApiError::Transport(err.to_string())
        })?;
        let status = response.status();
        debug!(%method, path, status = status.as_u16(), "api request");
        let body = read_response_body_with_limit(response, MAX_RESPONSE_BYTES).await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::Json(format!("invalid response from {path}: {err}")))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a response body, failing once `limit` bytes are exceeded.
///
/// # Errors
///
/// Returns [`ApiError`] when the stream fails or exceeds `limit`.
async fn read_response_body_with_limit(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, ApiError> {
    let mut body = Vec::new();
    let mut total: usize = 0;
    while let Some(chunk) =
        response.chunk().await.map_err(|err| ApiError::Transport(err.to_string()))?
    {
        let next_total = total.checked_add(chunk.len()).ok_or(ApiError::ResponseTooLarge {
            actual: usize::MAX,
            limit,
        })?;
        if next_total > limit {
            return Err(ApiError::ResponseTooLarge {
                actual: next_total,
                limit,
            });
        }
        body.extend_from_slice(&chunk);
        total = next_total;
    }
    Ok(body)
}

/// Extracts the user-facing message from a non-2xx response body.
pub(crate) fn error_message(status: StatusCode, body: &[u8]) -> String {
    let fallback = || format!("HTTP {}", status.as_u16());
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => value
            .get("error")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .map_or_else(fallback, str::to_string),
        Err(_) => status.canonical_reason().map_or_else(fallback, str::to_string),
    }
}
