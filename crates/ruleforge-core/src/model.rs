// crates/ruleforge-core/src/model.rs
// ============================================================================
// Module: RuleForge Data Model
// Description: Wire types returned by the compliance backend REST API.
// Purpose: Give every page a typed, read-only copy of backend records.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Records in this module mirror the JSON bodies served by the compliance
//! backend. The console never mutates them; each view fetches a fresh copy.
//! Optional or missing numeric fields default to zero, matching how the
//! dashboard treats absent counts.
//!
//! ## Invariants
//! - Violation counts are non-negative integers (`u64`).
//! - Unknown JSON fields are ignored so backend additions never break parsing.
//! - Non-optional counters, text, and lists read an explicit `null` as their
//!   default, the same as a missing key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::severity::SeverityLevel;
use crate::severity::classify;

// ============================================================================
// SECTION: Field Helpers
// ============================================================================

/// Deserializes `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// A policy rule extracted from a regulatory document.
///
/// # Invariants
/// - `fingerprint` is stable across re-extraction iff the semantic fields are
///   unchanged; it is the identity used when diffing snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule identifier.
    pub id: String,
    /// Category tag (threshold, pattern, ratio, ...).
    #[serde(default)]
    pub rule_type: Option<String>,
    /// Natural-language description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Data field the condition applies to.
    #[serde(default)]
    pub condition_field: Option<String>,
    /// Comparison operator.
    #[serde(default)]
    pub operator: Option<String>,
    /// Threshold value; numeric or textual depending on the rule.
    #[serde(default)]
    pub threshold_value: Value,
    /// Optional generated SQL hint.
    #[serde(default)]
    pub sql_hint: Option<String>,
    /// Content fingerprint over the rule's semantic fields.
    #[serde(rename = "_fingerprint", default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Derived violation count.
    #[serde(default, deserialize_with = "null_as_default")]
    pub violations: u64,
}

impl Rule {
    /// Returns the key used to match this rule across snapshots.
    ///
    /// Falls back to the identifier when no fingerprint is present or the
    /// fingerprint is empty.
    #[must_use]
    pub fn diff_key(&self) -> &str {
        match self.fingerprint.as_deref() {
            Some(fingerprint) if !fingerprint.is_empty() => fingerprint,
            _ => &self.id,
        }
    }

    /// Returns true when at least one violation was recorded for the rule.
    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        self.violations > 0
    }
}

/// Response body of `GET /api/rules`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesPage {
    /// Current rule set.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Vec<Rule>,
    /// Distinct rule types present in the rule set.
    #[serde(default, deserialize_with = "null_as_default")]
    pub types: Vec<String>,
}

// ============================================================================
// SECTION: Violations
// ============================================================================

/// Human-in-the-loop status recorded against a violation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HitlStatus {
    /// Awaiting analyst review.
    #[default]
    Pending,
    /// Analyst confirmed the violation.
    Confirmed,
    /// Analyst dismissed the violation.
    Dismissed,
    /// Analyst escalated the violation.
    Escalated,
}

impl HitlStatus {
    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Dismissed => "DISMISSED",
            Self::Escalated => "ESCALATED",
        }
    }

    /// Parses a status label (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "DISMISSED" => Some(Self::Dismissed),
            "ESCALATED" => Some(Self::Escalated),
            _ => None,
        }
    }
}

impl fmt::Display for HitlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule that matched offending rows in the monitored data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule reference.
    pub rule_id: String,
    /// Rule description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Observed violation count.
    #[serde(default, deserialize_with = "null_as_default")]
    pub violation_count: u64,
    /// Severity label as reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<SeverityLevel>,
    /// Human-in-the-loop status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub hitl_action: HitlStatus,
    /// Analyst who recorded the last decision.
    #[serde(default)]
    pub hitl_analyst: Option<String>,
    /// Timestamp of the last decision.
    #[serde(default)]
    pub hitl_timestamp: Option<String>,
    /// AI-generated plain-English explanation.
    #[serde(default)]
    pub plain_english: Option<String>,
    /// Policy clause the rule was extracted from.
    #[serde(default)]
    pub policy_reference: Option<String>,
    /// Explanation of why rows violate the rule.
    #[serde(default)]
    pub reason: Option<String>,
    /// Suggested remediation.
    #[serde(default)]
    pub recommended_action: Option<String>,
    /// Model or component that produced the explanation.
    #[serde(default)]
    pub generated_by: Option<String>,
    /// SQL text used to find offending rows.
    #[serde(default)]
    pub sql: Option<String>,
    /// Sample offending rows.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sample_violations: Vec<Value>,
    /// Execution status of the violation query.
    #[serde(default)]
    pub status: Option<String>,
}

impl Violation {
    /// Returns the severity classified from the violation count.
    #[must_use]
    pub const fn severity_level(&self) -> SeverityLevel {
        classify(self.violation_count)
    }
}

/// Response body of `GET /api/violations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViolationsPage {
    /// Violation records.
    #[serde(default, deserialize_with = "null_as_default")]
    pub violations: Vec<Violation>,
}

/// Analyst decision action submitted to `POST /api/hitl-decision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HitlAction {
    /// Confirm the violation.
    Confirm,
    /// Dismiss the violation.
    Dismiss,
    /// Escalate the violation.
    Escalate,
}

impl HitlAction {
    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirm => "CONFIRM",
            Self::Dismiss => "DISMISS",
            Self::Escalate => "ESCALATE",
        }
    }

    /// Returns the status a violation moves to after this action.
    #[must_use]
    pub const fn resulting_status(self) -> HitlStatus {
        match self {
            Self::Confirm => HitlStatus::Confirmed,
            Self::Dismiss => HitlStatus::Dismissed,
            Self::Escalate => HitlStatus::Escalated,
        }
    }
}

/// Request body of `POST /api/hitl-decision`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitlDecision {
    /// Rule the decision applies to.
    pub rule_id: String,
    /// Decision action.
    pub action: HitlAction,
    /// Analyst recording the decision.
    pub analyst: String,
    /// Free-form notes.
    pub notes: String,
}

// ============================================================================
// SECTION: Stats
// ============================================================================

/// Response body of `GET /api/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of extracted rules.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_rules: u64,
    /// Rules with at least one violation.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules_triggered: u64,
    /// Sum of violation counts.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_violations: u64,
    /// High-severity rule count.
    #[serde(default, deserialize_with = "null_as_default")]
    pub high_severity: u64,
    /// Medium-severity rule count.
    #[serde(default, deserialize_with = "null_as_default")]
    pub medium_severity: u64,
    /// Low-severity rule count.
    #[serde(default, deserialize_with = "null_as_default")]
    pub low_severity: u64,
    /// Timestamp of the last pipeline run.
    #[serde(default)]
    pub last_run: Option<String>,
}

impl Stats {
    /// Returns true when at least one rule has been produced.
    #[must_use]
    pub const fn has_rules(&self) -> bool {
        self.total_rules > 0
    }
}

// ============================================================================
// SECTION: Audit Log
// ============================================================================

/// Audit event type tag.
///
/// # Invariants
/// - Unknown tags round-trip verbatim through [`AuditEventType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuditEventType {
    /// Pipeline run started.
    PipelineRun,
    /// HITL confirmation.
    HitlConfirmed,
    /// HITL dismissal.
    HitlDismissed,
    /// HITL escalation.
    HitlEscalated,
    /// SQL query executed.
    SqlExecution,
    /// SQL query blocked by the guard.
    SqlBlocked,
    /// Explanation generation run.
    ExplanationRun,
    /// Policy rules updated.
    PolicyUpdate,
    /// Live watchdog detection.
    LiveDetection,
    /// Tag outside the fixed catalogue.
    Other(String),
}

impl AuditEventType {
    /// Known event types in display order.
    pub const KNOWN: [Self; 9] = [
        Self::PipelineRun,
        Self::HitlConfirmed,
        Self::HitlDismissed,
        Self::HitlEscalated,
        Self::SqlExecution,
        Self::SqlBlocked,
        Self::ExplanationRun,
        Self::PolicyUpdate,
        Self::LiveDetection,
    ];

    /// Returns the wire tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::PipelineRun => "PIPELINE_RUN",
            Self::HitlConfirmed => "HITL_CONFIRMED",
            Self::HitlDismissed => "HITL_DISMISSED",
            Self::HitlEscalated => "HITL_ESCALATED",
            Self::SqlExecution => "SQL_EXECUTION",
            Self::SqlBlocked => "SQL_BLOCKED",
            Self::ExplanationRun => "EXPLANATION_RUN",
            Self::PolicyUpdate => "POLICY_UPDATE",
            Self::LiveDetection => "LIVE_DETECTION",
            Self::Other(tag) => tag,
        }
    }

    /// Returns the short display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::PipelineRun => "Pipeline",
            Self::HitlConfirmed => "Confirmed",
            Self::HitlDismissed => "Dismissed",
            Self::HitlEscalated => "Escalated",
            Self::SqlExecution => "SQL Query",
            Self::SqlBlocked => "Blocked",
            Self::ExplanationRun => "AI Explain",
            Self::PolicyUpdate => "Policy Update",
            Self::LiveDetection => "Live Scan",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for AuditEventType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PIPELINE_RUN" => Self::PipelineRun,
            "HITL_CONFIRMED" => Self::HitlConfirmed,
            "HITL_DISMISSED" => Self::HitlDismissed,
            "HITL_ESCALATED" => Self::HitlEscalated,
            "SQL_EXECUTION" => Self::SqlExecution,
            "SQL_BLOCKED" => Self::SqlBlocked,
            "EXPLANATION_RUN" => Self::ExplanationRun,
            "POLICY_UPDATE" => Self::PolicyUpdate,
            "LIVE_DETECTION" => Self::LiveDetection,
            _ => Self::Other(value),
        }
    }
}

impl From<AuditEventType> for String {
    fn from(value: AuditEventType) -> Self {
        match value {
            AuditEventType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Entry identifier.
    #[serde(default)]
    pub id: Option<u64>,
    /// Event type tag.
    pub event_type: AuditEventType,
    /// Event timestamp (ISO-8601).
    #[serde(default)]
    pub ts: Option<String>,
    /// Optional rule reference.
    #[serde(default)]
    pub rule_id: Option<String>,
    /// Optional pipeline phase.
    #[serde(default)]
    pub phase: Option<String>,
    /// Free-form details object.
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: Map<String, Value>,
}

/// Summary statistics attached to an audit log response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStats {
    /// Total events recorded by the backend.
    #[serde(default)]
    pub total_events: Option<u64>,
    /// Number of HITL decisions.
    #[serde(default)]
    pub hitl_decisions: Option<u64>,
    /// Number of pipeline runs.
    #[serde(default)]
    pub pipeline_runs: Option<u64>,
}

/// Response body of `GET /api/audit-log`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditLogPage {
    /// Audit entries, newest first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<AuditEvent>,
    /// Summary statistics.
    #[serde(default, deserialize_with = "null_as_default")]
    pub stats: AuditStats,
}

// ============================================================================
// SECTION: Versions
// ============================================================================

/// Archived version index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Version number.
    pub version: u64,
    /// Archive timestamp.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Source PDF name.
    #[serde(default)]
    pub pdf_source: Option<String>,
    /// Number of rules in the archived set.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rule_count: u64,
}

impl VersionEntry {
    /// Returns the source PDF name when it is known.
    #[must_use]
    pub fn known_source(&self) -> Option<&str> {
        self.pdf_source.as_deref().filter(|source| !source.is_empty() && *source != "unknown")
    }
}

/// Response body of `GET /api/versions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionIndex {
    /// Archived versions, newest first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub versions: Vec<VersionEntry>,
}

impl VersionIndex {
    /// Returns the newest archived version.
    #[must_use]
    pub fn latest(&self) -> Option<&VersionEntry> {
        self.versions.first()
    }
}

/// Response body of `GET /api/versions/{n}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionRules {
    /// Version number.
    #[serde(default)]
    pub version: Option<u64>,
    /// Archive timestamp.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Source PDF name.
    #[serde(default)]
    pub pdf_source: Option<String>,
    /// Reported rule count.
    #[serde(default)]
    pub rule_count: Option<u64>,
    /// Archived rule set.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Vec<Rule>,
}

/// Which rule set a snapshot was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "version")]
pub enum SnapshotLabel {
    /// The live, non-archived rule set.
    Current,
    /// An archived version.
    Archived(u64),
}

impl fmt::Display for SnapshotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => f.write_str("Current"),
            Self::Archived(version) => write!(f, "v{version}"),
        }
    }
}

/// An immutable rule set as of a given point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionSnapshot {
    /// Snapshot origin.
    pub label: SnapshotLabel,
    /// Archive timestamp (absent for the current set).
    pub timestamp: Option<String>,
    /// Source PDF name.
    pub pdf_source: Option<String>,
    /// Rule set.
    pub rules: Vec<Rule>,
}

impl VersionSnapshot {
    /// Builds the live snapshot from the current rule set.
    #[must_use]
    pub fn current(page: RulesPage) -> Self {
        Self {
            label: SnapshotLabel::Current,
            timestamp: None,
            pdf_source: None,
            rules: page.rules,
        }
    }

    /// Builds an archived snapshot from a version response.
    #[must_use]
    pub fn archived(version: u64, payload: VersionRules) -> Self {
        Self {
            label: SnapshotLabel::Archived(payload.version.unwrap_or(version)),
            timestamp: payload.timestamp,
            pdf_source: payload.pdf_source,
            rules: payload.rules,
        }
    }

    /// Returns the number of rules in the snapshot.
    #[must_use]
    pub const fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

// ============================================================================
// SECTION: Live Monitoring
// ============================================================================

/// Live ingestion configuration reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveConfig {
    /// Ingester batch size in rows.
    #[serde(default)]
    pub batch_size: Option<u64>,
    /// Ingester interval in seconds.
    #[serde(default)]
    pub ingester_interval: Option<f64>,
    /// Watchdog interval in seconds.
    #[serde(default)]
    pub watchdog_interval: Option<f64>,
}

/// A rule's result from the latest watchdog scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveViolation {
    /// Rule reference.
    #[serde(default)]
    pub rule_id: Option<String>,
    /// Violation count in the live data.
    #[serde(default, deserialize_with = "null_as_default")]
    pub violation_count: u64,
    /// Severity label reported by the watchdog.
    #[serde(default)]
    pub severity: Option<String>,
    /// Query status (`SUCCESS`, `BLOCKED`, ...).
    #[serde(default)]
    pub status: Option<String>,
}

impl LiveViolation {
    /// Returns the severity classified from the violation count.
    #[must_use]
    pub const fn severity_level(&self) -> SeverityLevel {
        classify(self.violation_count)
    }
}

/// Response body of `GET /api/live-status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveStatus {
    /// Whether the ingester process is running.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingester_running: bool,
    /// Whether the watchdog process is running.
    #[serde(default, deserialize_with = "null_as_default")]
    pub watchdog_running: bool,
    /// Rows ingested into the live table.
    #[serde(default)]
    pub live_transaction_count: Option<u64>,
    /// Latest watchdog results.
    #[serde(default, deserialize_with = "null_as_default")]
    pub live_violations: Vec<LiveViolation>,
    /// Ingestion configuration.
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: LiveConfig,
    /// Timestamp of the last watchdog scan.
    #[serde(default)]
    pub last_update: Option<String>,
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Response body of `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Filename assigned by the backend.
    pub filename: String,
}

/// Request body of `POST /api/run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Phase code.
    pub phase: String,
    /// Uploaded document name, when the phase needs one.
    pub pdf: Option<String>,
}

/// Response body of `POST /api/run`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAck {
    /// Backend status label.
    #[serde(default)]
    pub status: Option<String>,
    /// Backend message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Response body of `GET /api/pipeline-status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStatus {
    /// Whether the backend process is still running.
    #[serde(default, deserialize_with = "null_as_default")]
    pub running: bool,
    /// Process return code once finished.
    #[serde(default)]
    pub returncode: Option<i64>,
    /// Log lines after the requested offset.
    #[serde(default, deserialize_with = "null_as_default")]
    pub log_lines: Vec<String>,
}

impl PipelineStatus {
    /// Returns true when the process finished with return code zero.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        !self.running && self.returncode == Some(0)
    }
}
