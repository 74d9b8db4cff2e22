// crates/ruleforge-core/src/views/audit.rs
// ============================================================================
// Module: Audit Log View
// Description: Audit search, event filter, summary counters, recent runs.
// Purpose: Project audit entries for the audit page and the scan page.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The scan page lists recent pipeline runs by filtering the audit log to
//! [`AuditEventType::PipelineRun`] entries; [`recent_runs`] performs that
//! projection together with the run detail fields the backend records.

use serde::Serialize;

use crate::model::AuditEvent;
use crate::model::AuditEventType;
use crate::model::AuditLogPage;
use crate::views::contains_ci;

/// Length of the `YYYY-MM-DDTHH:MM:SS` prefix kept for display.
const TIMESTAMP_DISPLAY_CHARS: usize = 19;

/// Audit log selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    /// Search text over event type, rule id, and serialized details.
    pub search: String,
    /// Event type to keep.
    pub event: Option<AuditEventType>,
}

impl AuditFilter {
    /// Returns true when `event` passes every selection.
    #[must_use]
    pub fn matches(&self, event: &AuditEvent) -> bool {
        let needle = self.search.to_lowercase();
        let details = serde_json::to_string(&event.details).unwrap_or_default();
        let matches_search = contains_ci(event.event_type.as_str(), &needle)
            || contains_ci(event.rule_id.as_deref().unwrap_or_default(), &needle)
            || contains_ci(&details, &needle);
        let matches_event = self.event.as_ref().is_none_or(|wanted| event.event_type == *wanted);
        matches_search && matches_event
    }

    /// Applies the filter, preserving order.
    #[must_use]
    pub fn apply<'a>(&self, events: &'a [AuditEvent]) -> Vec<&'a AuditEvent> {
        events.iter().filter(|event| self.matches(event)).collect()
    }
}

/// Audit header counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    /// Total events (backend figure, else the number of listed entries).
    pub total_events: u64,
    /// HITL decisions.
    pub hitl_decisions: u64,
    /// Pipeline runs.
    pub pipeline_runs: u64,
    /// Blocked SQL queries among the listed entries.
    pub blocked_queries: usize,
}

impl AuditSummary {
    /// Summarises an audit log response.
    #[must_use]
    pub fn from_page(page: &AuditLogPage) -> Self {
        let listed = u64::try_from(page.logs.len()).unwrap_or(u64::MAX);
        Self {
            total_events: page.stats.total_events.unwrap_or(listed),
            hitl_decisions: page.stats.hitl_decisions.unwrap_or(0),
            pipeline_runs: page.stats.pipeline_runs.unwrap_or(0),
            blocked_queries: page
                .logs
                .iter()
                .filter(|event| event.event_type == AuditEventType::SqlBlocked)
                .count(),
        }
    }
}

/// A pipeline run as listed on the scan page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentRun {
    /// Audit entry identifier.
    pub id: Option<u64>,
    /// Display timestamp.
    pub timestamp: Option<String>,
    /// Phase the run was started with.
    pub phase: Option<String>,
    /// Rules processed by the run.
    pub rules_processed: Option<u64>,
    /// Violations found by the run.
    pub violations_count: Option<u64>,
    /// Run duration in seconds.
    pub duration_s: Option<f64>,
}

/// Returns pipeline-run entries in log order.
#[must_use]
pub fn recent_runs(events: &[AuditEvent]) -> Vec<RecentRun> {
    events
        .iter()
        .filter(|event| event.event_type == AuditEventType::PipelineRun)
        .map(|event| RecentRun {
            id: event.id,
            timestamp: event.ts.as_deref().map(display_timestamp),
            phase: event.phase.clone(),
            rules_processed: event.details.get("rules_processed").and_then(serde_json::Value::as_u64),
            violations_count: event
                .details
                .get("violations_count")
                .and_then(serde_json::Value::as_u64),
            duration_s: event.details.get("duration_s").and_then(serde_json::Value::as_f64),
        })
        .collect()
}

/// Shortens an ISO-8601 timestamp to `YYYY-MM-DD HH:MM:SS`.
#[must_use]
pub fn display_timestamp(ts: &str) -> String {
    ts.chars()
        .take(TIMESTAMP_DISPLAY_CHARS)
        .map(|ch| if ch == 'T' { ' ' } else { ch })
        .collect()
}
