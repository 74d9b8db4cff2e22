// crates/ruleforge-core/src/views/live.rs
// ============================================================================
// Module: Live Monitor View
// Description: Live KPIs and the sorted live violation table.
// Purpose: Project watchdog results using the shared severity classifier.
// Dependencies: serde
// ============================================================================

use serde::Serialize;

use crate::model::LiveStatus;
use crate::severity::SeverityLevel;

/// Live KPI tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LiveMetrics {
    /// Rows ingested into the live table.
    pub transactions: Option<u64>,
    /// Rules with at least one live violation.
    pub rules_triggered: usize,
    /// Sum of live violation counts.
    pub total_hits: u64,
    /// Rules classified high severity.
    pub high_severity: usize,
}

impl LiveMetrics {
    /// Computes metrics from a live status snapshot.
    #[must_use]
    pub fn from_status(status: &LiveStatus) -> Self {
        let rows = &status.live_violations;
        Self {
            transactions: status.live_transaction_count,
            rules_triggered: rows.iter().filter(|row| row.violation_count > 0).count(),
            total_hits: rows.iter().map(|row| row.violation_count).sum(),
            high_severity: rows
                .iter()
                .filter(|row| row.severity_level() == SeverityLevel::High)
                .count(),
        }
    }
}

/// A row of the live violation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveRow {
    /// Rule reference.
    pub rule_id: Option<String>,
    /// Classified severity.
    pub severity: SeverityLevel,
    /// Live violation count.
    pub violation_count: u64,
    /// Query status.
    pub status: Option<String>,
}

/// Returns live violations sorted by count, highest first (stable).
#[must_use]
pub fn live_rows(status: &LiveStatus) -> Vec<LiveRow> {
    let mut rows: Vec<LiveRow> = status
        .live_violations
        .iter()
        .map(|row| LiveRow {
            rule_id: row.rule_id.clone(),
            severity: row.severity_level(),
            violation_count: row.violation_count,
            status: row.status.clone(),
        })
        .collect();
    rows.sort_by(|a, b| b.violation_count.cmp(&a.violation_count));
    rows
}

/// Names of live services that are not running.
#[must_use]
pub fn inactive_services(status: &LiveStatus) -> Vec<&'static str> {
    let mut inactive = Vec::new();
    if !status.ingester_running {
        inactive.push("ingester");
    }
    if !status.watchdog_running {
        inactive.push("watchdog");
    }
    inactive
}
