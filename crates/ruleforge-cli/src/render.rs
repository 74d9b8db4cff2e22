// crates/ruleforge-cli/src/render.rs
// ============================================================================
// Module: Text Rendering
// Description: Plain-text rendering of console page state.
// Purpose: Turn derived view state into stdout lines for the text format.
// Dependencies: ruleforge-core
// ============================================================================

//! ## Overview
//! Each page of the console renders to a list of lines. Functions here take
//! already-filtered view state and never touch the network, so the binary
//! decides what to fetch and this module decides how it reads.
//!
//! ## Invariants
//! - Labels come from the message catalog; only column layout is formatted
//!   inline.
//! - Optional backend fields render as `-` when absent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ruleforge_core::AuditEvent;
use ruleforge_core::GateStatus;
use ruleforge_core::LiveStatus;
use ruleforge_core::Route;
use ruleforge_core::RouteView;
use ruleforge_core::Rule;
use ruleforge_core::RuleDiff;
use ruleforge_core::VersionIndex;
use ruleforge_core::VersionSnapshot;
use ruleforge_core::Violation;
use ruleforge_core::routes::resolve;
use ruleforge_core::views::audit::AuditSummary;
use ruleforge_core::views::audit::RecentRun;
use ruleforge_core::views::audit::display_timestamp;
use ruleforge_core::views::dashboard::DashboardKpis;
use ruleforge_core::views::dashboard::PieSegment;
use ruleforge_core::views::dashboard::SeverityBreakdown;
use ruleforge_core::views::live::LiveMetrics;
use ruleforge_core::views::live::inactive_services;
use ruleforge_core::views::live::live_rows;
use ruleforge_core::views::pagination::PageSlice;
use ruleforge_core::views::vault::VaultSummary;
use ruleforge_core::views::violations::ViolationSummary;

use crate::t;

/// Placeholder for absent values.
const ABSENT: &str = "-";

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn or_absent(value: Option<&str>) -> &str {
    value.unwrap_or(ABSENT)
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| ABSENT.to_string(), |value| value.to_string())
}

/// Describes how a route resolves against the gate.
#[must_use]
pub fn route_view_label(view: RouteView) -> String {
    match view {
        RouteView::Page {
            ..
        } => t!("gate.view.open"),
        RouteView::Redirect {
            to,
        } => t!("gate.view.redirect", path = to.path()),
        RouteView::Loading => t!("gate.view.loading"),
        RouteView::Locked {
            scan,
        } => t!("gate.view.locked", path = scan.path()),
    }
}

/// Returns the catalog label of a gate status.
#[must_use]
pub fn gate_status_label(status: GateStatus) -> String {
    match status {
        GateStatus::Loading => t!("gate.status.loading"),
        GateStatus::Locked => t!("gate.status.locked"),
        GateStatus::Unlocked => t!("gate.status.unlocked"),
    }
}

// ============================================================================
// SECTION: Scan
// ============================================================================

/// Renders the gate status and the route table.
#[must_use]
pub fn gate_lines(status: GateStatus) -> Vec<String> {
    let mut lines = vec![t!("gate.header", status = gate_status_label(status))];
    for route in Route::ALL {
        let view = route_view_label(resolve(route, status));
        lines.push(format!("  {:<18} {view}", route.path()));
    }
    lines
}

/// Renders the recent pipeline runs.
#[must_use]
pub fn recent_run_lines(runs: &[RecentRun]) -> Vec<String> {
    if runs.is_empty() {
        return vec![t!("runs.empty")];
    }
    let mut lines = vec![t!("runs.header", count = runs.len())];
    for run in runs {
        let timestamp = run.timestamp.as_deref().map(display_timestamp);
        let mut line = format!(
            "  #{:<5} {:<19}  {}",
            optional(run.id),
            or_absent(timestamp.as_deref()),
            t!("runs.phase", phase = or_absent(run.phase.as_deref()))
        );
        if let Some(rules) = run.rules_processed {
            line.push_str(&format!("  {}", t!("runs.rules", count = rules)));
        }
        if let Some(violations) = run.violations_count {
            line.push_str(&format!("  {}", t!("runs.violations", count = violations)));
        }
        if let Some(duration) = run.duration_s {
            line.push_str(&format!("  {}", t!("runs.duration", seconds = format!("{duration:.1}"))));
        }
        lines.push(line);
    }
    lines
}

// ============================================================================
// SECTION: Dashboard
// ============================================================================

/// Renders the dashboard page.
#[must_use]
pub fn dashboard_lines(
    kpis: &DashboardKpis,
    breakdown: &SeverityBreakdown,
    segments: &[PieSegment],
    page: &PageSlice<'_, &Violation>,
) -> Vec<String> {
    let mut lines = vec![
        t!("dashboard.header"),
        t!("dashboard.kpi.rules", total = kpis.total_rules, triggered = kpis.rules_triggered),
        t!("dashboard.kpi.violations", total = kpis.total_violations),
        t!("dashboard.kpi.last_run", when = or_absent(kpis.last_run.as_deref())),
        t!(
            "dashboard.breakdown",
            high = breakdown.high,
            high_pct = format!("{:.1}", breakdown.high_percent),
            medium = breakdown.medium,
            medium_pct = format!("{:.1}", breakdown.medium_percent),
            low = breakdown.low,
            low_pct = format!("{:.1}", breakdown.low_percent)
        ),
    ];
    if !segments.is_empty() {
        lines.push(t!("dashboard.kinds"));
        for segment in segments {
            lines.push(format!(
                "  {:<14} {:>6}  {:>5.1}%",
                segment.kind, segment.count, segment.percent
            ));
        }
    }
    lines.push(t!(
        "dashboard.page",
        page = page.page,
        pages = page.total_pages,
        from = page.from,
        to = page.to,
        total = page.total
    ));
    for violation in page.items {
        lines.push(violation_row(violation));
    }
    lines
}

fn violation_row(violation: &Violation) -> String {
    format!(
        "  {:<12} {:<6} {:>8}  {:<9}  {}",
        violation.rule_id,
        violation.severity_level().as_str(),
        violation.violation_count,
        violation.hitl_action.as_str(),
        violation.description
    )
}

// ============================================================================
// SECTION: Policy Vault
// ============================================================================

/// Renders the policy vault page.
#[must_use]
pub fn vault_lines(summary: &VaultSummary, categories: &[String], rules: &[&Rule]) -> Vec<String> {
    let mut lines = vec![
        t!(
            "vault.summary",
            total = summary.total_rules,
            triggered = summary.triggered_rules,
            violations = summary.total_violations
        ),
        t!("vault.categories", categories = categories.join(", ")),
    ];
    if rules.is_empty() {
        lines.push(t!("vault.empty"));
        return lines;
    }
    for rule in rules {
        lines.push(format!(
            "  {:<12} {:<14} {:>8}  {}",
            rule.id,
            or_absent(rule.rule_type.as_deref()),
            rule.violations,
            rule.description
        ));
    }
    lines
}

// ============================================================================
// SECTION: Violations
// ============================================================================

/// Renders the violations page.
#[must_use]
pub fn violation_lines(summary: &ViolationSummary, violations: &[&Violation]) -> Vec<String> {
    let mut lines = vec![t!(
        "violations.summary",
        total = summary.total,
        pending = summary.pending,
        high = summary.high_severity,
        confirmed = summary.confirmed,
        escalated = summary.escalated
    )];
    if violations.is_empty() {
        lines.push(t!("violations.empty"));
        return lines;
    }
    lines.extend(violations.iter().copied().map(violation_row));
    lines
}

// ============================================================================
// SECTION: Audit Log
// ============================================================================

/// Renders the audit log page.
#[must_use]
pub fn audit_lines(summary: &AuditSummary, events: &[&AuditEvent]) -> Vec<String> {
    let mut lines = vec![t!(
        "audit.summary",
        total = summary.total_events,
        hitl = summary.hitl_decisions,
        runs = summary.pipeline_runs,
        blocked = summary.blocked_queries
    )];
    if events.is_empty() {
        lines.push(t!("audit.empty"));
        return lines;
    }
    for event in events {
        let timestamp = event.ts.as_deref().map(display_timestamp);
        lines.push(format!(
            "  {:<19}  {:<20} {}",
            or_absent(timestamp.as_deref()),
            event.event_type.label(),
            or_absent(event.rule_id.as_deref())
        ));
    }
    lines
}

// ============================================================================
// SECTION: Versions
// ============================================================================

/// Renders the version index, newest marked as latest.
#[must_use]
pub fn version_lines(index: &VersionIndex) -> Vec<String> {
    if index.versions.is_empty() {
        return vec![t!("versions.empty")];
    }
    let latest = index.latest().map(|entry| entry.version);
    index
        .versions
        .iter()
        .map(|entry| {
            let marker =
                if Some(entry.version) == latest { t!("versions.latest") } else { String::new() };
            format!(
                "  v{:<4} {:<19}  {:>5}  {} {marker}",
                entry.version,
                or_absent(entry.timestamp.as_deref().map(display_timestamp).as_deref()),
                entry.rule_count,
                or_absent(entry.known_source())
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

/// Renders a comparison of two snapshots.
#[must_use]
pub fn diff_lines(left: &VersionSnapshot, right: &VersionSnapshot, diff: &RuleDiff) -> Vec<String> {
    let mut lines = vec![
        t!(
            "versions.diff.header",
            left = left.label,
            left_count = left.rule_count(),
            right = right.label,
            right_count = right.rule_count()
        ),
        t!(
            "versions.diff.summary",
            added = diff.added.len(),
            removed = diff.removed.len(),
            unchanged = diff.unchanged.len()
        ),
    ];
    if diff.is_identical() {
        lines.push(t!("versions.diff.identical"));
    }
    for rule in &diff.added {
        lines.push(format!("  + {:<12} {}", rule.diff_key(), rule.description));
    }
    for rule in &diff.removed {
        lines.push(format!("  - {:<12} {}", rule.diff_key(), rule.description));
    }
    lines
}

// ============================================================================
// SECTION: Live Monitor
// ============================================================================

/// Renders the live monitor page.
#[must_use]
pub fn live_lines(status: &LiveStatus) -> Vec<String> {
    let metrics = LiveMetrics::from_status(status);
    let service = |running: bool| {
        if running { t!("live.service.running") } else { t!("live.service.stopped") }
    };
    let mut lines = vec![
        t!(
            "live.services",
            ingester = service(status.ingester_running),
            watchdog = service(status.watchdog_running)
        ),
        t!(
            "live.metrics",
            transactions = optional(metrics.transactions),
            triggered = metrics.rules_triggered,
            hits = metrics.total_hits,
            high = metrics.high_severity
        ),
        t!(
            "live.config",
            batch = optional(status.config.batch_size),
            ingester = optional(status.config.ingester_interval),
            watchdog = optional(status.config.watchdog_interval)
        ),
    ];
    let inactive = inactive_services(status);
    if !inactive.is_empty() {
        lines.push(t!("live.inactive", services = inactive.join(", ")));
    }
    for row in live_rows(status) {
        lines.push(format!(
            "  {:<12} {:<6} {:>8}  {}",
            or_absent(row.rule_id.as_deref()),
            row.severity.as_str(),
            row.violation_count,
            or_absent(row.status.as_deref())
        ));
    }
    lines
}
