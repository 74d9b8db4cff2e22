// crates/ruleforge-cli/src/tests/render.rs
// ============================================================================
// Module: Text Rendering Tests
// Description: Unit tests for page rendering.
// Purpose: Pin down the text layout of gated pages and empty states.
// Dependencies: ruleforge-cli render module, serde_json
// ============================================================================

use ruleforge_core::GateStatus;
use ruleforge_core::LiveStatus;
use ruleforge_core::Rule;
use ruleforge_core::VersionIndex;
use ruleforge_core::VersionRules;
use ruleforge_core::VersionSnapshot;
use ruleforge_core::Violation;
use ruleforge_core::diff_snapshots;
use ruleforge_core::views::audit::RecentRun;
use ruleforge_core::views::violations::ViolationSummary;
use serde_json::json;

use crate::render::diff_lines;
use crate::render::gate_lines;
use crate::render::live_lines;
use crate::render::recent_run_lines;
use crate::render::version_lines;
use crate::render::violation_lines;

fn rule(id: &str, fingerprint: &str) -> Rule {
    serde_json::from_value(json!({
        "id": id,
        "description": format!("rule {id}"),
        "_fingerprint": fingerprint,
    }))
    .unwrap()
}

fn snapshot(version: u64, rules: Vec<Rule>) -> VersionSnapshot {
    VersionSnapshot::archived(
        version,
        VersionRules {
            version: Some(version),
            rules,
            ..VersionRules::default()
        },
    )
}

#[test]
fn locked_gate_points_gated_routes_at_scan() {
    let lines = gate_lines(GateStatus::Locked);
    assert_eq!(lines[0], "Gate: locked");
    let dashboard = lines.iter().find(|line| line.contains("/dashboard")).unwrap();
    assert!(dashboard.ends_with("locked (run a scan at /scan-now)"), "{dashboard}");
    let scan = lines.iter().find(|line| line.trim_start().starts_with("/scan-now")).unwrap();
    assert!(scan.ends_with("open"), "{scan}");
    let root = lines.iter().find(|line| line.trim_start().starts_with("/ ")).unwrap();
    assert!(root.ends_with("redirects to /scan-now"), "{root}");
}

#[test]
fn unlocked_gate_opens_every_page() {
    let lines = gate_lines(GateStatus::Unlocked);
    assert_eq!(lines[0], "Gate: unlocked");
    let pages = lines.iter().skip(1).filter(|line| !line.contains("redirects"));
    assert!(pages.clone().all(|line| line.ends_with("open")));
    assert_eq!(pages.count(), 8);
}

#[test]
fn recent_runs_render_optional_details() {
    assert_eq!(recent_run_lines(&[]), vec!["No pipeline runs recorded.".to_string()]);
    let runs = vec![
        RecentRun {
            id: Some(7),
            timestamp: Some("2025-03-01T10:20:30.123456".to_string()),
            phase: Some("123".to_string()),
            rules_processed: Some(14),
            violations_count: None,
            duration_s: Some(2.25),
        },
        RecentRun {
            id: None,
            timestamp: None,
            phase: None,
            rules_processed: None,
            violations_count: None,
            duration_s: None,
        },
    ];
    let lines = recent_run_lines(&runs);
    assert_eq!(lines[0], "Recent runs (2):");
    assert!(lines[1].contains("2025-03-01 10:20:30"), "{}", lines[1]);
    assert!(lines[1].contains("phase 123"));
    assert!(lines[1].contains("14 rules"));
    assert!(!lines[1].contains("violations"));
    assert!(lines[1].ends_with("2.2s") || lines[1].ends_with("2.3s"), "{}", lines[1]);
    assert!(lines[2].contains("phase -"));
}

#[test]
fn empty_violation_list_keeps_the_summary() {
    let summary = ViolationSummary::from_violations(&[]);
    let lines = violation_lines(&summary, &[]);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Violations: 0 total"));
    assert_eq!(lines[1], "No violations match the current filters.");
}

#[test]
fn violation_rows_use_the_classified_severity() {
    let violation: Violation = serde_json::from_value(json!({
        "rule_id": "R-9",
        "description": "large transfers",
        "violation_count": 600,
        "severity": "LOW",
        "hitl_action": "ESCALATED",
    }))
    .unwrap();
    let summary = ViolationSummary::from_violations(std::slice::from_ref(&violation));
    let lines = violation_lines(&summary, &[&violation]);
    assert!(lines[1].contains("high"), "{}", lines[1]);
    assert!(lines[1].contains("ESCALATED"));
    assert!(lines[1].ends_with("large transfers"));
}

#[test]
fn version_list_marks_only_the_newest() {
    let index: VersionIndex = serde_json::from_value(json!({
        "versions": [
            { "version": 3, "timestamp": "2025-02-01T00:00:00", "pdf_source": "aml.pdf", "rule_count": 12 },
            { "version": 2, "pdf_source": "unknown", "rule_count": 10 },
        ]
    }))
    .unwrap();
    let lines = version_lines(&index);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("aml.pdf (latest)"), "{}", lines[0]);
    assert!(!lines[1].contains("(latest)"));
    assert!(lines[1].ends_with('-'), "{}", lines[1]);
    assert_eq!(version_lines(&VersionIndex::default()), vec!["No archived versions.".to_string()]);
}

#[test]
fn diff_lists_added_then_removed() {
    let left = snapshot(1, vec![rule("A", "fa"), rule("B", "fb")]);
    let right = snapshot(2, vec![rule("B2", "fb"), rule("C", "fc")]);
    let diff = diff_snapshots(&left, &right);
    let lines = diff_lines(&left, &right, &diff);
    assert_eq!(lines[0], "Comparing v1 (2 rules) with v2 (2 rules)");
    assert_eq!(lines[1], "1 added, 1 removed, 1 unchanged");
    assert!(lines[2].starts_with("  + fc"), "{}", lines[2]);
    assert!(lines[3].starts_with("  - fa"), "{}", lines[3]);
    assert_eq!(lines.len(), 4);
}

#[test]
fn identical_snapshots_say_so() {
    let left = snapshot(1, vec![rule("A", "fa")]);
    let right = snapshot(2, vec![rule("A", "fa")]);
    let diff = diff_snapshots(&left, &right);
    let lines = diff_lines(&left, &right, &diff);
    assert!(lines.contains(&"Rule sets are identical.".to_string()));
}

#[test]
fn live_page_flags_stopped_services_and_sorts_rows() {
    let status: LiveStatus = serde_json::from_value(json!({
        "ingester_running": true,
        "watchdog_running": false,
        "live_transaction_count": 1200,
        "live_violations": [
            { "rule_id": "R-1", "violation_count": 3, "status": "SUCCESS" },
            { "rule_id": "R-2", "violation_count": 70, "status": "SUCCESS" },
        ],
        "config": { "batch_size": 50 },
    }))
    .unwrap();
    let lines = live_lines(&status);
    assert_eq!(lines[0], "Ingester: running, watchdog: stopped");
    assert_eq!(lines[1], "Transactions: 1200, rules triggered: 2, hits: 73, high severity: 0");
    assert_eq!(lines[2], "Batch size: 50, ingester every -s, watchdog every -s");
    assert_eq!(lines[3], "Inactive services: watchdog");
    assert!(lines[4].contains("R-2") && lines[4].contains("medium"), "{}", lines[4]);
    assert!(lines[5].contains("R-1") && lines[5].contains("low"), "{}", lines[5]);
}
