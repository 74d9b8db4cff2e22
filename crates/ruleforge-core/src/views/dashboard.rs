// crates/ruleforge-core/src/views/dashboard.rs
// ============================================================================
// Module: Dashboard View
// Description: KPI tiles, severity breakdown, and violation-type pie chart.
// Purpose: Derive dashboard presentation data from stats and violations.
// Dependencies: regex, serde
// ============================================================================

//! ## Overview
//! The pie chart groups violations by a rule-type keyword found in the
//! violation description. Segments are ordered by count (descending, stable)
//! and carry SVG arc geometry for a 200x200 viewbox with radius 80.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::f64::consts::PI;
use std::fmt::Write as _;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::model::Stats;
use crate::model::Violation;
use crate::severity::SeverityLevel;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Segment colours, cycled by segment rank.
pub const PIE_PALETTE: [&str; 8] =
    ["#3b82f6", "#8b5cf6", "#ec4899", "#f59e0b", "#10b981", "#06b6d4", "#6366f1", "#ef4444"];
/// Kind assigned when no keyword matches.
pub const UNKNOWN_KIND: &str = "unknown";
/// Pie centre coordinate (both axes).
const PIE_CENTER: f64 = 100.0;
/// Pie radius.
const PIE_RADIUS: f64 = 80.0;

// ============================================================================
// SECTION: KPIs
// ============================================================================

/// KPI tiles shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardKpis {
    /// Extracted rules.
    pub total_rules: u64,
    /// Rules with violations.
    pub rules_triggered: u64,
    /// Total violation count.
    pub total_violations: u64,
    /// High-severity rules.
    pub high_severity: u64,
    /// Medium-severity rules.
    pub medium_severity: u64,
    /// Low-severity rules.
    pub low_severity: u64,
    /// Last pipeline run timestamp.
    pub last_run: Option<String>,
}

impl From<&Stats> for DashboardKpis {
    fn from(stats: &Stats) -> Self {
        Self {
            total_rules: stats.total_rules,
            rules_triggered: stats.rules_triggered,
            total_violations: stats.total_violations,
            high_severity: stats.high_severity,
            medium_severity: stats.medium_severity,
            low_severity: stats.low_severity,
            last_run: stats.last_run.clone(),
        }
    }
}

// ============================================================================
// SECTION: Severity Breakdown
// ============================================================================

/// Stacked severity bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityBreakdown {
    /// High-severity count.
    pub high: u64,
    /// Medium-severity count.
    pub medium: u64,
    /// Low-severity count.
    pub low: u64,
    /// High share in percent.
    pub high_percent: f64,
    /// Medium share in percent.
    pub medium_percent: f64,
    /// Low share in percent.
    pub low_percent: f64,
}

impl SeverityBreakdown {
    /// Computes percentages; all shares are zero when the total is zero.
    #[must_use]
    pub fn from_counts(high: u64, medium: u64, low: u64) -> Self {
        let total = high.saturating_add(medium).saturating_add(low);
        let share = |count: u64| {
            if total == 0 { 0.0 } else { ratio(count, total) * 100.0 }
        };
        Self {
            high,
            medium,
            low,
            high_percent: share(high),
            medium_percent: share(medium),
            low_percent: share(low),
        }
    }

    /// Builds the breakdown from backend stats.
    #[must_use]
    pub fn from_stats(stats: &Stats) -> Self {
        Self::from_counts(stats.high_severity, stats.medium_severity, stats.low_severity)
    }
}

/// Divides two counts as floating point.
#[allow(clippy::cast_precision_loss, reason = "Counts are far below 2^52.")]
fn ratio(part: u64, whole: u64) -> f64 {
    part as f64 / whole as f64
}

// ============================================================================
// SECTION: Violation Filters
// ============================================================================

/// Filters violations by classified severity; `None` keeps everything.
#[must_use]
pub fn filter_by_severity(
    violations: &[Violation],
    severity: Option<SeverityLevel>,
) -> Vec<&Violation> {
    violations
        .iter()
        .filter(|violation| severity.is_none_or(|level| violation.severity_level() == level))
        .collect()
}

// ============================================================================
// SECTION: Pie Chart
// ============================================================================

/// A pie chart segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSegment {
    /// Violation kind keyword.
    pub kind: String,
    /// Violations of this kind.
    pub count: u64,
    /// Share of all violations in percent.
    pub percent: f64,
    /// Cumulative percent where the segment starts.
    pub start_percent: f64,
    /// Fill colour.
    pub color: &'static str,
    /// SVG path data for the wedge.
    pub path: String,
}

/// Returns the rule-type keyword found in a violation description.
#[must_use]
pub fn violation_kind(description: &str) -> String {
    static KIND_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = KIND_PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)\b(threshold|pattern|frequency|jurisdiction|ratio|null_check|range|uniqueness)\b",
        )
        .ok()
    });
    pattern
        .as_ref()
        .and_then(|regex| regex.find(description))
        .map_or_else(|| UNKNOWN_KIND.to_string(), |found| found.as_str().to_lowercase())
}

/// Builds pie segments grouped by [`violation_kind`].
#[must_use]
pub fn pie_segments(violations: &[Violation]) -> Vec<PieSegment> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    for violation in violations {
        let kind = violation_kind(&violation.description);
        match counts.iter_mut().find(|(existing, _)| *existing == kind) {
            Some((_, count)) => *count += 1,
            None => counts.push((kind, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    let total: u64 = counts.iter().map(|(_, count)| count).sum();

    let mut cumulative = 0.0;
    counts
        .into_iter()
        .enumerate()
        .map(|(index, (kind, count))| {
            let percent = ratio(count, total) * 100.0;
            let start_percent = cumulative;
            cumulative += percent;
            PieSegment {
                kind,
                count,
                percent,
                start_percent,
                color: PIE_PALETTE[index % PIE_PALETTE.len()],
                path: wedge_path(start_percent, percent),
            }
        })
        .collect()
}

/// Returns SVG path data for a wedge starting at twelve o'clock.
fn wedge_path(start_percent: f64, percent: f64) -> String {
    let start_angle = (start_percent / 100.0).mul_add(360.0, -90.0);
    let end_angle = ((start_percent + percent) / 100.0).mul_add(360.0, -90.0);
    let large_arc = u8::from(percent > 50.0);
    let point = |angle: f64| {
        let radians = angle * PI / 180.0;
        (PIE_RADIUS.mul_add(radians.cos(), PIE_CENTER), PIE_RADIUS.mul_add(radians.sin(), PIE_CENTER))
    };
    let (x1, y1) = point(start_angle);
    let (x2, y2) = point(end_angle);
    let mut path = String::new();
    let _ = write!(
        path,
        "M {PIE_CENTER} {PIE_CENTER} L {x1:.3} {y1:.3} A {PIE_RADIUS} {PIE_RADIUS} 0 {large_arc} 1 \
         {x2:.3} {y2:.3} Z"
    );
    path
}
