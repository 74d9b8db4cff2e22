// crates/ruleforge-core/src/views/violations.rs
// ============================================================================
// Module: Violations View
// Description: Violation search, severity and HITL filters, review counters.
// Purpose: Project the violation list for analyst review.
// Dependencies: serde
// ============================================================================

use serde::Serialize;

use crate::model::HitlStatus;
use crate::model::Violation;
use crate::severity::SeverityLevel;
use crate::views::contains_ci;

/// Violation list selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationFilter {
    /// Search text over rule id and description.
    pub search: String,
    /// Classified severity to keep.
    pub severity: Option<SeverityLevel>,
    /// HITL status to keep.
    pub status: Option<HitlStatus>,
}

impl ViolationFilter {
    /// Returns true when `violation` passes every selection.
    #[must_use]
    pub fn matches(&self, violation: &Violation) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search =
            contains_ci(&violation.rule_id, &needle) || contains_ci(&violation.description, &needle);
        let matches_severity =
            self.severity.is_none_or(|level| violation.severity_level() == level);
        let matches_status = self.status.is_none_or(|status| violation.hitl_action == status);
        matches_search && matches_severity && matches_status
    }

    /// Applies the filter, preserving order.
    #[must_use]
    pub fn apply<'a>(&self, violations: &'a [Violation]) -> Vec<&'a Violation> {
        violations.iter().filter(|violation| self.matches(violation)).collect()
    }
}

/// Review counters over the unfiltered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViolationSummary {
    /// Violations listed.
    pub total: usize,
    /// Awaiting review.
    pub pending: usize,
    /// Classified high severity.
    pub high_severity: usize,
    /// Confirmed by an analyst.
    pub confirmed: usize,
    /// Escalated by an analyst.
    pub escalated: usize,
}

impl ViolationSummary {
    /// Counts review states.
    #[must_use]
    pub fn from_violations(violations: &[Violation]) -> Self {
        let with_status =
            |status: HitlStatus| violations.iter().filter(|v| v.hitl_action == status).count();
        Self {
            total: violations.len(),
            pending: with_status(HitlStatus::Pending),
            high_severity: violations
                .iter()
                .filter(|v| v.severity_level() == SeverityLevel::High)
                .count(),
            confirmed: with_status(HitlStatus::Confirmed),
            escalated: with_status(HitlStatus::Escalated),
        }
    }
}
