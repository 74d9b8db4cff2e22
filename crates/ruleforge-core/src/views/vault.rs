// crates/ruleforge-core/src/views/vault.rs
// ============================================================================
// Module: Policy Vault View
// Description: Rule search, category and status filters, vault summary.
// Purpose: Project the current rule set for the rule browser.
// Dependencies: serde
// ============================================================================

use serde::Serialize;

use crate::model::Rule;
use crate::model::RulesPage;
use crate::views::contains_ci;

/// Category label meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Rule status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatusFilter {
    /// Every rule.
    #[default]
    All,
    /// Rules with at least one violation.
    Triggered,
    /// Rules with zero violations.
    Clear,
}

impl RuleStatusFilter {
    /// Parses a filter label (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "triggered" => Some(Self::Triggered),
            "clear" => Some(Self::Clear),
            _ => None,
        }
    }

    /// Returns true when `rule` passes the filter.
    #[must_use]
    pub const fn matches(self, rule: &Rule) -> bool {
        match self {
            Self::All => true,
            Self::Triggered => rule.violations > 0,
            Self::Clear => rule.violations == 0,
        }
    }
}

/// Policy vault selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFilter {
    /// Search text over id, description, and condition field.
    pub search: String,
    /// Rule type to keep; `None` keeps every category.
    pub category: Option<String>,
    /// Status filter.
    pub status: RuleStatusFilter,
}

impl RuleFilter {
    /// Sets the category, treating [`ALL_CATEGORIES`] as no filter.
    #[must_use]
    pub fn with_category(mut self, category: Option<&str>) -> Self {
        self.category = category.filter(|value| *value != ALL_CATEGORIES).map(str::to_string);
        self
    }

    /// Returns true when `rule` passes every selection.
    #[must_use]
    pub fn matches(&self, rule: &Rule) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = contains_ci(&rule.id, &needle)
            || contains_ci(&rule.description, &needle)
            || contains_ci(rule.condition_field.as_deref().unwrap_or_default(), &needle);
        let matches_category = self
            .category
            .as_deref()
            .is_none_or(|category| rule.rule_type.as_deref() == Some(category));
        matches_search && matches_category && self.status.matches(rule)
    }

    /// Applies the filter, preserving order.
    #[must_use]
    pub fn apply<'a>(&self, rules: &'a [Rule]) -> Vec<&'a Rule> {
        rules.iter().filter(|rule| self.matches(rule)).collect()
    }
}

/// Vault header counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VaultSummary {
    /// Rule count.
    pub total_rules: usize,
    /// Rules with violations.
    pub triggered_rules: usize,
    /// Sum of rule violation counts.
    pub total_violations: u64,
}

impl VaultSummary {
    /// Summarises an unfiltered rule set.
    #[must_use]
    pub fn from_rules(rules: &[Rule]) -> Self {
        Self {
            total_rules: rules.len(),
            triggered_rules: rules.iter().filter(|rule| rule.is_triggered()).count(),
            total_violations: rules.iter().map(|rule| rule.violations).sum(),
        }
    }
}

/// Returns the category tabs: [`ALL_CATEGORIES`] followed by backend types.
#[must_use]
pub fn categories(page: &RulesPage) -> Vec<String> {
    std::iter::once(ALL_CATEGORIES.to_string()).chain(page.types.iter().cloned()).collect()
}
