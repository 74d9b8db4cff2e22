// crates/ruleforge-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Message catalog and placeholder substitution for CLI output.
// Purpose: Keep every user-facing string of the console in one place.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! The RuleForge CLI routes user-facing strings through a static catalog so
//! wording stays consistent across pages and error paths. Runtime output is
//! formatted with the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is built once and read-only thereafter.
//! - Missing keys render as the key itself.
//! - Placeholders are substituted in argument order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Catalog entries.
const CATALOG: &[(&str, &str)] = &[
    ("main.version", "ruleforge {version}"),
    ("args.severity_invalid", "invalid severity '{value}' (expected high, medium, low, or clear)"),
    (
        "args.status_invalid",
        "invalid status '{value}' (expected pending, confirmed, dismissed, or escalated)",
    ),
    ("args.rule_status_invalid", "invalid rule status '{value}' (expected all, triggered, or clear)"),
    ("args.version_invalid", "invalid version '{value}' (expected 'current' or a number)"),
    ("api.request_failed", "Backend request failed: {error}"),
    ("config.load_failed", "Failed to load configuration: {error}"),
    ("config.render_failed", "Failed to render configuration: {error}"),
    ("config.validate.ok", "Config valid: {path}"),
    ("config.validate.defaults", "Config valid: no file found, using defaults"),
    ("gate.header", "Gate: {status}"),
    ("gate.status.loading", "loading"),
    ("gate.status.locked", "locked"),
    ("gate.status.unlocked", "unlocked"),
    ("gate.view.open", "open"),
    ("gate.view.redirect", "redirects to {path}"),
    ("gate.view.loading", "loading"),
    ("gate.view.locked", "locked (run a scan at {path})"),
    (
        "gate.locked",
        "{page} is locked until a scan produces rules. Run `ruleforge scan` ({scan}) first.",
    ),
    ("scan.succeeded", "Scan completed successfully."),
    ("scan.failed", "Scan failed."),
    ("scan.interrupted", "Scan interrupted; the backend run was not aborted."),
    ("runs.empty", "No pipeline runs recorded."),
    ("runs.header", "Recent runs ({count}):"),
    ("runs.phase", "phase {phase}"),
    ("runs.rules", "{count} rules"),
    ("runs.violations", "{count} violations"),
    ("runs.duration", "{seconds}s"),
    ("dashboard.header", "Compliance dashboard"),
    ("dashboard.kpi.rules", "Rules: {total} total, {triggered} triggered"),
    ("dashboard.kpi.violations", "Violations: {total}"),
    ("dashboard.kpi.last_run", "Last run: {when}"),
    (
        "dashboard.breakdown",
        "Severity: high {high} ({high_pct}%), medium {medium} ({medium_pct}%), low {low} \
         ({low_pct}%)",
    ),
    ("dashboard.kinds", "Violation types:"),
    ("dashboard.page", "Page {page}/{pages}: showing {from}-{to} of {total}"),
    ("vault.summary", "Rules: {total} total, {triggered} triggered, {violations} violations"),
    ("vault.categories", "Categories: {categories}"),
    ("vault.empty", "No rules match the current filters."),
    (
        "violations.summary",
        "Violations: {total} total, {pending} pending, {high} high severity, {confirmed} \
         confirmed, {escalated} escalated",
    ),
    ("violations.empty", "No violations match the current filters."),
    ("violations.decided", "Recorded {action} on {rule} by {analyst}; status is now {status}."),
    (
        "audit.summary",
        "Events: {total}, HITL decisions: {hitl}, pipeline runs: {runs}, blocked queries: \
         {blocked}",
    ),
    ("audit.empty", "No audit events match the current filters."),
    ("versions.empty", "No archived versions."),
    ("versions.latest", "(latest)"),
    ("versions.none", "No archived versions to compare against."),
    (
        "versions.diff.header",
        "Comparing {left} ({left_count} rules) with {right} ({right_count} rules)",
    ),
    ("versions.diff.summary", "{added} added, {removed} removed, {unchanged} unchanged"),
    ("versions.diff.identical", "Rule sets are identical."),
    ("live.refreshed", "Refreshed at {at}"),
    ("live.connection_lost", "Connection lost: {error}. Showing last known status."),
    ("live.services", "Ingester: {ingester}, watchdog: {watchdog}"),
    ("live.service.running", "running"),
    ("live.service.stopped", "stopped"),
    (
        "live.metrics",
        "Transactions: {transactions}, rules triggered: {triggered}, hits: {hits}, high \
         severity: {high}",
    ),
    ("live.config", "Batch size: {batch}, ingester every {ingester}s, watchdog every {watchdog}s"),
    ("live.inactive", "Inactive services: {services}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.json_failed", "Failed to serialize JSON output: {error}"),
];

/// Returns the raw catalog entries in declaration order.
pub(crate) const fn catalog_entries() -> &'static [(&'static str, &'static str)] {
    CATALOG
}

/// Returns the message catalog.
pub(crate) fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG_MAP.get_or_init(|| CATALOG.iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Looks up `key` and substitutes `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
