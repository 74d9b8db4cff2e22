// crates/ruleforge-core/src/routes.rs
// ============================================================================
// Module: Console Routes
// Description: Route table and gate-aware route resolution.
// Purpose: Decide whether a page renders, redirects, or shows the lock view.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Three routes are always reachable (`/`, `/scan-now`, `/configuration`).
//! The remaining pages require the gate to be unlocked; until then they
//! resolve to a lock view pointing back at `/scan-now`, or to a loading view
//! while the first gate query is still in flight.

use serde::Serialize;

// ============================================================================
// SECTION: Gate Status
// ============================================================================

/// Observable state of the process-wide gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    /// Initial stats query has not completed.
    #[default]
    Loading,
    /// No rule data exists yet, or the stats query failed.
    Locked,
    /// At least one rule has been produced.
    Unlocked,
}

impl GateStatus {
    /// Derives the status from a stats query outcome; failures lock the gate.
    #[must_use]
    pub const fn from_total_rules(total_rules: Option<u64>) -> Self {
        match total_rules {
            Some(count) if count > 0 => Self::Unlocked,
            _ => Self::Locked,
        }
    }

    /// Returns true when gated pages may render.
    #[must_use]
    pub const fn is_unlocked(self) -> bool {
        matches!(self, Self::Unlocked)
    }
}

// ============================================================================
// SECTION: Routes
// ============================================================================

/// A console page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Root; redirects to the scan page.
    Root,
    /// Upload and pipeline run page.
    ScanNow,
    /// Console configuration.
    Configuration,
    /// KPI dashboard.
    Dashboard,
    /// Rule browser.
    PolicyVault,
    /// Violation review.
    Violations,
    /// Audit log.
    AuditLog,
    /// Live monitoring.
    LiveMonitor,
    /// Version history and diff.
    PolicyVersions,
}

impl Route {
    /// All routes in navigation order.
    pub const ALL: [Self; 9] = [
        Self::Root,
        Self::ScanNow,
        Self::Configuration,
        Self::Dashboard,
        Self::PolicyVault,
        Self::Violations,
        Self::AuditLog,
        Self::LiveMonitor,
        Self::PolicyVersions,
    ];

    /// Returns the client-side path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::ScanNow => "/scan-now",
            Self::Configuration => "/configuration",
            Self::Dashboard => "/dashboard",
            Self::PolicyVault => "/policy-vault",
            Self::Violations => "/violations",
            Self::AuditLog => "/audit-log",
            Self::LiveMonitor => "/live-monitor",
            Self::PolicyVersions => "/policy-versions",
        }
    }

    /// Looks up a route by path.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    /// Returns true when the route requires an unlocked gate.
    #[must_use]
    pub const fn is_gated(self) -> bool {
        !matches!(self, Self::Root | Self::ScanNow | Self::Configuration)
    }
}

/// Outcome of resolving a route against the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "view")]
pub enum RouteView {
    /// Render the page.
    Page {
        /// Page to render.
        route: Route,
    },
    /// Navigate elsewhere without rendering.
    Redirect {
        /// Destination route.
        to: Route,
    },
    /// Show the full-page loading indicator.
    Loading,
    /// Show the lock screen with a link to the scan page.
    Locked {
        /// Route the lock screen links to.
        scan: Route,
    },
}

/// Resolves `route` against the current gate status.
#[must_use]
pub const fn resolve(route: Route, gate: GateStatus) -> RouteView {
    if matches!(route, Route::Root) {
        return RouteView::Redirect {
            to: Route::ScanNow,
        };
    }
    if !route.is_gated() {
        return RouteView::Page {
            route,
        };
    }
    match gate {
        GateStatus::Loading => RouteView::Loading,
        GateStatus::Locked => RouteView::Locked {
            scan: Route::ScanNow,
        },
        GateStatus::Unlocked => RouteView::Page {
            route,
        },
    }
}
