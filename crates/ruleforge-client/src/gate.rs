// crates/ruleforge-client/src/gate.rs
// ============================================================================
// Module: Gate State
// Description: Process-wide "has any rule data been produced" flag.
// Purpose: Lock gated pages until the backend reports at least one rule.
// Dependencies: tokio, tracing
// ============================================================================

//! ## Overview
//! The gate starts in [`GateStatus::Loading`] and moves to `Locked` or
//! `Unlocked` after each [`Gate::refresh`]. A failed stats query locks the
//! gate instead of surfacing an error (fails closed). The gate is an explicit
//! value passed to whoever needs it; clones share the same state.

use std::sync::Arc;

use ruleforge_core::GateStatus;
use tokio::sync::watch;
use tracing::debug;
use tracing::info;

use crate::backend::StatsSource;

/// Shared gate state.
#[derive(Clone)]
pub struct Gate {
    /// Stats provider.
    source: Arc<dyn StatsSource>,
    /// Current status, observable by subscribers.
    status: Arc<watch::Sender<GateStatus>>,
}

impl Gate {
    /// Creates a gate in the loading state.
    #[must_use]
    pub fn new(source: Arc<dyn StatsSource>) -> Self {
        let (status, _) = watch::channel(GateStatus::Loading);
        Self {
            source,
            status: Arc::new(status),
        }
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> GateStatus {
        *self.status.borrow()
    }

    /// Subscribes to status changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GateStatus> {
        self.status.subscribe()
    }

    /// Re-queries stats and updates the status.
    pub async fn refresh(&self) -> GateStatus {
        let next = match self.source.stats().await {
            Ok(stats) => GateStatus::from_total_rules(Some(stats.total_rules)),
            Err(err) => {
                debug!(error = %err, "stats query failed; gate locked");
                GateStatus::from_total_rules(None)
            }
        };
        let previous = self.status.send_replace(next);
        if previous != next {
            info!(from = ?previous, to = ?next, "gate status changed");
        }
        next
    }
}

impl std::fmt::Debug for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gate").field("status", &self.status()).finish_non_exhaustive()
    }
}
