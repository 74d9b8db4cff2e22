// crates/ruleforge-client/src/tests/gate.rs
// ============================================================================
// Module: Gate Tests
// Description: Unlock rules and fail-closed behavior of the gate.
// ============================================================================

use std::sync::Arc;

use ruleforge_core::GateStatus;

use crate::gate::Gate;
use crate::tests::scripted::ScriptedStats;
use crate::tests::scripted::offline;

#[tokio::test]
async fn gate_starts_loading() {
    let gate = Gate::new(Arc::new(ScriptedStats::new(Vec::new(), 1)));
    assert_eq!(gate.status(), GateStatus::Loading);
}

#[tokio::test]
async fn gate_unlocks_only_with_rules() {
    let stats = Arc::new(ScriptedStats::new(vec![Ok(0), Ok(1)], 1));
    let gate = Gate::new(Arc::clone(&stats) as _);
    assert_eq!(gate.refresh().await, GateStatus::Locked);
    assert_eq!(gate.refresh().await, GateStatus::Unlocked);
    assert_eq!(stats.calls(), 2);
}

#[tokio::test]
async fn failed_stats_query_locks_the_gate() {
    let gate = Gate::new(Arc::new(ScriptedStats::new(vec![Ok(5), Err(offline())], 5)));
    assert_eq!(gate.refresh().await, GateStatus::Unlocked);
    assert_eq!(gate.refresh().await, GateStatus::Locked);
}

#[tokio::test]
async fn clones_share_state_and_notify_subscribers() {
    let gate = Gate::new(Arc::new(ScriptedStats::new(Vec::new(), 3)));
    let observer = gate.clone();
    let mut changes = observer.subscribe();
    gate.refresh().await;
    assert!(changes.has_changed().unwrap());
    assert_eq!(*changes.borrow_and_update(), GateStatus::Unlocked);
    assert_eq!(observer.status(), GateStatus::Unlocked);
}
