// crates/ruleforge-client/src/poll.rs
// ============================================================================
// Module: Scoped Poll Timers
// Description: Owned handle for a background polling task.
// Purpose: Guarantee a poll timer stops on every exit path.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! A [`PollHandle`] owns the task driving a repeating timer. Dropping the
//! handle aborts the task, so a view that goes away (or a run that completes)
//! never leaves an orphaned timer behind. Remote work started by the task is
//! not cancelled; only the local polling stops.

use std::future::Future;
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio::time::Interval;
use tokio::time::MissedTickBehavior;

/// Owned background poll task; aborted on drop.
#[derive(Debug)]
pub struct PollHandle {
    /// Task running the poll loop.
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Spawns `poll_loop` on the current runtime.
    #[must_use]
    pub fn spawn<F>(poll_loop: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            task: tokio::spawn(poll_loop),
        }
    }

    /// Returns true once the loop has exited or been aborted.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Returns a handle that stops the loop without owning it.
    #[must_use]
    pub fn abort_handle(&self) -> AbortHandle {
        self.task.abort_handle()
    }

    /// Stops the loop.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Returns an interval whose first tick fires one `period` from now.
///
/// Late ticks are delayed rather than bursted, so a slow response never
/// queues a backlog of polls.
#[must_use]
pub fn poll_interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
