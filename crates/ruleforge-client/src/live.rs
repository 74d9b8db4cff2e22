// crates/ruleforge-client/src/live.rs
// ============================================================================
// Module: Live Monitor Poller
// Description: Initial load and background refresh of live ingestion status.
// Purpose: Keep the live view current and flag lost connectivity.
// Dependencies: tokio, tracing
// ============================================================================

//! ## Overview
//! The live monitor loads once up front; a failure there is returned to the
//! caller. After that, a background poll refreshes the status at a fixed
//! interval. A failed background poll keeps the last good status, marks the
//! connection as lost, and keeps polling; the next success clears the flag.

use std::sync::Arc;
use std::time::Duration;

use ruleforge_core::LiveStatus;
use tokio::sync::mpsc;
use tracing::debug;
use tracing::warn;

use crate::api::ApiError;
use crate::backend::LiveSource;
use crate::poll::PollHandle;
use crate::poll::poll_interval;

/// Default live monitor poll interval.
pub const DEFAULT_LIVE_INTERVAL: Duration = Duration::from_secs(4);

/// Buffered updates before the poller waits for the consumer.
const UPDATE_BUFFER: usize = 8;

/// A live monitor refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveUpdate {
    /// Most recent successfully fetched status.
    pub status: LiveStatus,
    /// True when the latest background poll failed.
    pub connection_lost: bool,
    /// Failure message of the latest poll, when it failed.
    pub error: Option<String>,
}

/// Live monitor bound to a status source.
#[derive(Clone)]
pub struct LiveMonitor {
    /// Status provider.
    source: Arc<dyn LiveSource>,
    /// Poll interval.
    interval: Duration,
}

impl LiveMonitor {
    /// Creates a monitor.
    #[must_use]
    pub fn new(source: Arc<dyn LiveSource>, interval: Duration) -> Self {
        Self {
            source,
            interval,
        }
    }

    /// Performs the initial load.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the status cannot be fetched.
    pub async fn load(&self) -> Result<LiveStatus, ApiError> {
        self.source.live_status().await
    }

    /// Starts background polling from an initial status.
    ///
    /// The poll stops when the returned feed is dropped.
    #[must_use]
    pub fn watch(&self, initial: LiveStatus) -> LiveFeed {
        let (sender, updates) = mpsc::channel(UPDATE_BUFFER);
        let poll = PollHandle::spawn(poll_live(Arc::clone(&self.source), self.interval, initial, sender));
        LiveFeed {
            updates,
            _poll: poll,
        }
    }
}

impl std::fmt::Debug for LiveMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveMonitor").field("interval", &self.interval).finish_non_exhaustive()
    }
}

/// Stream of live updates; owns the poll timer.
#[derive(Debug)]
pub struct LiveFeed {
    /// Update stream.
    updates: mpsc::Receiver<LiveUpdate>,
    /// Poll timer, stopped on drop.
    _poll: PollHandle,
}

impl LiveFeed {
    /// Waits for the next refresh.
    pub async fn next(&mut self) -> Option<LiveUpdate> {
        self.updates.recv().await
    }
}

/// Background poll loop; exits when the feed is dropped.
async fn poll_live(
    source: Arc<dyn LiveSource>,
    period: Duration,
    mut last: LiveStatus,
    sender: mpsc::Sender<LiveUpdate>,
) {
    let mut interval = poll_interval(period);
    let mut connection_lost = false;
    loop {
        interval.tick().await;
        let update = match source.live_status().await {
            Ok(status) => {
                if connection_lost {
                    debug!("live monitor connection restored");
                }
                connection_lost = false;
                last = status;
                LiveUpdate {
                    status: last.clone(),
                    connection_lost,
                    error: None,
                }
            }
            Err(err) => {
                warn!(error = %err, "live monitor connection lost");
                connection_lost = true;
                LiveUpdate {
                    status: last.clone(),
                    connection_lost,
                    error: Some(err.to_string()),
                }
            }
        };
        if sender.send(update).await.is_err() {
            return;
        }
    }
}
