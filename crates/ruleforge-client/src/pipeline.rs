// crates/ruleforge-client/src/pipeline.rs
// ============================================================================
// Module: Pipeline Run Controller
// Description: Upload, start, poll, and completion for backend pipeline runs.
// Purpose: Drive the scan workflow state machine with an append-only log.
// Dependencies: tokio, tracing, thiserror
// ============================================================================

//! ## Overview
//! A run moves through `Idle -> Uploading (optional) -> Starting -> Running ->
//! Completed(success | failure)`.
//!
//! - Uploading happens only when the phase needs a document and the selected
//!   document has not been uploaded yet; the assigned name is cached by
//!   document identity.
//! - Running polls `pipeline-status` at a fixed interval with a cumulative
//!   offset cursor, appending only new lines. Poll failures are logged at
//!   debug level and retried on the next tick.
//! - The poll stops when the backend reports the process is no longer
//!   running; return code zero means success.
//! - Success refreshes the gate. Every polled completion refreshes the
//!   recent-runs listing.
//! - Failing to start (validation, upload, or run request) goes straight to
//!   `Completed(failure)` with a single `[ERROR] <message>` log line.
//!
//! Dropping an [`ActiveRun`] stops its poll timer. Starting a new run stops
//! the previous run's timer, so a controller polls at most one run at a time
//! and a superseded run never writes into the current snapshot. The backend
//! process is not aborted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use ruleforge_core::Phase;
use ruleforge_core::RunRequest;
use ruleforge_core::views::audit::RecentRun;
use ruleforge_core::views::audit::recent_runs;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::debug;
use tracing::info;

use crate::api::ApiError;
use crate::backend::PipelineBackend;
use crate::document::DocumentId;
use crate::document::PdfDocument;
use crate::gate::Gate;
use crate::poll::PollHandle;
use crate::poll::poll_interval;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Default pipeline poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1_500);

/// Prefix of the synthetic log line written when a run fails to start.
const START_ERROR_PREFIX: &str = "[ERROR]";

/// Terminal outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Process exited with return code zero.
    Success,
    /// Start failed or the process exited non-zero.
    Failure,
}

/// Run controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "outcome")]
pub enum RunState {
    /// No run has been started.
    #[default]
    Idle,
    /// Uploading the source document.
    Uploading,
    /// Waiting for the backend to acknowledge the run request.
    Starting,
    /// Polling the backend for progress.
    Running,
    /// Run finished.
    Completed(RunOutcome),
}

impl RunState {
    /// Returns true once the run has completed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Observable progress of the current run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSnapshot {
    /// Controller state.
    pub state: RunState,
    /// Log lines in arrival order.
    pub log: Vec<String>,
}

/// Streamed run progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// State transition.
    State(RunState),
    /// New log line.
    Log(String),
}

/// Run controller errors.
#[derive(Debug, Error)]
pub enum RunError {
    /// Selected file is not a PDF.
    #[error("only PDF files are supported: {0}")]
    NotPdf(String),
    /// Document could not be read.
    #[error("document io error: {0}")]
    Io(String),
    /// The phase needs a document and none is selected.
    #[error("phase {0} requires a PDF document")]
    DocumentRequired(Phase),
    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    /// Pipeline status poll interval.
    pub poll_interval: Duration,
    /// Audit entries fetched when refreshing recent runs.
    pub recent_runs_limit: u32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            recent_runs_limit: 20,
        }
    }
}

// ============================================================================
// SECTION: Controller
// ============================================================================

/// Pipeline run controller for one console session.
pub struct RunController {
    /// Backend operations.
    backend: Arc<dyn PipelineBackend>,
    /// Gate refreshed after successful runs.
    gate: Gate,
    /// Controller tuning.
    settings: RunSettings,
    /// Selected document.
    document: Option<PdfDocument>,
    /// Backend name assigned to the selected document, once uploaded.
    uploaded: Option<(DocumentId, String)>,
    /// Current run progress.
    snapshot: Arc<watch::Sender<RunSnapshot>>,
    /// Recent pipeline runs from the audit log.
    recent: Arc<watch::Sender<Vec<RecentRun>>>,
    /// Generation of the newest run; older reporters go quiet.
    generation: Arc<AtomicU64>,
    /// Poll timer of the newest run.
    active: Option<AbortHandle>,
}

impl RunController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(backend: Arc<dyn PipelineBackend>, gate: Gate, settings: RunSettings) -> Self {
        let (snapshot, _) = watch::channel(RunSnapshot::default());
        let (recent, _) = watch::channel(Vec::new());
        Self {
            backend,
            gate,
            settings,
            document: None,
            uploaded: None,
            snapshot: Arc::new(snapshot),
            recent: Arc::new(recent),
            generation: Arc::new(AtomicU64::new(0)),
            active: None,
        }
    }

    /// Selects (or clears) the source document.
    ///
    /// Choosing a document with a different identity discards the cached
    /// upload name.
    pub fn select_document(&mut self, document: Option<PdfDocument>) {
        let identity = document.as_ref().map(PdfDocument::identity);
        if self.uploaded.as_ref().map(|(cached, _)| *cached) != identity {
            self.uploaded = None;
        }
        self.document = document;
    }

    /// Returns the backend name of the uploaded document, if any.
    #[must_use]
    pub fn uploaded_filename(&self) -> Option<&str> {
        self.uploaded.as_ref().map(|(_, name)| name.as_str())
    }

    /// Returns the current run progress.
    #[must_use]
    pub fn snapshot(&self) -> RunSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Subscribes to run progress.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RunSnapshot> {
        self.snapshot.subscribe()
    }

    /// Returns the last recent-runs listing.
    #[must_use]
    pub fn recent_runs(&self) -> Vec<RecentRun> {
        self.recent.borrow().clone()
    }

    /// Reloads the recent-runs listing from the audit log.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the audit log cannot be fetched.
    pub async fn refresh_recent_runs(&self) -> Result<Vec<RecentRun>, ApiError> {
        refresh_recent(self.backend.as_ref(), &self.recent, self.settings.recent_runs_limit).await
    }

    /// Starts a run for `phase`.
    ///
    /// The returned [`ActiveRun`] streams progress and owns the poll timer.
    /// Start failures are reported through the run itself, never as `Err`.
    /// Any previous run of this controller stops polling first; its
    /// [`ActiveRun`] stream ends without a completion event.
    pub async fn start(&mut self, phase: Phase) -> ActiveRun {
        self.stop_previous();
        let (events, receiver) = mpsc::unbounded_channel();
        let reporter = Reporter {
            snapshot: Arc::clone(&self.snapshot),
            events,
            generation: self.generation.fetch_add(1, Ordering::SeqCst).wrapping_add(1),
            current: Arc::clone(&self.generation),
        };
        reporter.reset();

        match self.request_run(phase, &reporter).await {
            Ok(()) => {
                reporter.set_state(RunState::Running);
                let poll = PollHandle::spawn(poll_until_complete(
                    Arc::clone(&self.backend),
                    self.gate.clone(),
                    Arc::clone(&self.recent),
                    self.settings,
                    reporter,
                ));
                self.active = Some(poll.abort_handle());
                ActiveRun {
                    events: receiver,
                    poll: Some(poll),
                }
            }
            Err(err) => {
                reporter.push_log(format!("{START_ERROR_PREFIX} {err}"));
                reporter.set_state(RunState::Completed(RunOutcome::Failure));
                ActiveRun {
                    events: receiver,
                    poll: None,
                }
            }
        }
    }

    /// Aborts the poll timer of the previous run, if it is still running.
    fn stop_previous(&mut self) {
        if let Some(previous) = self.active.take() {
            debug!("stopping superseded pipeline poll");
            previous.abort();
        }
    }

    /// Uploads when needed and sends the run request.
    async fn request_run(&mut self, phase: Phase, reporter: &Reporter) -> Result<(), RunError> {
        let mut pdf = None;
        if phase.requires_document() {
            let document = self.document.as_ref().ok_or(RunError::DocumentRequired(phase))?;
            let identity = document.identity();
            let cached =
                self.uploaded.as_ref().filter(|(id, _)| *id == identity).map(|(_, name)| name.clone());
            let filename = match cached {
                Some(name) => name,
                None => {
                    reporter.set_state(RunState::Uploading);
                    let receipt = self.backend.upload(document).await?;
                    self.uploaded = Some((identity, receipt.filename.clone()));
                    receipt.filename
                }
            };
            pdf = Some(filename);
        }
        reporter.set_state(RunState::Starting);
        let request = RunRequest {
            phase: phase.code().to_string(),
            pdf,
        };
        self.backend.start_run(&request).await?;
        Ok(())
    }
}

impl std::fmt::Debug for RunController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunController")
            .field("settings", &self.settings)
            .field("document", &self.document)
            .field("uploaded", &self.uploaded_filename())
            .finish_non_exhaustive()
    }
}

/// A started run.
///
/// # Invariants
/// - Dropping the run stops its poll timer.
#[derive(Debug)]
pub struct ActiveRun {
    /// Progress stream.
    events: mpsc::UnboundedReceiver<RunEvent>,
    /// Poll timer; `None` when the run failed to start.
    poll: Option<PollHandle>,
}

impl ActiveRun {
    /// Waits for the next progress event; `None` once the run is over.
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }

    /// Drains events until the run completes and returns its outcome.
    ///
    /// Returns `None` when the poll was stopped before completion.
    pub async fn wait(mut self) -> Option<RunOutcome> {
        while let Some(event) = self.next_event().await {
            if let RunEvent::State(RunState::Completed(outcome)) = event {
                return Some(outcome);
            }
        }
        None
    }

    /// Returns true while the poll timer is active.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poll.as_ref().is_some_and(|poll| !poll.is_finished())
    }
}

// ============================================================================
// SECTION: Polling
// ============================================================================

/// Publishes run progress to the snapshot and the event stream.
struct Reporter {
    snapshot: Arc<watch::Sender<RunSnapshot>>,
    events: mpsc::UnboundedSender<RunEvent>,
    /// Generation this reporter belongs to.
    generation: u64,
    /// Controller's newest generation.
    current: Arc<AtomicU64>,
}

impl Reporter {
    fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    fn reset(&self) {
        self.snapshot.send_replace(RunSnapshot::default());
    }

    fn set_state(&self, state: RunState) {
        if !self.is_current() {
            return;
        }
        info!(?state, "pipeline run state");
        self.snapshot.send_modify(|snapshot| snapshot.state = state);
        let _ = self.events.send(RunEvent::State(state));
    }

    fn push_log(&self, line: String) {
        if !self.is_current() {
            return;
        }
        self.snapshot.send_modify(|snapshot| snapshot.log.push(line.clone()));
        let _ = self.events.send(RunEvent::Log(line));
    }
}

/// Polls the backend until the process stops running.
async fn poll_until_complete(
    backend: Arc<dyn PipelineBackend>,
    gate: Gate,
    recent: Arc<watch::Sender<Vec<RecentRun>>>,
    settings: RunSettings,
    reporter: Reporter,
) {
    let mut interval = poll_interval(settings.poll_interval);
    let mut offset = 0_usize;
    loop {
        interval.tick().await;
        if !reporter.is_current() {
            return;
        }
        let status = match backend.pipeline_status(offset).await {
            Ok(status) => status,
            Err(err) => {
                debug!(offset, error = %err, "pipeline status poll failed; retrying");
                continue;
            }
        };
        offset = offset.saturating_add(status.log_lines.len());
        for line in status.log_lines.iter().cloned() {
            reporter.push_log(line);
        }
        if status.running {
            continue;
        }
        let outcome = if status.succeeded() { RunOutcome::Success } else { RunOutcome::Failure };
        if outcome == RunOutcome::Success {
            gate.refresh().await;
        }
        if let Err(err) = refresh_recent(backend.as_ref(), &recent, settings.recent_runs_limit).await
        {
            debug!(error = %err, "recent runs refresh failed");
        }
        reporter.set_state(RunState::Completed(outcome));
        return;
    }
}

/// Fetches the audit log and publishes pipeline-run entries.
async fn refresh_recent(
    backend: &dyn PipelineBackend,
    recent: &watch::Sender<Vec<RecentRun>>,
    limit: u32,
) -> Result<Vec<RecentRun>, ApiError> {
    let page = backend.audit_log(limit).await?;
    let runs = recent_runs(&page.logs);
    recent.send_replace(runs.clone());
    Ok(runs)
}
