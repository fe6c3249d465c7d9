//! Analysis session: one in-flight request at a time.
//!
//! The session owns the [`AnalysisState`] and drives it through
//! `Idle -> Running -> Succeeded | Failed`. A run is started with
//! [`AnalysisSession::start`], which spawns the collaborator call on the
//! tokio runtime and returns immediately. The spawned task resolves the
//! run through a single path that writes the terminal state.
//!
//! State lives in a `watch` channel so a front end can await transitions
//! instead of polling. Only one run can be in flight: `start` is rejected
//! while the state is `Running`. There is no cancellation and no local
//! timeout; once the session is disposed, a late resolution is dropped.

use crate::client::Analyzer;
use crate::error::AnalysisError;
use crate::models::{AnalysisState, ResultSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What happened when a run was requested.
#[derive(Debug)]
pub enum StartOutcome {
    /// The run was dispatched. Awaiting the handle waits for resolution.
    Started(JoinHandle<()>),
    /// A run is already in flight; nothing was dispatched.
    AlreadyRunning,
    /// The session was disposed; nothing was dispatched.
    Disposed,
}

struct Shared {
    state: watch::Sender<AnalysisState>,
    disposed: AtomicBool,
    runs: AtomicU64,
}

impl Shared {
    fn resolve(&self, run: u64, outcome: Result<ResultSet, AnalysisError>) {
        let next = match outcome {
            Ok(results) => {
                info!(run, companies = results.len(), "Analysis succeeded");
                AnalysisState::Succeeded(results)
            }
            Err(e) => {
                warn!(run, "{}", e);
                AnalysisState::Failed(e.to_string())
            }
        };

        let applied = self.state.send_if_modified(|state| {
            if self.disposed.load(Ordering::Acquire) {
                return false;
            }
            *state = next;
            true
        });

        if !applied {
            debug!(run, "Session disposed, dropping late resolution");
        }
    }
}

/// Drives analysis runs against an [`Analyzer`].
pub struct AnalysisSession {
    analyzer: Arc<dyn Analyzer>,
    shared: Arc<Shared>,
}

impl AnalysisSession {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        let (state, _) = watch::channel(AnalysisState::Idle);
        Self {
            analyzer,
            shared: Arc::new(Shared {
                state,
                disposed: AtomicBool::new(false),
                runs: AtomicU64::new(0),
            }),
        }
    }

    /// Start a run over `urls`.
    ///
    /// Callers must not pass an empty list; the front end disables the
    /// action instead. Any previous result or error is cleared as soon as
    /// the run is accepted. Must be called from within a tokio runtime.
    pub fn start(&self, urls: Vec<String>) -> StartOutcome {
        if self.shared.disposed.load(Ordering::Acquire) {
            debug!("Ignoring start on a disposed session");
            return StartOutcome::Disposed;
        }

        let accepted = self.shared.state.send_if_modified(|state| {
            if state.is_running() {
                return false;
            }
            *state = AnalysisState::Running;
            true
        });

        if !accepted {
            debug!("Analysis already running, ignoring start");
            return StartOutcome::AlreadyRunning;
        }

        let run = self.shared.runs.fetch_add(1, Ordering::Relaxed) + 1;
        info!(run, urls = urls.len(), "Starting analysis");

        let analyzer = Arc::clone(&self.analyzer);
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            let outcome = analyzer.analyze(&urls).await;
            shared.resolve(run, outcome);
        });

        StartOutcome::Started(handle)
    }

    /// Snapshot of the current state.
    pub fn current_state(&self) -> AnalysisState {
        self.shared.state.borrow().clone()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.shared.state.subscribe()
    }

    /// Number of runs dispatched so far.
    pub fn runs_started(&self) -> u64 {
        self.shared.runs.load(Ordering::Relaxed)
    }

    /// Detach the session from any in-flight run. Later resolutions are
    /// ignored and further `start` calls do nothing.
    pub fn dispose(&self) {
        if !self.shared.disposed.swap(true, Ordering::AcqRel) {
            debug!("Analysis session disposed");
        }
    }

    #[allow(dead_code)] // Queried by embedding front ends
    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.load(Ordering::Acquire)
    }
}

impl Drop for AnalysisSession {
    fn drop(&mut self) {
        self.dispose();
    }
}
