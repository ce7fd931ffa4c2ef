//! Edit-run-display controller
//!
//! Owns the [`SessionState`] and mediates between the editor surface, file
//! loads, run requests and the analysis backend. File reads and analysis
//! calls run as spawned tasks; they report back over a channel and the
//! owner applies their completions with [`Controller::poll`] or
//! [`Controller::next_completion`]. Session state is only ever written from
//! the task that owns the controller.
//!
//! # Overlap
//!
//! Under [`OverlapPolicy::LastWriterWins`] nothing is cancelled and every
//! completion is applied in arrival order. Under
//! [`OverlapPolicy::CancelPrevious`] a new run cancels in-flight runs and a
//! new load cancels in-flight loads; late completions from cancelled work
//! are discarded.

use crate::analysis::{AnalysisBackend, AnalysisResult};
use crate::error::{Result, StudioError};
use crate::loader::SourceReader;
use crate::session::SessionState;
use crate::surface::{DisplaySurface, EditorSurface};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Identifies one spawned run or load
pub type Ticket = u64;

/// Treatment of a run or load started while another is pending
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Let everything finish; completions apply in arrival order
    #[default]
    LastWriterWins,
    /// Cancel pending operations of the same kind
    CancelPrevious,
}

/// Whether an analysis is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No run pending
    Idle,
    /// At least one run pending
    AwaitingAnalysis,
}

/// Message sent by a finished background task
#[derive(Debug)]
enum Completion {
    Analysis {
        ticket: Ticket,
        outcome: Result<AnalysisResult>,
    },
    FileLoad {
        ticket: Ticket,
        path: PathBuf,
        outcome: Result<String>,
    },
}

/// What applying a completion changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A run finished and the display was refreshed
    Analysis {
        /// Run that finished
        ticket: Ticket,
        /// False when the backend call failed
        succeeded: bool,
    },
    /// A file load finished
    FileLoad {
        /// Load that finished
        ticket: Ticket,
        /// File that was read
        path: PathBuf,
        /// False when the read failed and the buffer stayed empty
        loaded: bool,
    },
}

impl Applied {
    /// Ticket of the operation this completion belongs to
    pub fn ticket(&self) -> Ticket {
        match self {
            Applied::Analysis { ticket, .. } | Applied::FileLoad { ticket, .. } => *ticket,
        }
    }
}

/// Controller binding surfaces, session state and the analysis backend
pub struct Controller<E, D> {
    session: SessionState,
    editor: E,
    display: D,
    backend: Arc<dyn AnalysisBackend>,
    reader: Arc<dyn SourceReader>,
    policy: OverlapPolicy,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    runs: HashMap<Ticket, CancellationToken>,
    loads: HashMap<Ticket, CancellationToken>,
    next_ticket: Ticket,
}

impl<E, D> Controller<E, D>
where
    E: EditorSurface,
    D: DisplaySurface,
{
    /// Create a controller with an empty session
    pub fn new(
        editor: E,
        display: D,
        backend: Arc<dyn AnalysisBackend>,
        reader: Arc<dyn SourceReader>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session: SessionState::new(),
            editor,
            display,
            backend,
            reader,
            policy: OverlapPolicy::default(),
            tx,
            rx,
            runs: HashMap::new(),
            loads: HashMap::new(),
            next_ticket: 1,
        }
    }

    /// Set the overlap policy
    pub fn with_policy(mut self, policy: OverlapPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current overlap policy
    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Session state
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Editor surface
    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Mutable editor surface
    ///
    /// Edits made here reach the session only through
    /// [`Self::set_source_from_editor`].
    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    /// Display surface
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable display surface
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Run phase
    pub fn phase(&self) -> Phase {
        if self.runs.is_empty() {
            Phase::Idle
        } else {
            Phase::AwaitingAnalysis
        }
    }

    /// Whether a file load is pending
    pub fn is_loading(&self) -> bool {
        !self.loads.is_empty()
    }

    /// Whether any run or load is pending
    pub fn has_pending(&self) -> bool {
        !self.runs.is_empty() || !self.loads.is_empty()
    }

    /// Take the editor's text as the new source
    pub fn set_source_from_editor(&mut self, text: impl Into<String>) {
        self.session.replace_source(text);
    }

    /// Start loading `path` as the new source
    ///
    /// The source is emptied now. When the read succeeds the source and the
    /// editor both receive the file's text; when it fails the source stays
    /// empty and the failure is only logged.
    pub fn load_source_from_file(&mut self, path: impl Into<PathBuf>) -> Ticket {
        let path = path.into();
        if self.policy == OverlapPolicy::CancelPrevious {
            cancel_all(&mut self.loads, "load");
        }

        self.session.clear_source();
        let ticket = self.issue_ticket();
        let token = CancellationToken::new();
        self.loads.insert(ticket, token.clone());

        info!("Loading source from {} (load #{})", path.display(), ticket);

        let reader = Arc::clone(&self.reader);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let read_path = path.clone();
            let read = tokio::spawn(async move { reader.read_text(&read_path).await });
            if let Some(outcome) = supervise(read, &token).await {
                let _ = tx.send(Completion::FileLoad {
                    ticket,
                    path,
                    outcome,
                });
            }
        });

        ticket
    }

    /// Send the current source to the backend
    ///
    /// An empty source falls back to the editor's visible text.
    pub fn run(&mut self) -> Ticket {
        if self.policy == OverlapPolicy::CancelPrevious {
            cancel_all(&mut self.runs, "run");
        }

        let source = if self.session.source_text().is_empty() {
            debug!("Source is empty, reading editor text");
            self.editor.text()
        } else {
            self.session.source_text().to_string()
        };

        let ticket = self.issue_ticket();
        let token = CancellationToken::new();
        self.runs.insert(ticket, token.clone());

        info!("Starting analysis run #{} ({} bytes)", ticket, source.len());

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let call = tokio::spawn(async move { backend.analyze(&source).await });
            if let Some(outcome) = supervise(call, &token).await {
                let _ = tx.send(Completion::Analysis { ticket, outcome });
            }
        });

        ticket
    }

    /// Apply every completion that has already arrived
    ///
    /// Returns what was applied, in arrival order.
    pub fn poll(&mut self) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            applied.extend(self.apply(completion));
        }
        applied
    }

    /// Wait for the next completion that still matters and apply it
    ///
    /// Returns `None` straight away when nothing is pending.
    pub async fn next_completion(&mut self) -> Option<Applied> {
        while self.has_pending() {
            let completion = self.rx.recv().await?;
            if let Some(applied) = self.apply(completion) {
                return Some(applied);
            }
        }
        None
    }

    /// Start a run and wait until it has been applied
    ///
    /// Other completions arriving meanwhile are applied too.
    pub async fn run_to_completion(&mut self) -> Ticket {
        let ticket = self.run();
        self.settle(ticket).await;
        ticket
    }

    /// Start a load and wait until it has been applied
    pub async fn load_to_completion(&mut self, path: impl Into<PathBuf>) -> Ticket {
        let ticket = self.load_source_from_file(path);
        self.settle(ticket).await;
        ticket
    }

    /// Optionally load `file`, then run once and wait for the result
    ///
    /// Used by headless mode. A load that leaves the source empty is
    /// logged, and the run then falls back to the editor text.
    pub async fn analyze_once(&mut self, file: Option<PathBuf>) -> Ticket {
        if let Some(path) = file {
            self.load_to_completion(path.clone()).await;
            if self.session.source_text().is_empty() {
                warn!(
                    "{} produced no source; analyzing the editor text instead",
                    path.display()
                );
            }
        }
        self.run_to_completion().await
    }

    /// Cancel every pending run and load
    pub fn cancel_pending(&mut self) {
        cancel_all(&mut self.runs, "run");
        cancel_all(&mut self.loads, "load");
    }

    async fn settle(&mut self, ticket: Ticket) {
        while self.runs.contains_key(&ticket) || self.loads.contains_key(&ticket) {
            match self.next_completion().await {
                Some(applied) if applied.ticket() == ticket => break,
                Some(_) => continue,
                None => break,
            }
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    fn apply(&mut self, completion: Completion) -> Option<Applied> {
        match completion {
            Completion::Analysis { ticket, outcome } => {
                if self.runs.remove(&ticket).is_none() {
                    debug!("Discarding result of cancelled run #{}", ticket);
                    return None;
                }

                let succeeded = match outcome {
                    Ok(result) => {
                        info!(
                            "Run #{} finished with {} diagnostics",
                            ticket,
                            result.errors.len()
                        );
                        self.session.apply_analysis(result);
                        true
                    }
                    Err(e) => {
                        warn!("Run #{} failed: {}", ticket, e);
                        self.session.record_failure(&e);
                        false
                    }
                };

                let rendered = self.session.render();
                self.display.show(&rendered);

                Some(Applied::Analysis { ticket, succeeded })
            }
            Completion::FileLoad {
                ticket,
                path,
                outcome,
            } => {
                if self.loads.remove(&ticket).is_none() {
                    debug!("Discarding cancelled load #{} of {}", ticket, path.display());
                    return None;
                }

                let loaded = match outcome {
                    Ok(text) => {
                        info!("Loaded {} ({} bytes)", path.display(), text.len());
                        self.editor.set_text(&text);
                        self.session.replace_source(text);
                        true
                    }
                    Err(e) => {
                        warn!("Could not read {}: {}", path.display(), e);
                        false
                    }
                };

                Some(Applied::FileLoad {
                    ticket,
                    path,
                    loaded,
                })
            }
        }
    }
}

impl<E, D> Drop for Controller<E, D> {
    fn drop(&mut self) {
        for token in self.runs.values().chain(self.loads.values()) {
            token.cancel();
        }
    }
}

fn cancel_all(pending: &mut HashMap<Ticket, CancellationToken>, kind: &str) {
    for (ticket, token) in pending.drain() {
        debug!("Cancelling {} #{}", kind, ticket);
        token.cancel();
    }
}

/// Await a background task unless cancelled first
///
/// A panicking task becomes a [`StudioError::TaskFailed`] outcome;
/// cancellation aborts the task and yields `None`.
async fn supervise<T>(
    mut task: tokio::task::JoinHandle<Result<T>>,
    token: &CancellationToken,
) -> Option<Result<T>> {
    tokio::select! {
        _ = token.cancelled() => {
            task.abort();
            None
        }
        joined = &mut task => Some(match joined {
            Ok(outcome) => outcome,
            Err(e) => Err(StudioError::TaskFailed(e.to_string())),
        }),
    }
}
