//! Common test utilities and fakes

#![allow(dead_code)]

use analysis_studio::{AnalysisBackend, AnalysisResult, Result, SourceReader, StudioError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::oneshot;

pub type AnalysisGate = oneshot::Sender<Result<AnalysisResult>>;
pub type ReadGate = oneshot::Sender<Result<String>>;

/// Backend whose calls block until the test releases them
///
/// Each gated source text resolves with whatever the test sends through
/// its sender, so completion order is under the test's control.
pub struct GatedBackend {
    calls: Mutex<Vec<String>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<Result<AnalysisResult>>>>,
}

impl GatedBackend {
    /// Backend gating one call per source text
    pub fn new(sources: &[&str]) -> (Self, Vec<AnalysisGate>) {
        let mut senders = Vec::with_capacity(sources.len());
        let mut gates = HashMap::new();
        for source in sources {
            let (tx, rx) = oneshot::channel();
            senders.push(tx);
            gates.insert(source.to_string(), rx);
        }
        let backend = Self {
            calls: Mutex::new(Vec::new()),
            gates: Mutex::new(gates),
        };
        (backend, senders)
    }

    /// Source texts received so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisBackend for GatedBackend {
    async fn analyze(&self, source: &str) -> Result<AnalysisResult> {
        self.calls.lock().unwrap().push(source.to_string());
        let gate = self.gates.lock().unwrap().remove(source);
        match gate {
            Some(gate) => gate
                .await
                .unwrap_or_else(|_| Err(StudioError::Other("gate dropped".to_string()))),
            None => Err(StudioError::Other(format!("unexpected source: {source}"))),
        }
    }
}

/// Backend answering from a fixed script, one result per call
pub struct ScriptedBackend {
    calls: Mutex<Vec<String>>,
    script: Mutex<VecDeque<Result<AnalysisResult>>>,
}

impl ScriptedBackend {
    /// Backend replaying `script` in order
    pub fn new(script: Vec<Result<AnalysisResult>>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(script.into()),
        }
    }

    /// Source texts received so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisBackend for ScriptedBackend {
    async fn analyze(&self, source: &str) -> Result<AnalysisResult> {
        self.calls.lock().unwrap().push(source.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(StudioError::Other("script exhausted".to_string())))
    }
}

/// Reader whose reads block until the test releases them
pub struct GatedReader {
    gates: Mutex<HashMap<PathBuf, oneshot::Receiver<Result<String>>>>,
}

impl GatedReader {
    /// Reader gating one read per path
    pub fn new(paths: &[&str]) -> (Self, Vec<ReadGate>) {
        let mut senders = Vec::with_capacity(paths.len());
        let mut gates = HashMap::new();
        for path in paths {
            let (tx, rx) = oneshot::channel();
            senders.push(tx);
            gates.insert(PathBuf::from(path), rx);
        }
        (
            Self {
                gates: Mutex::new(gates),
            },
            senders,
        )
    }
}

#[async_trait]
impl SourceReader for GatedReader {
    async fn read_text(&self, path: &Path) -> Result<String> {
        let gate = self.gates.lock().unwrap().remove(path);
        match gate {
            Some(gate) => gate
                .await
                .unwrap_or_else(|_| Err(StudioError::Other("gate dropped".to_string()))),
            None => Err(StudioError::Other(format!(
                "unexpected read: {}",
                path.display()
            ))),
        }
    }
}

/// Result with context and inference
pub fn typed(context: &str, inference: &str) -> AnalysisResult {
    AnalysisResult::default().context(context).inference(inference)
}

/// Result with diagnostics only
pub fn failing(errors: &[&str]) -> AnalysisResult {
    AnalysisResult::with_errors(errors.iter().copied())
}
