//! Session state owned by the controller
//!
//! Holds the source buffer and the fields produced by the last analysis.
//! Analysis fields change only when a run completes; they are never
//! derived from the source text.

use crate::analysis::AnalysisResult;

/// Shown in place of an inference the backend did not send
pub const NO_INFERENCE: &str = "no inference available";

/// Separator between rendered sections
const SECTION_SEPARATOR: &str = "\n\n";

/// Per-run interactive state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    source_text: String,
    diagnostics: Vec<String>,
    context: Option<String>,
    inference: Option<String>,
}

impl SessionState {
    /// Empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Current source buffer
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Diagnostics from the last completed run
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Context from the most recent run that produced one
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Inference paired with [`Self::context`]
    pub fn inference(&self) -> Option<&str> {
        self.inference.as_deref()
    }

    /// Replace the whole source buffer
    pub fn replace_source(&mut self, text: impl Into<String>) {
        self.source_text = text.into();
    }

    /// Empty the source buffer
    pub fn clear_source(&mut self) {
        self.source_text.clear();
    }

    /// Fold a completed analysis into the session
    ///
    /// Diagnostics are always replaced. Context and inference are replaced
    /// together, and only when the result carries a context; a missing
    /// inference next to a present context becomes [`NO_INFERENCE`].
    pub fn apply_analysis(&mut self, result: AnalysisResult) {
        self.diagnostics = result.errors;

        if let Some(context) = result.context {
            self.context = Some(context);
            self.inference = Some(
                result
                    .inference
                    .unwrap_or_else(|| NO_INFERENCE.to_string()),
            );
        }
    }

    /// Record a failed analysis call as a single diagnostic
    ///
    /// Context and inference are kept, matching a result without context.
    pub fn record_failure(&mut self, reason: impl std::fmt::Display) {
        self.diagnostics = vec![format!("analysis failed: {reason}")];
    }

    /// Text for the display surface
    ///
    /// Diagnostics (one per line), then context and inference when defined,
    /// separated by blank lines.
    pub fn render(&self) -> String {
        let mut sections = vec![self.diagnostics.join("\n")];
        sections.extend(self.context.iter().cloned());
        sections.extend(self.inference.iter().cloned());
        sections.join(SECTION_SEPARATOR)
    }
}
