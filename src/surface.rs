//! Input and output surfaces
//!
//! The controller never touches a concrete widget. It reads and mirrors the
//! editor through [`EditorSurface`] and publishes rendered results through
//! [`DisplaySurface`]. The terminal UI implements both on its panes; the
//! in-memory versions here back headless mode and tests.

use std::io::{self, Write};
use tracing::warn;

/// Where the user edits source text
pub trait EditorSurface {
    /// Text currently visible in the editor
    fn text(&self) -> String;

    /// Replace the editor contents
    fn set_text(&mut self, text: &str);
}

/// Where rendered analysis results are shown
pub trait DisplaySurface {
    /// Show a freshly rendered session
    fn show(&mut self, rendered: &str);
}

/// Editor surface backed by a plain string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryEditor {
    text: String,
}

impl MemoryEditor {
    /// Editor pre-filled with `text`
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl EditorSurface for MemoryEditor {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

/// Display surface that keeps every rendering it was shown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDisplay {
    history: Vec<String>,
}

impl MemoryDisplay {
    /// Most recent rendering, if any
    pub fn latest(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    /// All renderings in the order they were shown
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl DisplaySurface for MemoryDisplay {
    fn show(&mut self, rendered: &str) {
        self.history.push(rendered.to_string());
    }
}

/// Display surface printing each rendering to stdout
#[derive(Debug, Default)]
pub struct StdoutDisplay;

impl DisplaySurface for StdoutDisplay {
    fn show(&mut self, rendered: &str) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{rendered}").and_then(|_| stdout.flush()) {
            warn!("Failed to write results to stdout: {}", e);
        }
    }
}
