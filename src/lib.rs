//! analysis-studio - Edit, run and inspect a source-code analysis backend
//!
//! A terminal studio around an external analyzer (type checker, type
//! inferencer, ...):
//! - Edit source text in the editor pane or load it from a file
//! - Send it to the backend on demand
//! - Show the returned diagnostics, context and inferred types
//!
//! # Architecture
//!
//! - **Controller**: owns the session state and mediates every input
//! - **Session**: source text plus the fields of the last analysis
//! - **Analysis**: result record, backend trait and HTTP transport
//! - **Surfaces**: the editor/display capabilities injected into the controller
//! - **Studio**: the ratatui front end
//!
//! # Example
//!
//! ```ignore
//! use analysis_studio::{Controller, FsSourceReader, HttpAnalysisBackend, MemoryDisplay, MemoryEditor};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = HttpAnalysisBackend::new("http://127.0.0.1:8000/analyze", None)?;
//!     let mut controller = Controller::new(
//!         MemoryEditor::default(),
//!         MemoryDisplay::default(),
//!         Arc::new(backend),
//!         Arc::new(FsSourceReader),
//!     );
//!
//!     controller.set_source_from_editor("class Main { main() : Int { 0 }; };");
//!     controller.run_to_completion().await;
//!     println!("{}", controller.session().render());
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod controller;
pub mod error;
pub mod loader;
pub mod session;
pub mod studio;
pub mod surface;
pub mod tui;

// Re-export commonly used types
pub use analysis::{AnalysisBackend, AnalysisResult, HttpAnalysisBackend};
pub use config::{BackendConfig, StudioConfig};
pub use controller::{Applied, Controller, OverlapPolicy, Phase, Ticket};
pub use error::{Result, StudioError};
pub use loader::{FsSourceReader, SourceReader};
pub use session::{SessionState, NO_INFERENCE};
pub use studio::StudioApp;
pub use surface::{DisplaySurface, EditorSurface, MemoryDisplay, MemoryEditor, StdoutDisplay};
