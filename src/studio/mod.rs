//! Interactive studio
//!
//! Terminal front end around the [`Controller`](crate::controller::Controller):
//! - Editor pane bound to the session source
//! - Results pane receiving rendered analysis output
//! - Open-file prompt standing in for a file chooser

mod app;
pub mod editor;
pub mod prompt;
pub mod results_panel;

pub use app::StudioApp;
pub use editor::{EditorState, EditorWidget, TextBuffer};
pub use prompt::{PathPrompt, PromptOutcome};
pub use results_panel::{ResultsPanel, ResultsPanelState};
