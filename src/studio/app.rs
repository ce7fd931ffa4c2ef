//! Interactive studio application
//!
//! Editor pane on the left, results pane on the right, status bar on top.
//! Ctrl+R runs the analysis, Ctrl+O opens a source file, Ctrl+Q quits.

use super::{
    editor::{EditorState, EditorWidget, Movement, TextBuffer},
    prompt::{PathPrompt, PromptOutcome},
    results_panel::{ResultsPanel, ResultsPanelState},
};
use crate::{
    analysis::AnalysisBackend,
    config::StudioConfig,
    controller::{Applied, Controller, Phase, Ticket},
    loader::SourceReader,
    tui::{EventLoop, TerminalConfig, TerminalManager, TuiEvent},
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const HINTS: &str = "Ctrl+R: run | Ctrl+O: open | Ctrl+Z/Y: undo/redo | PgUp/PgDn: scroll results | Ctrl+Q: quit";

/// Lines moved per results-pane scroll step
const RESULTS_SCROLL_STEP: u16 = 5;

/// Application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppState {
    Running,
    Quitting,
}

/// The studio's terminal front end
pub struct StudioApp {
    config: StudioConfig,
    controller: Controller<TextBuffer, ResultsPanelState>,
    editor_state: EditorState,
    prompt: Option<PathPrompt>,
    current_file: Option<PathBuf>,
    state: AppState,
    status: String,
}

impl StudioApp {
    /// Create the app with an empty editor
    pub fn new(
        config: StudioConfig,
        backend: Arc<dyn AnalysisBackend>,
        reader: Arc<dyn SourceReader>,
    ) -> Self {
        let controller = Controller::new(
            TextBuffer::new(),
            ResultsPanelState::new(),
            backend,
            reader,
        )
        .with_policy(config.overlap);

        Self {
            config,
            controller,
            editor_state: EditorState::default(),
            prompt: None,
            current_file: None,
            state: AppState::Running,
            status: "Ready".to_string(),
        }
    }

    /// Underlying controller
    pub fn controller(&self) -> &Controller<TextBuffer, ResultsPanelState> {
        &self.controller
    }

    /// Status bar text
    pub fn status(&self) -> &str {
        &self.status
    }

    /// File shown in the editor, once a load has succeeded
    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    /// Whether the open-file prompt is showing
    pub fn is_prompting(&self) -> bool {
        self.prompt.is_some()
    }

    /// Whether the user asked to quit
    pub fn is_quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    /// Start loading a source file into the editor
    pub fn open_file(&mut self, path: PathBuf) -> Ticket {
        self.status = format!("Loading: {}", path.display());
        self.controller.load_source_from_file(path)
    }

    /// Send the current source to the backend
    pub fn run_analysis(&mut self) -> Ticket {
        self.status = "Analyzing…".to_string();
        self.controller.run()
    }

    /// Apply finished background work without blocking
    pub fn poll_completions(&mut self) {
        for applied in self.controller.poll() {
            self.note_completion(&applied);
        }
    }

    /// Wait for the next finished background operation and apply it
    pub async fn wait_for_completion(&mut self) -> Option<Applied> {
        let applied = self.controller.next_completion().await?;
        self.note_completion(&applied);
        Some(applied)
    }

    /// Run the terminal UI until the user quits
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = TerminalManager::new(TerminalConfig::default())?;
        let event_loop = EventLoop::new(self.config.tick_rate_ms);

        loop {
            self.render(&mut terminal)?;

            match event_loop.poll_event()? {
                TuiEvent::Quit => self.quit(),
                TuiEvent::Key(key) => self.handle_key(key),
                TuiEvent::Resize(_, _) | TuiEvent::Tick => {}
            }

            self.poll_completions();

            if self.is_quitting() {
                break;
            }

            tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        }

        Ok(())
    }

    /// Handle one key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(prompt) = self.prompt.as_mut() {
            match prompt.handle_key(key) {
                PromptOutcome::Pending => {}
                PromptOutcome::Cancelled => {
                    self.prompt = None;
                    self.status = "Open cancelled".to_string();
                }
                PromptOutcome::Submitted(path) => {
                    self.prompt = None;
                    self.open_file(path);
                }
            }
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let buffer = self.controller.editor_mut();
        let mut edited = false;

        match (key.code, ctrl) {
            (KeyCode::Char('q'), true) | (KeyCode::Char('c'), true) => self.quit(),
            (KeyCode::Char('r'), true) => {
                self.run_analysis();
            }
            (KeyCode::Char('o'), true) => {
                let initial = self
                    .current_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.prompt = Some(PathPrompt::new(initial));
            }
            (KeyCode::Char('z'), true) => edited = buffer.undo().is_some(),
            (KeyCode::Char('y'), true) => edited = buffer.redo().is_some(),
            (KeyCode::Char(c), false) => {
                buffer.insert(&c.to_string());
                edited = true;
            }
            (KeyCode::Tab, _) => {
                buffer.insert("    ");
                edited = true;
            }
            (KeyCode::Enter, _) => {
                buffer.insert("\n");
                edited = true;
            }
            (KeyCode::Backspace, _) => {
                buffer.backspace();
                edited = true;
            }
            (KeyCode::Delete, _) => {
                buffer.delete();
                edited = true;
            }
            (KeyCode::Left, _) => buffer.move_cursor(Movement::Left),
            (KeyCode::Right, _) => buffer.move_cursor(Movement::Right),
            (KeyCode::Up, _) => buffer.move_cursor(Movement::Up),
            (KeyCode::Down, _) => buffer.move_cursor(Movement::Down),
            (KeyCode::Home, true) => buffer.move_cursor(Movement::BufferStart),
            (KeyCode::End, true) => buffer.move_cursor(Movement::BufferEnd),
            (KeyCode::Home, false) => buffer.move_cursor(Movement::LineStart),
            (KeyCode::End, false) => buffer.move_cursor(Movement::LineEnd),
            (KeyCode::PageDown, _) => self.controller.display_mut().scroll_down(RESULTS_SCROLL_STEP),
            (KeyCode::PageUp, _) => self.controller.display_mut().scroll_up(RESULTS_SCROLL_STEP),
            _ => {}
        }

        if edited {
            let text = self.controller.editor().text();
            self.controller.set_source_from_editor(text);
        }
    }

    fn quit(&mut self) {
        self.controller.cancel_pending();
        self.state = AppState::Quitting;
    }

    fn note_completion(&mut self, applied: &Applied) {
        match applied {
            Applied::Analysis { succeeded: true, .. } => {
                let count = self.controller.session().diagnostics().len();
                self.status = format!("Analysis finished: {} diagnostics", count);
            }
            Applied::Analysis { succeeded: false, .. } => {
                self.status = "Analysis failed".to_string();
            }
            Applied::FileLoad {
                ticket,
                path,
                loaded,
            } => {
                if *loaded {
                    self.editor_state = EditorState::default();
                    self.status = format!("Loaded: {}", path.display());
                    self.current_file = Some(path.clone());
                } else {
                    debug!("Load #{} failed; buffer left empty", ticket);
                    self.status = "Ready".to_string();
                }
            }
        }
    }

    fn render(&mut self, terminal: &mut TerminalManager) -> Result<()> {
        let status = match self.controller.phase() {
            Phase::AwaitingAnalysis => format!(" {} (analyzing…)", self.status),
            Phase::Idle => format!(" {}", self.status),
        };
        let title = match &self.current_file {
            Some(path) => format!(" {} ", path.display()),
            None => " [untitled] ".to_string(),
        };

        let controller = &mut self.controller;
        let editor_state = &mut self.editor_state;
        let prompt = &self.prompt;

        terminal.terminal_mut().draw(|frame| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // Status
                    Constraint::Min(5),    // Panes
                    Constraint::Length(1), // Hints
                ])
                .split(frame.area());

            frame.render_widget(
                Paragraph::new(status).style(Style::default().fg(Color::White).bg(Color::DarkGray)),
                rows[0],
            );

            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(rows[1]);

            let editor = EditorWidget::new(controller.editor())
                .block(Block::default().borders(Borders::ALL).title(title))
                .focused(prompt.is_none());
            frame.render_stateful_widget(editor, panes[0], editor_state);

            frame.render_stateful_widget(
                ResultsPanel::new(" Results "),
                panes[1],
                controller.display_mut(),
            );

            frame.render_widget(
                Paragraph::new(HINTS).style(Style::default().fg(Color::DarkGray)),
                rows[2],
            );

            if let Some(prompt) = prompt {
                let area = frame.area();
                prompt.render(frame, area);
            }
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use crate::controller::OverlapPolicy;
    use crate::error::{Result as StudioResult, StudioError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend answering with the source length as inference
    struct EchoBackend {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AnalysisBackend for EchoBackend {
        async fn analyze(&self, source: &str) -> StudioResult<AnalysisResult> {
            self.calls.lock().unwrap().push(source.to_string());
            Ok(AnalysisResult::default()
                .context("ctx")
                .inference(source.len().to_string()))
        }
    }

    /// Reader serving one fixed file
    struct FixedReader;

    #[async_trait]
    impl SourceReader for FixedReader {
        async fn read_text(&self, path: &Path) -> StudioResult<String> {
            if path == Path::new("main.cl") {
                Ok("class Main {};".to_string())
            } else if path == Path::new("lib.cl") {
                Ok("class Lib {};".to_string())
            } else {
                Err(StudioError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no such file",
                )))
            }
        }
    }

    fn app() -> (StudioApp, Arc<EchoBackend>) {
        app_with(StudioConfig::default())
    }

    fn app_with(config: StudioConfig) -> (StudioApp, Arc<EchoBackend>) {
        let backend = Arc::new(EchoBackend {
            calls: Mutex::new(Vec::new()),
        });
        let app = StudioApp::new(config, backend.clone(), Arc::new(FixedReader));
        (app, backend)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[tokio::test]
    async fn test_typing_updates_source() {
        let (mut app, _) = app();
        for c in "x = 1".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Backspace));

        assert_eq!(app.controller().session().source_text(), "x = ");
    }

    #[tokio::test]
    async fn test_ctrl_r_runs_and_shows_results() {
        let (mut app, backend) = app();
        for c in "x = 1".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }

        app.handle_key(ctrl('r'));
        assert_eq!(app.controller().phase(), Phase::AwaitingAnalysis);

        let applied = app.wait_for_completion().await;
        assert!(matches!(applied, Some(Applied::Analysis { succeeded: true, .. })));
        assert_eq!(backend.calls.lock().unwrap().as_slice(), ["x = 1"]);
        assert_eq!(app.controller().display().text(), "\n\nctx\n\n5");
        assert_eq!(app.status(), "Analysis finished: 0 diagnostics");
    }

    #[tokio::test]
    async fn test_open_prompt_loads_file() {
        let (mut app, _) = app();
        app.handle_key(ctrl('o'));
        assert!(app.is_prompting());

        for c in "main.cl".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.is_prompting());
        assert_eq!(app.controller().session().source_text(), "");

        app.wait_for_completion().await;
        assert_eq!(app.controller().session().source_text(), "class Main {};");
        assert_eq!(app.controller().editor().text(), "class Main {};");
        assert_eq!(app.status(), "Loaded: main.cl");
    }

    #[tokio::test]
    async fn test_failed_load_leaves_buffer_empty() {
        let (mut app, _) = app();
        for c in "old".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }

        app.open_file(PathBuf::from("missing.cl"));
        let applied = app.wait_for_completion().await;

        assert!(matches!(applied, Some(Applied::FileLoad { loaded: false, .. })));
        assert_eq!(app.controller().session().source_text(), "");
        assert_eq!(app.status(), "Ready");
    }

    #[tokio::test]
    async fn test_superseded_load_reports_newest_file() {
        let config = StudioConfig {
            overlap: OverlapPolicy::CancelPrevious,
            ..StudioConfig::default()
        };
        let (mut app, _) = app_with(config);

        app.open_file(PathBuf::from("main.cl"));
        app.open_file(PathBuf::from("main.cl"));
        let newest = app.open_file(PathBuf::from("lib.cl"));

        let applied = app.wait_for_completion().await;
        assert_eq!(
            applied,
            Some(Applied::FileLoad {
                ticket: newest,
                path: PathBuf::from("lib.cl"),
                loaded: true,
            })
        );
        assert!(app.wait_for_completion().await.is_none());
        assert_eq!(app.status(), "Loaded: lib.cl");
        assert_eq!(app.current_file(), Some(Path::new("lib.cl")));
        assert_eq!(app.controller().editor().text(), "class Lib {};");
    }

    #[tokio::test]
    async fn test_escape_closes_prompt() {
        let (mut app, _) = app();
        app.handle_key(ctrl('o'));
        app.handle_key(key(KeyCode::Esc));

        assert!(!app.is_prompting());
        assert!(!app.controller().is_loading());
    }

    #[tokio::test]
    async fn test_quit_key() {
        let (mut app, _) = app();
        assert!(!app.is_quitting());
        app.handle_key(ctrl('q'));
        assert!(app.is_quitting());
    }
}
