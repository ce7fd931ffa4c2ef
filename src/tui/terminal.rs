//! Terminal setup and restoration

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};

/// Terminal modes to enter for the session
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Capture mouse events
    pub mouse_capture: bool,

    /// Draw on the alternate screen so the shell is restored on exit
    pub alternate_screen: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            mouse_capture: false,
            alternate_screen: true,
        }
    }
}

/// Owns the ratatui terminal and undoes terminal modes on drop
pub struct TerminalManager {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    config: TerminalConfig,
}

impl TerminalManager {
    /// Enter raw mode and the configured screen modes
    pub fn new(config: TerminalConfig) -> Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        if config.mouse_capture {
            execute!(stdout, EnableMouseCapture)?;
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal, config })
    }

    /// Terminal to draw frames on
    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalManager {
    fn drop(&mut self) {
        let _ = disable_raw_mode();

        if self.config.mouse_capture {
            let _ = execute!(io::stdout(), DisableMouseCapture);
        }
        if self.config.alternate_screen {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
        let _ = self.terminal.show_cursor();
    }
}
