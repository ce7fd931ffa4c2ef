//! Open-file prompt
//!
//! A one-line modal input asking for the path of a source file.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::path::PathBuf;

/// Result of feeding a key to the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Still editing
    Pending,
    /// Enter pressed on a non-empty path
    Submitted(PathBuf),
    /// Esc pressed
    Cancelled,
}

/// Path entry dialog
#[derive(Debug, Clone, Default)]
pub struct PathPrompt {
    input: String,
    cursor: usize,
}

impl PathPrompt {
    /// Prompt pre-filled with `initial`
    pub fn new(initial: impl Into<String>) -> Self {
        let input = initial.into();
        let cursor = input.chars().count();
        Self { input, cursor }
    }

    /// Current input
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Feed one key press
    pub fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        match key.code {
            KeyCode::Esc => return PromptOutcome::Cancelled,
            KeyCode::Enter => {
                let path = self.input.trim();
                if !path.is_empty() {
                    return PromptOutcome::Submitted(PathBuf::from(path));
                }
            }
            KeyCode::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.input.insert(at, c);
                self.cursor += 1;
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_offset(self.cursor);
                self.input.remove(at);
            }
            KeyCode::Delete if self.cursor < self.input.chars().count() => {
                let at = self.byte_offset(self.cursor);
                self.input.remove(at);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.input.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            _ => {}
        }
        PromptOutcome::Pending
    }

    /// Draw centered over `area`
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = area.width.min(70);
        let height = area.height.min(4);
        let dialog = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .title(" Open source file ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .style(Style::default().bg(Color::Black));
        let inner = block.inner(dialog);

        let lines = vec![
            Line::from(Span::raw(self.input.as_str())),
            Line::from(Span::styled(
                "Enter: open | Esc: cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), dialog);

        let cursor_x = inner.x.saturating_add(self.cursor as u16);
        if cursor_x < inner.x + inner.width {
            frame.set_cursor_position((cursor_x, inner.y));
        }
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }
}
