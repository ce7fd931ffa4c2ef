//! Results pane
//!
//! Shows the latest rendered session (diagnostics, context, inference).
//! Implements [`DisplaySurface`] so the controller can write to it directly.

use crate::surface::DisplaySurface;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget, Wrap},
};

/// Contents and scroll position of the results pane
#[derive(Debug, Clone, Default)]
pub struct ResultsPanelState {
    text: String,
    scroll: u16,
    refreshes: usize,
}

impl ResultsPanelState {
    /// Empty pane
    pub fn new() -> Self {
        Self::default()
    }

    /// Text currently shown
    pub fn text(&self) -> &str {
        &self.text
    }

    /// How many times results were shown
    pub fn refreshes(&self) -> usize {
        self.refreshes
    }

    /// First visible line
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Scroll down by `lines`, stopping at the last line
    pub fn scroll_down(&mut self, lines: u16) {
        let last = self.text.lines().count().saturating_sub(1);
        let last = u16::try_from(last).unwrap_or(u16::MAX);
        self.scroll = self.scroll.saturating_add(lines).min(last);
    }

    /// Scroll up by `lines`
    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }
}

impl DisplaySurface for ResultsPanelState {
    fn show(&mut self, rendered: &str) {
        self.text = rendered.to_string();
        self.scroll = 0;
        self.refreshes += 1;
    }
}

/// Results pane widget
pub struct ResultsPanel<'a> {
    title: &'a str,
}

impl<'a> ResultsPanel<'a> {
    /// Pane with the given block title
    pub fn new(title: &'a str) -> Self {
        Self { title }
    }
}

impl<'a> StatefulWidget for ResultsPanel<'a> {
    type State = ResultsPanelState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title)
            .style(Style::default().fg(Color::Rgb(180, 180, 200)));

        let body = if state.refreshes == 0 {
            Paragraph::new("Ctrl+R to run analysis")
                .style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(state.text.as_str()).style(Style::default().fg(Color::White))
        };

        body.block(block)
            .wrap(Wrap { trim: false })
            .scroll((state.scroll, 0))
            .render(area, buf);
    }
}
