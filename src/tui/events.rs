//! Terminal event polling

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Events the studio reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    /// Key press
    Key(KeyEvent),

    /// Window resize
    Resize(u16, u16),

    /// Poll interval elapsed without input
    Tick,

    /// Quit shortcut pressed
    Quit,
}

/// Polls crossterm for input with a fixed tick
pub struct EventLoop {
    tick_rate: Duration,
}

impl EventLoop {
    /// Poll loop waiting at most `tick_rate_ms` per call
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Wait for the next event, or a tick if none arrives in time
    pub fn poll_event(&self) -> Result<TuiEvent> {
        if !event::poll(self.tick_rate)? {
            return Ok(TuiEvent::Tick);
        }

        Ok(match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => classify_key(key),
            Event::Resize(w, h) => TuiEvent::Resize(w, h),
            _ => TuiEvent::Tick,
        })
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TICK_RATE_MS)
    }
}

/// Map quit shortcuts (Ctrl+C, Ctrl+Q) to [`TuiEvent::Quit`]
pub fn classify_key(key: KeyEvent) -> TuiEvent {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), KeyModifiers::CONTROL) => {
            TuiEvent::Quit
        }
        _ => TuiEvent::Key(key),
    }
}
