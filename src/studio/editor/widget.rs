//! Editor pane rendering
//!
//! Line-number gutter, scrolled content and an inverted-cell cursor.

use super::TextBuffer;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, StatefulWidget, Widget},
};

/// Scroll state of the editor pane
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    /// First visible line
    pub scroll_offset: usize,
    /// First visible column
    pub h_scroll_offset: usize,
}

impl EditorState {
    /// Scroll so the cursor stays inside a `height` x `width` viewport
    pub fn ensure_cursor_visible(&mut self, line: usize, column: usize, height: usize, width: usize) {
        if height > 0 {
            if line >= self.scroll_offset + height {
                self.scroll_offset = line + 1 - height;
            }
            if line < self.scroll_offset {
                self.scroll_offset = line;
            }
        }
        if width > 0 {
            if column >= self.h_scroll_offset + width {
                self.h_scroll_offset = column + 1 - width;
            }
            if column < self.h_scroll_offset {
                self.h_scroll_offset = column;
            }
        }
    }
}

/// Editor pane widget
pub struct EditorWidget<'a> {
    buffer: &'a TextBuffer,
    block: Option<Block<'a>>,
    focused: bool,
}

impl<'a> EditorWidget<'a> {
    /// Widget over `buffer`
    pub fn new(buffer: &'a TextBuffer) -> Self {
        Self {
            buffer,
            block: None,
            focused: false,
        }
    }

    /// Surround with a block
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Draw the cursor
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn gutter_width(&self) -> u16 {
        let digits = self.buffer.line_count().max(1).ilog10() as u16 + 1;
        digits.max(3) + 1
    }
}

impl<'a> StatefulWidget for EditorWidget<'a> {
    type State = EditorState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        let gutter = self.gutter_width().min(inner.width);
        let content = Rect {
            x: inner.x + gutter,
            width: inner.width - gutter,
            ..inner
        };

        let cursor = self.buffer.cursor();
        state.ensure_cursor_visible(
            cursor.line,
            cursor.column,
            content.height as usize,
            content.width as usize,
        );

        for row in 0..inner.height {
            let line_idx = state.scroll_offset + row as usize;
            let Some(text) = self.buffer.line(line_idx) else {
                break;
            };
            let y = inner.y + row;
            let on_cursor_line = line_idx == cursor.line;

            let number_style = if on_cursor_line && self.focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let number = format!("{:>width$} ", line_idx + 1, width = gutter.saturating_sub(1) as usize);
            buf.set_stringn(inner.x, y, number, gutter as usize, number_style);

            let visible: String = text
                .chars()
                .skip(state.h_scroll_offset)
                .take(content.width as usize)
                .collect();
            buf.set_string(content.x, y, &visible, Style::default());

            if on_cursor_line && self.focused && cursor.column >= state.h_scroll_offset {
                let offset = cursor.column - state.h_scroll_offset;
                if offset < content.width as usize {
                    if let Some(cell) = buf.cell_mut((content.x + offset as u16, y)) {
                        cell.set_style(Style::default().add_modifier(Modifier::REVERSED));
                    }
                }
            }
        }
    }
}
