//! Rope-backed source buffer with undo/redo
//!
//! Cursor columns count characters, not bytes.

use super::{Movement, Position};
use crate::surface::EditorSurface;
use ropey::Rope;

/// Undoable edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Character index where the edit happened
    pub position: usize,
    /// Text that was inserted (empty for deletions)
    pub inserted: String,
    /// Text that was removed (empty for insertions)
    pub deleted: String,
}

/// Editable source text
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    content: Rope,
    cursor: Position,
    dirty: bool,
    undo_stack: Vec<Edit>,
    redo_stack: Vec<Edit>,
}

impl TextBuffer {
    /// Empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole buffer as a string
    pub fn text(&self) -> String {
        self.content.to_string()
    }

    /// Cursor position
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Whether the buffer was edited since it was last replaced
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of lines (an empty buffer has one)
    pub fn line_count(&self) -> usize {
        self.content.len_lines()
    }

    /// Line `idx` without its line break
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx >= self.content.len_lines() {
            return None;
        }
        let line = self.content.line(idx).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Replace everything, resetting cursor and history
    pub fn replace(&mut self, text: &str) {
        self.content = Rope::from_str(text);
        self.cursor = Position::default();
        self.dirty = false;
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Insert text at the cursor and move past it
    pub fn insert(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let idx = self.cursor_char_idx();
        self.content.insert(idx, text);
        self.record(Edit {
            position: idx,
            inserted: text.to_string(),
            deleted: String::new(),
        });
        self.set_cursor_char_idx(idx + text.chars().count());
    }

    /// Delete the character before the cursor
    ///
    /// A `\r\n` pair is removed as one line break.
    pub fn backspace(&mut self) {
        let idx = self.cursor_char_idx();
        if idx == 0 {
            return;
        }
        let start = if idx >= 2 && self.is_crlf_at(idx - 2) {
            idx - 2
        } else {
            idx - 1
        };
        self.remove_range(start, idx);
        self.set_cursor_char_idx(start);
    }

    /// Delete the character under the cursor
    ///
    /// A `\r\n` pair is removed as one line break.
    pub fn delete(&mut self) {
        let idx = self.cursor_char_idx();
        if idx >= self.content.len_chars() {
            return;
        }
        let end = if self.is_crlf_at(idx) { idx + 2 } else { idx + 1 };
        self.remove_range(idx, end);
    }

    /// Revert the last edit
    pub fn undo(&mut self) -> Option<Edit> {
        let edit = self.undo_stack.pop()?;
        if !edit.inserted.is_empty() {
            let end = edit.position + edit.inserted.chars().count();
            self.content.remove(edit.position..end);
        }
        if !edit.deleted.is_empty() {
            self.content.insert(edit.position, &edit.deleted);
        }
        self.set_cursor_char_idx(edit.position + edit.deleted.chars().count());
        self.redo_stack.push(edit.clone());
        self.dirty = true;
        Some(edit)
    }

    /// Reapply the last undone edit
    pub fn redo(&mut self) -> Option<Edit> {
        let edit = self.redo_stack.pop()?;
        if !edit.deleted.is_empty() {
            let end = edit.position + edit.deleted.chars().count();
            self.content.remove(edit.position..end);
        }
        if !edit.inserted.is_empty() {
            self.content.insert(edit.position, &edit.inserted);
        }
        self.set_cursor_char_idx(edit.position + edit.inserted.chars().count());
        self.undo_stack.push(edit.clone());
        self.dirty = true;
        Some(edit)
    }

    /// Move the cursor
    pub fn move_cursor(&mut self, movement: Movement) {
        let Position { line, column } = self.cursor;
        let last_line = self.line_count().saturating_sub(1);

        self.cursor = match movement {
            Movement::Left if column > 0 => Position::new(line, column - 1),
            Movement::Left if line > 0 => Position::new(line - 1, self.line_len(line - 1)),
            Movement::Left => self.cursor,
            Movement::Right if column < self.line_len(line) => Position::new(line, column + 1),
            Movement::Right if line < last_line => Position::new(line + 1, 0),
            Movement::Right => self.cursor,
            Movement::Up if line > 0 => Position::new(line - 1, column.min(self.line_len(line - 1))),
            Movement::Up => self.cursor,
            Movement::Down if line < last_line => {
                Position::new(line + 1, column.min(self.line_len(line + 1)))
            }
            Movement::Down => self.cursor,
            Movement::LineStart => Position::new(line, 0),
            Movement::LineEnd => Position::new(line, self.line_len(line)),
            Movement::BufferStart => Position::default(),
            Movement::BufferEnd => Position::new(last_line, self.line_len(last_line)),
        };
    }

    fn remove_range(&mut self, start: usize, end: usize) {
        let deleted = self.content.slice(start..end).to_string();
        self.content.remove(start..end);
        self.record(Edit {
            position: start,
            inserted: String::new(),
            deleted,
        });
    }

    /// Whether a `\r\n` pair starts at char index `idx`
    fn is_crlf_at(&self, idx: usize) -> bool {
        idx + 1 < self.content.len_chars()
            && self.content.char(idx) == '\r'
            && self.content.char(idx + 1) == '\n'
    }

    fn record(&mut self, edit: Edit) {
        self.undo_stack.push(edit);
        self.redo_stack.clear();
        self.dirty = true;
    }

    fn line_len(&self, line: usize) -> usize {
        self.line(line).map(|l| l.chars().count()).unwrap_or(0)
    }

    fn cursor_char_idx(&self) -> usize {
        let line = self.cursor.line.min(self.line_count().saturating_sub(1));
        let column = self.cursor.column.min(self.line_len(line));
        self.content.line_to_char(line) + column
    }

    fn set_cursor_char_idx(&mut self, idx: usize) {
        let idx = idx.min(self.content.len_chars());
        let line = self.content.char_to_line(idx);
        self.cursor = Position::new(line, idx - self.content.line_to_char(line));
    }
}

impl EditorSurface for TextBuffer {
    fn text(&self) -> String {
        TextBuffer::text(self)
    }

    fn set_text(&mut self, text: &str) {
        self.replace(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_newlines() {
        let mut buffer = TextBuffer::new();
        buffer.insert("class Main {\n");
        buffer.insert("};");

        assert_eq!(buffer.text(), "class Main {\n};");
        assert_eq!(buffer.cursor(), Position::new(1, 2));
        assert_eq!(buffer.line_count(), 2);
        assert!(buffer.is_dirty());
    }

    #[test]
    fn test_multibyte_columns() {
        let mut buffer = TextBuffer::new();
        buffer.insert("λx");
        assert_eq!(buffer.cursor(), Position::new(0, 2));

        buffer.move_cursor(Movement::Left);
        buffer.insert("é");
        assert_eq!(buffer.text(), "λéx");
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut buffer = TextBuffer::new();
        buffer.insert("a\nb");
        buffer.move_cursor(Movement::LineStart);
        buffer.backspace();

        assert_eq!(buffer.text(), "ab");
        assert_eq!(buffer.cursor(), Position::new(0, 1));
    }

    #[test]
    fn test_crlf_break_removed_as_one() {
        let mut buffer = TextBuffer::new();
        buffer.replace("ab\r\ncd");
        buffer.move_cursor(Movement::Down);
        buffer.move_cursor(Movement::LineStart);
        buffer.backspace();

        assert_eq!(buffer.text(), "abcd");
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.cursor(), Position::new(0, 2));

        buffer.undo();
        assert_eq!(buffer.text(), "ab\r\ncd");
        assert_eq!(buffer.cursor(), Position::new(1, 0));

        buffer.move_cursor(Movement::Up);
        buffer.move_cursor(Movement::LineEnd);
        buffer.delete();
        assert_eq!(buffer.text(), "abcd");
        assert_eq!(buffer.cursor(), Position::new(0, 2));
    }

    #[test]
    fn test_lone_carriage_return_is_one_char() {
        let mut buffer = TextBuffer::new();
        buffer.replace("a\rb");
        buffer.move_cursor(Movement::BufferEnd);
        buffer.backspace();
        buffer.backspace();

        assert_eq!(buffer.text(), "a");
    }

    #[test]
    fn test_delete_under_cursor() {
        let mut buffer = TextBuffer::new();
        buffer.insert("abc");
        buffer.move_cursor(Movement::BufferStart);
        buffer.delete();
        assert_eq!(buffer.text(), "bc");

        buffer.move_cursor(Movement::BufferEnd);
        buffer.delete();
        assert_eq!(buffer.text(), "bc");
    }

    #[test]
    fn test_undo_redo() {
        let mut buffer = TextBuffer::new();
        buffer.insert("Hello");
        buffer.insert(" World");
        buffer.backspace();

        assert_eq!(buffer.text(), "Hello Worl");

        buffer.undo();
        assert_eq!(buffer.text(), "Hello World");
        buffer.undo();
        assert_eq!(buffer.text(), "Hello");

        buffer.redo();
        assert_eq!(buffer.text(), "Hello World");
        assert_eq!(buffer.cursor(), Position::new(0, 11));
    }

    #[test]
    fn test_cursor_movement() {
        let mut buffer = TextBuffer::new();
        buffer.insert("Line 1\nLn 2\nLine 3");
        buffer.move_cursor(Movement::BufferStart);

        buffer.move_cursor(Movement::LineEnd);
        assert_eq!(buffer.cursor(), Position::new(0, 6));

        // Column clamps to the shorter line
        buffer.move_cursor(Movement::Down);
        assert_eq!(buffer.cursor(), Position::new(1, 4));

        buffer.move_cursor(Movement::Right);
        assert_eq!(buffer.cursor(), Position::new(2, 0));

        buffer.move_cursor(Movement::Left);
        assert_eq!(buffer.cursor(), Position::new(1, 4));
    }

    #[test]
    fn test_replace_resets_state() {
        let mut buffer = TextBuffer::new();
        buffer.insert("old");

        EditorSurface::set_text(&mut buffer, "new\ntext");

        assert_eq!(EditorSurface::text(&buffer), "new\ntext");
        assert_eq!(buffer.cursor(), Position::default());
        assert!(!buffer.is_dirty());
        assert!(buffer.undo().is_none());
    }
}
