//! Cursor position and movement

/// Position in a text buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column in characters (0-indexed)
    pub column: usize,
}

impl Position {
    /// Position at `line`, `column`
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Cursor movement commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// One character left, wrapping to the previous line
    Left,
    /// One character right, wrapping to the next line
    Right,
    /// One line up
    Up,
    /// One line down
    Down,
    /// Start of line
    LineStart,
    /// End of line
    LineEnd,
    /// Start of buffer
    BufferStart,
    /// End of buffer
    BufferEnd,
}
