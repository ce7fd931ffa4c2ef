//! Source editor pane

mod buffer;
mod cursor;
mod widget;

pub use buffer::{Edit, TextBuffer};
pub use cursor::{Movement, Position};
pub use widget::{EditorState, EditorWidget};
