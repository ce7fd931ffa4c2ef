//! Terminal plumbing shared by the studio UI
//!
//! - Terminal setup and restoration
//! - Event polling

mod events;
mod terminal;

pub use events::{classify_key, EventLoop, TuiEvent};
pub use terminal::{TerminalConfig, TerminalManager};
