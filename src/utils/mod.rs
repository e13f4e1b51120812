pub mod ansi;
pub mod format;

pub use ansi::strip_ansi;
pub use format::{DEFAULT_MESSAGE_FORMAT, render_message, select_format};
