//! Chat-specific terminal views: header, message list, composer.

mod header;
mod input_area;
mod message_list;

pub use header::render_header;
pub use input_area::{Command, Composer, HELP_TEXT, parse_command};
pub use message_list::{SUGGESTIONS, render_message, render_thinking, render_welcome};
