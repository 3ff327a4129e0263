//! Conversation model and the reply reveal animation.

mod message;
pub mod reveal;

pub use message::{Message, MessageId, Role};
pub use reveal::{RevealEnd, RevealSchedule, reveal_prefixes, run_reveal};
