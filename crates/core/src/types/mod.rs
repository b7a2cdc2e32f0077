//! Domain types for the chat protocol

mod command;
mod event;
mod request;

pub use command::{parse as parse_command, FOLKS_COMMAND, NICK_COMMAND};
pub use event::ChatEvent;
pub use request::{Request, RequestKind};
