//! Folkchat Core - protocol engine for the folkchat terminal client
//!
//! This crate provides:
//! - Fixed-capacity framed buffers and CRLF line framing
//! - Request codec and the request/response state machine
//! - The per-connection session and its readiness-driven event loop
//! - Terminal collaborator traits
//! - Error types

// Wire limits
pub const TIMESTAMP_LENGTH: usize = 10;
pub const MAX_NICK_LENGTH: usize = 20;
pub const MAX_MESSAGE_LENGTH: usize = 140;
/// Longest frame the server may send, delimiter included
pub const MAX_FRAME_LENGTH: usize = TIMESTAMP_LENGTH + MAX_NICK_LENGTH + MAX_MESSAGE_LENGTH + 3;

/// Requests accepted while another one is outstanding
pub const BACKLOG_CAPACITY: usize = 16;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;
pub const DEFAULT_HISTORY_LENGTH: usize = 50;

pub mod config;
pub mod error;
pub mod event_loop;
pub mod protocol;
pub mod session;
pub mod terminal;
pub mod transport;
pub mod types;

// Re-export common types
pub use config::ClientConfig;
pub use error::{CoreError, Result};
pub use event_loop::run;
pub use protocol::{FramedBuffer, Lines, RequestCodec, ResponseMachine, ResponseState};
pub use session::Session;
pub use terminal::{Console, InputEvent, MockConsole, Terminal};
pub use transport::{connect, Direction};
pub use types::{ChatEvent, Request, RequestKind};
