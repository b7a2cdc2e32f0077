//! TCP transport helpers
//!
//! The connection is driven by readiness: the session says which direction
//! it wants, the event loop waits for that readiness and then performs one
//! non-blocking read or write through [`StreamIo`].

pub mod stream;

pub use stream::StreamIo;

use tokio::io::Interest;
use tokio::net::TcpStream;

use crate::{CoreError, Result};

/// Readiness the connection is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Waiting for response bytes
    Read,
    /// Outbound bytes are queued
    Write,
}

impl Direction {
    /// Tokio readiness interest for this direction
    pub fn interest(self) -> Interest {
        match self {
            Direction::Read => Interest::READABLE,
            Direction::Write => Interest::WRITABLE,
        }
    }
}

/// Resolve `host` and connect to the first address that accepts
pub async fn connect(host: &str, port: u16) -> Result<TcpStream> {
    tracing::debug!("Connecting to {}:{}", host, port);
    let stream = TcpStream::connect((host, port))
        .await
        .map_err(CoreError::Socket)?;
    if let Ok(peer) = stream.peer_addr() {
        tracing::info!("Connected to {}", peer);
    }
    Ok(stream)
}
