//! Per-connection protocol state
//!
//! A [`Session`] owns both framed buffers, the response state machine, the
//! desired socket direction and the backlog of requests typed while another
//! one was outstanding. It performs no I/O of its own: the event loop hands
//! it a ready reader or writer.

use std::collections::VecDeque;
use std::io::{self, Read, Write};

use tracing::{debug, warn};

use crate::error::{CoreError, Result};
use crate::protocol::{FramedBuffer, Lines, RequestCodec, ResponseMachine, ResponseState};
use crate::terminal::Terminal;
use crate::transport::Direction;
use crate::types::{parse_command, Request};
use crate::BACKLOG_CAPACITY;

/// Protocol state of the single server connection
#[derive(Debug)]
pub struct Session {
    inbound: FramedBuffer,
    outbound: FramedBuffer,
    machine: ResponseMachine,
    direction: Direction,
    backlog: VecDeque<Request>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            inbound: FramedBuffer::new(),
            outbound: FramedBuffer::new(),
            machine: ResponseMachine::new(),
            direction: Direction::Read,
            backlog: VecDeque::new(),
        }
    }

    /// Readiness the socket should be polled for
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> ResponseState {
        self.machine.state()
    }

    /// Requests waiting behind the outstanding one
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    /// Bytes queued for the socket
    #[cfg(test)]
    fn unsent(&self) -> &[u8] {
        self.outbound.filled()
    }

    /// A request is being sent or answered
    pub fn is_busy(&self) -> bool {
        !self.machine.is_idle() || !self.outbound.is_empty()
    }

    /// Dispatch a line committed by the user
    ///
    /// Empty lines are ignored. Invalid input comes back as a non-fatal
    /// error and leaves the session untouched.
    pub fn submit(&mut self, line: &str) -> Result<()> {
        let request = match parse_command(line) {
            Ok(Some(request)) => request,
            Ok(None) => return Ok(()),
            Err(e) => {
                warn!("Rejected input: {}", e);
                return Err(e);
            }
        };
        if !self.is_busy() && self.backlog.is_empty() {
            return self.send(request);
        }
        if self.backlog.len() >= BACKLOG_CAPACITY {
            warn!("Backlog full, dropping {:?}", request.kind());
            return Err(CoreError::Backlogged {
                max: BACKLOG_CAPACITY,
            });
        }
        debug!("Deferring {:?} until {:?} completes", request.kind(), self.state());
        self.backlog.push_back(request);
        Ok(())
    }

    /// Poll for new messages if the connection is otherwise quiet
    ///
    /// Returns whether a poll request was issued.
    pub fn on_idle(&mut self) -> Result<bool> {
        if self.is_busy() || !self.backlog.is_empty() {
            return Ok(false);
        }
        self.send(Request::PollNew)?;
        Ok(true)
    }

    /// Flush queued request bytes once the socket is writable
    ///
    /// A short or blocked write keeps the rest for the next writable event.
    pub fn on_writable<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<usize> {
        let n = match self.outbound.drain_into(sink) {
            Ok(n) => n,
            Err(e) if is_transient(&e) => return Ok(0),
            Err(e) => return Err(CoreError::Socket(e)),
        };
        debug!("Sent {} bytes, {} still queued", n, self.outbound.len());
        if self.outbound.is_empty() {
            self.direction = Direction::Read;
        }
        Ok(n)
    }

    /// Read response bytes once the socket is readable and render every
    /// complete line
    pub fn on_readable<R, T>(&mut self, source: &mut R, terminal: &mut T) -> Result<usize>
    where
        R: Read + ?Sized,
        T: Terminal + ?Sized,
    {
        let n = match self.inbound.fill_from(source) {
            Ok(0) => return Err(CoreError::ConnectionClosed),
            Ok(n) => n,
            Err(e) if is_transient(&e) => return Ok(0),
            Err(e) => return Err(CoreError::Socket(e)),
        };

        let mut completed = false;
        let mut lines = Lines::new(&self.inbound);
        for line in lines.by_ref() {
            let step = self.machine.on_line(line?)?;
            if let Some(event) = step.event {
                terminal.print(&event).map_err(CoreError::Terminal)?;
            }
            completed |= step.complete;
        }
        let consumed = lines.consumed();
        self.inbound.consume_prefix(consumed);

        if completed && self.machine.is_idle() {
            if let Some(next) = self.backlog.pop_front() {
                self.send(next)?;
            }
        }
        Ok(n)
    }

    fn send(&mut self, request: Request) -> Result<()> {
        let kind = request.kind();
        self.machine.begin(kind)?;
        let n = RequestCodec::encode_into(&request, &mut self.outbound)?;
        self.direction = Direction::Write;
        debug!("Queued {:?} request ({} bytes)", kind, n);
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}
