//! Request/response state machine
//!
//! Every request is answered by a count line followed by payload lines.
//! Completion is checked against the index of the line just consumed, so a
//! count of `n` is followed by `n + 1` payload lines. Servers speaking this
//! protocol rely on that, keep it.

use tracing::{debug, trace};

use super::codec::RequestCodec;
use crate::error::{CoreError, Result};
use crate::types::{ChatEvent, RequestKind};

/// Where the outstanding response stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
    /// No request outstanding
    Idle,
    /// Request sent, count line not received yet
    AwaitingCount { kind: RequestKind },
    /// Count known, consuming payload lines
    ReceivingItems {
        kind: RequestKind,
        expected: u32,
        seen: u32,
    },
}

/// Result of feeding one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Output produced by the line, if any
    pub event: Option<ChatEvent>,
    /// The response is finished and the machine is idle again
    pub complete: bool,
}

/// Owner of the single outstanding-request slot
#[derive(Debug)]
pub struct ResponseMachine {
    state: ResponseState,
}

impl ResponseMachine {
    pub fn new() -> Self {
        Self {
            state: ResponseState::Idle,
        }
    }

    pub fn state(&self) -> ResponseState {
        self.state
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.state == ResponseState::Idle
    }

    /// Start waiting for the response to a request of `kind`
    pub fn begin(&mut self, kind: RequestKind) -> Result<()> {
        if !self.is_idle() {
            return Err(CoreError::InvalidState(format!(
                "cannot send {:?} while {:?}",
                kind, self.state
            )));
        }
        self.state = ResponseState::AwaitingCount { kind };
        Ok(())
    }

    /// Interpret one framed line of the response
    pub fn on_line(&mut self, line: &[u8]) -> Result<Step> {
        match self.state {
            ResponseState::Idle => Err(CoreError::UnexpectedData(
                String::from_utf8_lossy(line).into_owned(),
            )),
            ResponseState::AwaitingCount { kind } => {
                let expected = RequestCodec::decode_count(line)?;
                debug!("Response to {:?} announces {} items", kind, expected);
                self.state = ResponseState::ReceivingItems {
                    kind,
                    expected,
                    seen: 0,
                };
                let event = (kind == RequestKind::ListParticipants)
                    .then_some(ChatEvent::ParticipantsHeader);
                Ok(Step {
                    event,
                    complete: false,
                })
            }
            ResponseState::ReceivingItems {
                kind,
                expected,
                seen,
            } => {
                let event = match kind {
                    RequestKind::ListParticipants => ChatEvent::participant(seen, line),
                    _ => ChatEvent::message(line),
                };
                let complete = seen == expected;
                if complete {
                    trace!("Response to {:?} complete after {} items", kind, seen + 1);
                    self.state = ResponseState::Idle;
                } else {
                    self.state = ResponseState::ReceivingItems {
                        kind,
                        expected,
                        seen: seen + 1,
                    };
                }
                Ok(Step {
                    event: Some(event),
                    complete,
                })
            }
        }
    }
}

impl Default for ResponseMachine {
    fn default() -> Self {
        Self::new()
    }
}
