//! Text codec for the chat wire protocol
//!
//! Requests are single CRLF-terminated lines. A response starts with a count
//! line: plain decimal digits, no sign, within `0..=i32::MAX`.

use super::buffer::FramedBuffer;
use super::framer::DELIMITER;
use crate::error::{CoreError, Result};
use crate::types::Request;

/// Codec for requests and count lines
pub struct RequestCodec;

impl RequestCodec {
    /// Encode request to its wire line, delimiter included
    pub fn encode(request: &Request) -> Vec<u8> {
        let mut line = match request {
            Request::ListParticipants => b"folks".to_vec(),
            Request::PollNew => b"new".to_vec(),
            Request::ChangeNick(nick) => format!("my name is {}", nick).into_bytes(),
            Request::SendMessage(text) => format!("send {}", text).into_bytes(),
        };
        line.extend_from_slice(DELIMITER);
        line
    }

    /// Queue the encoded request into an outbound buffer
    ///
    /// The whole line must fit; nothing is appended otherwise.
    pub fn encode_into(request: &Request, buffer: &mut FramedBuffer) -> Result<usize> {
        let line = Self::encode(request);
        if line.len() > buffer.remaining() {
            return Err(CoreError::InvalidState(format!(
                "outbound buffer has {} free bytes, request needs {}",
                buffer.remaining(),
                line.len()
            )));
        }
        Ok(buffer.append(&line))
    }

    /// Decode the count line opening a response
    pub fn decode_count(line: &[u8]) -> Result<u32> {
        let malformed = || CoreError::MalformedCount(String::from_utf8_lossy(line).into_owned());

        if line.is_empty() || !line.iter().all(u8::is_ascii_digit) {
            return Err(malformed());
        }
        // Digits only, so the text is ASCII
        let text = std::str::from_utf8(line).map_err(|_| malformed())?;
        let count: u32 = text.parse().map_err(|_| malformed())?;
        if count > i32::MAX as u32 {
            return Err(malformed());
        }
        Ok(count)
    }
}
