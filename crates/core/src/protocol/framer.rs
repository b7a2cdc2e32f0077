//! CRLF line framing over a [`FramedBuffer`]
//!
//! Lines borrow from the buffer. After the pass the caller drops the consumed
//! prefix in one go:
//!
//! ```ignore
//! let mut lines = Lines::new(&inbound);
//! while let Some(line) = lines.next() {
//!     handle(line?);
//! }
//! let consumed = lines.consumed();
//! inbound.consume_prefix(consumed);
//! ```

use super::buffer::FramedBuffer;
use crate::error::{CoreError, Result};
use crate::MAX_FRAME_LENGTH;

/// Frame delimiter
pub const DELIMITER: &[u8; 2] = b"\r\n";

/// Lazy sequence of complete lines buffered so far
pub struct Lines<'a> {
    data: &'a [u8],
    full: bool,
    consumed: usize,
    done: bool,
}

impl<'a> Lines<'a> {
    pub fn new(buffer: &'a FramedBuffer) -> Self {
        Self {
            data: buffer.filled(),
            full: buffer.is_full(),
            consumed: 0,
            done: false,
        }
    }

    /// Bytes covered by the lines yielded so far, delimiters included
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Result<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let data: &'a [u8] = self.data;
        let rest = &data[self.consumed..];
        match find_delimiter(rest) {
            Some(k) => {
                self.consumed += k + DELIMITER.len();
                Some(Ok(&rest[..k]))
            }
            None => {
                self.done = true;
                // A full buffer that yielded nothing can never produce a line
                if self.full && self.consumed == 0 {
                    Some(Err(CoreError::LineTooLong {
                        max: MAX_FRAME_LENGTH,
                    }))
                } else {
                    None
                }
            }
        }
    }
}

fn find_delimiter(haystack: &[u8]) -> Option<usize> {
    haystack.windows(DELIMITER.len()).position(|w| w == DELIMITER)
}
