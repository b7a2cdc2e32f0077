//! Output rendered to the user

use std::fmt;

/// One line of output for the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Opens a participant listing
    ParticipantsHeader,

    /// Entry of a participant listing, numbered from 0
    Participant { index: u32, name: String },

    /// Payload line shown as received
    Message(String),

    /// Local feedback that never came from the server
    Notice(String),
}

impl ChatEvent {
    /// Create message event from raw payload bytes
    pub fn message(line: &[u8]) -> Self {
        Self::Message(String::from_utf8_lossy(line).into_owned())
    }

    /// Create participant event from raw payload bytes
    pub fn participant(index: u32, line: &[u8]) -> Self {
        Self::Participant {
            index,
            name: String::from_utf8_lossy(line).into_owned(),
        }
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self::Notice(text.into())
    }
}

impl fmt::Display for ChatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParticipantsHeader => f.write_str("Participants:"),
            Self::Participant { index, name } => write!(f, "\t{}. {}", index, name),
            Self::Message(text) => f.write_str(text),
            Self::Notice(text) => write!(f, "! {}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        assert_eq!(ChatEvent::ParticipantsHeader.to_string(), "Participants:");
        assert_eq!(ChatEvent::participant(2, b"carol").to_string(), "\t2. carol");
        assert_eq!(ChatEvent::message(b"bob: hi").to_string(), "bob: hi");
        assert_eq!(ChatEvent::notice("nope").to_string(), "! nope");
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let event = ChatEvent::message(&[b'o', 0xff, b'k']);
        assert_eq!(event, ChatEvent::Message("o\u{fffd}k".into()));
    }
}
