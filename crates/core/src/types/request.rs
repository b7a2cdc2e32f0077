//! Requests sent to the chat server

use crate::error::{CoreError, Result};
use crate::{MAX_MESSAGE_LENGTH, MAX_NICK_LENGTH};

/// What a request asks for; decides how its response is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    ListParticipants,
    PollNew,
    ChangeNick,
    SendMessage,
}

/// A validated request, ready for the codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `folks`
    ListParticipants,
    /// `new`
    PollNew,
    /// `my name is <nick>`
    ChangeNick(String),
    /// `send <text>`
    SendMessage(String),
}

impl Request {
    /// Nick change, rejecting line breaks and nicks over the size limit
    pub fn change_nick(nick: &str) -> Result<Self> {
        check_no_delimiter(nick)?;
        if nick.len() > MAX_NICK_LENGTH {
            return Err(CoreError::NickTooLong {
                size: nick.len(),
                max: MAX_NICK_LENGTH,
            });
        }
        Ok(Self::ChangeNick(nick.to_string()))
    }

    /// Chat message, rejecting line breaks and texts over the size limit
    pub fn send_message(text: &str) -> Result<Self> {
        check_no_delimiter(text)?;
        if text.len() > MAX_MESSAGE_LENGTH {
            return Err(CoreError::MessageTooLong {
                size: text.len(),
                max: MAX_MESSAGE_LENGTH,
            });
        }
        Ok(Self::SendMessage(text.to_string()))
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            Self::ListParticipants => RequestKind::ListParticipants,
            Self::PollNew => RequestKind::PollNew,
            Self::ChangeNick(_) => RequestKind::ChangeNick,
            Self::SendMessage(_) => RequestKind::SendMessage,
        }
    }
}

fn check_no_delimiter(text: &str) -> Result<()> {
    if text.bytes().any(|b| b == b'\r' || b == b'\n') {
        return Err(CoreError::EmbeddedDelimiter);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(Request::PollNew.kind(), RequestKind::PollNew);
        assert_eq!(
            Request::change_nick("bob").unwrap().kind(),
            RequestKind::ChangeNick
        );
    }

    #[test]
    fn test_size_limits() {
        let nick = "n".repeat(MAX_NICK_LENGTH);
        assert!(Request::change_nick(&nick).is_ok());
        let nick = "n".repeat(MAX_NICK_LENGTH + 1);
        assert!(matches!(
            Request::change_nick(&nick),
            Err(CoreError::NickTooLong { size: 21, max: 20 })
        ));

        let text = "m".repeat(MAX_MESSAGE_LENGTH);
        assert!(Request::send_message(&text).is_ok());
        let text = "m".repeat(MAX_MESSAGE_LENGTH + 1);
        assert!(matches!(
            Request::send_message(&text),
            Err(CoreError::MessageTooLong { size: 141, max: 140 })
        ));
    }

    #[test]
    fn test_line_breaks_rejected() {
        assert!(matches!(
            Request::send_message("hi\r\nnew"),
            Err(CoreError::EmbeddedDelimiter)
        ));
        assert!(matches!(
            Request::send_message("a\rb"),
            Err(CoreError::EmbeddedDelimiter)
        ));
        assert!(matches!(
            Request::change_nick("bo\nb"),
            Err(CoreError::EmbeddedDelimiter)
        ));
    }
}
