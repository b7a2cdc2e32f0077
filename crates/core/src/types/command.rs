//! Classification of lines typed by the user

use super::Request;
use crate::error::Result;

/// Lists everyone in the chat
pub const FOLKS_COMMAND: &str = ":folks";

/// Prefix of a nick change, followed by the new nick
pub const NICK_COMMAND: &str = ":nick ";

/// Map a committed input line to the request it asks for
///
/// `":folks"` lists participants, `":nick <nick>"` changes the nick and any
/// other non-empty line is sent as a message. Empty lines produce nothing.
pub fn parse(line: &str) -> Result<Option<Request>> {
    if line.is_empty() {
        return Ok(None);
    }
    if line == FOLKS_COMMAND {
        return Ok(Some(Request::ListParticipants));
    }
    if let Some(nick) = line.strip_prefix(NICK_COMMAND) {
        return Request::change_nick(nick).map(Some);
    }
    Request::send_message(line).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;

    #[test]
    fn test_command_classification() {
        assert_eq!(parse(":folks").unwrap(), Some(Request::ListParticipants));
        assert_eq!(
            parse(":nick bob").unwrap(),
            Some(Request::ChangeNick("bob".into()))
        );
        assert_eq!(
            parse("hello").unwrap(),
            Some(Request::SendMessage("hello".into()))
        );
        assert_eq!(parse("").unwrap(), None);
    }

    #[test]
    fn test_near_misses_are_messages() {
        assert_eq!(
            parse(":folks ").unwrap(),
            Some(Request::SendMessage(":folks ".into()))
        );
        assert_eq!(
            parse(":nick").unwrap(),
            Some(Request::SendMessage(":nick".into()))
        );
        assert_eq!(parse(" ").unwrap(), Some(Request::SendMessage(" ".into())));
    }

    #[test]
    fn test_nick_keeps_rest_verbatim() {
        assert_eq!(
            parse(":nick  two words").unwrap(),
            Some(Request::ChangeNick(" two words".into()))
        );
        assert_eq!(parse(":nick ").unwrap(), Some(Request::ChangeNick(String::new())));
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let long_nick = format!(":nick {}", "x".repeat(21));
        assert!(matches!(parse(&long_nick), Err(CoreError::NickTooLong { .. })));
        assert!(matches!(parse("a\nb"), Err(CoreError::EmbeddedDelimiter)));
    }
}
