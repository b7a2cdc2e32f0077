//! Terminal abstraction used by the session and the event loop

use std::collections::VecDeque;
use std::io;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::types::ChatEvent;

/// Where server output is printed
///
/// Implementations own an interactive input line. Asynchronous output is
/// printed above it: the line is erased, the text written, then the input
/// line drawn again so typing and server output never overlap.
pub trait Terminal {
    /// Erase the input line as last rendered
    fn erase_line(&mut self) -> io::Result<()>;

    /// Draw the input line again (prompt, pending text, cursor)
    fn redraw(&mut self) -> io::Result<()>;

    /// Write one line of output at the current position
    fn write_line(&mut self, text: &str) -> io::Result<()>;

    /// Print an event without disturbing the input line
    fn print(&mut self, event: &ChatEvent) -> io::Result<()> {
        self.erase_line()?;
        self.write_line(&event.to_string())?;
        self.redraw()
    }
}

/// What the user did since the last poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A line was committed with Enter
    Line(String),
    /// Keystrokes edited the pending line, nothing to dispatch
    Edited,
    /// Input is over (Ctrl-D, Ctrl-C or end of stdin)
    Closed,
}

/// Interactive terminal: output sink plus line-editing input source
#[async_trait(?Send)]
pub trait Console: Terminal {
    /// Wait for the next input event
    ///
    /// Must be cancel safe: the event loop drops the future whenever another
    /// source becomes ready first.
    async fn next_input(&mut self) -> io::Result<InputEvent>;
}

/// Mock console for testing
///
/// Records printed lines and replays scripted input. Input can be queued up
/// front or streamed through the sender returned by [`MockConsole::channel`].
pub struct MockConsole {
    queued: VecDeque<InputEvent>,
    inputs: Option<mpsc::UnboundedReceiver<InputEvent>>,
    /// Input ran out and `Closed` was reported
    exhausted: bool,
    printed: Vec<String>,
    redraws: usize,
    erasures: usize,
}

impl MockConsole {
    /// Create a console with no input
    ///
    /// Once queued input runs out (or the channel sender is dropped) it
    /// reports `Closed` a single time and then never completes again, like a
    /// stdin that hit end of file.
    pub fn new() -> Self {
        Self {
            queued: VecDeque::new(),
            inputs: None,
            exhausted: false,
            printed: Vec::new(),
            redraws: 0,
            erasures: 0,
        }
    }

    /// Create a console fed from a channel
    pub fn channel() -> (Self, mpsc::UnboundedSender<InputEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut console = Self::new();
        console.inputs = Some(rx);
        (console, tx)
    }

    /// Queue a committed line
    pub fn push_line(&mut self, line: &str) {
        self.queued.push_back(InputEvent::Line(line.to_string()));
    }

    /// Lines printed so far
    pub fn printed(&self) -> &[String] {
        &self.printed
    }

    pub fn redraws(&self) -> usize {
        self.redraws
    }

    pub fn erasures(&self) -> usize {
        self.erasures
    }
}

impl Default for MockConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for MockConsole {
    fn erase_line(&mut self) -> io::Result<()> {
        self.erasures += 1;
        Ok(())
    }

    fn redraw(&mut self) -> io::Result<()> {
        self.redraws += 1;
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.printed.push(text.to_string());
        Ok(())
    }
}

#[async_trait(?Send)]
impl Console for MockConsole {
    async fn next_input(&mut self) -> io::Result<InputEvent> {
        if let Some(event) = self.queued.pop_front() {
            return Ok(event);
        }
        if !self.exhausted {
            if let Some(rx) = self.inputs.as_mut() {
                if let Some(event) = rx.recv().await {
                    return Ok(event);
                }
            }
            self.exhausted = true;
            return Ok(InputEvent::Closed);
        }
        std::future::pending().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_print_erases_then_redraws() {
        let mut console = MockConsole::new();
        console.print(&ChatEvent::participant(0, b"alice")).unwrap();
        assert_eq!(console.printed(), ["\t0. alice"]);
        assert_eq!(console.erasures(), 1);
        assert_eq!(console.redraws(), 1);
    }

    #[tokio::test]
    async fn test_queued_input_then_closed() {
        let mut console = MockConsole::new();
        console.push_line(":folks");
        assert_eq!(
            console.next_input().await.unwrap(),
            InputEvent::Line(":folks".into())
        );
        assert_eq!(console.next_input().await.unwrap(), InputEvent::Closed);
    }

    #[tokio::test]
    async fn test_channel_input() {
        let (mut console, tx) = MockConsole::channel();
        tx.send(InputEvent::Edited).unwrap();
        assert_eq!(console.next_input().await.unwrap(), InputEvent::Edited);
        drop(tx);
        assert_eq!(console.next_input().await.unwrap(), InputEvent::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_is_reported_once() {
        let mut console = MockConsole::new();
        assert_eq!(console.next_input().await.unwrap(), InputEvent::Closed);
        let next = tokio::time::timeout(Duration::from_secs(60), console.next_input()).await;
        assert!(next.is_err());
    }
}
