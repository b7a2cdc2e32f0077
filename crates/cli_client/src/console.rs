//! Console implementations for the event loop
//!
//! [`RawConsole`] edits the input line in raw mode and keeps it intact while
//! server output scrolls above it. [`PipedConsole`] is the fallback for
//! non-TTY stdin: one committed line per input line, no redraws.

use std::io::{self, Stdout, Write};

use async_trait::async_trait;
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::terminal;
use folkchat_core::{ClientConfig, Console, InputEvent, Terminal};
use futures::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::line_editor::{EditOutcome, LineEditor};

/// Raw-mode console with line editing
///
/// Raw mode is restored when the console is dropped, even on panic.
pub struct RawConsole {
    editor: LineEditor,
    events: EventStream,
    out: Stdout,
    /// Terminal width in columns
    width: u16,
}

impl RawConsole {
    /// Switch the terminal to raw mode and start reading key events
    pub fn open(config: &ClientConfig) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let (width, _) = terminal::size().unwrap_or((80, 24));
        Ok(Self {
            editor: LineEditor::new(config.prompt.clone(), config.history_len),
            events: EventStream::new(),
            out: io::stdout(),
            width,
        })
    }
}

impl Drop for RawConsole {
    fn drop(&mut self) {
        // Best-effort restore - ignore errors during cleanup
        let _ = self.editor.erase(&mut self.out);
        let _ = terminal::disable_raw_mode();
    }
}

impl Terminal for RawConsole {
    fn erase_line(&mut self) -> io::Result<()> {
        self.editor.erase(&mut self.out)
    }

    fn redraw(&mut self) -> io::Result<()> {
        self.editor.render(&mut self.out, self.width)
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        // Raw mode does not translate \n
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(b"\r\n")?;
        self.out.flush()
    }
}

#[async_trait(?Send)]
impl Console for RawConsole {
    async fn next_input(&mut self) -> io::Result<InputEvent> {
        let event = match self.events.next().await {
            Some(event) => event?,
            None => return Ok(InputEvent::Closed),
        };
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                match self.editor.handle_key(key) {
                    EditOutcome::Pending => {
                        self.redraw()?;
                        Ok(InputEvent::Edited)
                    }
                    EditOutcome::Submit(line) => {
                        self.redraw()?;
                        Ok(InputEvent::Line(line))
                    }
                    EditOutcome::Close => Ok(InputEvent::Closed),
                }
            }
            Event::Resize(cols, rows) => {
                tracing::trace!("Terminal resized to {}x{}", cols, rows);
                self.width = cols;
                self.redraw()?;
                Ok(InputEvent::Edited)
            }
            _ => Ok(InputEvent::Edited),
        }
    }
}

/// Line-buffered console for piped input
///
/// Reads stdin unless built over another reader with [`PipedConsole::from_reader`].
pub struct PipedConsole<R = BufReader<Stdin>> {
    lines: Lines<R>,
    out: Stdout,
    /// Set once end of input was reported
    closed: bool,
}

impl PipedConsole {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl Default for PipedConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: AsyncBufRead + Unpin> PipedConsole<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            out: io::stdout(),
            closed: false,
        }
    }
}

impl<R> Terminal for PipedConsole<R> {
    fn erase_line(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn redraw(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }
}

#[async_trait(?Send)]
impl<R: AsyncBufRead + Unpin> Console for PipedConsole<R> {
    async fn next_input(&mut self) -> io::Result<InputEvent> {
        // End of input is reported once; the loop keeps running until
        // outstanding responses are in
        if self.closed {
            return std::future::pending().await;
        }
        match self.lines.next_line().await? {
            Some(line) => Ok(InputEvent::Line(line.trim_end_matches('\r').to_string())),
            None => {
                tracing::debug!("End of input");
                self.closed = true;
                Ok(InputEvent::Closed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_piped_lines_then_closed() {
        tokio::time::pause();
        let mut console = PipedConsole::from_reader(&b":folks\nhi there\r\n"[..]);
        assert_eq!(
            console.next_input().await.unwrap(),
            InputEvent::Line(":folks".into())
        );
        assert_eq!(
            console.next_input().await.unwrap(),
            InputEvent::Line("hi there".into())
        );
        assert_eq!(console.next_input().await.unwrap(), InputEvent::Closed);

        // Nothing more after end of input, however long the loop waits
        let next = tokio::time::timeout(Duration::from_secs(3600), console.next_input()).await;
        assert!(next.is_err());
    }

    #[tokio::test]
    async fn test_piped_empty_input_closes() {
        let mut console = PipedConsole::from_reader(&b""[..]);
        assert_eq!(console.next_input().await.unwrap(), InputEvent::Closed);
    }
}
