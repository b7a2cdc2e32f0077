//! Single-line editor with history for raw-mode terminals
//!
//! Keys are fed one at a time; Enter hands back the committed line and
//! clears the editor. The committed text is not echoed: it shows up again
//! once the server relays it.

use std::collections::VecDeque;
use std::io::{self, Write};

use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

/// What a key press amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Line changed (or nothing happened), keep editing
    Pending,
    /// Enter was pressed
    Submit(String),
    /// User asked to leave
    Close,
}

pub struct LineEditor {
    prompt: String,
    buffer: Vec<char>,
    cursor: usize,
    history: VecDeque<String>,
    history_len: usize,
    /// Row of the terminal cursor below the prompt row, as last rendered
    cursor_row: usize,
    /// Index into `history` while browsing, `None` when editing a fresh line
    browsing: Option<usize>,
    /// Fresh line saved when browsing starts
    draft: Vec<char>,
}

impl LineEditor {
    pub fn new(prompt: impl Into<String>, history_len: usize) -> Self {
        Self {
            prompt: prompt.into(),
            buffer: Vec::new(),
            cursor: 0,
            history: VecDeque::with_capacity(history_len),
            history_len,
            cursor_row: 0,
            browsing: None,
            draft: Vec::new(),
        }
    }

    pub fn line(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return EditOutcome::Close,
            KeyCode::Char('d') if ctrl => {
                if self.buffer.is_empty() {
                    return EditOutcome::Close;
                }
                self.delete();
            }
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.buffer.len(),
            KeyCode::Char('b') if ctrl => self.left(),
            KeyCode::Char('f') if ctrl => self.right(),
            KeyCode::Char('u') if ctrl => {
                self.buffer.drain(..self.cursor);
                self.cursor = 0;
            }
            KeyCode::Char('k') if ctrl => self.buffer.truncate(self.cursor),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.buffer.remove(self.cursor);
                }
            }
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.left(),
            KeyCode::Right => self.right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.buffer.len(),
            KeyCode::Up => self.older(),
            KeyCode::Down => self.newer(),
            KeyCode::Enter => return EditOutcome::Submit(self.commit()),
            _ => {}
        }
        EditOutcome::Pending
    }

    /// Clear the rendered input line, including rows it wrapped onto
    pub fn erase<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.queue_erase(out)?;
        out.flush()
    }

    /// Draw prompt and pending text, leaving the cursor at the edit point
    ///
    /// `width` is the terminal width in columns; text longer than that wraps.
    pub fn render<W: Write>(&mut self, out: &mut W, width: u16) -> io::Result<()> {
        let width = usize::from(width.max(1));
        let total = self.prompt.chars().count() + self.buffer.len();
        let at = self.prompt.chars().count() + self.cursor;
        // Writing the last column leaves the cursor there until the next byte
        let end_row = if total > 0 && total % width == 0 {
            total / width - 1
        } else {
            total / width
        };
        let (row, column) = (at / width, at % width);

        self.queue_erase(out)?;
        queue!(out, Print(&self.prompt), Print(self.line()))?;
        if row > end_row {
            queue!(out, Print("\r\n"))?;
        } else if end_row > row {
            queue!(out, MoveUp(to_u16(end_row - row)))?;
        }
        queue!(out, MoveToColumn(to_u16(column)))?;
        self.cursor_row = row;
        out.flush()
    }

    fn queue_erase<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if self.cursor_row > 0 {
            queue!(out, MoveUp(to_u16(self.cursor_row)))?;
        }
        queue!(out, MoveToColumn(0), Clear(ClearType::FromCursorDown))?;
        self.cursor_row = 0;
        Ok(())
    }

    fn commit(&mut self) -> String {
        let line: String = self.buffer.drain(..).collect();
        self.cursor = 0;
        self.browsing = None;
        self.draft.clear();
        if !line.is_empty() && self.history_len > 0 && self.history.back() != Some(&line) {
            if self.history.len() == self.history_len {
                self.history.pop_front();
            }
            self.history.push_back(line.clone());
        }
        line
    }

    fn delete(&mut self) {
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn right(&mut self) {
        if self.cursor < self.buffer.len() {
            self.cursor += 1;
        }
    }

    fn older(&mut self) {
        let index = match self.browsing {
            None if self.history.is_empty() => return,
            None => {
                self.draft = std::mem::take(&mut self.buffer);
                self.history.len() - 1
            }
            Some(0) => return,
            Some(i) => i - 1,
        };
        self.show_history(index);
    }

    fn newer(&mut self) {
        match self.browsing {
            None => {}
            Some(i) if i + 1 < self.history.len() => self.show_history(i + 1),
            Some(_) => {
                self.browsing = None;
                self.buffer = std::mem::take(&mut self.draft);
                self.cursor = self.buffer.len();
            }
        }
    }

    fn show_history(&mut self, index: usize) {
        self.browsing = Some(index);
        self.buffer = self.history[index].chars().collect();
        self.cursor = self.buffer.len();
    }
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
