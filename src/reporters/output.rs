use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use colored::Color;

use crate::core::error::Result;

/// Glyphs shared by the styles.
pub mod icon {
    pub const CHECK: &str = "✓";
    pub const CHECK_BOLD: &str = "✔";
    pub const CROSS: &str = "✖";
    pub const DOT: &str = "․";
    pub const DASH: &str = "▬";
}

const RESET: &str = "\x1b[0m";

/// Columns moved left by [`Output::rewind`]; wide enough for any line we draw.
const REWIND_COLUMNS: usize = 900;

/// One of the eight base terminal colors, optionally bold ("light").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    color: Color,
    light: bool,
}

impl Paint {
    pub const fn new(color: Color) -> Self {
        Self { color, light: false }
    }

    pub const fn light(color: Color) -> Self {
        Self { color, light: true }
    }

    /// The SGR sequence that switches to this paint, e.g. `\x1b[31;1m`.
    pub fn escape(&self) -> String {
        format!(
            "\x1b[{}{}m",
            self.color.to_fg_str(),
            if self.light { ";1" } else { "" }
        )
    }
}

/// The single text sink a reporter writes to.
///
/// Every write is flushed immediately so cursor movements and partially drawn
/// lines show up as they happen.
pub struct Output {
    writer: Box<dyn Write>,
    color: bool,
}

impl Output {
    pub fn new(writer: Box<dyn Write>, color: bool) -> Self {
        Self { writer, color }
    }

    pub fn supports_color(&self) -> bool {
        self.color
    }

    pub fn colorize(&self, text: &str, paint: Paint) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("{}{}{}", paint.escape(), text, RESET)
    }

    pub fn write(&mut self, text: &str) -> Result<()> {
        self.emit(text)
    }

    pub fn paint(&mut self, text: &str, paint: Paint) -> Result<()> {
        let text = self.colorize(text, paint);
        self.emit(&text)
    }

    pub fn up(&mut self, n: usize) -> Result<()> {
        self.cursor(n, 'A')
    }

    pub fn down(&mut self, n: usize) -> Result<()> {
        self.cursor(n, 'B')
    }

    pub fn right(&mut self, n: usize) -> Result<()> {
        self.cursor(n, 'C')
    }

    pub fn left(&mut self, n: usize) -> Result<()> {
        self.cursor(n, 'D')
    }

    /// Clear the current line and return to its first column.
    pub fn rewind(&mut self) -> Result<()> {
        if !self.color {
            return Ok(());
        }
        self.emit(&format!("\x1b[1K\x1b[{}D", REWIND_COLUMNS))
    }

    fn cursor(&mut self, n: usize, code: char) -> Result<()> {
        if !self.color {
            return Ok(());
        }
        self.emit(&format!("\x1b[{}{}", n, code))
    }

    fn emit(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// A clonable in-memory sink. All clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).into_owned()
    }

    pub fn clear(&self) {
        self.buffer.borrow_mut().clear();
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
