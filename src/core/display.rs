//! Line display abstraction
//!
//! The session controller only talks to a [`LineDisplay`]. The real terminal
//! implementation lives in `ui::renderer`; [`BufferDisplay`] keeps everything
//! in memory for headless playback and tests.

use std::io;

/// Destructive backspace: move left, blank the cell, move left again
pub const ERASE_SEQUENCE: &str = "\x08 \x08";

/// A surface that can show raw text and take input focus.
///
/// Writes are raw: a `\n` does not return the carriage, callers emit `\r`
/// themselves.
pub trait LineDisplay {
    /// Attach to the host surface
    fn open(&mut self) -> io::Result<()>;

    /// Take input focus
    fn focus(&mut self) -> io::Result<()>;

    /// Release input focus
    fn blur(&mut self) -> io::Result<()>;

    /// Write raw text
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Write text followed by a line break
    fn writeln(&mut self, text: &str) -> io::Result<()> {
        self.write(text)?;
        self.write("\r\n")
    }

    /// Fit the display to a new host size
    fn fit(&mut self, cols: u16, rows: u16) -> io::Result<()>;
}

/// In-memory display recording everything written to it
#[derive(Debug, Default, Clone)]
pub struct BufferDisplay {
    output: String,
    opened: bool,
    focused: bool,
    size: Option<(u16, u16)>,
}

impl BufferDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Drain the recorded output
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    #[allow(dead_code)]
    pub fn is_open(&self) -> bool {
        self.opened
    }

    #[allow(dead_code)]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    #[allow(dead_code)]
    pub fn size(&self) -> Option<(u16, u16)> {
        self.size
    }
}

impl LineDisplay for BufferDisplay {
    fn open(&mut self) -> io::Result<()> {
        self.opened = true;
        Ok(())
    }

    fn focus(&mut self) -> io::Result<()> {
        self.focused = true;
        Ok(())
    }

    fn blur(&mut self) -> io::Result<()> {
        self.focused = false;
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn fit(&mut self, cols: u16, rows: u16) -> io::Result<()> {
        self.size = Some((cols, rows));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writeln_appends_crlf() {
        let mut display = BufferDisplay::new();
        display.write("root > ").unwrap();
        display.writeln("about").unwrap();
        assert_eq!(display.output(), "root > about\r\n");

        assert_eq!(display.take_output(), "root > about\r\n");
        assert_eq!(display.output(), "");
    }

    #[test]
    fn test_focus_and_fit() {
        let mut display = BufferDisplay::new();
        assert!(!display.is_open());
        display.open().unwrap();
        display.focus().unwrap();
        assert!(display.is_open());
        assert!(display.is_focused());

        display.blur().unwrap();
        assert!(!display.is_focused());

        display.fit(50, 22).unwrap();
        assert_eq!(display.size(), Some((50, 22)));
    }
}
