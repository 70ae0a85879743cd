//! Terminal display using crossterm
//!
//! Writes the session output straight to the host terminal. Raw mode is
//! enabled so every key reaches the controller and `\n` does not return the
//! carriage on its own.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, SetCursorStyle, Show},
    queue,
    style::{ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, SetSize},
};
use tracing::{debug, info};

use crate::config::{ColorScheme, CursorShape, TerminalConfig};
use crate::core::display::LineDisplay;

/// Line display over a crossterm-capable writer
pub struct CrosstermDisplay<W: Write> {
    out: W,
    scheme: ColorScheme,
    cursor_shape: CursorShape,
    cursor_blink: bool,
    grid: Option<(u16, u16)>,
    /// Toggle raw mode on open/close (only meaningful on a real tty)
    raw_mode: bool,
    initialized: bool,
    size: (u16, u16),
}

impl CrosstermDisplay<io::Stdout> {
    /// Display on stdout, switching the terminal to raw mode
    pub fn stdout(config: &TerminalConfig, scheme: ColorScheme) -> Self {
        Self::new(io::stdout(), config, scheme, true)
    }

    /// Current terminal size
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl<W: Write> CrosstermDisplay<W> {
    pub fn new(out: W, config: &TerminalConfig, scheme: ColorScheme, raw_mode: bool) -> Self {
        Self {
            out,
            scheme,
            cursor_shape: config.cursor_style,
            cursor_blink: config.cursor_blink,
            grid: config.grid_size(),
            raw_mode,
            initialized: false,
            size: (0, 0),
        }
    }

    /// Last size the display was fitted to
    #[allow(dead_code)]
    pub fn fitted_size(&self) -> (u16, u16) {
        self.size
    }

    /// Restore the terminal
    pub fn close(&mut self) -> io::Result<()> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;

        queue!(
            self.out,
            ResetColor,
            SetCursorStyle::DefaultUserShape,
            Show
        )?;
        // Restore the default cursor color
        self.out.write_all(b"\x1b]112\x07")?;
        self.out.write_all(b"\r\n")?;
        self.out.flush()?;

        if self.raw_mode {
            terminal::disable_raw_mode()?;
        }
        info!("Display closed");
        Ok(())
    }
}

impl<W: Write> LineDisplay for CrosstermDisplay<W> {
    fn open(&mut self) -> io::Result<()> {
        if self.raw_mode {
            terminal::enable_raw_mode()?;
        }
        self.initialized = true;

        if let Some((cols, rows)) = self.grid {
            queue!(self.out, SetSize(cols, rows))?;
            self.size = (cols, rows);
        }

        queue!(
            self.out,
            SetBackgroundColor(self.scheme.background.to_crossterm()),
            SetForegroundColor(self.scheme.foreground.to_crossterm()),
            Clear(ClearType::All),
            MoveTo(0, 0),
            cursor_style(self.cursor_shape, self.cursor_blink)
        )?;
        // OSC 12: cursor color
        write!(self.out, "\x1b]12;{}\x07", self.scheme.cursor.to_hex())?;
        self.out.flush()?;

        info!("Display opened with scheme {}", self.scheme.name);
        Ok(())
    }

    fn focus(&mut self) -> io::Result<()> {
        debug!("Focus gained");
        queue!(self.out, Show)?;
        self.out.flush()
    }

    fn blur(&mut self) -> io::Result<()> {
        debug!("Focus lost");
        queue!(self.out, Hide)?;
        self.out.flush()
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    fn fit(&mut self, cols: u16, rows: u16) -> io::Result<()> {
        info!("Resize: {}x{}", cols, rows);
        self.size = (cols, rows);
        Ok(())
    }
}

impl<W: Write> Drop for CrosstermDisplay<W> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn cursor_style(shape: CursorShape, blink: bool) -> SetCursorStyle {
    match (shape, blink) {
        (CursorShape::Block, true) => SetCursorStyle::BlinkingBlock,
        (CursorShape::Block, false) => SetCursorStyle::SteadyBlock,
        (CursorShape::Underline, true) => SetCursorStyle::BlinkingUnderScore,
        (CursorShape::Underline, false) => SetCursorStyle::SteadyUnderScore,
        (CursorShape::Bar, true) => SetCursorStyle::BlinkingBar,
        (CursorShape::Bar, false) => SetCursorStyle::SteadyBar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run `f` against a display writing into a buffer, dropping it afterwards
    fn render(
        config: &TerminalConfig,
        f: impl FnOnce(&mut CrosstermDisplay<&mut Vec<u8>>),
    ) -> String {
        let mut buf = Vec::new();
        {
            let mut d = CrosstermDisplay::new(&mut buf, config, ColorScheme::phosphor(), false);
            f(&mut d);
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_open_applies_theme() {
        let config = TerminalConfig {
            cols: Some(50),
            rows: Some(22),
            ..TerminalConfig::default()
        };
        let out = render(&config, |d| {
            d.open().unwrap();
            assert_eq!(d.fitted_size(), (50, 22));
        });
        assert!(out.starts_with("\x1b[8;22;50t"));
        assert!(out.contains("\x1b[48;2;0;0;0m"));
        assert!(out.contains("\x1b[38;2;0;255;0m"));
        assert!(out.contains("\x1b[1 q"));
        assert!(out.contains("\x1b]12;#00ff00\x07"));
    }

    #[test]
    fn test_write_is_raw() {
        let out = render(&TerminalConfig::default(), |d| {
            d.write("ab").unwrap();
            d.write("\x08 \x08").unwrap();
            d.writeln("x").unwrap();
        });
        // Never opened, so dropping writes nothing else
        assert_eq!(out, "ab\x08 \x08x\r\n");
    }

    #[test]
    fn test_close_restores_terminal_once() {
        let out = render(&TerminalConfig::default(), |d| {
            d.open().unwrap();
            d.close().unwrap();
            d.close().unwrap();
        });
        assert_eq!(out.matches("\x1b]112\x07").count(), 1);
        assert!(out.ends_with("\r\n"));
    }

    #[test]
    fn test_focus_toggles_cursor() {
        let out = render(&TerminalConfig::default(), |d| {
            d.blur().unwrap();
            d.focus().unwrap();
        });
        assert_eq!(out, "\x1b[?25l\x1b[?25h");
    }

    #[test]
    fn test_fit_records_size() {
        render(&TerminalConfig::default(), |d| {
            d.fit(120, 40).unwrap();
            assert_eq!(d.fitted_size(), (120, 40));
        });
    }

    #[test]
    fn test_cursor_style_mapping() {
        assert!(matches!(
            cursor_style(CursorShape::Bar, false),
            SetCursorStyle::SteadyBar
        ));
        assert!(matches!(
            cursor_style(CursorShape::Underline, true),
            SetCursorStyle::BlinkingUnderScore
        ));
    }
}
