//! Session controller
//!
//! Turns key presses into terminal output. Only one command runs at a time:
//! while a block of text is being typed the session is locked and every key
//! except Ctrl+C is dropped.
//!
//! # State machine
//!
//! ```text
//!            Enter (help / section / fullcv)
//!   Idle ─────────────────────────────────────▶ Animating
//!    ▲                                            │   │
//!    │  last char typed, completion runs          │   │ Ctrl+C
//!    └────────────────────────────────────────────┘   ▼
//!    ▲                                          Interrupted
//!    └──── stop: cancel frame, reset full CV ─────────┘
//! ```

use std::io;

use tracing::{debug, info, warn};
use unicode_width::UnicodeWidthStr;

use super::content::{ContentStore, FULL_CV_COMMAND, HELP_COMMAND};
use super::display::{LineDisplay, ERASE_SEQUENCE};
use super::frame::{FrameId, FrameScheduler};
use super::input::{Key, KeyPress};
use super::typewriter::{expand_char, Completion, Step, Typewriter};

/// First line written when the session starts
pub const DEFAULT_WELCOME: &str = "Type 'help' to see available commands.";

const HELP_HINT: &str = "Type 'help' to see available commands.";
const INTERRUPT_NOTICE: &str = "\r\n\nInterrupted\r\n\n";

/// Animation lock state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Animating,
    Interrupted,
}

/// Command line being typed
#[derive(Debug, Default)]
struct InputBuffer {
    text: String,
    /// Column of the cursor, counting the prompt
    cursor_col: usize,
}

/// Progress through the full CV playback
#[derive(Debug, Default)]
struct FullCvPlayback {
    index: usize,
    active: bool,
}

pub struct SessionController<D: LineDisplay> {
    display: D,
    content: ContentStore,
    prompt: String,
    prompt_len: usize,
    welcome: String,
    input: InputBuffer,
    state: AnimationState,
    typing: Option<Typewriter>,
    frames: FrameScheduler,
    full_cv: FullCvPlayback,
}

impl<D: LineDisplay> SessionController<D> {
    /// Create a controller over an already configured display
    pub fn new(display: D, content: ContentStore, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        let prompt_len = UnicodeWidthStr::width(prompt.as_str());
        Self {
            display,
            content,
            prompt,
            prompt_len,
            welcome: DEFAULT_WELCOME.to_string(),
            input: InputBuffer {
                text: String::new(),
                cursor_col: prompt_len,
            },
            state: AnimationState::Idle,
            typing: None,
            frames: FrameScheduler::new(),
            full_cv: FullCvPlayback::default(),
        }
    }

    /// Replace the welcome line
    pub fn with_welcome(mut self, welcome: impl Into<String>) -> Self {
        self.welcome = welcome.into();
        self
    }

    /// Open the display, write the welcome line and the first prompt
    pub fn start(&mut self) -> io::Result<()> {
        self.display.open()?;
        self.display.focus()?;
        self.display.writeln(&self.welcome)?;
        self.write_prompt()
    }

    #[allow(dead_code)]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.state == AnimationState::Animating
    }

    /// Frame the host loop should fire next
    pub fn pending_frame(&self) -> Option<FrameId> {
        self.frames.pending()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Pass a host resize through to the display
    pub fn fit(&mut self, cols: u16, rows: u16) -> io::Result<()> {
        self.display.fit(cols, rows)
    }

    pub fn focus(&mut self) -> io::Result<()> {
        self.display.focus()
    }

    pub fn blur(&mut self) -> io::Result<()> {
        self.display.blur()
    }

    /// Handle one key press
    pub fn handle_key(&mut self, key: KeyPress) -> io::Result<()> {
        if self.is_animating() {
            if key.is_interrupt() {
                return self.interrupt();
            }
            // Not interactive while typing
            return Ok(());
        }

        match key.key {
            Key::Backspace => self.handle_backspace(),
            Key::Enter => self.handle_return(),
            Key::Up | Key::Down | Key::Left | Key::Right => Ok(()),
            _ => match key.printable_char() {
                Some(ch) => self.handle_input(ch),
                None => Ok(()),
            },
        }
    }

    /// Run one animation step for a frame the host fired.
    ///
    /// Stale frames (cancelled or superseded) are ignored.
    pub fn on_frame(&mut self, id: FrameId) -> io::Result<()> {
        if !self.frames.fire(id) {
            debug!("Ignoring stale frame {:?}", id);
            return Ok(());
        }
        self.animate_step()
    }

    fn handle_input(&mut self, ch: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.display.write(ch.encode_utf8(&mut buf))?;
        self.input.text.push(ch);
        self.input.cursor_col += 1;
        Ok(())
    }

    fn handle_backspace(&mut self) -> io::Result<()> {
        if self.input.cursor_col > self.prompt_len {
            self.display.write(ERASE_SEQUENCE)?;
            self.input.cursor_col -= 1;
            self.input.text.pop();
        }
        Ok(())
    }

    fn handle_return(&mut self) -> io::Result<()> {
        self.display.writeln("")?;
        let command = std::mem::take(&mut self.input.text);
        self.dispatch(&command)?;
        self.input.cursor_col = self.prompt_len;
        if !self.is_animating() {
            self.write_prompt()?;
        }
        Ok(())
    }

    fn write_prompt(&mut self) -> io::Result<()> {
        self.display.write(&self.prompt)
    }

    fn dispatch(&mut self, raw: &str) -> io::Result<()> {
        let command = raw.trim();

        if !self.content.commands.contains(command) {
            debug!("Unrecognized command: {:?}", command);
            self.display
                .writeln(&format!(" ERROR: Command not recognized: {}!", command))?;
            return self.display.writeln(HELP_HINT);
        }

        debug!("Dispatching command: {}", command);
        match command {
            HELP_COMMAND => self.write_help(),
            FULL_CV_COMMAND => self.start_full_cv(),
            section => self.write_section(section),
        }
    }

    fn help_text(&self) -> String {
        let mut text = String::from("\n  AVAILABLE COMMANDS:\n\n");
        for command in self.content.commands.iter() {
            text.push_str("- ");
            text.push_str(command);
            text.push('\n');
        }
        text
    }

    fn write_help(&mut self) -> io::Result<()> {
        let text = self.help_text();
        self.start_typing(&text, Completion::ReprintPrompt)
    }

    fn start_full_cv(&mut self) -> io::Result<()> {
        self.full_cv = FullCvPlayback {
            index: 0,
            active: true,
        };
        self.advance_full_cv()
    }

    fn advance_full_cv(&mut self) -> io::Result<()> {
        let next = self
            .content
            .sections
            .playback()
            .get(self.full_cv.index)
            .cloned();

        match next {
            Some(section) => {
                self.full_cv.active = true;
                self.full_cv.index += 1;
                self.write_section(&section)
            }
            None => {
                self.reset_full_cv();
                self.write_prompt()
            }
        }
    }

    fn reset_full_cv(&mut self) {
        self.full_cv = FullCvPlayback::default();
    }

    fn write_section(&mut self, section: &str) -> io::Result<()> {
        self.display
            .writeln(&format!("\n  {}", section.to_uppercase()))?;

        if self.state == AnimationState::Interrupted {
            return Ok(());
        }

        let body = match self.content.sections.body(section) {
            Some(lines) => lines.join("\n"),
            None => {
                warn!("Section '{}' has no body", section);
                String::new()
            }
        };

        let then = if self.full_cv.active {
            Completion::AdvanceFullCv
        } else {
            Completion::ReprintPrompt
        };
        self.start_typing(&format!("\r\n{}", body), then)
    }

    fn start_typing(&mut self, text: &str, then: Completion) -> io::Result<()> {
        self.state = AnimationState::Animating;
        self.typing = Some(Typewriter::new(text, then));
        self.animate_step()
    }

    fn animate_step(&mut self) -> io::Result<()> {
        if self.state == AnimationState::Interrupted {
            self.stop_animation();
            return Ok(());
        }

        let Some(typing) = self.typing.as_mut() else {
            return Ok(());
        };

        match typing.step() {
            Step::Emit(ch) => {
                self.display.write(&expand_char(ch))?;
                self.frames.request();
                Ok(())
            }
            Step::Done(then) => {
                self.typing = None;
                self.display.writeln("\r")?;
                self.state = AnimationState::Idle;
                self.complete(then)
            }
        }
    }

    fn complete(&mut self, then: Completion) -> io::Result<()> {
        match then {
            Completion::ReprintPrompt => self.write_prompt(),
            Completion::AdvanceFullCv => self.advance_full_cv(),
        }
    }

    /// Halt the running animation. Its continuation is dropped with it.
    fn stop_animation(&mut self) {
        self.state = AnimationState::Idle;
        self.frames.cancel();
        self.typing = None;
        self.reset_full_cv();
    }

    fn interrupt(&mut self) -> io::Result<()> {
        info!("Animation interrupted");
        self.state = AnimationState::Interrupted;
        self.stop_animation();
        self.display.write(INTERRUPT_NOTICE)?;
        self.write_prompt()
    }
}
