//! Typing animation state
//!
//! A [`Typewriter`] owns one block of text being revealed, the offset of the
//! next character and what should happen once the block is done.

/// What the controller does when a typed block finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Write the prompt and accept input again
    ReprintPrompt,
    /// Move on to the next full CV section
    AdvanceFullCv,
}

/// One character revealed by a typing step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Emit this character, then schedule another step
    Emit(char),
    /// The block is fully typed
    Done(Completion),
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    text: Vec<char>,
    pos: usize,
    then: Completion,
}

impl Typewriter {
    pub fn new(text: &str, then: Completion) -> Self {
        Self {
            text: text.chars().collect(),
            pos: 0,
            then,
        }
    }

    /// Advance by one character
    pub fn step(&mut self) -> Step {
        match self.text.get(self.pos) {
            Some(&ch) => {
                self.pos += 1;
                Step::Emit(ch)
            }
            None => Step::Done(self.then),
        }
    }

    #[allow(dead_code)]
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Raw text for a character, adding the carriage return the display does not
pub fn expand_char(ch: char) -> String {
    if ch == '\n' {
        "\n\r".to_string()
    } else {
        ch.to_string()
    }
}
