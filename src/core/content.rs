//! Résumé content registries
//!
//! Holds the recognized commands and the section bodies, validated once at
//! startup so the session controller never has to handle missing content.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;
use tracing::warn;

/// Lists every registered command
pub const HELP_COMMAND: &str = "help";
/// Plays every section in playback order
pub const FULL_CV_COMMAND: &str = "fullcv";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContentError {
    #[error("Command list contains an empty command")]
    EmptyCommand,

    #[error("Command registered more than once: {0}")]
    DuplicateCommand(String),

    #[error("Command '{0}' has no section body")]
    MissingCommandBody(String),

    #[error("Full CV section '{0}' has no section body")]
    MissingSectionBody(String),

    #[error("'fullcv' is registered but the section list is empty")]
    EmptyPlayback,
}

/// Returns true for commands that steer the session instead of naming a section
pub fn is_control_command(command: &str) -> bool {
    command == HELP_COMMAND || command == FULL_CV_COMMAND
}

/// Recognized commands, kept in configuration order for the help listing
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<String>,
}

impl CommandRegistry {
    /// Build a registry, rejecting empty and duplicate commands
    pub fn new<I, S>(commands: I) -> Result<Self, ContentError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for command in commands {
            let command = command.into().trim().to_string();
            if command.is_empty() {
                return Err(ContentError::EmptyCommand);
            }
            if !seen.insert(command.clone()) {
                return Err(ContentError::DuplicateCommand(command));
            }
            ordered.push(command);
        }
        Ok(Self { commands: ordered })
    }

    pub fn contains(&self, command: &str) -> bool {
        self.commands.iter().any(|c| c == command)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

/// Section bodies plus the order used for full CV playback
#[derive(Debug, Clone, Default)]
pub struct SectionRegistry {
    playback: Vec<String>,
    bodies: BTreeMap<String, Vec<String>>,
}

impl SectionRegistry {
    pub fn new(playback: Vec<String>, bodies: BTreeMap<String, Vec<String>>) -> Self {
        Self { playback, bodies }
    }

    /// Section identifiers in playback order
    pub fn playback(&self) -> &[String] {
        &self.playback
    }

    /// Body lines for a section
    pub fn body(&self, id: &str) -> Option<&[String]> {
        self.bodies.get(id).map(Vec::as_slice)
    }
}

/// Validated content handed to the session controller
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pub commands: CommandRegistry,
    pub sections: SectionRegistry,
}

impl ContentStore {
    /// Validate raw configuration into a content store.
    ///
    /// Every non-control command and every playback entry must have a body.
    /// Bodies nothing refers to are only logged.
    pub fn validate(
        commands: &[String],
        playback: &[String],
        bodies: &BTreeMap<String, Vec<String>>,
    ) -> Result<Self, ContentError> {
        let commands = CommandRegistry::new(commands.iter().cloned())?;

        for command in commands.iter().filter(|c| !is_control_command(c)) {
            if !bodies.contains_key(command) {
                return Err(ContentError::MissingCommandBody(command.to_string()));
            }
        }

        let playback: Vec<String> = playback.iter().map(|s| s.trim().to_string()).collect();
        for id in &playback {
            if !bodies.contains_key(id) {
                return Err(ContentError::MissingSectionBody(id.clone()));
            }
        }

        if commands.contains(FULL_CV_COMMAND) && playback.is_empty() {
            return Err(ContentError::EmptyPlayback);
        }

        for id in bodies.keys() {
            if !commands.contains(id) && !playback.contains(id) {
                warn!("Section '{}' is not reachable from any command", id);
            }
        }

        Ok(Self {
            commands,
            sections: SectionRegistry::new(playback, bodies.clone()),
        })
    }
}
