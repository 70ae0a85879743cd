//! Configuration and color scheme management for cvterm.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.cvterm/config.toml`
//! - Built-in color schemes (phosphor, amber, solarized, nord, dracula)
//! - Validation of the résumé content into a [`ContentStore`]
//!
//! # Configuration File
//!
//! ```toml
//! welcome = "Type 'help' to see available commands."
//! frame_interval_ms = 16
//!
//! [terminal]
//! color_scheme = "phosphor"
//! cursor_style = "block"
//! cursor_blink = true
//! cols = 50
//! rows = 22
//!
//! [cv]
//! prompt = "root > "
//! commands = ["about", "contact", "help", "fullcv"]
//! sections = ["about", "contact"]
//!
//! [cv.bodies]
//! about = ["Name: Jane Doe", "Role: Platform Engineer"]
//! contact = ["GitHub: https://github.com/janedoe"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::content::{ContentError, ContentStore};
use crate::core::session::DEFAULT_WELCOME;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid résumé content: {0}")]
    Content(#[from] ContentError),
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First line written at startup
    pub welcome: String,
    /// Delay between typed characters
    pub frame_interval_ms: u64,
    /// Look of the terminal
    pub terminal: TerminalConfig,
    /// Commands and résumé content
    pub cv: CvConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            welcome: DEFAULT_WELCOME.to_string(),
            frame_interval_ms: 16,
            terminal: TerminalConfig::default(),
            cv: CvConfig::default(),
        }
    }
}

/// Cursor shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorShape {
    Block,
    Underline,
    Bar,
}

/// Terminal appearance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub color_scheme: String,
    pub cursor_style: CursorShape,
    pub cursor_blink: bool,
    /// Grid size to request from the host terminal
    pub cols: Option<u16>,
    pub rows: Option<u16>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            color_scheme: "phosphor".to_string(),
            cursor_style: CursorShape::Block,
            cursor_blink: true,
            cols: None,
            rows: None,
        }
    }
}

impl TerminalConfig {
    /// Configured grid size, when both dimensions are set
    pub fn grid_size(&self) -> Option<(u16, u16)> {
        self.cols.zip(self.rows)
    }
}

/// Commands and résumé sections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CvConfig {
    pub prompt: String,
    /// Recognized commands, listed by `help` in this order
    pub commands: Vec<String>,
    /// Section order for `fullcv`
    pub sections: Vec<String>,
    /// Section body lines
    pub bodies: BTreeMap<String, Vec<String>>,
}

impl Default for CvConfig {
    fn default() -> Self {
        let bodies = [
            (
                "about",
                vec![
                    "Name: Jane Doe",
                    "Role: Platform Engineer",
                    "Builds and runs cloud infrastructure, CI/CD pipelines and the",
                    "tooling around them.",
                    "Key Areas of Expertise:",
                    " Cloud Platforms: AWS, Azure",
                    " DevOps Tools: GitLab, Jenkins, Terraform, Ansible, Docker, Kubernetes",
                    " Programming Languages: Rust, Python, Bash",
                ],
            ),
            (
                "experience",
                vec![
                    "Platform Engineer, Example Corp, 2021 - present",
                    "- designed and maintained CI/CD pipelines with GitLab and Jenkins",
                    "- provisioned cloud resources with Terraform and CloudFormation",
                    "- ran EKS clusters for test and production workloads",
                    "Systems Administrator, Example Hosting, 2017 - 2021",
                    "- automated Windows and Linux provisioning with Ansible",
                ],
            ),
            (
                "projects",
                vec![
                    "cvterm - this résumé, typed out in a terminal",
                    "infra-modules - reusable Terraform modules for small teams",
                ],
            ),
            (
                "education",
                vec![
                    "Computer Programming",
                    "Example Open University, 2016 - 2017",
                    "• Web applications, relational databases",
                ],
            ),
            (
                "certifications",
                vec![
                    "AWS Certified DevOps Engineer - Professional",
                    "KCNA: Kubernetes and Cloud Native Associate",
                ],
            ),
            (
                "contact",
                vec![
                    "LinkedIn: https://www.linkedin.com/in/janedoe/",
                    "GitHub: https://github.com/janedoe",
                ],
            ),
        ];

        let sections: Vec<String> = bodies.iter().map(|(id, _)| id.to_string()).collect();
        let mut commands = sections.clone();
        commands.push("fullcv".to_string());
        commands.push("help".to_string());

        Self {
            prompt: "root > ".to_string(),
            commands,
            sections,
            bodies: bodies
                .into_iter()
                .map(|(id, lines)| {
                    (
                        id.to_string(),
                        lines.into_iter().map(str::to_string).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `~/.cvterm/config.toml` is
    /// used when present, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::get_config_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => {
                    info!("No config file found, using built-in defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        app_dir().map(|dir| dir.join("config.toml"))
    }

    /// Validate the résumé content
    pub fn content(&self) -> Result<ContentStore, ConfigError> {
        Ok(ContentStore::validate(
            &self.cv.commands,
            &self.cv.sections,
            &self.cv.bodies,
        )?)
    }

    /// Get the color scheme
    pub fn get_color_scheme(&self) -> ColorScheme {
        ColorScheme::by_name(&self.terminal.color_scheme)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }

    /// `#rrggbb` form used by OSC color sequences
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Color scheme definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorScheme {
    pub name: String,
    pub background: Color,
    pub foreground: Color,
    pub cursor: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::phosphor()
    }
}

impl ColorScheme {
    /// Green on black, the classic monochrome terminal
    pub fn phosphor() -> Self {
        Self {
            name: "phosphor".to_string(),
            background: Color::new(0, 0, 0),
            foreground: Color::new(0, 255, 0),
            cursor: Color::new(0, 255, 0),
        }
    }

    /// Amber monochrome
    pub fn amber() -> Self {
        Self {
            name: "amber".to_string(),
            background: Color::new(16, 10, 0),
            foreground: Color::new(255, 176, 0),
            cursor: Color::new(255, 204, 0),
        }
    }

    /// Solarized Dark scheme
    pub fn solarized_dark() -> Self {
        Self {
            name: "solarized-dark".to_string(),
            background: Color::new(0, 43, 54),
            foreground: Color::new(147, 161, 161),
            cursor: Color::new(38, 139, 210),
        }
    }

    /// Nord scheme
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            background: Color::new(46, 52, 64),
            foreground: Color::new(216, 222, 233),
            cursor: Color::new(136, 192, 208),
        }
    }

    /// Dracula scheme
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            background: Color::new(40, 42, 54),
            foreground: Color::new(248, 248, 242),
            cursor: Color::new(189, 147, 249),
        }
    }

    /// Get scheme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "amber" => Self::amber(),
            "solarized-dark" | "solarized_dark" => Self::solarized_dark(),
            "nord" => Self::nord(),
            "dracula" => Self::dracula(),
            _ => Self::phosphor(),
        }
    }

    /// List available schemes
    pub fn list() -> Vec<&'static str> {
        vec!["phosphor", "amber", "solarized-dark", "nord", "dracula"]
    }
}

/// `~/.cvterm`, created on first use
pub fn app_dir() -> Option<PathBuf> {
    let dir = home_dir()?.join(".cvterm");
    if !dir.exists() {
        let _ = fs::create_dir_all(&dir);
    }
    Some(dir)
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_content_is_valid() {
        let config = Config::default();
        let store = config.content().unwrap();
        assert!(store.commands.contains("help"));
        assert!(store.commands.contains("fullcv"));
        assert_eq!(store.sections.playback().len(), 6);
        assert_eq!(store.sections.playback()[0], "about");
    }

    #[test]
    fn test_parse_partial_config() {
        let config = Config::parse(
            r#"
            frame_interval_ms = 5

            [terminal]
            color_scheme = "amber"
            cursor_style = "bar"
            cols = 50
            rows = 22

            [cv]
            prompt = "$ "
            commands = ["about", "help"]
            sections = []

            [cv.bodies]
            about = ["line1", "line2"]
            "#,
        )
        .unwrap();

        assert_eq!(config.welcome, DEFAULT_WELCOME);
        assert_eq!(config.frame_interval(), Duration::from_millis(5));
        assert_eq!(config.terminal.cursor_style, CursorShape::Bar);
        assert!(config.terminal.cursor_blink);
        assert_eq!(config.terminal.grid_size(), Some((50, 22)));
        assert_eq!(config.get_color_scheme().name, "amber");
        assert_eq!(config.cv.prompt, "$ ");

        let store = config.content().unwrap();
        assert_eq!(
            store.sections.body("about"),
            Some(&["line1".to_string(), "line2".to_string()][..])
        );
    }

    #[test]
    fn test_invalid_content_is_reported() {
        let config = Config::parse(
            r#"
            [cv]
            commands = ["about", "experience", "help"]
            sections = []

            [cv.bodies]
            about = ["line1"]
            "#,
        )
        .unwrap();

        let err = config.content().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Content(ContentError::MissingCommandBody(ref c)) if c == "experience"
        ));
    }

    #[test]
    fn test_round_trip_defaults() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        let parsed = Config::parse(&text).unwrap();
        assert_eq!(parsed.cv.commands, config.cv.commands);
        assert_eq!(parsed.cv.bodies, config.cv.bodies);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/cvterm.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_color_schemes() {
        assert_eq!(ColorScheme::by_name("NORD").name, "nord");
        assert_eq!(ColorScheme::by_name("unknown").name, "phosphor");
        for name in ColorScheme::list() {
            assert_eq!(ColorScheme::by_name(name).name, name);
        }
        assert_eq!(Color::new(0, 255, 0).to_hex(), "#00ff00");
    }

    #[test]
    fn test_grid_size_needs_both() {
        let terminal = TerminalConfig {
            cols: Some(50),
            ..TerminalConfig::default()
        };
        assert_eq!(terminal.grid_size(), None);
    }
}
