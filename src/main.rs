//! cvterm - an interactive résumé for the terminal
//!
//! Type a section name and the résumé types it back, one character per
//! frame. Ctrl+C interrupts a section that is still being typed.
//!
//! # Quick Start
//!
//! ```text
//! cvterm                        # Interactive session with ~/.cvterm/config.toml
//! cvterm -c my-cv.toml          # Use a specific config file
//! cvterm --print about          # Print one section and exit
//! ```
//!
//! # Commands
//!
//! | Command | Action |
//! |---------|--------|
//! | help | List all commands |
//! | fullcv | Type every section in order |
//! | <section> | Type one section |

mod config;
mod core;
mod ui;

use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableFocusChange, EnableFocusChange, Event, KeyEventKind,
};
use crossterm::execute;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::{ColorScheme, Config};
use crate::core::content::ContentStore;
use crate::core::display::BufferDisplay;
use crate::core::input::{Key, KeyPress};
use crate::core::session::SessionController;
use crate::ui::{CrosstermDisplay, KeyMapper};

/// How long to wait for input when nothing is being typed
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Command line options
#[derive(Debug, Default)]
struct Args {
    /// Config file given with --config
    config_path: Option<PathBuf>,
    /// Validate the configuration and exit
    check: bool,
    /// Run a single command headless and print the transcript
    print: Option<String>,
    /// Print the built-in configuration
    dump_config: bool,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("cvterm {}", VERSION);
}

fn print_help() {
    eprintln!("cvterm {} - An interactive résumé for the terminal", VERSION);
    eprintln!();
    eprintln!("Usage: cvterm [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <PATH>   Use this config file");
    eprintln!("  -p, --print <CMD>     Run one command, print the output and exit");
    eprintln!("      --check           Validate the configuration and exit");
    eprintln!("      --dump-config     Print the built-in configuration as TOML");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  Enter                 Run the typed command");
    eprintln!("  Ctrl+C                Interrupt the section being typed");
    eprintln!("  Ctrl+D, Ctrl+Q        Quit");
    eprintln!();
    eprintln!("Configuration: ~/.cvterm/config.toml");
    eprintln!();
    eprintln!("Color schemes: {}", ColorScheme::list().join(", "));
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing config path".to_string());
                }
                parsed.config_path = Some(PathBuf::from(&args[i]));
            }
            "-p" | "--print" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing command to print".to_string());
                }
                parsed.print = Some(args[i].clone());
            }
            "--check" => {
                parsed.check = true;
            }
            "--dump-config" => {
                parsed.dump_config = true;
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(parsed)
}

/// Log to ~/.cvterm/cvterm.log so nothing lands on the raw-mode screen
fn init_logging() {
    let log_path = config::app_dir()
        .map(|dir| dir.join("cvterm.log"))
        .unwrap_or_else(|| PathBuf::from("cvterm.log"));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    if args.dump_config {
        print!("{}", Config::default().to_toml()?);
        return Ok(());
    }

    init_logging();
    info!("cvterm {} starting...", VERSION);

    let config = Config::load(args.config_path.as_deref())?;
    let content = match config.content() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };
    info!(
        "{} commands, {} full CV sections",
        content.commands.len(),
        content.sections.playback().len()
    );

    if args.check {
        println!("Configuration OK");
        return Ok(());
    }

    if let Some(command) = args.print {
        return run_print(&config, content, &command);
    }

    run_terminal(&config, content)
}

/// Type one command into an in-memory session and print what it wrote
fn run_print(config: &Config, content: ContentStore, command: &str) -> anyhow::Result<()> {
    let mut session = SessionController::new(BufferDisplay::new(), content, config.cv.prompt.clone());
    session.start()?;
    session.display_mut().take_output();

    for ch in command.chars() {
        session.handle_key(KeyPress::plain(Key::Char(ch)))?;
    }
    session.handle_key(KeyPress::plain(Key::Enter))?;
    while let Some(id) = session.pending_frame() {
        session.on_frame(id)?;
    }

    let transcript: String = session
        .display()
        .output()
        .chars()
        .filter(|&c| c != '\r')
        .collect();
    println!("{}", transcript.trim_end_matches(config.cv.prompt.as_str()).trim_end());
    Ok(())
}

/// Run the interactive session on the host terminal
fn run_terminal(config: &Config, content: ContentStore) -> anyhow::Result<()> {
    let display = CrosstermDisplay::stdout(&config.terminal, config.get_color_scheme());
    let mut session = SessionController::new(display, content, config.cv.prompt.clone())
        .with_welcome(config.welcome.clone());

    execute!(io::stdout(), EnableFocusChange)?;
    session.start()?;
    if config.terminal.grid_size().is_none() {
        let (cols, rows) = CrosstermDisplay::size()?;
        session.fit(cols, rows)?;
    }

    let result = run_main_loop(&mut session, config.frame_interval());

    // Cleanup even when the loop failed
    let _ = execute!(io::stdout(), DisableFocusChange);
    session.display_mut().close()?;

    result
}

/// Main event loop: key events in, one animation frame per interval
fn run_main_loop(
    session: &mut SessionController<CrosstermDisplay<io::Stdout>>,
    frame_interval: Duration,
) -> anyhow::Result<()> {
    let mut scheduled = None;
    let mut due = Instant::now();

    loop {
        // A new frame request starts a new interval
        match session.pending_frame() {
            Some(id) if scheduled != Some(id) => {
                scheduled = Some(id);
                due = Instant::now() + frame_interval;
            }
            None => scheduled = None,
            _ => {}
        }

        let timeout = match scheduled {
            Some(_) => due.saturating_duration_since(Instant::now()),
            None => IDLE_POLL,
        };

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key_event) => {
                    if key_event.kind != KeyEventKind::Press {
                        continue;
                    }
                    if !session.is_animating() && KeyMapper::is_quit(&key_event) {
                        info!("Quit requested");
                        break;
                    }
                    session.handle_key(KeyMapper::map(&key_event))?;
                }
                Event::Resize(cols, rows) => session.fit(cols, rows)?,
                Event::FocusGained => session.focus()?,
                Event::FocusLost => session.blur()?,
                _ => {}
            }
        }

        if let Some(id) = scheduled {
            if Instant::now() >= due {
                session.on_frame(id)?;
            }
        }
    }

    Ok(())
}
