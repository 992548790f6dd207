//! `ebfe` - Exuberant Binary File Editor
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin ebfe -- some.bin
//! cargo run --bin ebfe -- --help
//! cargo run --bin ebfe -- --driver headless --script 'jj<C-f><tick>q'
//! ```
//!
//! Press `q` or Esc to quit.

use ebfe_tui::app::Application;
use ebfe_tui::driver::{AnsiDriver, AnsiOptions, HeadlessDriver, Message};
use ebfe_tui::error::{Error, Result};
use ebfe_tui::hex::{DEFAULT_STYLES, Editor, wall_clock};
use ebfe_tui::input::{KeyCode, KeyEvent};
use ebfe_tui::log::TracingSink;
use ebfe_tui::style::StyleSheet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ============================================================================
// CLI Parsing
// ============================================================================

const HELP_TEXT: &str = "ebfe - Exuberant Binary File Editor

USAGE:
    ebfe [OPTIONS] [URI]...

ARGS:
    [URI]...                Files to open: a path, file://PATH, or mem://NAME
                            for built-in demo content (default: mem://0)

OPTIONS:
    -h, --help              Print this help message and exit
    --driver <NAME>         Terminal driver: ansi (default) or headless
    --styles <TEXT>         Extra style definitions, e.g. 'status fg=green'
    --log <PATH>            Write a debug log to PATH
    --no-alt-screen         Don't enter alternate screen
    --no-clock              Hide the clock in the title bar
    --headless-size <WxH>   Screen size for the headless driver (default: 80x24)
    --script <KEYS>         Input for the headless driver: plain characters
                            plus <Esc> <Tab> <Enter> <Up> <Down> <PageUp>
                            <PageDown> <C-x> <tick> <resize WxH>

KEYS:
    j / k, Down / Up        Scroll one line
    Ctrl-F / Ctrl-B         Scroll one page
    Tab                     Next stream
    q, Esc                  Quit
";

/// Which driver runs the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverKind {
    Ansi,
    Headless,
}

/// Command-line configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub driver: DriverKind,
    pub styles: Option<String>,
    pub log: Option<PathBuf>,
    pub use_alt_screen: bool,
    pub show_clock: bool,
    pub headless_size: (u32, u32),
    pub script: Vec<Message>,
    pub uris: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            driver: DriverKind::Ansi,
            styles: None,
            log: None,
            use_alt_screen: true,
            show_clock: true,
            headless_size: (80, 24),
            script: Vec::new(),
            uris: Vec::new(),
        }
    }
}

/// Result of CLI parsing.
pub enum ParseResult {
    /// Successfully parsed configuration.
    Config(Config),
    /// User requested help.
    Help,
    /// Parse error with message.
    Error(String),
}

impl Config {
    /// Parse configuration from command-line arguments.
    pub fn from_args<I>(args: I) -> ParseResult
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        // Skip program name
        args.next();

        while let Some(arg) = args.next() {
            let arg_str = arg.to_string_lossy();

            match arg_str.as_ref() {
                "-h" | "--help" => return ParseResult::Help,

                "--driver" => {
                    let Some(value) = args.next() else {
                        return ParseResult::Error("--driver requires a value".to_string());
                    };
                    config.driver = match value.to_string_lossy().as_ref() {
                        "ansi" => DriverKind::Ansi,
                        "headless" => DriverKind::Headless,
                        other => {
                            return ParseResult::Error(format!(
                                "Unknown --driver: {other} (use ansi or headless)"
                            ));
                        }
                    };
                }

                "--styles" => {
                    let Some(value) = args.next() else {
                        return ParseResult::Error("--styles requires a value".to_string());
                    };
                    config.styles = Some(value.to_string_lossy().to_string());
                }

                "--log" => {
                    let Some(value) = args.next() else {
                        return ParseResult::Error("--log requires a path".to_string());
                    };
                    config.log = Some(PathBuf::from(value));
                }

                "--no-alt-screen" => config.use_alt_screen = false,

                "--no-clock" => config.show_clock = false,

                "--headless-size" => {
                    let Some(value) = args.next() else {
                        return ParseResult::Error(
                            "--headless-size requires a value (e.g., 80x24)".to_string(),
                        );
                    };
                    let value = value.to_string_lossy();
                    match parse_size(&value) {
                        Some(size) => config.headless_size = size,
                        None => {
                            return ParseResult::Error(format!(
                                "Invalid --headless-size: {value} (use WxH format, e.g., 80x24)"
                            ));
                        }
                    }
                }

                "--script" => {
                    let Some(value) = args.next() else {
                        return ParseResult::Error("--script requires a value".to_string());
                    };
                    match parse_script(&value.to_string_lossy()) {
                        Ok(script) => config.script = script,
                        Err(msg) => return ParseResult::Error(msg),
                    }
                }

                other if other.starts_with('-') && other.len() > 1 => {
                    return ParseResult::Error(format!("Unknown option: {other}"));
                }

                uri => config.uris.push(uri.to_string()),
            }
        }

        ParseResult::Config(config)
    }
}

/// Parse a size string like "80x24" into (width, height).
fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once('x')?;
    let w = w.parse::<u32>().ok()?;
    let h = h.parse::<u32>().ok()?;
    if w == 0 || h == 0 {
        return None;
    }
    Some((w, h))
}

/// Parse headless input: characters are keys, `<...>` names a special key
/// or message.
fn parse_script(script: &str) -> std::result::Result<Vec<Message>, String> {
    let mut messages = Vec::new();
    let mut rest = script;
    while let Some(c) = rest.chars().next() {
        if c != '<' {
            messages.push(Message::Key(KeyEvent::char(c)));
            rest = &rest[c.len_utf8()..];
            continue;
        }
        let Some(end) = rest.find('>') else {
            return Err(format!("Unterminated key name in --script: {rest}"));
        };
        let name = &rest[1..end];
        rest = &rest[end + 1..];

        let message = match name {
            "Esc" => Message::Key(KeyEvent::key(KeyCode::Esc)),
            "Tab" => Message::Key(KeyEvent::key(KeyCode::Tab)),
            "Enter" => Message::Key(KeyEvent::key(KeyCode::Enter)),
            "Up" => Message::Key(KeyEvent::key(KeyCode::Up)),
            "Down" => Message::Key(KeyEvent::key(KeyCode::Down)),
            "PageUp" => Message::Key(KeyEvent::key(KeyCode::PageUp)),
            "PageDown" => Message::Key(KeyEvent::key(KeyCode::PageDown)),
            "lt" => Message::Key(KeyEvent::char('<')),
            "tick" => Message::Timeout,
            _ => {
                if let Some(size) = name.strip_prefix("resize ") {
                    let (width, height) =
                        parse_size(size).ok_or_else(|| format!("Invalid resize in --script: {size}"))?;
                    Message::Resize { width, height }
                } else if let Some(c) = name.strip_prefix("C-").and_then(single_char) {
                    Message::Key(KeyEvent::with_ctrl(KeyCode::Char(c)))
                } else {
                    return Err(format!("Unknown key in --script: <{name}>"));
                }
            }
        };
        messages.push(message);
    }
    Ok(messages)
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

// ============================================================================
// Logging
// ============================================================================

/// Install a file-backed tracing subscriber. The guard flushes on drop.
fn init_logging(path: &Path) -> Option<WorkerGuard> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = path.file_name()?;
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ebfe=info,ebfe_tui=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .ok()?;

    tracing::info!(log = %path.display(), "tracing initialized");
    Some(guard)
}

// ============================================================================
// Entry Point
// ============================================================================

fn main() {
    let config = match Config::from_args(std::env::args_os()) {
        ParseResult::Config(config) => config,
        ParseResult::Help => {
            print!("{HELP_TEXT}");
            return;
        }
        ParseResult::Error(msg) => {
            eprintln!("Error: {msg}");
            eprintln!("Run with --help for usage information.");
            std::process::exit(1);
        }
    };

    let code = match run(&config) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ebfe: {err}");
            1
        }
    };
    std::process::exit(code);
}

fn run(config: &Config) -> Result<i32> {
    let _log_guard = config.log.as_deref().and_then(init_logging);

    let mut sheet = StyleSheet::parse(DEFAULT_STYLES)?;
    if let Some(extra) = &config.styles {
        sheet.apply(extra)?;
    }
    let mut editor = Editor::open(&config.uris, &sheet)?;
    if config.show_clock {
        editor.set_clock(Some(Box::new(wall_clock)));
    }
    let mut app = Application::new(editor, sheet);
    if config.log.is_some() {
        app = app.with_log_sink(TracingSink);
    }

    match config.driver {
        DriverKind::Ansi => {
            let options = AnsiOptions {
                use_alt_screen: config.use_alt_screen,
                ..AnsiOptions::default()
            };
            let mut driver = AnsiDriver::stdio(options)?;
            finish(app.run(&mut driver))
        }
        DriverKind::Headless => {
            let (width, height) = config.headless_size;
            let mut driver = HeadlessDriver::new(width, height);
            for &message in &config.script {
                driver.push(message);
            }
            let result = finish(app.run(&mut driver));
            println!("{}", driver.screen_text());
            tracing::info!(frames = driver.frames(), "headless run finished");
            result
        }
    }
}

/// Running out of input ends the session normally.
fn finish(result: Result<i32>) -> Result<i32> {
    match result {
        Err(Error::Disconnected) => {
            tracing::info!("input ended");
            Ok(0)
        }
        other => other,
    }
}
