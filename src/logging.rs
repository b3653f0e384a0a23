use chrono::Local;
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::OnceLock;

/// Log targets that can be named in the debug filter.
pub const TOPICS: [&str; 4] = ["movement", "collision", "command", "clock"];

// Custom logger structure
#[derive(Debug)]
struct HeroDuelLogger {
    level: LevelFilter,
    debug_filters: Option<HashSet<String>>,
}

/// Finds the number following `label` in a message, e.g. "Hero 1" -> 1.
fn number_after(message: &str, label: &str) -> Option<u64> {
    let start = message.find(label)? + label.len();
    let digits: String = message[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Builds the "[H01][T00042] " prefix from whatever context the message carries.
fn context_prefix(message: &str) -> String {
    // Messages from the topic macros already carry their own prefix
    if message.starts_with("[H") || message.starts_with("[T") {
        return String::new();
    }

    let mut context = String::new();
    if let Some(hero) = number_after(message, "Hero ") {
        context.push_str(&format!("[H{:02}]", hero));
    }
    if let Some(tick) = number_after(message, "Tick ") {
        context.push_str(&format!("[T{:05}]", tick));
    }
    if !context.is_empty() {
        context.push(' ');
    }
    context
}

impl HeroDuelLogger {
    fn passes_filter(&self, metadata: &Metadata) -> bool {
        match &self.debug_filters {
            Some(filters)
                if metadata.level() == log::Level::Debug
                    || metadata.level() == log::Level::Trace =>
            {
                filters.contains(metadata.target())
                    || filters.iter().any(|f| metadata.target().starts_with(f.as_str()))
            }
            _ => true,
        }
    }
}

// Implement the log::Log trait for our custom logger
impl log::Log for HeroDuelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && self.passes_filter(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_color = match record.level() {
            log::Level::Error => "\x1B[31m", // Red
            log::Level::Warn => "\x1B[33m",  // Yellow
            log::Level::Info => "\x1B[32m",  // Green
            log::Level::Debug => "\x1B[36m", // Cyan
            log::Level::Trace => "\x1B[35m", // Magenta
        };
        let reset = "\x1B[0m";
        let timestamp = Local::now().format("%H:%M:%S%.3f");

        let message = record.args().to_string();
        let context = context_prefix(&message);

        let output = format!(
            "{timestamp} {level_color}{level:5}{reset} {context}{target}: {message}",
            level = record.level(),
            target = record.target(),
        );

        // A closed stdout is not worth crashing the game over
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", output);
        let _ = stdout.flush();
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

static LOGGER: OnceLock<HeroDuelLogger> = OnceLock::new();

/// Parses a comma separated topic list such as "movement, collision".
pub fn parse_debug_filter(filter: &str) -> HashSet<String> {
    filter
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Maps a level name from the command line; unknown names fall back to info.
pub fn parse_level(name: &str) -> LevelFilter {
    match name.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

// Initialize the logger with optional debug filters
pub fn init_logger(level: LevelFilter, debug_filter: Option<String>) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| HeroDuelLogger {
        level,
        debug_filters: debug_filter.as_deref().map(parse_debug_filter),
    });
    log::set_logger(logger).map(|()| log::set_max_level(level))
}

// Helper macros for specific debug topics
#[macro_export]
macro_rules! debug_movement {
    ($hero:expr, $tick:expr, $($arg:tt)*) => {
        log::debug!(target: "movement", "[H{:02}][T{:05}] {}", $hero, $tick, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_collision {
    ($hero:expr, $tick:expr, $($arg:tt)*) => {
        log::debug!(target: "collision", "[H{:02}][T{:05}] {}", $hero, $tick, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_command {
    ($hero:expr, $tick:expr, $($arg:tt)*) => {
        log::debug!(target: "command", "[H{:02}][T{:05}] {}", $hero, $tick, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_clock {
    ($tick:expr, $($arg:tt)*) => {
        log::debug!(target: "clock", "[T{:05}] {}", $tick, format_args!($($arg)*))
    };
}
