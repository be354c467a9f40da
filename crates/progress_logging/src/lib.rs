#![deny(missing_docs)]
//! Logging for the progress tracker crates.
//!
//! Library code logs through the `progress_*` macros (thin wrappers over the
//! `log` facade); `progress-watch` installs a `simplelog` backend at startup
//! and test binaries call [`initialize_for_tests`].

use std::fs::{File, OpenOptions};
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// `log::trace!` under the workspace prefix.
#[macro_export]
macro_rules! progress_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// `log::debug!` under the workspace prefix.
#[macro_export]
macro_rules! progress_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// `log::info!` under the workspace prefix.
#[macro_export]
macro_rules! progress_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// `log::warn!` under the workspace prefix.
#[macro_export]
macro_rules! progress_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// `log::error!` under the workspace prefix.
#[macro_export]
macro_rules! progress_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Where log records go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Append to the log file only.
    File,
    /// Terminal only; warnings and errors go to stderr.
    Terminal,
    /// Terminal and log file.
    Both,
}

impl LogDestination {
    fn wants_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }

    fn wants_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }
}

// HTTP and TLS internals are far chattier than the poll loops at debug.
const QUIET_TARGETS: [&str; 4] = ["hyper", "hyper_util", "reqwest", "rustls"];

/// Installs the global logger.
///
/// The file at `log_path` is appended to, so consecutive sessions share one
/// log. If it cannot be opened the problem is reported on stderr and only the
/// terminal logger (if any) is installed. A second call is a no-op.
pub fn initialize(destination: LogDestination, level: LevelFilter, log_path: &Path) {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if destination.wants_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if destination.wants_file() {
        if let Some(file_logger) = open_file_logger(level, config, log_path) {
            loggers.push(file_logger);
        }
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

/// Terminal logger for test binaries; later calls are ignored.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        build_config(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error);
    for target in QUIET_TARGETS {
        builder.add_filter_ignore_str(target);
    }
    builder.build()
}

fn open_file_logger(
    level: LevelFilter,
    config: Config,
    log_path: &Path,
) -> Option<Box<WriteLogger<File>>> {
    let opened = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path);
    match opened {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("progress-watch: cannot open log file {}: {}", log_path.display(), err);
            None
        }
    }
}
