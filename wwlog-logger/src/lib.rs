// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! `log` implementation on top of the ArchestrA logger facade.
//!
//! Records are forwarded to the process-wide [`wwlog`] facade under the category named by
//! their target (`sql`, `connection`, ...) or implied by their level, and optionally echoed
//! to the console. Records of the facade crate itself are echoed only.

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::str::FromStr;
use wwlog::Facade;

mod console;
pub mod fmt;
mod ffi;
pub mod record;

const ENV_RUST_LOG: &str = "RUST_LOG";

/// Initialize the logger.
///
/// A valid level passed as `RUST_LOG` environment variable overrides `level`.
/// Enable output to `stdout` via `console`.
/// Enable forwarding to the native logger via `forward`.
///
/// # Panics
///
/// Panics if a logger is already set.
pub fn init(level: LevelFilter, console: bool, forward: bool) {
    try_init(level, console, forward).expect("failed to set logger")
}

/// Initialize the logger. Fails if a logger is already set.
pub fn try_init(level: LevelFilter, console: bool, forward: bool) -> Result<(), SetLoggerError> {
    let logger = Logger::new(console, forward.then(wwlog::facade));

    // Set the maximum log level the log subsystem will forward to this logger impl.
    log::set_max_level(level_from_env().unwrap_or(level));
    // Set the logger in the global subsystem.
    log::set_boxed_logger(Box::new(logger))
}

/// The bridging logger
#[derive(Debug)]
pub struct Logger {
    console: Option<console::Console>,
    facade: Option<&'static Facade>,
}

impl Logger {
    /// Create a new logger that echoes to the console if `console` is set and forwards to
    /// `facade` if given.
    pub fn new(console: bool, facade: Option<&'static Facade>) -> Self {
        let console = console.then(console::Console::default);
        Self { console, facade }
    }
}

impl Log for Logger {
    /// Check if a log message with the specified metadata would be logged.
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        let message = record.args().to_string();
        let record = record::Record::new(record.level(), record.target(), &message);

        if let Some(console) = &self.console {
            let _ = console.write(&record);
        }

        if let (Some(facade), Some(category)) = (self.facade, record.category) {
            facade.log(category, record.message);
        }
    }

    fn flush(&self) {}
}

/// Try to parse the log level from the environment variable `RUST_LOG`.
fn level_from_env() -> Option<LevelFilter> {
    std::env::var(ENV_RUST_LOG).ok().and_then(|s| {
        LevelFilter::from_str(&s)
            .inspect_err(|_| eprintln!("Failed to parse log level from `RUST_LOG={s}`"))
            .ok()
    })
}
