// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Facade over the ArchestrA logger library.
//!
//! The native logger library (`LoggerDll.dll`) is located through the registry value
//! `HKEY_LOCAL_MACHINE\Software\ArchestrA\Framework\Logger\InstallPath`, loaded on first use
//! and called with a client identity registered once per process.
//!
//! Every logging function is best effort. If the library cannot be found, loaded or
//! registered with, messages are silently dropped and the counters report `-1`. Nothing is
//! retried: a failed initialization stays failed for the life of the process.
//!
//! ```no_run
//! wwlog::log_info("Service started");
//! wwlog::log_error_format("Value out of range: {0}", &[&42]);
//!
//! if let Some(cookie) = wwlog::register_custom_flag("Polling") {
//!     wwlog::log_custom(cookie, "Polled 12 items");
//! }
//! ```
//!
//! The process-wide facade never unregisters its identity; the registration is released
//! when the process exits. Owned [`Facade`] instances unregister on drop.

pub mod backend;
pub mod config;
pub mod error;
mod facade;
mod ffi;
pub mod format;
pub mod native;

pub use backend::{Backend, Category, Cookie, Identity, Stats};
pub use config::Config;
pub use error::Error;
pub use facade::{default_identity_name, Facade};

use std::fmt::Display;
use std::sync::OnceLock;

static FACADE: OnceLock<Facade> = OnceLock::new();

/// The process-wide facade. Created from [`Config::from_env`] unless one was installed
/// with [`set_facade`] before.
pub fn facade() -> &'static Facade {
    FACADE.get_or_init(|| Facade::native(Config::from_env()))
}

/// Install the process-wide facade. Fails, returning `facade`, if it is already set.
pub fn set_facade(facade: Facade) -> Result<(), Facade> {
    FACADE.set(facade)
}

/// Log an error condition from which the caller cannot continue
pub fn log_error(message: &str) {
    facade().error(message)
}

/// Log an error message built from `template` and positional `args`.
///
/// Without arguments the template is logged verbatim.
pub fn log_error_format(template: &str, args: &[&dyn Display]) {
    facade().error_format(template, args)
}

/// Log an error condition from which the caller can continue
pub fn log_warning(message: &str) {
    facade().warning(message)
}

/// Log completion of a large task or something else of casual interest
pub fn log_info(message: &str) {
    facade().info(message)
}

pub fn log_trace(message: &str) {
    facade().trace(message)
}

/// Log that a component started or stopped
pub fn log_start_stop(message: &str) {
    facade().start_stop(message)
}

/// Log that a thread started or stopped
pub fn log_thread_start_stop(message: &str) {
    facade().thread_start_stop(message)
}

pub fn log_connection(message: &str) {
    facade().connection(message)
}

/// Log an object reference count
pub fn log_reference_count(message: &str) {
    facade().reference_count(message)
}

/// Log that a constructor or destructor ran
pub fn log_ctor_dtor(message: &str) {
    facade().ctor_dtor(message)
}

/// Log a SQL statement or related message
pub fn log_sql(message: &str) {
    facade().sql(message)
}

/// Log that a function was entered or exited
pub fn log_entry_exit(message: &str) {
    facade().entry_exit(message)
}

/// Replace the default identity name (`wwlog`)
pub fn set_identity_name(name: &str) {
    facade().set_identity_name(name)
}

/// Register a custom flag that is off by default.
///
/// Messages logged under the flag are recorded only once the flag is switched on in the
/// logger. Returns `None` if the logger is unavailable.
pub fn register_custom_flag(name: &str) -> Option<Cookie> {
    facade().register_custom_flag(name)
}

/// Register a custom flag that is on or off by default
pub fn register_custom_flag_ex(name: &str, default_on: bool) -> Option<Cookie> {
    facade().register_custom_flag_ex(name, default_on)
}

/// Log `message` under a custom flag
pub fn log_custom(cookie: Cookie, message: &str) {
    facade().log_custom(cookie, message)
}

/// Aggregate counters of the logger
pub fn stats() -> Option<Stats> {
    facade().stats()
}

/// Number of errors logged, or `-1` if unavailable
pub fn error_count() -> i32 {
    facade().error_count()
}

/// Number of warnings logged, or `-1` if unavailable
pub fn warning_count() -> i32 {
    facade().warning_count()
}

#[cfg(test)]
mod tests;
