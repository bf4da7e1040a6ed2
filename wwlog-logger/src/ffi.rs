// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

use log::LevelFilter;
use std::ffi::c_int;

/// Initialize the logger from C. Unknown level filters disable logging.
/// Does nothing if a logger is already set.
#[no_mangle]
extern "C" fn __init(level_filter: c_int, console: bool, forward: bool) {
    let level_filter = match level_filter {
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        5 => LevelFilter::Trace,
        _ => LevelFilter::Off,
    };
    let _ = crate::try_init(level_filter, console, forward);
}
