// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

use log::LevelFilter;
use std::{thread, time};

fn main() {
    // Echo diagnostics of the facade itself to the console, don't forward.
    wwlog_logger::init(LevelFilter::Debug, true, false);

    wwlog::set_identity_name("wwlog hello");
    wwlog::log_start_stop("Starting hello");

    // Logs a format string on the error category.
    wwlog::log_error_format("You ask your mom, please? but she still says, {0}!", &[&"No"]);

    // Braces are kept without arguments.
    wwlog::log_error_format("{0} is not a placeholder here", &[]);

    wwlog::log_warning("You missed two classes");

    let homework = wwlog::register_custom_flag_ex("Homework", true);

    for _ in 0..3 {
        if let Some(cookie) = homework {
            wwlog::log_custom(cookie, "And no homework");
        }
        thread::sleep(time::Duration::from_secs(1));
    }

    match wwlog::stats() {
        Some(stats) => log::info!(
            "{} errors, {} warnings, last error at {:?}",
            stats.error_count,
            stats.warning_count,
            stats.last_error
        ),
        None => log::warn!("Logger stats unavailable"),
    }

    wwlog::log_start_stop("Stopping hello");
}
