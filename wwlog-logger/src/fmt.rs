// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

use crate::record::{implied, Record};
use console::{style, Color};
use log::Level;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use time::format_description::FormatItem;
use time::macros::format_description;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour]:[minute]:[second].[subsecond digits:3]");

/// Width of the widest target seen so far
static TARGET_SIZE: AtomicUsize = AtomicUsize::new(16);

/// Write `record` as a single line
pub fn format<W: io::Write>(record: &Record, mut writer: W) -> io::Result<()> {
    let timestamp = record
        .timestamp
        .format(TIMESTAMP_FORMAT)
        .map_err(io::Error::other)?;

    let level = {
        let level_color = match record.level {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug => Color::Color256(243),
            Level::Trace => Color::White,
        };
        style(record.level).bold().fg(level_color)
    };

    let target = {
        let target = record.target;
        TARGET_SIZE.fetch_max(target.len(), Ordering::Relaxed);
        let target_size = TARGET_SIZE.load(Ordering::Relaxed);
        style(format!("{target:<target_size$}")).fg(target.color())
    };

    let pid = record.pid;
    let message = record.message;

    // Show the category only if it differs from what the level implies
    match record.category {
        Some(category) if category != implied(record.level) => writeln!(
            writer,
            "{timestamp} {target} ({pid}): {level:<5}: [{category}] {message}"
        ),
        _ => writeln!(writer, "{timestamp} {target} ({pid}): {level:<5}: {message}"),
    }
}

/// Generate a color of `self`.
trait HashColor {
    fn color(&self) -> Color;
}

impl HashColor for &str {
    fn color(&self) -> Color {
        let hash = self.bytes().fold(42u8, |c, x| c ^ x);
        // Skip black and the darkest grays
        let hash = match hash {
            c @ 0..=1 => c + 2,
            c @ 232..=240 => c + 9,
            c => c,
        };
        Color::Color256(hash)
    }
}
