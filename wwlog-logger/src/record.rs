// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

use log::Level;
use time::OffsetDateTime;
use wwlog::Category;

/// Target prefix of records emitted by the facade crate itself
const INTERNAL_TARGET: &str = "wwlog";

/// Log record as seen by the outputs of this logger
#[derive(Debug)]
pub struct Record<'a> {
    pub timestamp: OffsetDateTime,
    pub level: Level,
    pub target: &'a str,
    pub pid: u32,
    /// Category the record is forwarded under, `None` if it is not forwarded
    pub category: Option<Category>,
    pub message: &'a str,
}

impl<'a> Record<'a> {
    /// Create a record stamped with the current time
    pub fn new(level: Level, target: &'a str, message: &'a str) -> Record<'a> {
        let category = (!is_internal(target)).then(|| route(level, target));
        Record {
            timestamp: OffsetDateTime::now_utc(),
            level,
            target,
            pid: std::process::id(),
            category,
            message,
        }
    }
}

/// Whether `target` belongs to the facade crate. Such records must never be forwarded to the
/// facade, which may be emitting them while it initializes.
pub fn is_internal(target: &str) -> bool {
    target
        .strip_prefix(INTERNAL_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Category for a record. A target naming a category wins over the level.
pub fn route(level: Level, target: &str) -> Category {
    target.parse().unwrap_or_else(|_| implied(level))
}

/// Category a level routes to when the target names none
pub fn implied(level: Level) -> Category {
    match level {
        Level::Error => Category::Error,
        Level::Warn => Category::Warning,
        Level::Info => Category::Info,
        Level::Debug | Level::Trace => Category::Trace,
    }
}
