// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Interface to the logging backend.
//!
//! The [`Facade`](crate::Facade) only talks to a [`Backend`]. The production implementation is
//! [`NativeBackend`](crate::native::NativeBackend); tests substitute a recording double.

use crate::error::Error;
use std::fmt;
use std::num::NonZeroI32;
use std::str::FromStr;
use time::OffsetDateTime;

/// Category code under which custom flags are registered
pub const CUSTOM_FLAG_CATEGORY: i32 = 11;

/// Identity handle handed out by the backend on client registration.
///
/// Opaque to this crate. A handle of 0 means "not registered" and is rejected on construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Identity(NonZeroI32);

impl Identity {
    /// Wrap a raw handle. Returns `None` for 0.
    pub fn new(handle: i32) -> Option<Self> {
        NonZeroI32::new(handle).map(Self)
    }

    /// The raw handle
    pub fn get(self) -> i32 {
        self.0.get()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cookie of a registered custom flag
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cookie(NonZeroI32);

impl Cookie {
    /// Wrap a raw cookie. Returns `None` for 0.
    pub fn new(cookie: i32) -> Option<Self> {
        NonZeroI32::new(cookie).map(Self)
    }

    /// The raw cookie
    pub fn get(self) -> i32 {
        self.0.get()
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Built-in message categories
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// An error condition from which the caller cannot continue
    Error = 1,
    /// An error condition from which the caller can continue
    Warning = 2,
    /// Completion of large tasks and similar things of casual interest
    Info = 3,
    Trace = 4,
    /// A component started or stopped
    StartStop = 5,
    /// A function was entered or exited
    EntryExit = 6,
    /// A thread started or stopped
    ThreadStartStop = 7,
    /// SQL statements and related messages
    Sql = 8,
    Connection = 9,
    /// A constructor or destructor ran
    CtorDtor = 10,
    /// Object reference counts
    RefCount = 11,
}

impl Category {
    /// All categories in code order
    pub const ALL: [Category; 11] = [
        Category::Error,
        Category::Warning,
        Category::Info,
        Category::Trace,
        Category::StartStop,
        Category::EntryExit,
        Category::ThreadStartStop,
        Category::Sql,
        Category::Connection,
        Category::CtorDtor,
        Category::RefCount,
    ];

    /// Stable numeric code used on the C interface
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Look up a category by its numeric code
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Lowercase name of the category
    pub fn name(self) -> &'static str {
        match self {
            Category::Error => "error",
            Category::Warning => "warning",
            Category::Info => "info",
            Category::Trace => "trace",
            Category::StartStop => "startstop",
            Category::EntryExit => "entryexit",
            Category::ThreadStartStop => "threadstartstop",
            Category::Sql => "sql",
            Category::Connection => "connection",
            Category::CtorDtor => "ctordtor",
            Category::RefCount => "refcount",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown category name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError(String);

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category `{}`", self.0)
    }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == lower)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// Aggregate counters maintained by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub error_count: i32,
    pub last_error: Option<OffsetDateTime>,
    pub warning_count: i32,
    pub last_warning: Option<OffsetDateTime>,
}

/// A logging backend.
///
/// Implementations must be callable from any thread. Failures are reported as [`Error`] and
/// never surface past the facade.
pub trait Backend: Send + Sync {
    /// Register a logging client and return its identity
    fn register_client(&self) -> Result<Identity, Error>;

    /// Release an identity obtained from [`Backend::register_client`]
    fn unregister_client(&self, identity: Identity) -> Result<(), Error>;

    /// Set the human readable name shown for `identity`
    fn set_identity_name(&self, identity: Identity, name: &str) -> Result<(), Error>;

    /// Log `message` under `category`
    fn log(&self, identity: Identity, category: Category, message: &str) -> Result<(), Error>;

    /// Register a custom flag named `name` under [`CUSTOM_FLAG_CATEGORY`].
    ///
    /// `default_on` of `None` leaves the backend default (off) in place.
    fn register_flag(
        &self,
        identity: Identity,
        name: &str,
        default_on: Option<bool>,
    ) -> Result<Cookie, Error>;

    /// Log `message` under the custom flag identified by `cookie`
    fn log_custom(&self, identity: Identity, cookie: Cookie, message: &str) -> Result<(), Error>;

    /// Query aggregate counters, filtered by `host` (empty for all hosts)
    fn stats(&self, host: &str) -> Result<Stats, Error>;
}

#[cfg(test)]
mod test {
    use super::{Category, Cookie, Identity};

    #[test]
    fn zero_handles_are_rejected() {
        assert!(Identity::new(0).is_none());
        assert!(Cookie::new(0).is_none());
        assert_eq!(Identity::new(-7).map(Identity::get), Some(-7));
        assert_eq!(Cookie::new(3).map(Cookie::get), Some(3));
    }

    #[test]
    fn category_codes() {
        for category in Category::ALL {
            assert_eq!(Category::from_code(category.code()), Some(category));
        }
        assert_eq!(Category::from_code(0), None);
        assert_eq!(Category::from_code(12), None);
    }

    #[test]
    fn category_names() {
        assert_eq!("sql".parse::<Category>(), Ok(Category::Sql));
        assert_eq!("RefCount".parse::<Category>(), Ok(Category::RefCount));
        assert!("verbose".parse::<Category>().is_err());
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>(), Ok(category));
        }
    }
}
