// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Logger facade error implementation

use std::path::PathBuf;

/// Logger facade error type
///
/// None of these errors ever leave the public logging operations. They are produced by the
/// backend and configuration layers and swallowed by [`Facade`](crate::Facade).
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Reading the install path from the system configuration failed
    Config((std::io::Error, &'static str)),
    /// The install path is not configured
    NotFound(&'static str),
    /// The native library or one of its entry points could not be loaded
    Load((libloading::Error, PathBuf)),
    /// The native library returned an invalid identity handle
    Registration(i32),
    /// A native call reported failure
    Native((&'static str, i32)),
    /// A message template could not be formatted
    Format(&'static str),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config((e, _)) => Some(e),
            Error::Load((e, _)) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Config((e, description)) => write!(f, "Config error: {}, {}", description, e),
            Error::NotFound(description) => write!(f, "Not found: {}", description),
            Error::Load((e, path)) => write!(f, "Failed to load {}: {}", path.display(), e),
            Error::Registration(handle) => {
                write!(f, "Registration failed, identity handle {}", handle)
            }
            Error::Native((entry_point, code)) => {
                write!(f, "Native call {} failed with {}", entry_point, code)
            }
            Error::Format(description) => write!(f, "Format error, {}", description),
        }
    }
}
