// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Backend calling into the native logger library.

use crate::backend::{Backend, Category, Cookie, Identity, Stats, CUSTOM_FLAG_CATEGORY};
use crate::config::Config;
use crate::error::Error;
use libloading::Library;
use log::debug;
use std::ffi::c_int;
use std::iter;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

type RegisterClientFn = unsafe extern "system" fn(identity: *mut c_int) -> c_int;
type SetIdentityNameFn = unsafe extern "system" fn(identity: c_int, name: *const u16) -> c_int;
type LogFn = unsafe extern "system" fn(identity: c_int, message: *const u16);
type RegisterFlagFn =
    unsafe extern "system" fn(identity: c_int, custom_flag: c_int, name: *const u16) -> c_int;
type RegisterFlagExFn = unsafe extern "system" fn(
    identity: c_int,
    custom_flag: c_int,
    name: *const u16,
    default_value: c_int,
) -> c_int;
type LogCustomFn = unsafe extern "system" fn(identity: c_int, cookie: c_int, message: *const u16);
type GetStatsFn = unsafe extern "system" fn(
    host: *const u16,
    error_count: *mut c_int,
    last_error: *mut i64,
    warning_count: *mut c_int,
    last_warning: *mut i64,
) -> c_int;

/// 100ns ticks between 1601-01-01 and 1970-01-01
const FILETIME_UNIX_EPOCH: i64 = 116_444_736_000_000_000;

/// Entry point of a built-in category
fn entry_point(category: Category) -> &'static str {
    match category {
        Category::Error => "LOGERROR",
        Category::Warning => "LOGWARNING",
        Category::Info => "LOGINFO",
        Category::Trace => "LOGTRACE",
        Category::StartStop => "LOGSTARTSTOP",
        Category::EntryExit => "LOGENTRYEXIT",
        Category::ThreadStartStop => "LOGTHREADSTARTSTOP",
        Category::Sql => "LOGSQL",
        Category::Connection => "LOGCONNECTION",
        Category::CtorDtor => "LOGCTORDTOR",
        Category::RefCount => "LOGREFCOUNT",
    }
}

/// The native logger library with all entry points resolved.
///
/// The function pointers stay valid as long as `_library` is loaded.
pub struct NativeBackend {
    register_client: RegisterClientFn,
    unregister_client: RegisterClientFn,
    set_identity_name: SetIdentityNameFn,
    /// Category loggers indexed by `Category::code() - 1`
    loggers: Vec<LogFn>,
    register_flag: RegisterFlagFn,
    register_flag_ex: RegisterFlagExFn,
    log_custom: LogCustomFn,
    get_stats: GetStatsFn,
    path: PathBuf,
    _library: Library,
}

impl std::fmt::Debug for NativeBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeBackend")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl NativeBackend {
    /// Locate the library through `config` and load it
    pub fn discover(config: &Config) -> Result<Self, Error> {
        let path = config.resolve_library_path()?;
        Self::open(path)
    }

    /// Load the library at `path` and resolve every entry point
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, Error> {
        let path = path.into();
        debug!("Loading logger library {path:?}");

        // Safety: loading runs the library initializers. The logger library is trusted.
        let library =
            unsafe { Library::new(&path) }.map_err(|e| Error::Load((e, path.clone())))?;

        // Safety: the signatures match the exports of the logger library
        unsafe {
            let mut loggers = Vec::with_capacity(Category::ALL.len());
            for category in Category::ALL {
                loggers.push(symbol::<LogFn>(&library, &path, entry_point(category))?);
            }

            Ok(Self {
                register_client: symbol(&library, &path, "REGISTERLOGGERCLIENT")?,
                unregister_client: symbol(&library, &path, "UNREGISTERLOGGERCLIENT")?,
                set_identity_name: symbol(&library, &path, "SETIDENTITYNAME")?,
                loggers,
                register_flag: symbol(&library, &path, "REGISTERLOGFLAG")?,
                register_flag_ex: symbol(&library, &path, "REGISTERLOGFLAGEX")?,
                log_custom: symbol(&library, &path, "LOGCUSTOM2")?,
                get_stats: symbol(&library, &path, "GETLOGGERSTATS")?,
                path,
                _library: library,
            })
        }
    }

    /// Path the library was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolve `name` in `library`.
///
/// # Safety
///
/// `T` must match the signature of the exported symbol.
unsafe fn symbol<T: Copy>(library: &Library, path: &Path, name: &'static str) -> Result<T, Error> {
    library
        .get::<T>(name.as_bytes())
        .map(|symbol| *symbol)
        .map_err(|e| Error::Load((e, path.to_path_buf())))
}

impl Backend for NativeBackend {
    fn register_client(&self) -> Result<Identity, Error> {
        let mut handle: c_int = 0;
        // Safety: handle is a valid out pointer. The status is not meaningful, the handle is.
        unsafe { (self.register_client)(&mut handle) };
        Identity::new(handle).ok_or(Error::Registration(handle))
    }

    fn unregister_client(&self, identity: Identity) -> Result<(), Error> {
        let mut handle = identity.get();
        // Safety: handle is a valid in/out pointer
        unsafe { (self.unregister_client)(&mut handle) };
        Ok(())
    }

    fn set_identity_name(&self, identity: Identity, name: &str) -> Result<(), Error> {
        let name = wide(name);
        // Safety: name is NUL-terminated and outlives the call
        unsafe { (self.set_identity_name)(identity.get(), name.as_ptr()) };
        Ok(())
    }

    fn log(&self, identity: Identity, category: Category, message: &str) -> Result<(), Error> {
        let logger = self.loggers[category.code() as usize - 1];
        let message = wide(message);
        // Safety: message is NUL-terminated and outlives the call
        unsafe { logger(identity.get(), message.as_ptr()) };
        Ok(())
    }

    fn register_flag(
        &self,
        identity: Identity,
        name: &str,
        default_on: Option<bool>,
    ) -> Result<Cookie, Error> {
        let name = wide(name);
        // Safety: name is NUL-terminated and outlives the call
        let cookie = unsafe {
            match default_on {
                None => (self.register_flag)(identity.get(), CUSTOM_FLAG_CATEGORY, name.as_ptr()),
                Some(on) => (self.register_flag_ex)(
                    identity.get(),
                    CUSTOM_FLAG_CATEGORY,
                    name.as_ptr(),
                    on as c_int,
                ),
            }
        };
        Cookie::new(cookie).ok_or(Error::Native(("REGISTERLOGFLAG", cookie)))
    }

    fn log_custom(&self, identity: Identity, cookie: Cookie, message: &str) -> Result<(), Error> {
        let message = wide(message);
        // Safety: message is NUL-terminated and outlives the call
        unsafe { (self.log_custom)(identity.get(), cookie.get(), message.as_ptr()) };
        Ok(())
    }

    fn stats(&self, host: &str) -> Result<Stats, Error> {
        let host = wide(host);
        let mut error_count: c_int = 0;
        let mut last_error: i64 = 0;
        let mut warning_count: c_int = 0;
        let mut last_warning: i64 = 0;

        // Safety: host is NUL-terminated, all out pointers are valid
        let status = unsafe {
            (self.get_stats)(
                host.as_ptr(),
                &mut error_count,
                &mut last_error,
                &mut warning_count,
                &mut last_warning,
            )
        };
        if status <= 0 {
            return Err(Error::Native(("GETLOGGERSTATS", status)));
        }

        Ok(Stats {
            error_count,
            last_error: from_filetime(last_error),
            warning_count,
            last_warning: from_filetime(last_warning),
        })
    }
}

/// Encode `s` as NUL-terminated UTF-16. The string is cut at the first interior NUL.
pub(crate) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16()
        .take_while(|&c| c != 0)
        .chain(iter::once(0))
        .collect()
}

/// Convert a FILETIME tick count. Zero (never) and out of range values yield `None`.
fn from_filetime(ticks: i64) -> Option<OffsetDateTime> {
    if ticks <= 0 {
        return None;
    }
    let nanos = (i128::from(ticks) - i128::from(FILETIME_UNIX_EPOCH)) * 100;
    OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
}
