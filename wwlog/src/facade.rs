// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! The logging facade.
//!
//! A [`Facade`] loads its backend on first use, registers a client identity once and then
//! forwards messages under that identity. Logging is best effort: no operation returns an
//! error or panics because the backend is missing or misbehaves. The only observable failure
//! signals are [`Facade::register_custom_flag`] returning `None` and the counters returning
//! `-1`.

use crate::backend::{Backend, Category, Cookie, Identity, Stats};
use crate::config::Config;
use crate::error::Error;
use crate::format::format;
use crate::native::NativeBackend;
use log::{debug, trace};
use std::borrow::Cow;
use std::fmt::{self, Display};
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

/// Opens the backend. Called at most once per facade.
type Opener = dyn Fn() -> Result<Box<dyn Backend>, Error> + Send + Sync;

/// Lazily initialized logging facade
pub struct Facade {
    opener: Box<Opener>,
    /// Name set for the identity right after registration
    default_name: String,
    /// Set once the load was attempted. `None` inside if it failed.
    backend: OnceLock<Option<Box<dyn Backend>>>,
    /// Set once registration was attempted. `None` inside if it failed.
    identity: OnceLock<Option<Identity>>,
}

impl fmt::Debug for Facade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facade")
            .field("default_name", &self.default_name)
            .field("loaded", &self.is_loaded())
            .field("identity", &self.identity())
            .finish()
    }
}

impl Facade {
    /// Create a facade that opens its backend through `opener` on first use
    pub fn new<S, F>(default_name: S, opener: F) -> Self
    where
        S: Into<String>,
        F: Fn() -> Result<Box<dyn Backend>, Error> + Send + Sync + 'static,
    {
        Self {
            opener: Box::new(opener),
            default_name: default_name.into(),
            backend: OnceLock::new(),
            identity: OnceLock::new(),
        }
    }

    /// Create a facade backed by the native logger library located through `config`
    pub fn native(config: Config) -> Self {
        Self::new(default_identity_name(), move || {
            let backend = NativeBackend::discover(&config)?;
            Ok(Box::new(backend) as Box<dyn Backend>)
        })
    }

    /// Whether the backend was loaded successfully. Does not trigger loading.
    pub fn is_loaded(&self) -> bool {
        matches!(self.backend.get(), Some(Some(_)))
    }

    /// The registered identity, if any. Does not trigger registration.
    pub fn identity(&self) -> Option<Identity> {
        self.identity.get().copied().flatten()
    }

    /// Load the backend unless that was attempted before
    fn backend(&self) -> Option<&dyn Backend> {
        self.backend
            .get_or_init(|| {
                let backend = suppress("load logger backend", || (self.opener)());
                if backend.is_none() {
                    debug!("Logger backend unavailable, messages are dropped");
                }
                backend
            })
            .as_deref()
    }

    /// Load the backend and register the identity unless that was attempted before
    fn registered(&self) -> Option<(&dyn Backend, Identity)> {
        let backend = self.backend()?;
        let identity = *self.identity.get_or_init(|| {
            let identity = suppress("register logger client", || backend.register_client())?;
            trace!("Registered logger client {identity}");
            suppress("set identity name", || {
                backend.set_identity_name(identity, &self.default_name)
            });
            Some(identity)
        });
        identity.map(|identity| (backend, identity))
    }

    /// Log `message` under `category`
    pub fn log(&self, category: Category, message: &str) {
        if let Some((backend, identity)) = self.registered() {
            suppress("log message", || backend.log(identity, category, message));
        }
    }

    /// Log an error condition from which the caller cannot continue
    pub fn error(&self, message: &str) {
        self.log(Category::Error, message)
    }

    /// Log an error message built from `template` and `args`.
    ///
    /// See [`format`](crate::format) for the template syntax. Without arguments the template
    /// is logged verbatim. A template that fails to format is logged verbatim as well.
    pub fn error_format(&self, template: &str, args: &[&dyn Display]) {
        let Some((backend, identity)) = self.registered() else {
            return;
        };

        let message = if args.is_empty() {
            Cow::Borrowed(template)
        } else {
            suppress("format message", || format(template, args))
                .map_or(Cow::Borrowed(template), Cow::Owned)
        };

        suppress("log message", || {
            backend.log(identity, Category::Error, &message)
        });
    }

    /// Log an error condition from which the caller can continue
    pub fn warning(&self, message: &str) {
        self.log(Category::Warning, message)
    }

    /// Log completion of a large task or something else of casual interest
    pub fn info(&self, message: &str) {
        self.log(Category::Info, message)
    }

    pub fn trace(&self, message: &str) {
        self.log(Category::Trace, message)
    }

    /// Log that a component started or stopped
    pub fn start_stop(&self, message: &str) {
        self.log(Category::StartStop, message)
    }

    /// Log that a function was entered or exited
    pub fn entry_exit(&self, message: &str) {
        self.log(Category::EntryExit, message)
    }

    /// Log that a thread started or stopped
    pub fn thread_start_stop(&self, message: &str) {
        self.log(Category::ThreadStartStop, message)
    }

    /// Log a SQL statement or related message
    pub fn sql(&self, message: &str) {
        self.log(Category::Sql, message)
    }

    pub fn connection(&self, message: &str) {
        self.log(Category::Connection, message)
    }

    /// Log that a constructor or destructor ran
    pub fn ctor_dtor(&self, message: &str) {
        self.log(Category::CtorDtor, message)
    }

    /// Log an object reference count
    pub fn reference_count(&self, message: &str) {
        self.log(Category::RefCount, message)
    }

    /// Replace the default identity name
    pub fn set_identity_name(&self, name: &str) {
        if let Some((backend, identity)) = self.registered() {
            suppress("set identity name", || {
                backend.set_identity_name(identity, name)
            });
        }
    }

    /// Register a custom flag that is off by default.
    ///
    /// Returns the cookie to pass to [`Facade::log_custom`], or `None` if the backend is
    /// unavailable or refused the flag.
    pub fn register_custom_flag(&self, name: &str) -> Option<Cookie> {
        let (backend, identity) = self.registered()?;
        suppress("register custom flag", || {
            backend.register_flag(identity, name, None)
        })
    }

    /// Register a custom flag that is on or off by default
    pub fn register_custom_flag_ex(&self, name: &str, default_on: bool) -> Option<Cookie> {
        let (backend, identity) = self.registered()?;
        suppress("register custom flag", || {
            backend.register_flag(identity, name, Some(default_on))
        })
    }

    /// Log `message` under the custom flag identified by `cookie`
    pub fn log_custom(&self, cookie: Cookie, message: &str) {
        if let Some((backend, identity)) = self.registered() {
            suppress("log custom message", || {
                backend.log_custom(identity, cookie, message)
            });
        }
    }

    /// Query the aggregate counters of all hosts.
    ///
    /// Only loads the backend, no identity is registered.
    pub fn stats(&self) -> Option<Stats> {
        let backend = self.backend()?;
        suppress("query logger stats", || backend.stats(""))
    }

    /// Number of errors logged, or `-1` if unavailable
    pub fn error_count(&self) -> i32 {
        self.stats().map_or(-1, |stats| stats.error_count)
    }

    /// Number of warnings logged, or `-1` if unavailable
    pub fn warning_count(&self) -> i32 {
        self.stats().map_or(-1, |stats| stats.warning_count)
    }
}

impl Drop for Facade {
    fn drop(&mut self) {
        if let (Some(Some(backend)), Some(Some(identity))) = (self.backend.get(), self.identity.get())
        {
            suppress("unregister logger client", || {
                backend.unregister_client(*identity)
            });
        }
    }
}

/// Name of this crate, registered until the caller sets another one
pub fn default_identity_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

/// Run `f` and turn errors and panics into `None`
fn suppress<T, F: FnOnce() -> Result<T, Error>>(what: &str, f: F) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            debug!("Failed to {what}: {e}");
            None
        }
        Err(_) => {
            debug!("Failed to {what}: panicked");
            None
        }
    }
}
