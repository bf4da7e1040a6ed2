// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

use crate::backend::{Backend, Category, Cookie, Identity, Stats};
use crate::error::Error;
use crate::facade::{default_identity_name, Facade};
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

/// A call received by the recording backend
#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Register,
    Unregister(i32),
    SetIdentityName(i32, String),
    Log(i32, Category, String),
    RegisterFlag(i32, String, Option<bool>),
    LogCustom(i32, i32, String),
    Stats(String),
}

/// How the recording backend answers a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reply {
    Succeed,
    Fail,
    Panic,
}

/// Behavior of the recording backend
#[derive(Debug, Clone, Copy)]
struct Script {
    handle: i32,
    cookie: i32,
    stats: Option<Stats>,
    set_name: Reply,
    panic_on_log: bool,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            handle: 17,
            cookie: 4,
            stats: Some(STATS),
            set_name: Reply::Succeed,
            panic_on_log: false,
        }
    }
}

const STATS: Stats = Stats {
    error_count: 3,
    last_error: None,
    warning_count: 5,
    last_warning: None,
};

/// Backend that records every call
struct Recorder {
    script: Script,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Recorder {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Backend for Recorder {
    fn register_client(&self) -> Result<Identity, Error> {
        self.record(Call::Register);
        Identity::new(self.script.handle).ok_or(Error::Registration(self.script.handle))
    }

    fn unregister_client(&self, identity: Identity) -> Result<(), Error> {
        self.record(Call::Unregister(identity.get()));
        Ok(())
    }

    fn set_identity_name(&self, identity: Identity, name: &str) -> Result<(), Error> {
        self.record(Call::SetIdentityName(identity.get(), name.to_string()));
        match self.script.set_name {
            Reply::Succeed => Ok(()),
            Reply::Fail => Err(Error::Native(("SETIDENTITYNAME", 0))),
            Reply::Panic => panic!("name rejected"),
        }
    }

    fn log(&self, identity: Identity, category: Category, message: &str) -> Result<(), Error> {
        assert!(!self.script.panic_on_log, "backend exploded");
        self.record(Call::Log(identity.get(), category, message.to_string()));
        Ok(())
    }

    fn register_flag(
        &self,
        identity: Identity,
        name: &str,
        default_on: Option<bool>,
    ) -> Result<Cookie, Error> {
        self.record(Call::RegisterFlag(
            identity.get(),
            name.to_string(),
            default_on,
        ));
        Cookie::new(self.script.cookie).ok_or(Error::Native(("REGISTERLOGFLAG", 0)))
    }

    fn log_custom(&self, identity: Identity, cookie: Cookie, message: &str) -> Result<(), Error> {
        self.record(Call::LogCustom(
            identity.get(),
            cookie.get(),
            message.to_string(),
        ));
        Ok(())
    }

    fn stats(&self, host: &str) -> Result<Stats, Error> {
        self.record(Call::Stats(host.to_string()));
        self.script.stats.ok_or(Error::Native(("GETLOGGERSTATS", 0)))
    }
}

/// Observations shared between a test and its facade
#[derive(Clone, Default)]
struct Observer {
    opens: Arc<AtomicUsize>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Observer {
    fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }
}

/// Facade over a recording backend
fn recording(script: Script) -> (Facade, Observer) {
    let observer = Observer::default();
    let p = observer.clone();
    let facade = Facade::new("unit", move || {
        p.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(Recorder {
            script,
            calls: p.calls.clone(),
        }) as Box<dyn Backend>)
    });
    (facade, observer)
}

/// Facade whose backend can't be found
fn unavailable() -> (Facade, Observer) {
    let observer = Observer::default();
    let p = observer.clone();
    let facade = Facade::new("unit", move || {
        p.opens.fetch_add(1, Ordering::SeqCst);
        Err(Error::NotFound("install path not configured"))
    });
    (facade, observer)
}

/// Argument whose `Display` implementation fails
struct Broken;

impl fmt::Display for Broken {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        Err(fmt::Error)
    }
}

/// Error messages the backend received
fn errors(observer: &Observer) -> Vec<String> {
    observer
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Log(_, Category::Error, message) => Some(message),
            _ => None,
        })
        .collect()
}

/// Call every public operation once
fn exercise(facade: &Facade) {
    facade.error("error");
    facade.error_format("error {0}", &[&1]);
    facade.warning("warning");
    facade.info("info");
    facade.trace("trace");
    facade.start_stop("start stop");
    facade.entry_exit("entry exit");
    facade.thread_start_stop("thread start stop");
    facade.sql("select 1");
    facade.connection("connection");
    facade.ctor_dtor("ctor dtor");
    facade.reference_count("ref count");
    facade.set_identity_name("name");
    let _ = facade.register_custom_flag("flag");
    let _ = facade.register_custom_flag_ex("flag", true);
    let _ = facade.error_count();
    let _ = facade.warning_count();
}

#[test]
fn unavailable_backend_is_opened_once() {
    let (facade, observer) = unavailable();
    for _ in 0..10 {
        exercise(&facade);
    }
    assert_eq!(observer.opens(), 1);
    assert!(!facade.is_loaded());
    assert_eq!(facade.identity(), None);
}

#[test]
fn unavailable_backend_signals() {
    let (facade, _) = unavailable();
    assert_eq!(facade.register_custom_flag("flag"), None);
    assert_eq!(facade.register_custom_flag_ex("flag", true), None);
    assert_eq!(facade.error_count(), -1);
    assert_eq!(facade.warning_count(), -1);
    assert_eq!(facade.stats(), None);
}

#[test]
fn configuration_error_degrades() {
    let observer = Observer::default();
    let o = observer.clone();
    let facade = Facade::new("unit", move || {
        o.opens.fetch_add(1, Ordering::SeqCst);
        Err(Error::Config((
            io::Error::other("access denied"),
            "failed to query install path",
        )))
    });
    for _ in 0..3 {
        exercise(&facade);
    }
    assert_eq!(observer.opens(), 1);
    assert_eq!(facade.error_count(), -1);
    assert_eq!(facade.warning_count(), -1);
    assert_eq!(facade.register_custom_flag("flag"), None);
}

#[test]
fn opener_panic_is_suppressed() {
    let facade = Facade::new("unit", || panic!("no library"));
    facade.info("dropped");
    assert_eq!(facade.error_count(), -1);
    assert!(!facade.is_loaded());
}

#[test]
fn nothing_happens_before_first_use() {
    let (facade, observer) = recording(Script::default());
    assert_eq!(observer.opens(), 0);
    assert!(!facade.is_loaded());
    assert_eq!(facade.identity(), None);
}

#[test]
fn registers_once_with_default_name() {
    let (facade, observer) = recording(Script::default());
    facade.info("one");
    facade.info("two");

    assert_eq!(
        observer.calls(),
        vec![
            Call::Register,
            Call::SetIdentityName(17, "unit".to_string()),
            Call::Log(17, Category::Info, "one".to_string()),
            Call::Log(17, Category::Info, "two".to_string()),
        ]
    );
    assert_eq!(observer.opens(), 1);
    assert!(facade.is_loaded());
    assert_eq!(facade.identity(), Identity::new(17));
}

#[test]
fn default_name_failure_keeps_identity() {
    for set_name in [Reply::Fail, Reply::Panic] {
        let (facade, observer) = recording(Script {
            set_name,
            ..Script::default()
        });
        facade.info("one");
        facade.warning("two");

        assert_eq!(
            observer.calls(),
            vec![
                Call::Register,
                Call::SetIdentityName(17, "unit".to_string()),
                Call::Log(17, Category::Info, "one".to_string()),
                Call::Log(17, Category::Warning, "two".to_string()),
            ],
            "{set_name:?}"
        );
        assert_eq!(facade.identity(), Identity::new(17));
    }
}

#[test]
fn default_name_is_crate_name() {
    assert_eq!(default_identity_name(), "wwlog");
}

#[test]
fn categories_are_forwarded_unchanged() {
    let (facade, observer) = recording(Script::default());
    facade.error("e");
    facade.warning("w");
    facade.info("i");
    facade.trace("t");
    facade.start_stop("s");
    facade.entry_exit("x");
    facade.thread_start_stop("th");
    facade.sql("select * from t");
    facade.connection("c");
    facade.ctor_dtor("cd");
    facade.reference_count("rc");

    let logged: Vec<(i32, Category, String)> = observer
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Log(handle, category, message) => Some((handle, category, message)),
            _ => None,
        })
        .collect();
    let expected = [
        (Category::Error, "e"),
        (Category::Warning, "w"),
        (Category::Info, "i"),
        (Category::Trace, "t"),
        (Category::StartStop, "s"),
        (Category::EntryExit, "x"),
        (Category::ThreadStartStop, "th"),
        (Category::Sql, "select * from t"),
        (Category::Connection, "c"),
        (Category::CtorDtor, "cd"),
        (Category::RefCount, "rc"),
    ]
    .map(|(category, message)| (17, category, message.to_string()));
    assert_eq!(logged, expected);
    assert_eq!(observer.count(&Call::Register), 1);
}

#[test]
fn failed_registration_is_permanent() {
    let (facade, observer) = recording(Script {
        handle: 0,
        ..Script::default()
    });
    for _ in 0..5 {
        exercise(&facade);
    }

    assert_eq!(observer.count(&Call::Register), 1);
    assert!(observer
        .calls()
        .iter()
        .all(|call| matches!(call, Call::Register | Call::Stats(_))));
    assert!(facade.is_loaded());
    assert_eq!(facade.identity(), None);
    assert_eq!(facade.register_custom_flag("flag"), None);
}

#[test]
fn error_format_substitutes_arguments() {
    let (facade, observer) = recording(Script::default());
    facade.error_format("Value: {0}", &[&42]);
    facade.error_format("{0} literal, no arguments", &[]);
    facade.error_format("broken {1}", &[&"only one"]);

    assert_eq!(
        errors(&observer),
        vec!["Value: 42", "{0} literal, no arguments", "broken {1}"]
    );
}

#[test]
fn error_format_wide_alignment() {
    let (facade, observer) = recording(Script::default());
    facade.error_format("[{0,70000}]", &[&1]);
    facade.error_format("[{0,1000000}]", &[&1]);

    let messages = errors(&observer);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].len(), 70_002);
    assert!(messages[0].ends_with(" 1]"));
    assert_eq!(messages[1], "[{0,1000000}]");
}

#[test]
fn error_format_failing_argument() {
    let (facade, observer) = recording(Script::default());
    facade.error_format("bad {0,5}", &[&Broken]);
    facade.error_format("bad {0}", &[&Broken]);
    assert_eq!(errors(&observer), vec!["bad {0,5}", "bad {0}"]);
}

#[test]
fn custom_flags() {
    let (facade, observer) = recording(Script::default());
    let cookie = facade.register_custom_flag("MyFlag").unwrap();
    assert_eq!(cookie.get(), 4);
    facade.log_custom(cookie, "hello");
    assert_eq!(facade.register_custom_flag_ex("OnFlag", true), Some(cookie));
    assert_eq!(facade.register_custom_flag_ex("OffFlag", false), Some(cookie));

    let calls = observer.calls();
    assert_eq!(
        &calls[2..],
        &[
            Call::RegisterFlag(17, "MyFlag".to_string(), None),
            Call::LogCustom(17, 4, "hello".to_string()),
            Call::RegisterFlag(17, "OnFlag".to_string(), Some(true)),
            Call::RegisterFlag(17, "OffFlag".to_string(), Some(false)),
        ]
    );
}

#[test]
fn refused_custom_flag() {
    let (facade, _) = recording(Script {
        cookie: 0,
        ..Script::default()
    });
    assert_eq!(facade.register_custom_flag("MyFlag"), None);
}

#[test]
fn set_identity_name_overrides_default() {
    let (facade, observer) = recording(Script::default());
    facade.set_identity_name("Pump controller");
    assert_eq!(
        observer.calls(),
        vec![
            Call::Register,
            Call::SetIdentityName(17, "unit".to_string()),
            Call::SetIdentityName(17, "Pump controller".to_string()),
        ]
    );
}

#[test]
fn counters_do_not_register() {
    let (facade, observer) = recording(Script::default());
    assert_eq!(facade.error_count(), 3);
    assert_eq!(facade.warning_count(), 5);
    assert_eq!(
        observer.calls(),
        vec![Call::Stats(String::new()), Call::Stats(String::new())]
    );
    assert_eq!(facade.identity(), None);
}

#[test]
fn counters_unavailable() {
    let (facade, _) = recording(Script {
        stats: None,
        ..Script::default()
    });
    assert_eq!(facade.error_count(), -1);
    assert_eq!(facade.warning_count(), -1);
}

#[test]
fn backend_panic_is_suppressed() {
    let (facade, observer) = recording(Script {
        panic_on_log: true,
        ..Script::default()
    });
    facade.error("boom");
    facade.warning("boom again");
    assert_eq!(observer.count(&Call::Register), 1);
    assert_eq!(facade.error_count(), 3);
}

#[test]
fn drop_unregisters() {
    let (facade, observer) = recording(Script::default());
    facade.info("hello");
    drop(facade);
    assert_eq!(observer.calls().last(), Some(&Call::Unregister(17)));
}

#[test]
fn drop_without_registration() {
    let (facade, observer) = recording(Script::default());
    let _ = facade.error_count();
    drop(facade);
    assert_eq!(observer.count(&Call::Unregister(17)), 0);
}

#[test]
fn concurrent_first_use() {
    const THREADS: usize = 16;
    let (facade, observer) = recording(Script::default());
    let facade = Arc::new(facade);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let facade = facade.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                facade.info(&format!("thread {i}"));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(observer.opens(), 1);
    assert_eq!(observer.count(&Call::Register), 1);
    let logged = observer
        .calls()
        .iter()
        .filter(|call| matches!(call, Call::Log(17, Category::Info, _)))
        .count();
    assert_eq!(logged, THREADS);
}

#[test]
fn concurrent_first_use_unavailable() {
    const THREADS: usize = 16;
    let (facade, observer) = unavailable();
    let facade = Arc::new(facade);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let facade = facade.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                exercise(&facade);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(observer.opens(), 1);
}
