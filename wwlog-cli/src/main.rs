// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Send messages to the ArchestrA logger from the command line

use anyhow::{bail, Error};
use argh::FromArgs;
use log::{debug, info, LevelFilter};
use std::path::PathBuf;
use wwlog::{Category, Config, Facade};

#[derive(FromArgs)]
#[argh(help_triggers("-h", "--help", "help"))]
/// Logger client arguments
struct Args {
    #[argh(description = "message category (error, warning, info, trace, sql, ...)")]
    #[argh(option, short = 'c', default = "Category::Info")]
    category: Category,

    #[argh(description = "identity name shown in the logger")]
    #[argh(option, short = 'i')]
    identity: Option<String>,

    #[argh(description = "logger install directory, overrides the registry")]
    #[argh(option, short = 'p')]
    install_path: Option<PathBuf>,

    #[argh(description = "log the message under this custom flag")]
    #[argh(option, short = 'f')]
    flag: Option<String>,

    #[argh(description = "register the custom flag as on by default")]
    #[argh(switch)]
    flag_on: bool,

    #[argh(description = "print the error and warning counters")]
    #[argh(switch, short = 's')]
    stats: bool,

    #[argh(description = "log level of this tool")]
    #[argh(option, short = 'l')]
    log_level: Option<LevelFilter>,

    #[argh(positional)]
    /// message to log
    message: Vec<String>,
}

impl Args {
    /// Reject option combinations that would be ignored
    fn check(&self) -> Result<(), Error> {
        if self.flag_on && self.flag.is_none() {
            bail!("--flag-on requires --flag");
        }
        Ok(())
    }
}

fn main() -> Result<(), Error> {
    let args: Args = argh::from_env();
    args.check()?;
    let Args {
        category,
        identity,
        install_path,
        flag,
        flag_on,
        stats,
        log_level,
        message,
    } = args;

    // Diagnostics of this tool go to the console only
    wwlog_logger::init(log_level.unwrap_or(LevelFilter::Warn), true, false);

    let mut config = Config::from_env();
    if let Some(path) = install_path {
        config = config.with_install_path(path);
    }
    debug!("Using {config:?}");
    if wwlog::set_facade(Facade::native(config)).is_err() {
        bail!("logger facade already initialized");
    }

    let message = message.join(" ");
    let forwarding = identity.is_some() || !message.is_empty();

    if let Some(identity) = identity {
        wwlog::set_identity_name(&identity);
    }

    if !message.is_empty() {
        match flag {
            Some(flag) => {
                let cookie = if flag_on {
                    wwlog::register_custom_flag_ex(&flag, true)
                } else {
                    wwlog::register_custom_flag(&flag)
                };
                let Some(cookie) = cookie else {
                    bail!("failed to register custom flag {flag:?}");
                };
                info!("Logging to custom flag {flag:?} ({cookie})");
                wwlog::log_custom(cookie, &message);
            }
            None => {
                info!("Logging to {category}");
                wwlog::facade().log(category, &message);
            }
        }
    }

    if stats {
        match wwlog::stats() {
            Some(stats) => {
                println!("errors:   {}", stats.error_count);
                if let Some(last) = stats.last_error {
                    println!("  last:   {last}");
                }
                println!("warnings: {}", stats.warning_count);
                if let Some(last) = stats.last_warning {
                    println!("  last:   {last}");
                }
            }
            None => bail!("logger stats unavailable"),
        }
    }

    if forwarding && !wwlog::facade().is_loaded() {
        bail!("logger library not available");
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::Args;
    use argh::FromArgs;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["wwlog-cli"], args).unwrap()
    }

    #[test]
    fn flag_on_requires_flag() {
        let error = parse(&["--flag-on", "hello"]).check().unwrap_err();
        assert_eq!(error.to_string(), "--flag-on requires --flag");

        assert!(parse(&["-f", "MyFlag", "--flag-on", "hello"]).check().is_ok());
        assert!(parse(&["-f", "MyFlag", "hello"]).check().is_ok());
        assert!(parse(&["-c", "sql", "select 1"]).check().is_ok());
    }
}
