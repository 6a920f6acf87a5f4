use core::fmt;
use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Mutex, OnceLock};

#[allow(unused)]
macro_rules! log {
    ($($arg:tt)*) => {{
        $crate::debug::log_args(std::format_args!("{}\n", std::format_args!($($arg)*)));
    }};
}
pub(crate) use log;

/// Names a file to append log lines to instead of stderr.
const LOG_PATH_VAR: &str = "GUILE_BRIDGE_LOG";

enum Sink {
    File(Mutex<File>),
    Stderr,
}

impl Sink {
    fn open(path: Option<&OsStr>) -> Self {
        let Some(path) = path else {
            return Sink::Stderr;
        };
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Sink::File(Mutex::new(file)),
            Err(e) => {
                eprintln!("could not open log file {}: {e}", path.to_string_lossy());
                Sink::Stderr
            }
        }
    }

    fn write(&self, args: fmt::Arguments) {
        match self {
            Sink::File(file) => {
                // poisoned by a panicking writer, keep logging
                let mut guard = file.lock().unwrap_or_else(|e| e.into_inner());
                guard.write_fmt(args).unwrap_or(());
            }
            Sink::Stderr => eprint!("{}", args),
        }
    }
}

static OUTPUT: OnceLock<Sink> = OnceLock::new();

pub fn log_args(args: fmt::Arguments) {
    if cfg!(test) {
        eprint!("{}", args);
        return;
    }

    OUTPUT
        .get_or_init(|| Sink::open(std::env::var_os(LOG_PATH_VAR).as_deref()))
        .write(args);
}
