//! Library-level tracing, compiled out unless the `logging` feature is on.
//!
//! Every level goes through `log_event!`, which forwards to
//! `tracing::event!` or expands to nothing. The per-level names are imported
//! like functions:
//!
//! ```rust,ignore
//! use crate::logging::{debug, warn};
//!
//! debug!(namespace = %name, "opening namespace");
//! warn!(key = key, "commit failed");
//! ```
//!
//! No subscriber is installed here; that is left to the application.

#[cfg(feature = "logging")]
macro_rules! log_event {
    ($level:ident, $($arg:tt)+) => {
        tracing::event!(tracing::Level::$level, $($arg)+)
    };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_event {
    ($level:ident, $($arg:tt)+) => {};
}

/// Per-entry reads and writes.
macro_rules! log_trace {
    ($($arg:tt)+) => { $crate::logging::log_event!(TRACE, $($arg)+) };
}

macro_rules! log_debug {
    ($($arg:tt)+) => { $crate::logging::log_event!(DEBUG, $($arg)+) };
}

/// Namespace open, key generation.
macro_rules! log_info {
    ($($arg:tt)+) => { $crate::logging::log_event!(INFO, $($arg)+) };
}

/// Handled failures such as a commit that did not reach disk.
macro_rules! log_warn {
    ($($arg:tt)+) => { $crate::logging::log_event!(WARN, $($arg)+) };
}

/// Failures that are about to be returned to the caller.
macro_rules! log_error {
    ($($arg:tt)+) => { $crate::logging::log_event!(ERROR, $($arg)+) };
}

pub(crate) use log_event;

pub(crate) use log_debug as debug;
pub(crate) use log_error as error;
pub(crate) use log_info as info;
pub(crate) use log_trace as trace;
pub(crate) use log_warn as warn;
