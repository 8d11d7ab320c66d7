//! Logging macros for ergonomic message formatting.
//!
//! The `*f!` macros take `format!`-style arguments. With a format string first
//! they log through the global logger; with a logger expression first they log
//! through that logger.
//!
//! # Examples
//!
//! ```
//! use rust_structured_logger::prelude::*;
//! use rust_structured_logger::{infof, warnf};
//!
//! let logger = StructuredLogger::disabled();
//!
//! // Through a specific logger
//! let port = 8080;
//! infof!(logger, "listening on port {}", port);
//!
//! // Through the global logger
//! warnf!("disk usage at {}%", 91);
//! ```

/// Build a loose key-value argument array.
///
/// # Examples
///
/// ```
/// use rust_structured_logger::{kvs, Arg, FieldValue};
///
/// let args = kvs!["user", "alice", "retries", 2];
/// assert_eq!(args[3], Arg::Value(FieldValue::Int(2)));
/// ```
#[macro_export]
macro_rules! kvs {
    ($($item:expr),* $(,)?) => {
        [$($crate::Arg::from($item)),*]
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_formatted {
    ($global:ident, $method:ident, $fmt:literal $(, $args:expr)* $(,)?) => {
        $crate::core::global::$global(::std::format_args!($fmt $(, $args)*))
    };
    ($global:ident, $method:ident, $logger:expr, $($arg:tt)+) => {{
        #[allow(unused_imports)]
        use $crate::core::{InfoLogger as _, Logger as _};
        $logger.$method(::std::format_args!($($arg)+))
    }};
}

/// Log a formatted debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_structured_logger::prelude::*;
/// # let logger = StructuredLogger::disabled();
/// use rust_structured_logger::debugf;
/// debugf!(logger, "cache miss for key {}", "user:42");
/// ```
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::__log_formatted!(debugf, debugf, $($arg)+)
    };
}

/// Log a formatted info-level message.
#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::__log_formatted!(infof, infof, $($arg)+)
    };
}

/// Log a formatted warning.
#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::__log_formatted!(warnf, warnf, $($arg)+)
    };
}

/// Log a formatted error-level message.
///
/// # Examples
///
/// ```
/// # use rust_structured_logger::prelude::*;
/// # let logger = StructuredLogger::disabled();
/// use rust_structured_logger::errorf;
/// let code = 503;
/// errorf!(logger, "upstream returned {code}");
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::__log_formatted!(errorf, errorf, $($arg)+)
    };
}

/// Log a formatted message and unwind with it.
#[macro_export]
macro_rules! panicf {
    ($($arg:tt)+) => {
        $crate::__log_formatted!(panicf, panicf, $($arg)+)
    };
}

/// Log a formatted message and exit the process.
#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => {
        $crate::__log_formatted!(fatalf, fatalf, $($arg)+)
    };
}
