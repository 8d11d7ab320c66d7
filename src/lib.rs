//! # Rust Structured Logger
//!
//! Structured, leveled logging with verbosity gates, derived loggers and a
//! swappable process-wide logger.
//!
//! ## Features
//!
//! - **Three call styles**: typed fields, `format_args!` messages, and loose
//!   key-value pairs validated at runtime
//! - **Verbosity**: `v(n)` hands out an Info logger that costs nothing when closed
//! - **Derived loggers**: `with_values`, `with_name` and `l(ctx)` never touch
//!   the logger they came from
//! - **Context binding**: carry a logger inside a [`Context`] and fetch it back
//!   with [`from_context`]
//! - **Global logger**: configured from [`Options`], replaceable at runtime
//!
//! ## Example
//!
//! ```no_run
//! use rust_structured_logger::prelude::*;
//! use rust_structured_logger::{global, infof};
//!
//! let opts = Options {
//!     level: "debug".to_string(),
//!     format: "json".to_string(),
//!     ..Options::default()
//! };
//! init_global_logger(&opts).unwrap();
//!
//! global::info("service started", &[Field::int32("port", 8080)]);
//! global::infow("request", &kvs!["method", "GET", "status", 200]);
//! infof!("cache warmed in {}ms", 12);
//!
//! let api = global::with_name("api");
//! api.v(2).info("verbose detail", &[]);
//! global::flush();
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub use crate::core::global;

pub mod prelude {
    pub use crate::core::{
        from_context, init_global_logger, Arg, Backend, Context, Field, FieldValue, InfoLogger,
        LogLevel, Logger, LoggerError, Options, Result, SharedLogger, StructuredLogger,
    };
    pub use crate::kvs;
}

pub use crate::core::{
    from_context, init_global_logger, normalize_key_values, parse_level, redirect_log_crate,
    std_error_writer, std_info_writer, Arg, Backend, BackendBuilder, BackendMetrics, Caller,
    Context, Field, FieldValue, InfoLogger, LogLevel, Logger, LoggerError, Options, OutputFormat,
    Result, Severity, SharedLogger, Sink, StructuredLogger,
};
