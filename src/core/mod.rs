//! Core logger types and traits

pub mod backend;
pub mod context;
pub mod encoder;
pub mod error;
pub mod field;
pub mod global;
pub mod key_values;
pub mod log_bridge;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod options;
pub mod sink;
pub mod writer;

pub use backend::{Backend, BackendBuilder, CheckedEntry, Core};
pub use context::{
    from_context, Context, KEY_REQUEST_ID, KEY_USERNAME, KEY_WATCHER_NAME, UNKNOWN_CONTEXT,
};
pub use encoder::{Encoder, OutputFormat, CONSOLE_FORMAT, JSON_FORMAT};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue};
pub use global::{global, init_global_logger};
pub use key_values::{normalize_key_values, Arg};
pub use log_bridge::redirect_log_crate;
pub use log_entry::{Caller, LogEntry};
pub use log_level::{parse_level, LogLevel, Severity};
pub use logger::{
    InfoLogger, Logger, NoopInfoLogger, SharedLogger, StructuredLogger, VerboseInfoLogger,
};
pub use metrics::BackendMetrics;
pub use options::Options;
pub use sink::Sink;
pub use writer::{std_error_writer, std_info_writer, LevelWriter};
