//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Level text that does not name a known severity
    #[error("unrecognized level: {0:?}")]
    UnrecognizedLevel(String),

    /// Format text other than `console` or `json`
    #[error("not a valid log format: {0:?}")]
    InvalidFormat(String),

    /// A sink target could not be opened
    #[error("cannot open sink '{path}': {source}")]
    SinkOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Sink write or sync failure
    #[error("Writer error for sink '{sink}': {message}")]
    WriterError { sink: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    pub fn unrecognized_level(text: impl Into<String>) -> Self {
        LoggerError::UnrecognizedLevel(text.into())
    }

    pub fn invalid_format(text: impl Into<String>) -> Self {
        LoggerError::InvalidFormat(text.into())
    }

    /// Create a sink open error with the offending path
    pub fn sink_open(path: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::SinkOpen {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn writer(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::WriterError {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// True for errors produced by option validation
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LoggerError::UnrecognizedLevel(_)
                | LoggerError::InvalidFormat(_)
                | LoggerError::InvalidConfiguration { .. }
        )
    }
}
