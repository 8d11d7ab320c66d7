//! Log level definitions
//!
//! Named levels map onto a signed severity scale. Verbosity levels `V(n)` sit
//! below Info at severity `-n`, so every extra step of verbosity needs a more
//! permissive minimum to pass.

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
#[repr(i8)]
pub enum LogLevel {
    Debug = -1,
    #[default]
    Info = 0,
    Warn = 1,
    Error = 2,
    /// Reserved for diagnostics about logger misuse; unwinds in development mode.
    DPanic = 3,
    Panic = 4,
    Fatal = 5,
}

impl LogLevel {
    pub const ALL: [LogLevel; 7] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::DPanic,
        LogLevel::Panic,
        LogLevel::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::DPanic => "DPANIC",
            LogLevel::Panic => "PANIC",
            LogLevel::Fatal => "FATAL",
        }
    }

    #[inline]
    pub const fn severity(self) -> Severity {
        Severity(self as i8)
    }

    /// True iff this level passes a gate configured at `minimum`.
    #[inline]
    pub fn enabled_at(self, minimum: LogLevel) -> bool {
        self.severity().enabled_at(minimum.severity())
    }

    /// Panic and Fatal records end the calling thread or process once written.
    pub fn is_terminal(self) -> bool {
        matches!(self, LogLevel::Panic | LogLevel::Fatal)
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Debug => Magenta,
            LogLevel::Info => Blue,
            LogLevel::Warn => Yellow,
            LogLevel::Error | LogLevel::DPanic | LogLevel::Panic | LogLevel::Fatal => Red,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "dpanic" => Ok(LogLevel::DPanic),
            "panic" => Ok(LogLevel::Panic),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(LoggerError::unrecognized_level(s)),
        }
    }
}

/// Parse a level name, ignoring case.
pub fn parse_level(text: &str) -> Result<LogLevel, LoggerError> {
    text.parse()
}

/// Numeric severity the backend gates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Severity(pub i8);

impl Severity {
    /// Severity of an Info-class message at verbosity `n`.
    ///
    /// Saturates at `i8::MIN`, so anything past `V(128)` shares one gate.
    #[inline]
    pub fn verbosity(n: u32) -> Self {
        let n = i32::try_from(n).unwrap_or(i32::MAX);
        Severity(i8::try_from(-n).unwrap_or(i8::MIN))
    }

    #[inline]
    pub fn enabled_at(self, minimum: Severity) -> bool {
        self >= minimum
    }

    /// The named level for this severity, if there is one.
    pub fn level(self) -> Option<LogLevel> {
        LogLevel::ALL.into_iter().find(|l| l.severity() == self)
    }

    pub fn color_code(self) -> colored::Color {
        match self.level() {
            Some(level) => level.color_code(),
            None => colored::Color::Magenta,
        }
    }
}

impl From<LogLevel> for Severity {
    fn from(level: LogLevel) -> Self {
        level.severity()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level() {
            Some(level) => write!(f, "{}", level.to_str()),
            None => write!(f, "LEVEL({})", self.0),
        }
    }
}
