//! Log entry structure

use super::field::Field;
use super::log_level::Severity;
use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::panic::Location;
use std::sync::Arc;

/// Source position of the emitting call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    file: Cow<'static, str>,
    line: u32,
}

impl Caller {
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// `dir/file.rs:line`, keeping only the last directory component.
    pub fn short(&self) -> String {
        let mut parts = self.file.rsplitn(3, |c| c == '/' || c == '\\');
        let file = parts.next().unwrap_or(&self.file);
        match parts.next() {
            Some(dir) => format!("{}/{}:{}", dir, file, self.line),
            None => format!("{}:{}", file, self.line),
        }
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub logger_name: Option<Arc<str>>,
    pub caller: Option<Caller>,
    pub stacktrace: Option<String>,
    /// Bound fields first, then call-site fields.
    pub fields: Vec<Field>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: String) -> String {
        if !message.contains(|c: char| matches!(c, '\n' | '\r' | '\t')) {
            return message;
        }
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(severity: Severity, message: String) -> Self {
        Self {
            severity,
            message: Self::sanitize_message(message),
            timestamp: Local::now(),
            logger_name: None,
            caller: None,
            stacktrace: None,
            fields: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: Option<Arc<str>>) -> Self {
        self.logger_name = name;
        self
    }

    pub fn with_caller(mut self, caller: Option<Caller>) -> Self {
        self.caller = caller;
        self
    }

    pub fn with_stacktrace(mut self, stacktrace: String) -> Self {
        self.stacktrace = Some(stacktrace);
        self
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }
}
