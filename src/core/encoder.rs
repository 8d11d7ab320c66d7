//! Record encoders
//!
//! Two layouts are supported:
//! - Console: `2025-01-08 10:30:45.123 INFO api handlers/user.rs:42 Request processed {"id":7}`
//! - Json: `{"caller":"handlers/user.rs:42","level":"INFO","logger":"api","message":"Request processed","id":7,...}`

use super::error::LoggerError;
use super::log_entry::LogEntry;
use colored::Colorize;
use std::fmt::Write;
use std::str::FromStr;

pub const CONSOLE_FORMAT: &str = "console";
pub const JSON_FORMAT: &str = "json";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable, space separated
    #[default]
    Console,
    /// One JSON object per line
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Console => CONSOLE_FORMAT,
            OutputFormat::Json => JSON_FORMAT,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            CONSOLE_FORMAT => Ok(OutputFormat::Console),
            JSON_FORMAT => Ok(OutputFormat::Json),
            _ => Err(LoggerError::invalid_format(s)),
        }
    }
}

/// Turns entries into single records (without the trailing newline).
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    format: OutputFormat,
    /// Colored level names; only honoured by the console layout.
    color: bool,
}

impl Encoder {
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self {
            format,
            color: color && format == OutputFormat::Console,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn uses_color(&self) -> bool {
        self.color
    }

    pub fn encode(&self, entry: &LogEntry) -> String {
        match self.format {
            OutputFormat::Console => self.encode_console(entry),
            OutputFormat::Json => self.encode_json(entry),
        }
    }

    fn encode_console(&self, entry: &LogEntry) -> String {
        let mut out = String::with_capacity(128 + entry.message.len());
        let _ = write!(out, "{}", entry.timestamp.format(TIMESTAMP_FORMAT));

        let level = entry.severity.to_string();
        if self.color {
            let _ = write!(out, " {}", level.color(entry.severity.color_code()));
        } else {
            let _ = write!(out, " {}", level);
        }

        if let Some(ref name) = entry.logger_name {
            let _ = write!(out, " {}", name);
        }
        if let Some(ref caller) = entry.caller {
            let _ = write!(out, " {}", caller.short());
        }
        let _ = write!(out, " {}", entry.message);

        if !entry.fields.is_empty() {
            let _ = write!(out, " {}", fields_object(entry));
        }
        if let Some(ref stacktrace) = entry.stacktrace {
            out.push('\n');
            out.push_str(stacktrace.trim_end());
        }
        out
    }

    fn encode_json(&self, entry: &LogEntry) -> String {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "timestamp".to_string(),
            serde_json::Value::String(entry.timestamp.format(TIMESTAMP_FORMAT).to_string()),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.severity.to_string()),
        );
        if let Some(ref name) = entry.logger_name {
            json_obj.insert(
                "logger".to_string(),
                serde_json::Value::String(name.to_string()),
            );
        }
        if let Some(ref caller) = entry.caller {
            json_obj.insert("caller".to_string(), serde_json::Value::String(caller.short()));
        }
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );
        if let Some(ref stacktrace) = entry.stacktrace {
            json_obj.insert(
                "stacktrace".to_string(),
                serde_json::Value::String(stacktrace.clone()),
            );
        }

        for field in &entry.fields {
            json_obj.insert(json_field_key(field.key()), field.value().to_json_value());
        }

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }
}

/// Keys the JSON encoder writes for every record.
const RESERVED_KEYS: [&str; 6] = ["timestamp", "level", "logger", "caller", "message", "stacktrace"];

/// User fields never replace record keys; colliding ones move under `fields.`
fn json_field_key(key: &str) -> String {
    if RESERVED_KEYS.contains(&key) {
        format!("fields.{}", key)
    } else {
        key.to_string()
    }
}

fn fields_object(entry: &LogEntry) -> String {
    let map: serde_json::Map<String, serde_json::Value> = entry
        .fields
        .iter()
        .map(|f| (f.key().to_string(), f.value().to_json_value()))
        .collect();
    serde_json::Value::Object(map).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Caller, Field, LogLevel};
    use std::sync::Arc;

    fn entry() -> LogEntry {
        LogEntry::new(LogLevel::Info.severity(), "Request completed".to_string())
            .with_name(Some(Arc::from("api.users")))
            .with_caller(Some(Caller::new("src/handlers/user.rs", 42)))
            .with_fields(vec![
                Field::string("request_id", "abc-123"),
                Field::int32("latency_ms", 42),
            ])
    }

    #[test]
    fn test_console_layout() {
        let result = Encoder::new(OutputFormat::Console, false).encode(&entry());

        assert!(result.contains(" INFO api.users handlers/user.rs:42 Request completed "));
        assert!(result.contains(r#""request_id":"abc-123""#));
        assert!(result.contains(r#""latency_ms":42"#));
        assert!(!result.contains('\n'));
    }

    #[test]
    fn test_console_without_fields() {
        let entry = LogEntry::new(LogLevel::Warn.severity(), "plain".to_string());
        let result = Encoder::new(OutputFormat::Console, false).encode(&entry);
        assert!(result.ends_with(" WARN plain"));
    }

    #[test]
    fn test_json_layout() {
        let result = Encoder::new(OutputFormat::Json, false).encode(&entry());

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["message"], "Request completed");
        assert_eq!(parsed["logger"], "api.users");
        assert_eq!(parsed["caller"], "handlers/user.rs:42");
        assert_eq!(parsed["request_id"], "abc-123");
        assert_eq!(parsed["latency_ms"], 42);
        assert!(parsed["timestamp"].is_string());
    }

    #[test]
    fn test_color_only_for_console() {
        assert!(Encoder::new(OutputFormat::Console, true).uses_color());
        assert!(!Encoder::new(OutputFormat::Json, true).uses_color());
    }

    #[test]
    fn test_verbosity_level_name() {
        let entry = LogEntry::new(crate::core::Severity::verbosity(3), "chatty".to_string());
        let result = Encoder::new(OutputFormat::Json, false).encode(&entry);
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["level"], "LEVEL(-3)");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("console".parse::<OutputFormat>().unwrap(), OutputFormat::Console);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        let err = "test".parse::<OutputFormat>().unwrap_err();
        assert_eq!(err.to_string(), r#"not a valid log format: "test""#);
    }

    #[test]
    fn test_json_fields_cannot_replace_record_keys() {
        let entry = LogEntry::new(LogLevel::Error.severity(), "real message".to_string())
            .with_fields(vec![
                Field::string("message", "user-data"),
                Field::string("level", "fake"),
                Field::string("other", "kept"),
            ]);
        let result = Encoder::new(OutputFormat::Json, false).encode(&entry);

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["message"], "real message");
        assert_eq!(parsed["fields.message"], "user-data");
        assert_eq!(parsed["fields.level"], "fake");
        assert_eq!(parsed["other"], "kept");
    }
}
