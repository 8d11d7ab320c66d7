//! Logger configuration
//!
//! `Options` serializes with kebab-case keys, so a configuration file section
//! such as
//!
//! ```json
//! {"level":"debug","format":"json","output-paths":["stdout","/var/log/app.log"]}
//! ```
//!
//! deserializes directly; keys that are left out keep their defaults.

use super::{
    encoder::{OutputFormat, CONSOLE_FORMAT},
    error::{LoggerError, Result},
    global,
    log_level::{parse_level, LogLevel},
    log_bridge,
    logger::StructuredLogger,
};
use serde::{Deserialize, Serialize};

pub const FLAG_LEVEL: &str = "log.level";
pub const FLAG_DISABLE_CALLER: &str = "log.disable-caller";
pub const FLAG_DISABLE_STACKTRACE: &str = "log.disable-stacktrace";
pub const FLAG_FORMAT: &str = "log.format";
pub const FLAG_ENABLE_COLOR: &str = "log.enable-color";
pub const FLAG_OUTPUT_PATHS: &str = "log.output-paths";
pub const FLAG_ERROR_OUTPUT_PATHS: &str = "log.error-output-paths";
pub const FLAG_DEVELOPMENT: &str = "log.development";
pub const FLAG_NAME: &str = "log.name";

/// Logger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Options {
    /// Targets for every record: `stdout`, `stderr` or a file path
    pub output_paths: Vec<String>,
    /// Additional targets for Error and above
    pub error_output_paths: Vec<String>,
    pub level: String,
    /// `console` or `json`
    pub format: String,
    pub disable_caller: bool,
    /// Stop attaching backtraces to Panic and Fatal records
    pub disable_stacktrace: bool,
    /// Colored level names in the console format
    pub enable_color: bool,
    /// DPanic unwinds after writing
    pub development: bool,
    /// Name of the root logger
    pub name: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            output_paths: vec!["stdout".to_string()],
            error_output_paths: vec!["stderr".to_string()],
            level: LogLevel::Info.to_string().to_lowercase(),
            format: CONSOLE_FORMAT.to_string(),
            disable_caller: false,
            disable_stacktrace: false,
            enable_color: false,
            development: false,
            name: String::new(),
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check level and format, collecting every problem in that order.
    pub fn validate(&self) -> Vec<LoggerError> {
        let mut errors = Vec::new();

        if let Err(e) = parse_level(&self.level) {
            errors.push(e);
        }
        if let Err(e) = self.format.parse::<OutputFormat>() {
            errors.push(e);
        }

        errors
    }

    /// JSON object keyed by the kebab-case option names.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Strict build: reject an unparseable level, then install the result
    /// as the global logger and route the `log` crate facade into it.
    pub fn build(&self) -> Result<()> {
        parse_level(&self.level)?;
        global::replace(StructuredLogger::new(self)?);

        match log_bridge::redirect_log_crate() {
            Ok(()) | Err(LoggerError::InvalidConfiguration { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Options::default();
        assert_eq!(opts.output_paths, vec!["stdout"]);
        assert_eq!(opts.error_output_paths, vec!["stderr"]);
        assert_eq!(opts.level, "info");
        assert_eq!(opts.format, "console");
        assert!(!opts.disable_caller && !opts.development);
        assert!(opts.name.is_empty());
        assert!(opts.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_in_order() {
        let opts = Options {
            level: "test".to_string(),
            format: "test".to_string(),
            ..Options::default()
        };

        let errors: Vec<String> = opts.validate().iter().map(ToString::to_string).collect();
        assert_eq!(
            errors,
            vec![
                r#"unrecognized level: "test""#.to_string(),
                r#"not a valid log format: "test""#.to_string(),
            ]
        );
    }

    #[test]
    fn test_validate_is_case_insensitive() {
        let opts = Options {
            level: "WARN".to_string(),
            format: "Json".to_string(),
            ..Options::default()
        };
        assert!(opts.validate().is_empty());
    }

    #[test]
    fn test_json_uses_kebab_case() {
        let json = Options::default().to_json();
        for key in [
            "output-paths",
            "error-output-paths",
            "level",
            "format",
            "disable-caller",
            "disable-stacktrace",
            "enable-color",
            "development",
            "name",
        ] {
            assert!(json.contains(&format!("\"{}\":", key)), "missing {} in {}", key, json);
        }
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let opts = Options::from_json(r#"{"level":"debug","enable-color":true}"#).unwrap();
        assert_eq!(opts.level, "debug");
        assert!(opts.enable_color);
        assert_eq!(opts.format, "console");
        assert_eq!(opts.output_paths, vec!["stdout"]);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Options::from_json("not json"),
            Err(LoggerError::JsonError(_))
        ));
    }

    #[test]
    fn test_build_rejects_bad_level() {
        let opts = Options {
            level: "verbose".to_string(),
            ..Options::default()
        };
        assert!(matches!(opts.build(), Err(LoggerError::UnrecognizedLevel(_))));
    }
}
