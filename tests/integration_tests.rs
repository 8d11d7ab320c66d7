//! Integration tests for the structured logger
//!
//! These tests verify:
//! - Log injection prevention
//! - Derived loggers (values, names, context)
//! - Loose key-value misuse diagnostics
//! - Verbosity gating
//! - Panic escalation
//! - File and error-output routing

use rust_structured_logger::core::{KEY_REQUEST_ID, KEY_USERNAME, UNKNOWN_CONTEXT};
use rust_structured_logger::prelude::*;
use rust_structured_logger::sinks::MemorySink;
use rust_structured_logger::{global, OutputFormat, Severity};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

fn memory_logger(min: impl Into<Severity>) -> (StructuredLogger, MemorySink) {
    let sink = MemorySink::new();
    let backend = Backend::builder()
        .min_severity(min.into())
        .format(OutputFormat::Json)
        .sink(sink.clone())
        .build()
        .expect("Failed to build backend");
    (StructuredLogger::from_backend(backend), sink)
}

fn read_json_lines(path: &std::path::Path) -> Vec<serde_json::Value> {
    fs::read_to_string(path)
        .expect("Failed to read log file")
        .lines()
        .map(|l| serde_json::from_str(l).expect("Invalid JSON line"))
        .collect()
}

#[test]
fn test_log_injection_prevention() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("injection_test.log");

    let opts = Options {
        output_paths: vec![log_file.to_string_lossy().into_owned()],
        error_output_paths: Vec::new(),
        ..Options::default()
    };
    let logger = StructuredLogger::new(&opts).expect("Failed to create logger");

    let malicious_message = "User login\nERROR [2024-10-17] Fake error injected\nINFO Continuation";
    logger.info(malicious_message, &[]);
    logger.flush();

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert!(content.contains("\\n"));
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1, "Log should be a single line, not multiple");
}

#[test]
fn test_with_values_enriches_only_the_child() {
    let (logger, sink) = memory_logger(LogLevel::Info);

    let child = logger.with_values(&kvs!["k1", "v1"]);
    child.infow("msg", &kvs!["k2", "v2"]);
    logger.infow("msg", &kvs!["k2", "v2"]);

    let lines = sink.json_lines();
    assert_eq!(lines[0]["k1"], "v1");
    assert_eq!(lines[0]["k2"], "v2");
    assert!(lines[1].get("k1").is_none());
    assert_eq!(lines[1]["k2"], "v2");
}

#[test]
fn test_odd_pairs_emit_message_and_one_diagnostic() {
    let (logger, sink) = memory_logger(LogLevel::Info);

    logger.infow("m", &kvs!["a", 1, "b"]);

    let lines = sink.json_lines();
    let diagnostics: Vec<_> = lines.iter().filter(|l| l["level"] == "DPANIC").collect();
    let records: Vec<_> = lines.iter().filter(|l| l["message"] == "m").collect();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["ignored key"], "b");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["a"], 1);
    assert_eq!(logger.backend().core().metrics().misuse_reports(), 1);
}

#[test]
fn test_non_string_key_emits_message_without_pairs() {
    let (logger, sink) = memory_logger(LogLevel::Info);

    logger.infow("m", &kvs![1, "x"]);

    let lines = sink.json_lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["invalid key"], 1);
    assert_eq!(lines[1]["message"], "m");
    assert!(lines[1].get("x").is_none());
}

#[test]
fn test_errorw_uses_pairs() {
    let (logger, sink) = memory_logger(LogLevel::Info);

    logger.errorw("request failed", &kvs!["status", 502, "upstream", "billing"]);

    let line = &sink.json_lines()[0];
    assert_eq!(line["message"], "request failed");
    assert_eq!(line["status"], 502);
    assert_eq!(line["upstream"], "billing");
}

#[test]
fn test_disabled_verbosity_writes_nothing() {
    let (logger, sink) = memory_logger(LogLevel::Info);

    let verbose = logger.v(3);
    assert!(!verbose.enabled());
    verbose.info("hidden", &[Field::int32("n", 1)]);
    verbose.infof(format_args!("hidden {}", 2));
    verbose.infow("hidden", &kvs!["n", 3]);

    assert!(sink.lines().is_empty());
    assert_eq!(logger.backend().core().metrics().records_written(), 0);
}

#[test]
fn test_enabled_verbosity_writes_at_its_severity() {
    let (logger, sink) = memory_logger(Severity::verbosity(3));

    logger.v(3).info("deep", &[]);
    logger.v(4).info("too deep", &[]);

    let lines = sink.json_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["level"], "LEVEL(-3)");
}

#[test]
fn test_l_attaches_request_values() {
    let (logger, sink) = memory_logger(LogLevel::Info);
    let ctx = Context::background()
        .with_value(KEY_REQUEST_ID, "abc-123")
        .with_value(KEY_USERNAME, "alice");

    let scoped = logger.l(&ctx);
    scoped.info("handled", &[]);
    logger.info("unscoped", &[]);

    let lines = sink.json_lines();
    assert_eq!(lines[0]["requestID"], "abc-123");
    assert_eq!(lines[0]["username"], "alice");
    assert!(lines[1].get("requestID").is_none());
}

#[test]
fn test_context_round_trip() {
    let (logger, sink) = memory_logger(LogLevel::Info);
    let named = logger.with_name("worker");

    let ctx = named.with_context(&Context::background());
    from_context(&ctx).warn("from ctx", &[]);

    let line = &sink.json_lines()[0];
    assert_eq!(line["logger"], "worker");
    assert_eq!(line["level"], "WARN");
}

#[test]
#[serial]
fn test_from_empty_context_uses_unknown_context_logger() {
    let (logger, sink) = memory_logger(LogLevel::Info);
    global::replace(logger);

    let fallback = from_context(&Context::background());
    fallback.info("orphan", &[]);

    let line = &sink.json_lines()[0];
    assert_eq!(line["logger"], UNKNOWN_CONTEXT);
    assert_eq!(line["message"], "orphan");
}

#[test]
fn test_panic_writes_then_unwinds() {
    let (logger, sink) = memory_logger(LogLevel::Info);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        logger.panicw("invariant broken", &kvs!["shard", 7]);
    }));

    let payload = result.expect_err("panic should unwind");
    assert_eq!(
        payload.downcast_ref::<String>().map(String::as_str),
        Some("invariant broken")
    );

    let line = &sink.json_lines()[0];
    assert_eq!(line["level"], "PANIC");
    assert_eq!(line["shard"], 7);
}

#[test]
fn test_error_output_paths_receive_errors_only() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let all = temp_dir.path().join("all.log");
    let errors = temp_dir.path().join("errors.log");

    let opts = Options {
        output_paths: vec![all.to_string_lossy().into_owned()],
        error_output_paths: vec![format!("file://{}", errors.display())],
        format: "json".to_string(),
        level: "debug".to_string(),
        ..Options::default()
    };
    let logger = StructuredLogger::new(&opts).expect("Failed to create logger");

    logger.debug("d", &[]);
    logger.info("i", &[]);
    logger.error("e", &[Field::string("cause", "timeout")]);
    logger.flush();

    let all_lines = read_json_lines(&all);
    let error_lines = read_json_lines(&errors);
    assert_eq!(all_lines.len(), 3);
    assert_eq!(error_lines.len(), 1);
    assert_eq!(error_lines[0]["cause"], "timeout");
}

#[test]
fn test_disable_caller_and_stacktrace() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("quiet.log");

    let opts = Options {
        output_paths: vec![log_file.to_string_lossy().into_owned()],
        error_output_paths: Vec::new(),
        format: "json".to_string(),
        disable_caller: true,
        disable_stacktrace: true,
        ..Options::default()
    };
    let logger = StructuredLogger::new(&opts).expect("Failed to create logger");

    logger.info("plain", &[]);
    let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        logger.panic("no trace", &[]);
    }));

    let lines = read_json_lines(&log_file);
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.get("caller").is_none()));
    assert!(lines.iter().all(|l| l.get("stacktrace").is_none()));
}

#[test]
fn test_console_format_layout() {
    let sink = MemorySink::new();
    let backend = Backend::builder()
        .name("api")
        .sink(sink.clone())
        .build()
        .expect("Failed to build backend");
    let logger = StructuredLogger::from_backend(backend);

    logger.info("served", &[Field::duration("took", std::time::Duration::from_millis(5))]);

    let line = &sink.lines()[0];
    assert!(line.contains(" INFO api "), "line was {}", line);
    assert!(line.contains(" served "), "line was {}", line);
    assert!(line.ends_with(r#"{"took":5.0}"#), "line was {}", line);
}

#[test]
fn test_unopenable_path_is_an_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("no-such-dir").join("app.log");

    let opts = Options {
        output_paths: vec![missing.to_string_lossy().into_owned()],
        ..Options::default()
    };

    match StructuredLogger::new(&opts) {
        Err(LoggerError::SinkOpen { path, .. }) => assert!(path.ends_with("app.log")),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("opening a path in a missing directory should fail"),
    }
}

#[test]
fn test_bound_fields_cannot_forge_record_keys() {
    let (logger, sink) = memory_logger(LogLevel::Info);
    let forged = logger.with_values(&kvs!["message", "user-data", "level", "fake"]);

    forged.error("real message", &[]);

    let line = &sink.json_lines()[0];
    assert_eq!(line["level"], "ERROR");
    assert_eq!(line["message"], "real message");
    assert_eq!(line["fields.message"], "user-data");
    assert_eq!(line["fields.level"], "fake");
}

#[test]
fn test_derived_logger_reports_caller_in_this_file() {
    let (logger, sink) = memory_logger(LogLevel::Info);
    let derived = logger.with_name("api").with_values(&kvs!["k", 1]);

    let line_no = line!() + 1;
    derived.error("from a derived logger", &[]);

    let line = &sink.json_lines()[0];
    assert_eq!(
        line["caller"],
        format!("tests/integration_tests.rs:{}", line_no)
    );
}

#[test]
fn test_typed_field_as_loose_value() {
    let (logger, sink) = memory_logger(LogLevel::Info);

    logger.infow("still logged", &kvs!["k", Field::int32("n", 1)]);

    let lines = sink.json_lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["level"], "DPANIC");
    assert_eq!(
        lines[0]["message"],
        "strongly-typed Field passed to loose key-value logging"
    );
    assert_eq!(lines[1]["message"], "still logged");
    assert!(lines[1].get("k").is_none());
    assert!(lines[1].get("n").is_none());
    assert_eq!(logger.backend().core().metrics().misuse_reports(), 1);
}
