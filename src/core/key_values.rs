//! Loose key-value argument lists
//!
//! The `*w` logging forms take alternating keys and values instead of typed
//! [`Field`]s. Each element is an [`Arg`]; the [`kvs!`](crate::kvs) macro
//! builds the slice without spelling out the conversions:
//!
//! ```
//! use rust_structured_logger::{kvs, Arg};
//!
//! let args: [Arg; 4] = kvs!["user", "alice", "attempt", 3];
//! assert_eq!(args.len(), 4);
//! ```

use super::backend::Backend;
use super::field::{Field, FieldValue};
use std::time::Duration;

/// One element of a loose key-value list.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(FieldValue),
    /// A typed field; not accepted in loose lists and reported as misuse
    Field(Field),
}

impl Arg {
    fn as_key(&self) -> Option<&str> {
        match self {
            Arg::Value(FieldValue::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl From<Field> for Arg {
    fn from(field: Field) -> Self {
        Arg::Field(field)
    }
}

impl From<FieldValue> for Arg {
    fn from(value: FieldValue) -> Self {
        Arg::Value(value)
    }
}

macro_rules! impl_arg_from {
    ($($source:ty),*) => {
        $(
            impl From<$source> for Arg {
                fn from(v: $source) -> Self {
                    Arg::Value(FieldValue::from(v))
                }
            }
        )*
    };
}

impl_arg_from!(
    String, &str, &String, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool,
    Duration, serde_json::Value
);

/// Convert alternating keys and values into fields, followed by `additional`.
///
/// Malformed input is reported at DPanic through `backend` and processing
/// stops at the first problem; pairs accepted before it are kept, and
/// `additional` always comes last.
#[track_caller]
pub fn normalize_key_values(backend: &Backend, args: &[Arg], additional: Vec<Field>) -> Vec<Field> {
    if args.is_empty() {
        return additional;
    }

    let mut fields = Vec::with_capacity(args.len() / 2 + additional.len());

    let mut i = 0;
    while i < args.len() {
        if let Arg::Field(field) = &args[i] {
            backend.report_misuse(
                "strongly-typed Field passed to loose key-value logging",
                Field::string("field", field.to_string()),
            );
            break;
        }

        let Some(value) = args.get(i + 1) else {
            backend.report_misuse(
                "odd number of arguments passed as key-value pairs for logging",
                Field::new("ignored key", arg_value(&args[i])),
            );
            break;
        };

        let value = match value {
            Arg::Value(v) => v,
            Arg::Field(field) => {
                backend.report_misuse(
                    "strongly-typed Field passed to loose key-value logging",
                    Field::string("field", field.to_string()),
                );
                break;
            }
        };

        let Some(key) = args[i].as_key() else {
            backend.report_misuse(
                "non-string key argument passed to logging, ignoring all later arguments",
                Field::new("invalid key", arg_value(&args[i])),
            );
            break;
        };

        fields.push(Field::new(key, value.clone()));
        i += 2;
    }

    fields.extend(additional);
    fields
}

fn arg_value(arg: &Arg) -> FieldValue {
    match arg {
        Arg::Value(v) => v.clone(),
        Arg::Field(f) => FieldValue::String(f.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, OutputFormat};
    use crate::sinks::MemorySink;

    fn backend() -> (Backend, MemorySink) {
        let sink = MemorySink::new();
        let backend = Backend::builder()
            .min_level(LogLevel::Debug)
            .format(OutputFormat::Json)
            .sink(sink.clone())
            .build()
            .unwrap();
        (backend, sink)
    }

    #[test]
    fn test_pairs_become_fields() {
        let (backend, sink) = backend();
        let fields = normalize_key_values(&backend, &crate::kvs!["a", 1, "b", "two"], Vec::new());

        assert_eq!(fields, vec![Field::new("a", 1), Field::new("b", "two")]);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_empty_returns_additional() {
        let (backend, _sink) = backend();
        let extra = vec![Field::bool("x", true)];
        assert_eq!(normalize_key_values(&backend, &[], extra.clone()), extra);
    }

    #[test]
    fn test_odd_count_reports_ignored_key() {
        let (backend, sink) = backend();
        let fields = normalize_key_values(&backend, &crate::kvs!["a", 1, "dangling"], Vec::new());

        assert_eq!(fields, vec![Field::new("a", 1)]);
        let report = &sink.json_lines()[0];
        assert_eq!(report["level"], "DPANIC");
        assert_eq!(
            report["message"],
            "odd number of arguments passed as key-value pairs for logging"
        );
        assert_eq!(report["ignored key"], "dangling");
        assert_eq!(backend.core().metrics().misuse_reports(), 1);
    }

    #[test]
    fn test_non_string_key_stops_processing() {
        let (backend, sink) = backend();
        let fields =
            normalize_key_values(&backend, &crate::kvs!["a", 1, 42, "x", "b", 2], Vec::new());

        assert_eq!(fields, vec![Field::new("a", 1)]);
        let report = &sink.json_lines()[0];
        assert_eq!(report["invalid key"], 42);
    }

    #[test]
    fn test_typed_field_is_rejected() {
        let (backend, sink) = backend();
        let args = [Arg::from(Field::int32("n", 1)), Arg::from("ignored")];
        let fields = normalize_key_values(&backend, &args, Vec::new());

        assert!(fields.is_empty());
        let report = &sink.json_lines()[0];
        assert_eq!(
            report["message"],
            "strongly-typed Field passed to loose key-value logging"
        );
        assert_eq!(report["field"], "n=1");
    }

    #[test]
    fn test_pairs_come_before_additional() {
        let (backend, _sink) = backend();
        let extra = vec![Field::bool("extra", true)];
        let fields = normalize_key_values(&backend, &crate::kvs!["a", 1, "b", 2], extra);

        let keys: Vec<&str> = fields.iter().map(Field::key).collect();
        assert_eq!(keys, ["a", "b", "extra"]);
    }

    #[test]
    fn test_additional_follows_pairs_after_misuse() {
        let (backend, sink) = backend();
        let extra = vec![Field::bool("extra", true)];
        let fields = normalize_key_values(&backend, &crate::kvs!["a", 1, "dangling"], extra);

        let keys: Vec<&str> = fields.iter().map(Field::key).collect();
        assert_eq!(keys, ["a", "extra"]);
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn test_typed_field_as_value_is_rejected() {
        let (backend, sink) = backend();
        let fields = normalize_key_values(
            &backend,
            &crate::kvs!["a", 1, "k", Field::int32("n", 1), "b", 2],
            Vec::new(),
        );

        assert_eq!(fields, vec![Field::new("a", 1)]);
        let report = &sink.json_lines()[0];
        assert_eq!(report["level"], "DPANIC");
        assert_eq!(report["field"], "n=1");
        assert_eq!(backend.core().metrics().misuse_reports(), 1);
    }
}
