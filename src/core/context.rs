//! Request-scoped context values and logger binding
//!
//! A [`Context`] is an immutable chain of key/value pairs. Adding a value
//! returns a new context that shares everything before it, so contexts are
//! cheap to clone and hand across threads.
//!
//! ```
//! use rust_structured_logger::core::context::{Context, KEY_REQUEST_ID};
//!
//! let ctx = Context::background().with_value(KEY_REQUEST_ID, "req-42");
//! assert_eq!(ctx.value(KEY_REQUEST_ID).and_then(|v| v.as_str()), Some("req-42"));
//! ```

use super::field::FieldValue;
use super::global;
use super::logger::SharedLogger;
use std::fmt;
use std::sync::Arc;

pub const KEY_REQUEST_ID: &str = "requestID";
pub const KEY_USERNAME: &str = "username";
pub const KEY_WATCHER_NAME: &str = "watcher";

/// Name of the logger handed out when a context carries none.
pub const UNKNOWN_CONTEXT: &str = "Unknown-Context";

#[derive(PartialEq, Eq)]
enum Key {
    Named(String),
    /// Slot for the bound logger; unreachable from string keys
    Logger,
}

enum Slot {
    Value(FieldValue),
    Logger(SharedLogger),
}

struct Node {
    key: Key,
    slot: Slot,
    parent: Option<Arc<Node>>,
}

#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// The empty root context
    pub fn background() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Context {
        self.push(Key::Named(key.into()), Slot::Value(value.into()))
    }

    /// Most recently added value under `key`.
    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.nodes().find_map(|node| match (&node.key, &node.slot) {
            (Key::Named(k), Slot::Value(v)) if k == key => Some(v),
            _ => None,
        })
    }

    pub(crate) fn with_logger(&self, logger: SharedLogger) -> Context {
        self.push(Key::Logger, Slot::Logger(logger))
    }

    pub(crate) fn logger(&self) -> Option<&SharedLogger> {
        self.nodes().find_map(|node| match (&node.key, &node.slot) {
            (Key::Logger, Slot::Logger(l)) => Some(l),
            _ => None,
        })
    }

    fn push(&self, key: Key, slot: Slot) -> Context {
        Context {
            head: Some(Arc::new(Node {
                key,
                slot,
                parent: self.head.clone(),
            })),
        }
    }

    fn nodes(&self) -> impl Iterator<Item = &Node> {
        std::iter::successors(self.head.as_deref(), |node| node.parent.as_deref())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for node in self.nodes() {
            match (&node.key, &node.slot) {
                (Key::Named(k), Slot::Value(v)) => list.entry(&format_args!("{}={}", k, v)),
                _ => list.entry(&format_args!("<logger>")),
            };
        }
        list.finish()
    }
}

/// The logger bound to `ctx`, or the global logger named [`UNKNOWN_CONTEXT`].
pub fn from_context(ctx: &Context) -> SharedLogger {
    match ctx.logger() {
        Some(logger) => Arc::clone(logger),
        None => global::with_name(UNKNOWN_CONTEXT),
    }
}
