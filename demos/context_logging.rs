//! Context logging example
//!
//! Demonstrates carrying a logger and request values through a Context.
//!
//! Run with: cargo run --example context_logging

use rust_structured_logger::core::{KEY_REQUEST_ID, KEY_USERNAME};
use rust_structured_logger::prelude::*;
use rust_structured_logger::global;

fn handle(ctx: &Context) {
    let logger = from_context(ctx).l(ctx);
    logger.infow("handling request", &kvs!["items", 3]);
}

fn main() -> Result<()> {
    println!("=== Rust Structured Logger - Context Example ===\n");

    init_global_logger(&Options {
        format: "json".to_string(),
        ..Options::default()
    })?;

    let ctx = Context::background()
        .with_value(KEY_REQUEST_ID, "req-7f3a")
        .with_value(KEY_USERNAME, "alice");

    println!("1. Logger bound to the context:");
    let bound = global::with_name("handler").with_context(&ctx);
    handle(&bound);

    println!("\n2. No logger bound (falls back to Unknown-Context):");
    handle(&ctx);

    global::flush();
    println!("\n=== Example completed ===");
    Ok(())
}
