//! Basic usage example
//!
//! Demonstrates the three call styles, verbosity and derived loggers.
//!
//! Run with: cargo run --example basic_usage

use rust_structured_logger::prelude::*;
use rust_structured_logger::{global, infof, warnf};
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Structured Logger - Basic Usage Example ===\n");

    let opts = Options {
        level: "debug".to_string(),
        enable_color: true,
        name: "demo".to_string(),
        ..Options::default()
    };
    for err in opts.validate() {
        eprintln!("invalid option: {}", err);
    }
    init_global_logger(&opts)?;

    println!("1. Typed fields:");
    global::info(
        "server started",
        &[
            Field::int32("port", 8080),
            Field::duration("boot", Duration::from_millis(42)),
        ],
    );

    println!("\n2. Formatted messages:");
    infof!("accepting connections on {} workers", 4);
    warnf!("disk usage at {}%", 91);

    println!("\n3. Loose key-value pairs:");
    global::infow("request", &kvs!["method", "GET", "path", "/users", "status", 200]);
    global::errorw("upstream failed", &kvs!["service", "billing", "attempt", 3]);

    println!("\n4. Verbosity:");
    global::v(0).info("shown at the default level", &[]);
    global::v(2).info("hidden unless the minimum is V(2) or lower", &[]);

    println!("\n5. Derived loggers:");
    let db = global::with_name("db").with_values(&kvs!["pool", "primary"]);
    db.debug("connection acquired", &[]);

    global::flush();
    println!("\n=== Example completed ===");
    Ok(())
}
