//! Stopping and restarting a module.
//!
//! Shows the full stop cycle: delegates detach, namespaced listeners drop,
//! the instance record is evicted, and a later start re-instantiates from
//! the surviving registration.
//!
//! Run with: `cargo run --example stop_resume`

use serde_json::{json, Value};
use std::sync::Arc;
use trellis_runtime::{MethodTable, RuntimeConfig, RuntimeDirectory};
use trellis_view::DocumentTree;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let directory = RuntimeDirectory::new();
    let app = directory.create(
        RuntimeConfig::new("demo"),
        Arc::new(DocumentTree::new()),
    )?;

    app.module().add("session", false, |_ctx| {
        let generation = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or_default();
        println!("session instance created (generation {generation})");

        Ok(Box::new(
            MethodTable::new()
                .method("generation", move |_| Ok(json!(generation)))
                .on_stop(|| println!("session instance stopped")),
        ))
    })?;

    let app = app.init()?;

    let first = app.module().get("session")?;
    let first_generation = first.invoke("generation", Value::Null)?;
    println!("first generation: {first_generation}");

    // Stop: the record is evicted; the registration stays.
    app.module().stop("session");
    assert!(!app.module().is_started(&"session".into()));

    // Restart re-runs the factory: a genuinely fresh instance.
    let second = app.module().get("session")?;
    assert!(!first.same_instance(&second));
    println!("second generation: {}", second.invoke("generation", Value::Null)?);

    app.destroy();
    println!("runtimes left in directory: {}", directory.count());
    Ok(())
}
