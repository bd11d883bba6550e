//! A counter module wired to a visual tree.
//!
//! Demonstrates the full path: directory → container → module registration
//! → init → tree interactions flowing through the delegate into the
//! module's handlers → public method calls through the guard.
//!
//! Run with: `cargo run --example counter`

use serde_json::{json, Value};
use std::sync::Arc;
use trellis_runtime::{
    Handler, InteractionKind, MethodTable, ModuleError, RuntimeConfig, RuntimeDirectory,
};
use trellis_view::{DocumentTree, Element, ElementTree};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // The visual tree: a section owned by the counter module, with a
    // typed button inside it.
    let tree = Arc::new(DocumentTree::new());
    let panel = tree.append(tree.root(), Element::new("section").module("counter"))?;
    let button = tree.append(panel, Element::new("button").role("increment"))?;

    let directory = RuntimeDirectory::new();
    let app = directory.create(
        RuntimeConfig::new("demo").with_global("theme", json!("dark")),
        Arc::clone(&tree) as Arc<dyn ElementTree>,
    )?;

    app.module().add("counter", true, |ctx| {
        let count = Arc::new(parking_lot::Mutex::new(0i64));

        // Interest in pointer-activate anywhere inside the module root.
        let for_clicks = Arc::clone(&count);
        ctx.listen(
            InteractionKind::PointerActivate.as_str(),
            Handler::new(move |notice| {
                let interaction = notice.payload.as_interaction();
                let role = interaction
                    .and_then(|i| i.target_role.as_deref())
                    .unwrap_or("(untyped)");
                let mut count = for_clicks.lock();
                *count += 1;
                println!("clicked {role}: count = {count}");
                Ok(())
            }),
        )
        .map_err(|err| ModuleError::InitFailed(err.to_string()))?;

        Ok(Box::new(MethodTable::new().method("value", move |_| {
            Ok(json!(*count.lock()))
        })))
    })?;

    let app = app.init()?;

    // Simulate three interactions bubbling up from the button.
    for _ in 0..3 {
        tree.fire(button, InteractionKind::PointerActivate, json!({}))?;
    }

    let counter = app.module().get("counter")?;
    println!("final value: {}", counter.invoke("value", Value::Null)?);
    println!("main module: {}", app.main().expect("main").name());

    Ok(())
}
