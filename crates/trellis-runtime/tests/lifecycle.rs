//! Module lifecycle: registration, lazy start, stop cycle, reset/destroy,
//! directory invariants.

mod common;

use common::counter_factory;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use trellis_runtime::{
    ErrorCode, MethodTable, ModuleError, RuntimeConfig, RuntimeDirectory, RuntimeError,
};
use trellis_view::{DocumentTree, Element, ElementTree};

fn debug_runtime(directory: &RuntimeDirectory, name: &str) -> trellis_runtime::RuntimeContainer {
    directory
        .create(
            RuntimeConfig::new(name).with_debug(true),
            Arc::new(DocumentTree::new()),
        )
        .unwrap()
}

#[test]
fn duplicate_registration_fails_and_first_stays_active() {
    let directory = RuntimeDirectory::new();
    let app = debug_runtime(&directory, "app");

    app.module()
        .add("m", false, |_| {
            Ok(Box::new(MethodTable::new().method("which", |_| Ok(json!("first")))))
        })
        .unwrap();

    let err = app
        .module()
        .add("m", false, |_| {
            Ok(Box::new(MethodTable::new().method("which", |_| Ok(json!("second")))))
        })
        .unwrap_err();
    assert_eq!(err.code(), "RUNTIME_DUPLICATE_MODULE");

    let handle = app.module().get("m").unwrap();
    assert_eq!(handle.invoke("which", Value::Null).unwrap(), json!("first"));
}

#[test]
fn get_starts_lazily_once_with_stable_identity() {
    let directory = RuntimeDirectory::new();
    let app = debug_runtime(&directory, "app");
    let factory_runs = Arc::new(Mutex::new(0));

    {
        let factory_runs = Arc::clone(&factory_runs);
        app.module()
            .add("counter", false, move |ctx| {
                *factory_runs.lock() += 1;
                counter_factory(ctx)
            })
            .unwrap();
    }

    assert!(!app.module().is_started(&"counter".into()));
    let first = app.module().get("counter").unwrap();
    let second = app.module().get("counter").unwrap();

    assert_eq!(*factory_runs.lock(), 1);
    assert!(first.same_instance(&second));

    // State is shared through both handles.
    first.invoke("increment", Value::Null).unwrap();
    assert_eq!(second.invoke("value", Value::Null).unwrap(), json!(1));
}

#[test]
fn get_unregistered_module_fails() {
    let directory = RuntimeDirectory::new();
    let app = debug_runtime(&directory, "app");

    let err = app.module().get("ghost").unwrap_err();
    assert_eq!(err.code(), "RUNTIME_UNKNOWN_MODULE");
}

#[test]
fn start_is_noop_for_unregistered_and_already_started() {
    let directory = RuntimeDirectory::new();
    let app = debug_runtime(&directory, "app");
    let factory_runs = Arc::new(Mutex::new(0));

    {
        let factory_runs = Arc::clone(&factory_runs);
        app.module()
            .add("m", false, move |ctx| {
                *factory_runs.lock() += 1;
                counter_factory(ctx)
            })
            .unwrap();
    }

    app.module().start("ghost").unwrap();
    app.module().start("m").unwrap();
    app.module().start("m").unwrap();
    assert_eq!(*factory_runs.lock(), 1);
}

#[test]
fn init_starts_all_in_registration_order() {
    let directory = RuntimeDirectory::new();
    let app = debug_runtime(&directory, "app");
    let order = Arc::new(Mutex::new(Vec::new()));

    for name in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        app.module()
            .add(name, false, move |_| {
                order.lock().push(name);
                Ok(Box::new(MethodTable::new()))
            })
            .unwrap();
    }

    let app = app.init().unwrap();
    assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    assert_eq!(app.module().started_count(), 3);
}

#[test]
fn registration_after_init_is_not_auto_started() {
    let directory = RuntimeDirectory::new();
    let app = debug_runtime(&directory, "app").init().unwrap();

    app.module()
        .add("late", false, |ctx| counter_factory(ctx))
        .unwrap();
    assert!(!app.module().is_started(&"late".into()));

    // A later full pass picks it up.
    app.module().start_all().unwrap();
    assert!(app.module().is_started(&"late".into()));
}

#[test]
fn stop_evicts_and_restart_reinstantiates() {
    let directory = RuntimeDirectory::new();
    let app = debug_runtime(&directory, "app");
    let stopped = Arc::new(Mutex::new(0));

    {
        let stopped = Arc::clone(&stopped);
        app.module()
            .add("counter", false, move |_| {
                let stopped = Arc::clone(&stopped);
                Ok(Box::new(
                    MethodTable::new()
                        .method("value", |_| Ok(json!(0)))
                        .on_stop(move || *stopped.lock() += 1),
                ))
            })
            .unwrap();
    }

    let first = app.module().get("counter").unwrap();
    assert!(app.module().stop("counter"));
    assert_eq!(*stopped.lock(), 1);
    assert!(!app.module().is_started(&"counter".into()));

    // Second stop is a no-op.
    assert!(!app.module().stop("counter"));

    // Registration survived; restart produces a fresh instance.
    let second = app.module().get("counter").unwrap();
    assert!(!first.same_instance(&second));
}

#[test]
fn main_module_reference_follows_lifecycle() {
    let directory = RuntimeDirectory::new();
    let app = debug_runtime(&directory, "app");

    app.module()
        .add("shell", true, |ctx| counter_factory(ctx))
        .unwrap();
    app.module()
        .add("side", false, |ctx| counter_factory(ctx))
        .unwrap();

    assert!(app.main().is_none());
    let app = app.init().unwrap();

    let main = app.main().expect("main set after start");
    assert_eq!(main.name().as_str(), "shell");

    // Stopping a non-main module leaves main alone.
    app.module().stop("side");
    assert!(app.main().is_some());

    app.module().stop("shell");
    assert!(app.main().is_none());
}

#[test]
fn reset_clears_instances_and_store_keeps_registrations() {
    let directory = RuntimeDirectory::new();
    let app = debug_runtime(&directory, "app");
    app.global().update("theme", json!("dark")).unwrap();

    app.module()
        .add("counter", false, |ctx| counter_factory(ctx))
        .unwrap();
    let app = app.init().unwrap();
    assert_eq!(app.module().started_count(), 1);

    app.reset();
    assert_eq!(app.module().started_count(), 0);
    assert_eq!(app.global().count(), 0);
    assert_eq!(app.module().names().len(), 1);

    // A fresh init pass restarts the surviving registrations.
    app.module().start_all().unwrap();
    assert_eq!(app.module().started_count(), 1);
}

#[test]
fn destroy_removes_container_from_directory() {
    let directory = RuntimeDirectory::new();
    let app = debug_runtime(&directory, "app");
    assert_eq!(directory.count(), 1);

    app.destroy();
    assert_eq!(directory.count(), 0);
    let err = directory.get("app").unwrap_err();
    assert_eq!(err.code(), "RUNTIME_UNKNOWN_RUNTIME");
}

#[test]
fn directory_enforces_unique_nonempty_names() {
    let directory = RuntimeDirectory::new();
    let tree: Arc<DocumentTree> = Arc::new(DocumentTree::new());

    let err = directory
        .create(RuntimeConfig::new(""), tree.clone())
        .unwrap_err();
    assert_eq!(err.code(), "RUNTIME_MISSING_NAME");

    directory
        .create(RuntimeConfig::new("app"), tree.clone())
        .unwrap();
    let err = directory
        .create(RuntimeConfig::new("app"), tree)
        .unwrap_err();
    assert_eq!(err.code(), "RUNTIME_DUPLICATE_RUNTIME");

    assert!(matches!(
        directory.get(""),
        Err(RuntimeError::MissingName)
    ));
}

#[test]
fn runtimes_with_same_module_name_stay_isolated() {
    let directory = RuntimeDirectory::new();
    let a = debug_runtime(&directory, "a");
    let b = debug_runtime(&directory, "b");

    a.module()
        .add("counter", false, |ctx| counter_factory(ctx))
        .unwrap();
    b.module()
        .add("counter", false, |ctx| counter_factory(ctx))
        .unwrap();

    a.module()
        .get("counter")
        .unwrap()
        .invoke("increment", Value::Null)
        .unwrap();

    // b's counter never saw a's increment.
    let b_value = b
        .module()
        .get("counter")
        .unwrap()
        .invoke("value", Value::Null)
        .unwrap();
    assert_eq!(b_value, json!(0));
}

#[test]
fn cyclic_factory_dependency_fails_fast() {
    let directory = RuntimeDirectory::new();
    let app = debug_runtime(&directory, "app");

    app.module()
        .add("a", false, |ctx| {
            ctx.module("b")
                .map_err(|err| ModuleError::InitFailed(err.to_string()))?;
            Ok(Box::new(MethodTable::new()))
        })
        .unwrap();
    app.module()
        .add("b", false, |ctx| {
            ctx.module("a")
                .map_err(|err| ModuleError::InitFailed(err.to_string()))?;
            Ok(Box::new(MethodTable::new()))
        })
        .unwrap();

    let err = app.module().get("a").unwrap_err();
    assert_eq!(err.code(), "RUNTIME_MODULE_FAILED");
    assert!(
        err.to_string().contains("cyclic module dependency"),
        "expected cycle in chain, got: {err}"
    );
    assert!(!app.module().is_started(&"a".into()));
    assert!(!app.module().is_started(&"b".into()));
}

#[test]
fn acyclic_lazy_dependency_chain_starts_recursively() {
    let directory = RuntimeDirectory::new();
    let app = debug_runtime(&directory, "app");

    app.module()
        .add("ui", false, |ctx| {
            let store = ctx
                .module("store")
                .map_err(|err| ModuleError::InitFailed(err.to_string()))?;
            let seed = store
                .invoke("value", Value::Null)
                .map_err(|err| ModuleError::InitFailed(err.to_string()))?;
            Ok(Box::new(
                MethodTable::new().method("seed", move |_| Ok(seed.clone())),
            ))
        })
        .unwrap();
    app.module()
        .add("store", false, |ctx| counter_factory(ctx))
        .unwrap();

    let ui = app.module().get("ui").unwrap();
    assert_eq!(ui.invoke("seed", Value::Null).unwrap(), json!(0));
    assert!(app.module().is_started(&"store".into()));
}

#[test]
fn headless_module_runs_without_root_element() {
    let directory = RuntimeDirectory::new();
    // Tree has no element marked for the module: legal, just headless.
    let app = debug_runtime(&directory, "app");

    app.module()
        .add("worker", false, |ctx| {
            assert!(ctx.element().is_none());
            counter_factory(ctx)
        })
        .unwrap();

    let worker = app.module().get("worker").unwrap();
    assert!(worker.element().is_none());
    assert_eq!(worker.invoke("increment", Value::Null).unwrap(), json!(1));
}

#[test]
fn module_root_resolution_uses_marker_in_document_order() {
    let directory = RuntimeDirectory::new();
    let tree = Arc::new(DocumentTree::new());
    let first = tree
        .append(tree.root(), Element::new("section").module("panel"))
        .unwrap();
    let _second = tree
        .append(tree.root(), Element::new("section").module("panel"))
        .unwrap();

    let app = directory
        .create(
            RuntimeConfig::new("app").with_debug(true),
            Arc::clone(&tree) as Arc<dyn ElementTree>,
        )
        .unwrap();

    app.module()
        .add("panel", false, |ctx| {
            assert!(ctx.element().is_some());
            Ok(Box::new(MethodTable::new()))
        })
        .unwrap();

    let handle = app.module().get("panel").unwrap();
    assert_eq!(handle.element(), Some(first));
}

#[test]
fn peer_main_reaches_other_runtime_main_only() {
    let directory = RuntimeDirectory::new();
    let a = debug_runtime(&directory, "a");
    let b = debug_runtime(&directory, "b");

    b.module()
        .add("shell", true, |_| {
            Ok(Box::new(
                MethodTable::new().method("ping", |_| Ok(json!("pong"))),
            ))
        })
        .unwrap();
    let _b = b.init().unwrap();

    a.module()
        .add("bridge", false, move |ctx| {
            Ok(Box::new(MethodTable::new().method("ask", move |_| {
                ctx.peer_main("b")
                    .and_then(|main| main.invoke("ping", Value::Null))
                    .map_err(|err| ModuleError::ExecutionFailed(err.to_string()))
            })))
        })
        .unwrap();

    let bridge = a.module().get("bridge").unwrap();
    assert_eq!(bridge.invoke("ask", Value::Null).unwrap(), json!("pong"));
}

#[test]
fn peer_main_without_main_module_fails() {
    let directory = RuntimeDirectory::new();
    let a = debug_runtime(&directory, "a");
    let _b = debug_runtime(&directory, "b");

    a.module()
        .add("bridge", false, move |ctx| {
            let probe = ctx.peer_main("b");
            assert!(matches!(probe, Err(RuntimeError::NoMainModule(_))));

            let unknown = ctx.peer_main("nowhere");
            assert!(matches!(unknown, Err(RuntimeError::UnknownRuntime(_))));
            Ok(Box::new(MethodTable::new()))
        })
        .unwrap();

    app_start(&a);
}

fn app_start(container: &trellis_runtime::RuntimeContainer) {
    container.module().start("bridge").unwrap();
    assert!(container.module().is_started(&"bridge".into()));
}
