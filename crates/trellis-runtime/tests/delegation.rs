//! Interaction delegation end to end: tree interactions flowing through a
//! module's delegate into its namespaced handlers.

mod common;

use common::collect_faults;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use trellis_runtime::{
    EventKey, Handler, InteractionKind, MethodTable, ModuleError, ModuleName, RuntimeConfig,
    RuntimeContainer, RuntimeDirectory,
};
use trellis_view::{DocumentTree, Element, ElementTree};

struct Stage {
    app: RuntimeContainer,
    tree: Arc<DocumentTree>,
}

/// One runtime over a tree with a `counter` module root and a typed
/// increment button inside it.
fn stage() -> (Stage, trellis_types::ElementId) {
    let tree = Arc::new(DocumentTree::new());
    let panel = tree
        .append(tree.root(), Element::new("section").module("counter"))
        .unwrap();
    let button = tree
        .append(panel, Element::new("button").role("increment"))
        .unwrap();

    let directory = RuntimeDirectory::new();
    let app = directory
        .create(
            RuntimeConfig::new("app").with_debug(true),
            Arc::clone(&tree) as Arc<dyn ElementTree>,
        )
        .unwrap();

    (Stage { app, tree }, button)
}

#[test]
fn interaction_reaches_module_handler_with_resolved_target() {
    let (stage, button) = stage();
    let seen = Arc::new(Mutex::new(Vec::new()));

    {
        let seen = Arc::clone(&seen);
        stage
            .app
            .module()
            .add("counter", false, move |ctx| {
                let seen = Arc::clone(&seen);
                ctx.listen(
                    InteractionKind::PointerActivate.as_str(),
                    Handler::new(move |notice| {
                        let interaction = notice
                            .payload
                            .as_interaction()
                            .expect("interaction payload");
                        seen.lock().push((
                            interaction.event.origin,
                            interaction.target,
                            interaction.target_role.clone(),
                        ));
                        Ok(())
                    }),
                )
                .map_err(|err| ModuleError::InitFailed(err.to_string()))?;
                Ok(Box::new(MethodTable::new()))
            })
            .unwrap();
    }

    let app = stage.app.init().unwrap();
    stage
        .tree
        .fire(button, InteractionKind::PointerActivate, json!({"x": 10}))
        .unwrap();

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, button);
    assert_eq!(seen[0].1, Some(button));
    assert_eq!(seen[0].2.as_deref(), Some("increment"));
    drop(seen);

    assert!(app.module().is_started(&"counter".into()));
}

#[test]
fn kinds_without_subscribers_are_not_observed() {
    let (stage, button) = stage();
    let seen = Arc::new(Mutex::new(0));

    {
        let seen = Arc::clone(&seen);
        stage
            .app
            .module()
            .add("counter", false, move |ctx| {
                let seen = Arc::clone(&seen);
                ctx.listen(
                    InteractionKind::PointerActivate.as_str(),
                    Handler::new(move |_| {
                        *seen.lock() += 1;
                        Ok(())
                    }),
                )
                .map_err(|err| ModuleError::InitFailed(err.to_string()))?;
                Ok(Box::new(MethodTable::new()))
            })
            .unwrap();
    }

    let _app = stage.app.init().unwrap();

    // No subscriber for key-down: the delegate never attached an observer.
    let delivered = stage
        .tree
        .fire(button, InteractionKind::KeyDown, json!({}))
        .unwrap();
    assert_eq!(delivered, 0);

    stage
        .tree
        .fire(button, InteractionKind::PointerActivate, json!({}))
        .unwrap();
    assert_eq!(*seen.lock(), 1);
}

#[test]
fn shared_root_element_does_not_cross_talk() {
    // Two modules whose marker resolves to the same element. Both attach
    // delegates there; namespacing on event keys keeps them apart.
    let tree = Arc::new(DocumentTree::new());
    let shared = tree
        .append(
            tree.root(),
            Element::new("section").module("alpha").module("beta"),
        )
        .unwrap();

    let directory = RuntimeDirectory::new();
    let app = directory
        .create(
            RuntimeConfig::new("app").with_debug(true),
            Arc::clone(&tree) as Arc<dyn ElementTree>,
        )
        .unwrap();

    let alpha_seen = Arc::new(Mutex::new(0));
    let beta_seen = Arc::new(Mutex::new(0));

    for (name, seen, kind) in [
        ("alpha", &alpha_seen, InteractionKind::PointerActivate),
        ("beta", &beta_seen, InteractionKind::KeyDown),
    ] {
        let seen = Arc::clone(seen);
        app.module()
            .add(name, false, move |ctx| {
                let seen = Arc::clone(&seen);
                ctx.listen(
                    kind.as_str(),
                    Handler::new(move |_| {
                        *seen.lock() += 1;
                        Ok(())
                    }),
                )
                .map_err(|err| ModuleError::InitFailed(err.to_string()))?;
                Ok(Box::new(MethodTable::new()))
            })
            .unwrap();
    }

    let app = app.init().unwrap();
    let alpha_root = app.module().get("alpha").unwrap().element();
    let beta_root = app.module().get("beta").unwrap().element();
    assert_eq!(alpha_root, Some(shared));
    assert_eq!(alpha_root, beta_root);

    tree.fire(shared, InteractionKind::PointerActivate, json!({}))
        .unwrap();
    tree.fire(shared, InteractionKind::KeyDown, json!({})).unwrap();

    // Each module saw exactly its own kind, once.
    assert_eq!(*alpha_seen.lock(), 1);
    assert_eq!(*beta_seen.lock(), 1);
}

#[test]
fn stop_detaches_delegate_and_drops_module_listeners() {
    let (stage, button) = stage();
    let seen = Arc::new(Mutex::new(0));

    {
        let seen = Arc::clone(&seen);
        stage
            .app
            .module()
            .add("counter", false, move |ctx| {
                let seen = Arc::clone(&seen);
                ctx.listen(
                    InteractionKind::PointerActivate.as_str(),
                    Handler::new(move |_| {
                        *seen.lock() += 1;
                        Ok(())
                    }),
                )
                .map_err(|err| ModuleError::InitFailed(err.to_string()))?;
                Ok(Box::new(MethodTable::new()))
            })
            .unwrap();
    }

    let app = stage.app.init().unwrap();
    stage
        .tree
        .fire(button, InteractionKind::PointerActivate, json!({}))
        .unwrap();
    assert_eq!(*seen.lock(), 1);

    app.module().stop("counter");

    // Observer gone from the tree...
    let delivered = stage
        .tree
        .fire(button, InteractionKind::PointerActivate, json!({}))
        .unwrap();
    assert_eq!(delivered, 0);

    // ...and the module's namespaced listeners gone from the bus.
    let key = EventKey::module(
        ModuleName::new("counter"),
        InteractionKind::PointerActivate.as_str(),
    );
    assert!(!app.event().has_listeners(&key));

    // Restart rebuilds the whole path.
    app.module().start("counter").unwrap();
    stage
        .tree
        .fire(button, InteractionKind::PointerActivate, json!({}))
        .unwrap();
    assert_eq!(*seen.lock(), 2);
}

#[test]
fn listeners_registered_after_start_wait_for_next_attach_cycle() {
    let (stage, button) = stage();

    stage
        .app
        .module()
        .add("counter", false, |_| Ok(Box::new(MethodTable::new())))
        .unwrap();
    let app = stage.app.init().unwrap();

    // Subscribe after the delegate already attached: interest was
    // snapshotted, so no observer exists for this kind yet.
    let seen = Arc::new(Mutex::new(0));
    {
        let seen = Arc::clone(&seen);
        app.event().listen(
            EventKey::module(
                ModuleName::new("counter"),
                InteractionKind::Change.as_str(),
            ),
            Handler::new(move |_| {
                *seen.lock() += 1;
                Ok(())
            }),
        );
    }

    let delivered = stage
        .tree
        .fire(button, InteractionKind::Change, json!({}))
        .unwrap();
    assert_eq!(delivered, 0);
    assert_eq!(*seen.lock(), 0);
}

#[test]
fn interaction_handler_fault_lands_on_error_channel_in_production() {
    let tree = Arc::new(DocumentTree::new());
    let panel = tree
        .append(tree.root(), Element::new("section").module("counter"))
        .unwrap();

    let directory = RuntimeDirectory::new();
    let app = directory
        .create(
            RuntimeConfig::new("app"),
            Arc::clone(&tree) as Arc<dyn ElementTree>,
        )
        .unwrap();
    let faults = collect_faults(&app);

    app.module()
        .add("counter", false, |ctx| {
            ctx.listen(
                InteractionKind::PointerActivate.as_str(),
                Handler::new(|_| {
                    Err(trellis_runtime::Fault::new("TEST_HANDLER_DOWN", "boom"))
                }),
            )
            .map_err(|err| ModuleError::InitFailed(err.to_string()))?;
            Ok(Box::new(MethodTable::new()))
        })
        .unwrap();

    let _app = app.init().unwrap();

    // The delegate has no module caller to re-raise into; the fault is
    // wrapped and published instead of unwinding out of fire().
    tree.fire(panel, InteractionKind::PointerActivate, json!({}))
        .unwrap();

    let faults = faults.lock();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].code, "TEST_HANDLER_DOWN");
}

#[test]
fn detached_origin_is_tolerated() {
    let (stage, _button) = stage();
    let targets = Arc::new(Mutex::new(Vec::new()));

    {
        let targets = Arc::clone(&targets);
        stage
            .app
            .module()
            .add("counter", false, move |ctx| {
                let targets = Arc::clone(&targets);
                ctx.listen(
                    InteractionKind::PointerLeave.as_str(),
                    Handler::new(move |notice| {
                        let interaction =
                            notice.payload.as_interaction().expect("interaction");
                        targets.lock().push(interaction.target);
                        Ok(())
                    }),
                )
                .map_err(|err| ModuleError::InitFailed(err.to_string()))?;
                Ok(Box::new(MethodTable::new()))
            })
            .unwrap();
    }

    let app = stage.app.init().unwrap();
    let panel = app.module().get("counter").unwrap().element().unwrap();

    // Detach a child, then let the interaction fire on the detached node
    // while the observer sits on the still-attached module root.
    let orphan = stage.tree.append(panel, Element::new("span")).unwrap();
    stage.tree.detach(orphan).unwrap();

    // The detached node no longer bubbles to the module root, so the
    // delegate sees nothing and nothing errors.
    let delivered = stage
        .tree
        .fire(orphan, InteractionKind::PointerLeave, json!({}))
        .unwrap();
    assert_eq!(delivered, 0);
    assert!(targets.lock().is_empty());

    // An untyped origin inside the module resolves to no target but still
    // delivers the raw event.
    let plain = stage.tree.append(panel, Element::new("span")).unwrap();
    stage
        .tree
        .fire(plain, InteractionKind::PointerLeave, json!({}))
        .unwrap();
    let targets = targets.lock();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0], None);
}

#[test]
fn module_can_notify_itself_about_interactions() {
    // A module wiring its own interaction handler to a public method via
    // its context: the full delegate → dispatcher → module loop.
    let (stage, button) = stage();

    stage
        .app
        .module()
        .add("counter", false, |ctx| {
            let count = Arc::new(Mutex::new(0i64));
            let for_handler = Arc::clone(&count);
            ctx.listen(
                InteractionKind::PointerActivate.as_str(),
                Handler::new(move |_| {
                    *for_handler.lock() += 1;
                    Ok(())
                }),
            )
            .map_err(|err| ModuleError::InitFailed(err.to_string()))?;

            Ok(Box::new(MethodTable::new().method("value", move |_| {
                Ok(json!(*count.lock()))
            })))
        })
        .unwrap();

    let app = stage.app.init().unwrap();
    for _ in 0..3 {
        stage
            .tree
            .fire(button, InteractionKind::PointerActivate, json!({}))
            .unwrap();
    }

    let counter = app.module().get("counter").unwrap();
    assert_eq!(counter.invoke("value", Value::Null).unwrap(), json!(3));
}
