//! Shared fixtures for runtime integration tests.
#![allow(dead_code)]

use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use trellis_runtime::{
    EventKey, Fault, Handler, MethodTable, Module, ModuleContext, ModuleError, RuntimeContainer,
};

/// Subscribes to the container's `error` channel and collects every fault.
pub fn collect_faults(container: &RuntimeContainer) -> Arc<Mutex<Vec<Fault>>> {
    let faults = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&faults);
    container.event().listen(
        EventKey::error(),
        Handler::new(move |notice| {
            if let Some(fault) = notice.payload.as_fault() {
                sink.lock().push(fault.clone());
            }
            Ok(())
        }),
    );
    faults
}

/// A counter module: `increment` and `value` over an atomic.
pub fn counter_factory(_ctx: ModuleContext) -> Result<Box<dyn Module>, ModuleError> {
    let value = Arc::new(AtomicI64::new(0));
    let for_increment = Arc::clone(&value);
    Ok(Box::new(
        MethodTable::new()
            .method("increment", move |_| {
                Ok(json!(for_increment.fetch_add(1, Ordering::SeqCst) + 1))
            })
            .method("value", move |_| Ok(json!(value.load(Ordering::SeqCst)))),
    ))
}

/// A counter whose `increment` always overflows.
pub fn overflowing_counter(_ctx: ModuleContext) -> Result<Box<dyn Module>, ModuleError> {
    Ok(Box::new(MethodTable::new().method("increment", |_| {
        Err(ModuleError::ExecutionFailed("overflow".into()))
    })))
}
