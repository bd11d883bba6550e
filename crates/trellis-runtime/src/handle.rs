//! The error-containment guard around a started module.
//!
//! [`ModuleHandle`] is what `registry.get` and `ctx.module` hand out: the
//! module's public surface, wrapped in the try/result boundary the runtime
//! guarantees. The guard is an explicit combinator applied at every
//! invocation, with no reflection over the instance:
//!
//! ```text
//! handle.invoke("increment", payload)
//!     │
//!     ▼ Module::invoke
//!   Ok(value) ──────────────────────────────► Ok(value)
//!   Err(e)    ── annotate module + method ──┐
//!                                           ▼
//!                        debug?  yes → Err(RuntimeError::ModuleFailed)
//!                                no  → publish `error` notice, Ok(Null)
//! ```
//!
//! Net effect: in production no module method call can propagate an
//! unhandled failure out of the runtime; in debug every failure surfaces
//! immediately to the caller.

use crate::registry::ModuleRecord;
use crate::RuntimeError;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;
use trellis_types::{ElementId, Fault, ModuleName};

/// Guarded public handle to a started module instance.
///
/// Handles are cheap clones sharing one underlying instance; identity is
/// stable from start until the module is stopped.
#[derive(Clone)]
pub struct ModuleHandle {
    record: Arc<ModuleRecord>,
}

impl ModuleHandle {
    pub(crate) fn new(record: Arc<ModuleRecord>) -> Self {
        Self { record }
    }

    /// The module's name.
    #[must_use]
    pub fn name(&self) -> &ModuleName {
        &self.record.name
    }

    /// The module's root element, or `None` for a headless module.
    #[must_use]
    pub fn element(&self) -> Option<ElementId> {
        self.record.root
    }

    /// Returns `true` if both handles point at the same started instance.
    #[must_use]
    pub fn same_instance(&self, other: &ModuleHandle) -> bool {
        Arc::ptr_eq(&self.record, &other.record)
    }

    /// Invokes a module method through the containment guard.
    ///
    /// On success the method's value passes through unchanged. On module
    /// failure the error is annotated with module and method, then routed
    /// by the mode-dependent policy: debug re-raises, production publishes
    /// an `error` notice and returns `Ok(Value::Null)`: the call "returns
    /// undefined" and the runtime keeps going.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::ModuleFailed`] in debug mode when the method fails
    /// - [`RuntimeError::Handler`] when an event raised *by* the method
    ///   fails in a subscriber and debug mode lets it propagate
    /// - [`RuntimeError::ContainerGone`] if the container was torn down
    pub fn invoke(&self, method: &str, payload: Value) -> Result<Value, RuntimeError> {
        match self.record.instance.invoke(method, payload) {
            Ok(value) => Ok(value),
            Err(err) => {
                let fault = Fault::from(err)
                    .with_module(self.record.name.clone())
                    .with_method(method);
                warn!(fault = %fault, "contained module failure");
                self.record.context.raise(fault)?;
                Ok(Value::Null)
            }
        }
    }
}

impl std::fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("module", &self.record.name)
            .field("root", &self.record.root)
            .finish_non_exhaustive()
    }
}
