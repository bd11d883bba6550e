//! The sandboxed module context.
//!
//! A [`ModuleContext`] is the only surface a module implementation may use
//! to reach the runtime. It scopes all event traffic into the module's
//! private namespace and exposes read-only access to shared services.
//!
//! # Capability Boundary
//!
//! The context never hands out the container or its registry: a module can
//! look up a sibling's public handle, but it cannot enumerate, register, or
//! stop modules. The shared [`dispatcher`](ModuleContext::dispatcher) and
//! store remain reachable: the sandbox is an API-surface (capability)
//! boundary enforced by what the context exposes, not hard isolation, and
//! is documented as such.
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use trellis_module::{MethodTable, Module};
//! use trellis_runtime::ModuleContext;
//! use trellis_event::Handler;
//!
//! fn factory(ctx: ModuleContext) -> Result<Box<dyn Module>, trellis_module::ModuleError> {
//!     // Private namespace: another module's "refresh" never lands here.
//!     ctx.listen("refresh", Handler::new(|notice| {
//!         println!("refresh: {:?}", notice.payload.as_data());
//!         Ok(())
//!     })).ok();
//!
//!     Ok(Box::new(MethodTable::new().method("poke", {
//!         let ctx = ctx.clone();
//!         move |_| {
//!             ctx.notify("refresh", json!({"from": "poke"})).ok();
//!             Ok(json!(null))
//!         }
//!     })))
//! }
//! ```

use crate::container::ContainerInner;
use crate::{ModuleHandle, RuntimeDirectory, RuntimeError};
use serde_json::Value;
use std::sync::{Arc, Weak};
use trellis_event::{Dispatcher, EventKey, Handler, NoticePayload};
use trellis_types::{ElementId, Fault, ModuleName};

struct ContextInner {
    /// Backreference only; a context never keeps its container alive.
    container: Weak<ContainerInner>,
    module: ModuleName,
    root: Option<ElementId>,
}

/// The capability-scoped facade a module uses to reach shared services.
///
/// Cheap to clone; module factories typically clone it into the closures
/// they hand back. Immutable after construction.
#[derive(Clone)]
pub struct ModuleContext {
    inner: Arc<ContextInner>,
}

impl ModuleContext {
    pub(crate) fn new(
        container: Weak<ContainerInner>,
        module: ModuleName,
        root: Option<ElementId>,
    ) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                container,
                module,
                root,
            }),
        }
    }

    /// The name of the module this context belongs to.
    #[must_use]
    pub fn name(&self) -> &ModuleName {
        &self.inner.module
    }

    /// The module's root element, or `None` for a headless module.
    #[must_use]
    pub fn element(&self) -> Option<ElementId> {
        self.inner.root
    }

    /// Current state of the container's `debug` flag. `false` once the
    /// container is gone.
    #[must_use]
    pub fn debug(&self) -> bool {
        self.inner
            .container
            .upgrade()
            .is_some_and(|container| container.debug())
    }

    /// Subscribes `handler` to the module-private event `event`.
    ///
    /// The name is rewritten into this module's namespace before reaching
    /// the dispatcher: two modules using the same local name never collide.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ContainerGone`] if the container was torn
    /// down.
    pub fn listen(&self, event: impl Into<String>, handler: Handler) -> Result<(), RuntimeError> {
        let container = self.container()?;
        container.dispatcher.listen(self.key(event), handler);
        Ok(())
    }

    /// Removes a previously registered subscriber for `event`.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ContainerGone`] if the container was torn
    /// down.
    pub fn unlisten(&self, event: impl Into<String>, handler: &Handler) -> Result<(), RuntimeError> {
        let container = self.container()?;
        container.dispatcher.unlisten(&self.key(event), handler);
        Ok(())
    }

    /// Publishes `data` under the module-private event `event`.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::ContainerGone`] if the container was torn down
    /// - [`RuntimeError::Handler`] if a subscriber failed; when the caller
    ///   is a module method running under the containment guard, that is
    ///   where the failure gets caught
    pub fn notify(&self, event: impl Into<String>, data: Value) -> Result<(), RuntimeError> {
        let container = self.container()?;
        container
            .dispatcher
            .notify(&self.key(event), NoticePayload::Data(data))?;
        Ok(())
    }

    /// Returns another module's public handle, lazily starting it if it is
    /// registered but not yet started.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::UnknownModule`] if `name` was never registered
    /// - [`RuntimeError::CyclicModule`] if this start closes a factory
    ///   dependency cycle
    /// - [`RuntimeError::ContainerGone`] if the container was torn down
    pub fn module(&self, name: impl Into<ModuleName>) -> Result<ModuleHandle, RuntimeError> {
        let container = self.container()?;
        container.registry.get(name)
    }

    /// Read-only lookup in the container's global store.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::Store`] for an empty key
    /// - [`RuntimeError::ContainerGone`] if the container was torn down
    pub fn global(&self, key: &str) -> Result<Option<Value>, RuntimeError> {
        let container = self.container()?;
        Ok(container.globals.get(key)?)
    }

    /// Signals that an error occurred, applying the mode-dependent policy:
    /// with `debug` truthy the fault re-raises to the caller as
    /// [`RuntimeError::ModuleFailed`] (fail fast); otherwise it is
    /// published as an `error` notice and swallowed (fail soft).
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::ModuleFailed`] in debug mode, carrying `fault`
    /// - [`RuntimeError::ContainerGone`] if the container was torn down
    pub fn raise(&self, fault: Fault) -> Result<(), RuntimeError> {
        let container = self.container()?;
        if container.debug() {
            Err(RuntimeError::ModuleFailed(fault))
        } else {
            container.publish_fault(fault);
            Ok(())
        }
    }

    /// The container's shared dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ContainerGone`] if the container was torn
    /// down.
    pub fn dispatcher(&self) -> Result<Arc<Dispatcher>, RuntimeError> {
        Ok(Arc::clone(&self.container()?.dispatcher))
    }

    /// Reaches another runtime's main module through the directory this
    /// container was created in. Access stops at the main module: a peer
    /// runtime's registry is never exposed.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::UnknownRuntime`] if no such runtime exists (or
    ///   this container has no directory)
    /// - [`RuntimeError::NoMainModule`] if the peer has no started main
    /// - [`RuntimeError::ContainerGone`] if the container was torn down
    pub fn peer_main(&self, runtime: impl Into<trellis_types::RuntimeName>) -> Result<ModuleHandle, RuntimeError> {
        let runtime = runtime.into();
        let container = self.container()?;
        let directory = container
            .directory
            .read()
            .upgrade()
            .map(RuntimeDirectory::from_inner)
            .ok_or_else(|| RuntimeError::UnknownRuntime(runtime.clone()))?;
        let peer = directory.get(runtime.clone())?;
        peer.main().ok_or(RuntimeError::NoMainModule(runtime))
    }

    fn key(&self, event: impl Into<String>) -> EventKey {
        EventKey::module(self.inner.module.clone(), event.into())
    }

    pub(crate) fn container(&self) -> Result<Arc<ContainerInner>, RuntimeError> {
        self.inner.container.upgrade().ok_or(RuntimeError::ContainerGone)
    }
}

impl std::fmt::Debug for ModuleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleContext")
            .field("module", &self.inner.module)
            .field("root", &self.inner.root)
            .finish_non_exhaustive()
    }
}
