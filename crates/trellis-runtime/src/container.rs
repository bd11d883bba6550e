//! The runtime container.
//!
//! A [`RuntimeContainer`] is one isolated instance of the module system:
//! it owns one dispatcher, one global store, and one module registry, all
//! bound to the visual-element tree it was created against.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  RuntimeContainer "app"                   │
//! │  ┌─────────────┐  ┌──────────────┐  ┌─────────────────┐   │
//! │  │ Dispatcher  │  │ global store │  │ ModuleRegistry  │   │
//! │  └─────────────┘  └──────────────┘  └─────────────────┘   │
//! │         bound to one Arc<dyn ElementTree>                 │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Containers are cheap cloneable handles; the last clone dropping tears
//! the container down. `init` eagerly starts every registered module;
//! `reset` stops all instances and clears the store while keeping
//! registrations; `destroy` additionally removes the container from its
//! directory.

use crate::directory::DirectoryInner;
use crate::registry::{ModuleRecord, ModuleRegistry};
use crate::{ModuleHandle, RuntimeConfig, RuntimeError};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::{Arc, Weak};
use tracing::{error, info};
use trellis_event::{Dispatcher, EventKey, NoticePayload};
use trellis_types::{Dictionary, Fault, RuntimeName};
use trellis_view::{ElementTree, FaultSink};

/// Key under which the debug flag lives in the global store.
const DEBUG_KEY: &str = "debug";

/// Store-value truthiness, for the dynamically-read `debug` flag: `false`,
/// `null`, `0`, and `""` are falsy; everything else is truthy.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) struct ContainerInner {
    pub(crate) name: RuntimeName,
    pub(crate) dispatcher: Arc<Dispatcher>,
    pub(crate) globals: Dictionary<Value>,
    pub(crate) tree: Arc<dyn ElementTree>,
    pub(crate) registry: ModuleRegistry,
    /// Weak so the main module's record lifecycle stays owned by the
    /// registry; cleared when the main module stops.
    pub(crate) main: RwLock<Weak<ModuleRecord>>,
    /// Backreference to the directory that created this container, if any.
    pub(crate) directory: RwLock<Weak<DirectoryInner>>,
}

impl ContainerInner {
    /// Dynamic read of the `debug` flag; any store value counts by
    /// truthiness, so the mode can be toggled at runtime via the store.
    pub(crate) fn debug(&self) -> bool {
        self.globals
            .get(DEBUG_KEY)
            .ok()
            .flatten()
            .is_some_and(|value| truthy(&value))
    }

    /// Publishes a contained fault on the `error` channel. A failing
    /// error-channel subscriber is logged and swallowed: error reporting
    /// must not recurse.
    pub(crate) fn publish_fault(&self, fault: Fault) {
        if let Err(err) = self
            .dispatcher
            .notify(&EventKey::error(), NoticePayload::Fault(fault))
        {
            error!(error = %err, "error-channel subscriber failed");
        }
    }

    /// Builds the fault sink handed to interaction delegates: fail loud in
    /// debug (there is no caller to re-raise into), fail soft in
    /// production.
    pub(crate) fn fault_sink(this: &Arc<Self>) -> FaultSink {
        let weak = Arc::downgrade(this);
        Arc::new(move |fault: Fault| {
            let Some(inner) = weak.upgrade() else {
                error!(fault = %fault, "fault raised after container teardown");
                return;
            };
            if inner.debug() {
                error!(fault = %fault, "unhandled interaction fault");
            } else {
                inner.publish_fault(fault);
            }
        })
    }
}

/// An isolated instance of the module system, identified by name.
#[derive(Clone)]
pub struct RuntimeContainer {
    pub(crate) inner: Arc<ContainerInner>,
}

impl RuntimeContainer {
    /// Creates a standalone container (no directory) against `tree`.
    ///
    /// Config keys besides `name` are seeded into the global store; the
    /// `debug` flag is seeded under `"debug"`.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::MissingName`] if the config has an empty name
    /// - [`RuntimeError::Store`] if a seeded global has an empty key
    pub fn create(
        config: RuntimeConfig,
        tree: Arc<dyn ElementTree>,
    ) -> Result<Self, RuntimeError> {
        if config.name.is_empty() {
            return Err(RuntimeError::MissingName);
        }

        let inner = Arc::new_cyclic(|weak: &Weak<ContainerInner>| ContainerInner {
            name: config.name.clone(),
            dispatcher: Arc::new(Dispatcher::new()),
            globals: Dictionary::new(),
            tree,
            registry: ModuleRegistry::new(weak.clone()),
            main: RwLock::new(Weak::new()),
            directory: RwLock::new(Weak::new()),
        });

        inner.globals.update(DEBUG_KEY, Value::Bool(config.debug))?;
        for (key, value) in config.globals {
            inner.globals.update(key, value)?;
        }

        info!(runtime = %inner.name, debug = config.debug, "created runtime container");
        Ok(Self { inner })
    }

    /// Eagerly starts every registered module and returns the container
    /// for chaining.
    ///
    /// # Errors
    ///
    /// In debug mode the first failing module start aborts; in production
    /// failures are published on the `error` channel and the pass
    /// completes.
    pub fn init(self) -> Result<Self, RuntimeError> {
        info!(runtime = %self.inner.name, "init: starting all modules");
        self.inner.registry.start_all()?;
        Ok(self)
    }

    /// The container's name.
    #[must_use]
    pub fn name(&self) -> &RuntimeName {
        &self.inner.name
    }

    /// The shared event dispatcher.
    #[must_use]
    pub fn event(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    /// The global key/value store.
    #[must_use]
    pub fn global(&self) -> &Dictionary<Value> {
        &self.inner.globals
    }

    /// The module registry.
    #[must_use]
    pub fn module(&self) -> &ModuleRegistry {
        &self.inner.registry
    }

    /// The visual-element tree this container is bound to.
    #[must_use]
    pub fn tree(&self) -> Arc<dyn ElementTree> {
        Arc::clone(&self.inner.tree)
    }

    /// The started main module, if a registration flagged main has
    /// started and not been stopped since.
    #[must_use]
    pub fn main(&self) -> Option<ModuleHandle> {
        self.inner.main.read().upgrade().map(ModuleHandle::new)
    }

    /// Current state of the `debug` flag.
    #[must_use]
    pub fn debug(&self) -> bool {
        self.inner.debug()
    }

    /// Stops all module instances and clears the global store (including
    /// seeded config values), keeping registrations intact.
    pub fn reset(&self) {
        info!(runtime = %self.inner.name, "reset");
        self.inner.registry.stop_all();
        self.inner.globals.clear();
    }

    /// [`reset`](Self::reset), then removes the container from the
    /// directory that created it (if any).
    pub fn destroy(&self) {
        self.reset();
        if let Some(directory) = self.inner.directory.read().upgrade() {
            directory.runtimes.remove(self.inner.name.as_str());
        }
        info!(runtime = %self.inner.name, "destroyed");
    }
}

impl std::fmt::Debug for RuntimeContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeContainer")
            .field("name", &self.inner.name)
            .field("debug", &self.debug())
            .field("registry", &self.inner.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_matrix() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("yes")));
        assert!(truthy(&json!([])));
        assert!(truthy(&json!({})));
    }
}
