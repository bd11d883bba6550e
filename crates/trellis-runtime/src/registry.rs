//! The module registry.
//!
//! One registry per runtime container. It owns the module lifecycle state
//! machine:
//!
//! ```text
//! unregistered ──add──► registered ──start/get──► started
//!                            ▲                       │
//!                            └───────── stop ────────┘
//! ```
//!
//! Stop evicts the instance record (delegates detached, module-scoped bus
//! listeners dropped, `on_stop` hook called); the registration stays, so a
//! later `start`/`get` re-instantiates cleanly.
//!
//! # Laziness and Reentrancy
//!
//! `get` starts a registered-but-unstarted module on demand, and a factory
//! may itself call `ctx.module(..)`, recursively starting others. No lock
//! is held while a factory runs. A per-container currently-starting stack
//! turns factory dependency cycles into [`RuntimeError::CyclicModule`]
//! instead of stack overflow.
//!
//! # Failure Reporting
//!
//! Configuration failures (duplicate add, unknown get) are never silently
//! ignored: in debug mode they return `Err` to the caller; in production
//! `add`/`start` publish an `error` notice and report success (the runtime
//! keeps going), while `get`, which must produce a handle, publishes and
//! still returns `Err`.

use crate::container::ContainerInner;
use crate::{ModuleContext, ModuleHandle, RuntimeError};
use parking_lot::{Mutex, RwLock};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::{debug, info, trace};
use trellis_event::EventScope;
use trellis_module::{Module, ModuleError};
use trellis_types::{ElementId, Fault, ModuleName};
use trellis_view::InteractionDelegate;

/// Factory producing a module instance from its sandboxed context.
pub type ModuleFactory =
    Arc<dyn Fn(ModuleContext) -> Result<Box<dyn Module>, ModuleError> + Send + Sync>;

/// An immutable registration: name, main flag, factory.
struct Registration {
    name: ModuleName,
    main: bool,
    factory: ModuleFactory,
}

/// Everything a started module owns. Evicted as a unit on stop.
pub(crate) struct ModuleRecord {
    pub(crate) name: ModuleName,
    pub(crate) instance: Arc<dyn Module>,
    pub(crate) context: ModuleContext,
    pub(crate) root: Option<ElementId>,
    /// Ordered list; currently always length ≤ 1 (one delegate on the
    /// module root).
    pub(crate) delegates: Vec<InteractionDelegate>,
}

/// Per-container module registry.
pub struct ModuleRegistry {
    container: Weak<ContainerInner>,
    registrations: RwLock<Vec<Registration>>,
    records: RwLock<HashMap<ModuleName, Arc<ModuleRecord>>>,
    /// Stack of names whose factories are currently running; closing a
    /// cycle against it fails fast instead of recursing forever.
    starting: Mutex<Vec<ModuleName>>,
}

impl ModuleRegistry {
    pub(crate) fn new(container: Weak<ContainerInner>) -> Self {
        Self {
            container,
            registrations: RwLock::new(Vec::new()),
            records: RwLock::new(HashMap::new()),
            starting: Mutex::new(Vec::new()),
        }
    }

    /// Registers a module factory under `name`.
    ///
    /// Registrations are immutable once added and have no retroactive
    /// effect on already-started modules.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::MissingName`] for an empty name and
    /// [`RuntimeError::DuplicateModule`] for a name already registered
    /// (the first registration stays active); both are subject to the
    /// reporting policy above.
    pub fn add<F>(&self, name: impl Into<ModuleName>, main: bool, factory: F) -> Result<(), RuntimeError>
    where
        F: Fn(ModuleContext) -> Result<Box<dyn Module>, ModuleError> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            return self.contain(RuntimeError::MissingName);
        }

        let mut registrations = self.registrations.write();
        if registrations.iter().any(|reg| reg.name == name) {
            drop(registrations);
            return self.contain(RuntimeError::DuplicateModule(name));
        }
        debug!(module = %name, main, "registered module");
        registrations.push(Registration {
            name,
            main,
            factory: Arc::new(factory),
        });
        Ok(())
    }

    /// Returns the public handle for `name`, starting the module first if
    /// it is registered but not yet started. Handle identity is stable
    /// until the module is stopped.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::UnknownModule`] if `name` was never registered
    /// - [`RuntimeError::CyclicModule`] if the lazy start closes a factory
    ///   dependency cycle
    /// - any failure of the module's factory
    pub fn get(&self, name: impl Into<ModuleName>) -> Result<ModuleHandle, RuntimeError> {
        let name = name.into();
        if !self.is_registered(&name) {
            return Err(self.report(RuntimeError::UnknownModule(name)));
        }
        if let Err(err) = self.ensure_started(&name) {
            return Err(self.report(err));
        }
        let record = self
            .records
            .read()
            .get(&name)
            .cloned()
            .ok_or(RuntimeError::UnknownModule(name))?;
        Ok(ModuleHandle::new(record))
    }

    /// Starts `name` if it is registered and not yet started; otherwise a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Factory and cycle failures, subject to the reporting policy (debug
    /// re-raises, production publishes and returns `Ok`).
    pub fn start(&self, name: impl Into<ModuleName>) -> Result<(), RuntimeError> {
        let name = name.into();
        if !self.is_registered(&name) {
            trace!(module = %name, "start skipped: not registered");
            return Ok(());
        }
        match self.ensure_started(&name) {
            Ok(()) => Ok(()),
            Err(err) => self.contain(err),
        }
    }

    /// Starts every currently-registered module in registration order.
    ///
    /// Registrations added afterwards are NOT started automatically; run
    /// another pass or start them individually.
    ///
    /// # Errors
    ///
    /// In debug mode the first failing module aborts the pass; in
    /// production each failure is published and the pass continues.
    pub fn start_all(&self) -> Result<(), RuntimeError> {
        let names: Vec<ModuleName> = self
            .registrations
            .read()
            .iter()
            .map(|reg| reg.name.clone())
            .collect();
        for name in names {
            self.start(name)?;
        }
        Ok(())
    }

    /// Stops `name`: detaches its interaction delegates, drops its
    /// module-scoped bus listeners, calls the instance's `on_stop` hook,
    /// and evicts the record. The registration stays, so a later
    /// `start`/`get` re-instantiates.
    ///
    /// Returns `true` if a started instance was actually stopped.
    pub fn stop(&self, name: impl Into<ModuleName>) -> bool {
        let name = name.into();
        let Some(record) = self.records.write().remove(&name) else {
            return false;
        };

        for delegate in &record.delegates {
            delegate.detach_events();
        }
        if let Some(container) = self.container.upgrade() {
            container
                .dispatcher
                .remove_scope(&EventScope::Module(name.clone()));
            let mut main = container.main.write();
            if let Some(current) = main.upgrade() {
                if Arc::ptr_eq(&current, &record) {
                    *main = Weak::new();
                }
            }
        }
        record.instance.on_stop();
        info!(module = %name, "stopped module");
        true
    }

    /// Stops every started module, in registration order.
    pub fn stop_all(&self) {
        let names: Vec<ModuleName> = self
            .registrations
            .read()
            .iter()
            .map(|reg| reg.name.clone())
            .collect();
        for name in names {
            self.stop(name);
        }
    }

    /// Returns `true` if `name` has a registration.
    #[must_use]
    pub fn is_registered(&self, name: &ModuleName) -> bool {
        self.registrations.read().iter().any(|reg| &reg.name == name)
    }

    /// Returns `true` if `name` currently has a started instance.
    #[must_use]
    pub fn is_started(&self, name: &ModuleName) -> bool {
        self.records.read().contains_key(name)
    }

    /// Registered module names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<ModuleName> {
        self.registrations
            .read()
            .iter()
            .map(|reg| reg.name.clone())
            .collect()
    }

    /// Number of started instances.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.records.read().len()
    }

    /// Starts `name` unless already started. Raw result, no reporting
    /// policy applied.
    fn ensure_started(&self, name: &ModuleName) -> Result<(), RuntimeError> {
        if self.records.read().contains_key(name) {
            return Ok(());
        }
        let Some((main, factory)) = self.registration(name) else {
            return Err(RuntimeError::UnknownModule(name.clone()));
        };

        {
            let mut starting = self.starting.lock();
            if starting.contains(name) {
                let mut chain = starting.clone();
                chain.push(name.clone());
                return Err(RuntimeError::CyclicModule {
                    module: name.clone(),
                    chain,
                });
            }
            starting.push(name.clone());
        }

        let result = self.instantiate(name, main, &factory);

        let mut starting = self.starting.lock();
        if let Some(position) = starting.iter().rposition(|entry| entry == name) {
            starting.remove(position);
        }
        result
    }

    /// Builds context, runs the factory, attaches the delegate, records
    /// the instance. No registry lock is held while the factory runs.
    fn instantiate(
        &self,
        name: &ModuleName,
        main: bool,
        factory: &ModuleFactory,
    ) -> Result<(), RuntimeError> {
        let container = self
            .container
            .upgrade()
            .ok_or(RuntimeError::ContainerGone)?;

        let root = container.tree.find_module_root(name);
        let context = ModuleContext::new(Arc::downgrade(&container), name.clone(), root);

        let instance: Arc<dyn Module> = match factory(context.clone()) {
            Ok(instance) => Arc::from(instance),
            Err(err) => {
                return Err(RuntimeError::ModuleFailed(
                    Fault::from(err).with_module(name.clone()),
                ));
            }
        };

        let mut delegates = Vec::new();
        if let Some(root) = root {
            let delegate = InteractionDelegate::new(
                name.clone(),
                root,
                Arc::clone(&container.tree),
                Arc::clone(&container.dispatcher),
                ContainerInner::fault_sink(&container),
            );
            delegate.attach_events()?;
            delegates.push(delegate);
        }

        let record = Arc::new(ModuleRecord {
            name: name.clone(),
            instance,
            context,
            root,
            delegates,
        });

        {
            let mut records = self.records.write();
            match records.entry(name.clone()) {
                Entry::Occupied(_) => {
                    // Lost a concurrent start race; the first instance
                    // wins and this one never becomes observable.
                    for delegate in &record.delegates {
                        delegate.detach_events();
                    }
                    return Ok(());
                }
                Entry::Vacant(slot) => {
                    slot.insert(Arc::clone(&record));
                }
            }
        }

        if main {
            *container.main.write() = Arc::downgrade(&record);
        }
        info!(
            module = %name,
            main,
            headless = root.is_none(),
            "started module"
        );
        Ok(())
    }

    fn registration(&self, name: &ModuleName) -> Option<(bool, ModuleFactory)> {
        self.registrations
            .read()
            .iter()
            .find(|reg| &reg.name == name)
            .map(|reg| (reg.main, Arc::clone(&reg.factory)))
    }

    /// Reporting policy for fire-and-forget operations: debug re-raises,
    /// production publishes an `error` notice and swallows.
    fn contain(&self, err: RuntimeError) -> Result<(), RuntimeError> {
        if self.debug() {
            Err(err)
        } else {
            self.publish(&err);
            Ok(())
        }
    }

    /// Reporting policy for value-producing operations: the error always
    /// returns to the caller, and production additionally publishes it.
    fn report(&self, err: RuntimeError) -> RuntimeError {
        if !self.debug() {
            self.publish(&err);
        }
        err
    }

    fn publish(&self, err: &RuntimeError) {
        if let Some(container) = self.container.upgrade() {
            container.publish_fault(err.to_fault());
        }
    }

    fn debug(&self) -> bool {
        self.container
            .upgrade()
            .is_some_and(|container| container.debug())
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("registered", &self.names())
            .field("started", &self.started_count())
            .finish_non_exhaustive()
    }
}
