//! Interaction delegation.
//!
//! An [`InteractionDelegate`] binds one tree observer per interaction kind
//! on a module's root element and re-emits everything it sees as
//! module-scoped bus notices. Interest is filtered: a kind only gets an
//! observer when the bus currently has at least one subscriber for it, so
//! nobody pays for interaction kinds no module asked about.
//!
//! ```text
//! tree interaction on descendant
//!     │ bubbles to module root
//!     ▼
//! InteractionDelegate observer
//!     │ resolve nearest typed ancestor (origin, bounded by module edge)
//!     ▼
//! Dispatcher::notify((module, kind), InteractionNotice { event, target, target_role })
//! ```
//!
//! Notifications issued from here have no module caller to re-raise into,
//! so handler faults are routed into the container's [`FaultSink`] instead
//! of unwinding into the tree.

use crate::{ElementTree, ObserverId, ViewError};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};
use trellis_event::{
    Dispatcher, EventKey, InteractionKind, InteractionNotice, NoticePayload,
};
use trellis_types::{ElementId, Fault, ModuleName};

/// Where a delegate routes handler faults it cannot re-raise.
///
/// The runtime container supplies an implementation applying the
/// mode-dependent error policy (log loudly in debug, publish an `error`
/// notice in production).
pub type FaultSink = Arc<dyn Fn(Fault) + Send + Sync>;

/// Finds the nearest ancestor of `origin` (inclusive) that carries a role
/// marker, bounded by the nearest module boundary.
///
/// The walk tolerates detached origins: when the parent chain ends before
/// a match, the answer is "no match", never an error. A module-boundary
/// element that itself carries a role does match; an untyped module
/// boundary stops the walk.
#[must_use]
pub fn resolve_typed_target(
    tree: &dyn ElementTree,
    origin: ElementId,
) -> Option<(ElementId, String)> {
    let mut current = origin;
    if let Some(role) = tree.role(current) {
        return Some((current, role));
    }
    loop {
        if tree.is_module_root(current) {
            return None;
        }
        current = tree.parent(current)?;
        if let Some(role) = tree.role(current) {
            return Some((current, role));
        }
    }
}

#[derive(Default)]
struct DelegateState {
    attached: bool,
    observers: Vec<(InteractionKind, ObserverId)>,
}

/// Translates interactions on one module's root element into namespaced
/// bus notices.
pub struct InteractionDelegate {
    module: ModuleName,
    root: ElementId,
    tree: Arc<dyn ElementTree>,
    dispatcher: Arc<Dispatcher>,
    sink: FaultSink,
    state: Mutex<DelegateState>,
}

impl InteractionDelegate {
    /// Creates a detached delegate for `module`'s root element.
    #[must_use]
    pub fn new(
        module: ModuleName,
        root: ElementId,
        tree: Arc<dyn ElementTree>,
        dispatcher: Arc<Dispatcher>,
        sink: FaultSink,
    ) -> Self {
        Self {
            module,
            root,
            tree,
            dispatcher,
            sink,
            state: Mutex::new(DelegateState::default()),
        }
    }

    /// The module this delegate serves.
    #[must_use]
    pub fn module(&self) -> &ModuleName {
        &self.module
    }

    /// The element observers are bound to.
    #[must_use]
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Returns `true` while observers are attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.state.lock().attached
    }

    /// Attaches one tree observer per interaction kind that currently has
    /// bus subscribers under `(module, kind)`. Idempotent: a second call
    /// while attached is a no-op.
    ///
    /// Interest is a snapshot: subscribers registered after this call gain
    /// an observer only on the next attach cycle (module stop/start).
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if the root element is no longer part of the
    /// tree; observers attached before the failure are rolled back.
    pub fn attach_events(&self) -> Result<(), ViewError> {
        let mut state = self.state.lock();
        if state.attached {
            return Ok(());
        }

        for kind in InteractionKind::ALL {
            let key = EventKey::module(self.module.clone(), kind.as_str());
            if !self.dispatcher.has_listeners(&key) {
                continue;
            }
            match self.tree.observe(self.root, kind, self.observer(kind)) {
                Ok(id) => state.observers.push((kind, id)),
                Err(err) => {
                    for (kind, id) in state.observers.drain(..) {
                        self.tree.ignore(self.root, kind, id);
                    }
                    return Err(err);
                }
            }
        }

        debug!(
            module = %self.module,
            kinds = state.observers.len(),
            "attached interaction delegate"
        );
        state.attached = true;
        Ok(())
    }

    /// Removes every attached observer and resets the attached flag.
    /// Safe to call when never attached.
    pub fn detach_events(&self) {
        let mut state = self.state.lock();
        for (kind, id) in state.observers.drain(..) {
            self.tree.ignore(self.root, kind, id);
        }
        if state.attached {
            debug!(module = %self.module, "detached interaction delegate");
        }
        state.attached = false;
    }

    /// Builds the tree observer for one kind.
    ///
    /// The closure holds the tree weakly: the tree owns the closure, and a
    /// strong backreference would keep the pair alive forever.
    fn observer(&self, kind: InteractionKind) -> crate::InteractionObserver {
        let module = self.module.clone();
        let dispatcher = Arc::clone(&self.dispatcher);
        let tree: Weak<dyn ElementTree> = Arc::downgrade(&self.tree);
        let sink = Arc::clone(&self.sink);

        Arc::new(move |event| {
            let resolved = tree
                .upgrade()
                .and_then(|tree| resolve_typed_target(tree.as_ref(), event.origin));
            let (target, target_role) = match resolved {
                Some((element, role)) => (Some(element), Some(role)),
                None => (None, None),
            };

            let key = EventKey::module(module.clone(), kind.as_str());
            let notice = InteractionNotice {
                event: event.clone(),
                target,
                target_role,
            };
            if let Err(err) = dispatcher.notify(&key, NoticePayload::Interaction(notice)) {
                warn!(key = %key, error = %err, "interaction handler failed");
                sink(err.into_fault());
            }
        })
    }
}

impl std::fmt::Debug for InteractionDelegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionDelegate")
            .field("module", &self.module)
            .field("root", &self.root)
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}
