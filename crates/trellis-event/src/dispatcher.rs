//! The publish/subscribe bus.
//!
//! One [`Dispatcher`] is shared by every module in a runtime container.
//! Notification is synchronous and ordered; see the crate docs for the full
//! delivery contract.
//!
//! # Reentrancy
//!
//! Handlers may freely call back into the dispatcher (listen, unlisten,
//! notify). The listener list for an in-flight notification is snapshotted
//! before any handler runs, so no lock is held across subscriber code and
//! mutations made by a handler take effect from the next notification on.

use crate::{EventError, EventKey, EventScope, Handler, Notice, NoticePayload};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::trace;

/// Synchronous publish/subscribe dispatcher.
///
/// # Contract
///
/// - [`listen`](Self::listen): unconstrained multiplicity, no
///   de-duplication: registering the same handler twice invokes it twice.
/// - [`notify`](Self::notify): no listeners is a no-op, not an error;
///   otherwise every currently-registered handler for the key is invoked
///   in subscription order. The first handler fault aborts delivery and
///   propagates to the caller.
/// - [`unlisten`](Self::unlisten): removes the first handler with the same
///   identity; no-op when absent.
#[derive(Debug, Default)]
pub struct Dispatcher {
    listeners: RwLock<HashMap<EventKey, Vec<Handler>>>,
}

impl Dispatcher {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `key`.
    pub fn listen(&self, key: EventKey, handler: Handler) {
        trace!(key = %key, "listen");
        self.listeners.write().entry(key).or_default().push(handler);
    }

    /// Publishes `payload` to every subscriber of `key`, in subscription
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::HandlerFailed`] carrying the first
    /// subscriber fault; later subscribers are not invoked. The failure is
    /// deliberately not contained here: a misbehaving subscriber surfaces
    /// in its publisher's control flow unless the publisher runs under the
    /// runtime's containment guard.
    pub fn notify(
        &self,
        key: &EventKey,
        payload: impl Into<NoticePayload>,
    ) -> Result<(), EventError> {
        // Snapshot so handlers can reenter the bus without deadlock, and so
        // subscription changes made mid-flight don't affect this delivery.
        let snapshot = match self.listeners.read().get(key) {
            Some(handlers) => handlers.clone(),
            None => return Ok(()),
        };

        trace!(key = %key, subscribers = snapshot.len(), "notify");
        let notice = Notice::new(key.clone(), payload.into());
        for handler in &snapshot {
            handler.call(&notice).map_err(|fault| EventError::HandlerFailed {
                key: key.to_string(),
                fault,
            })?;
        }
        Ok(())
    }

    /// Removes the first subscriber of `key` with the same identity as
    /// `handler`. No-op if the key or handler is not registered.
    pub fn unlisten(&self, key: &EventKey, handler: &Handler) {
        let mut listeners = self.listeners.write();
        if let Some(handlers) = listeners.get_mut(key) {
            if let Some(index) = handlers.iter().position(|h| h.same_identity(handler)) {
                handlers.remove(index);
            }
            if handlers.is_empty() {
                listeners.remove(key);
            }
        }
    }

    /// Removes every subscription whose key belongs to `scope`.
    ///
    /// Used when a module stops: its namespace goes away with it.
    pub fn remove_scope(&self, scope: &EventScope) {
        self.listeners
            .write()
            .retain(|key, _| key.scope() != scope);
    }

    /// Returns the number of subscribers currently registered under `key`.
    #[must_use]
    pub fn listener_count(&self, key: &EventKey) -> usize {
        self.listeners.read().get(key).map_or(0, Vec::len)
    }

    /// Returns `true` if `key` has at least one subscriber.
    #[must_use]
    pub fn has_listeners(&self, key: &EventKey) -> bool {
        self.listener_count(key) > 0
    }
}
