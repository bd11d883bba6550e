//! Identity-bearing subscriber handles.
//!
//! A [`Handler`] is a cloneable handle to one subscriber closure. Clones
//! share identity, which is what makes [`Dispatcher::unlisten`] work:
//! removal matches the first registered handler with the same identity,
//! mirroring removal-by-function-reference. Two handlers built from two
//! `Handler::new` calls are always distinct, even over identical closures.
//!
//! [`Dispatcher::unlisten`]: crate::Dispatcher::unlisten

use crate::Notice;
use std::sync::Arc;
use trellis_types::Fault;

type HandlerFn = dyn Fn(&Notice) -> Result<(), Fault> + Send + Sync;

/// A subscriber on the dispatcher.
///
/// Handlers are fallible: a returned [`Fault`] propagates to whoever called
/// `notify`, aborting delivery to later subscribers: the dispatcher itself
/// never contains failures; containment lives in `trellis-runtime`'s guard
/// layer.
///
/// # Example
///
/// ```
/// use trellis_event::Handler;
///
/// let handler = Handler::new(|notice| {
///     println!("saw {}", notice.key);
///     Ok(())
/// });
/// let clone = handler.clone();
/// assert!(handler.same_identity(&clone));
/// ```
#[derive(Clone)]
pub struct Handler {
    f: Arc<HandlerFn>,
}

impl Handler {
    /// Wraps a closure as a handler.
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Notice) -> Result<(), Fault> + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Invokes the handler.
    ///
    /// # Errors
    ///
    /// Whatever the underlying closure returns.
    pub fn call(&self, notice: &Notice) -> Result<(), Fault> {
        (self.f)(notice)
    }

    /// Returns `true` if both handles refer to the same registered closure.
    #[must_use]
    pub fn same_identity(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventKey, NoticePayload};
    use serde_json::json;

    fn any_notice() -> Notice {
        Notice::new(EventKey::runtime("x"), NoticePayload::Data(json!(null)))
    }

    #[test]
    fn clones_share_identity() {
        let handler = Handler::new(|_| Ok(()));
        let clone = handler.clone();
        assert!(handler.same_identity(&clone));
    }

    #[test]
    fn separate_constructions_are_distinct() {
        let a = Handler::new(|_| Ok(()));
        let b = Handler::new(|_| Ok(()));
        assert!(!a.same_identity(&b));
    }

    #[test]
    fn call_propagates_fault() {
        let handler = Handler::new(|_| Err(Fault::new("TEST_BOOM", "boom")));
        let err = handler.call(&any_notice()).unwrap_err();
        assert_eq!(err.code, "TEST_BOOM");
    }
}
