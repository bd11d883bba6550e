//! The element tree seam.
//!
//! [`ElementTree`] is the contract the runtime programs against. The
//! in-memory [`DocumentTree`](crate::DocumentTree) implements it for tests
//! and demos; a host embeds trellis by implementing it over whatever widget
//! or scene tree it renders.
//!
//! Implementations must be tolerant of stale ids: interaction handlers can
//! legitimately fire on elements that were detached between the native
//! event and its observation, so queries answer "no match" rather than
//! failing wherever possible. Only [`observe`](ElementTree::observe) is
//! fallible: attaching an observer to an element that no longer exists is
//! a caller bug.

use crate::ViewError;
use std::sync::Arc;
use trellis_event::{InteractionEvent, InteractionKind};
use trellis_types::{ElementId, ModuleName};

/// Callback invoked by a tree when an observed interaction fires.
///
/// Observers are infallible at this layer; failure routing happens inside
/// the delegate that registered them.
pub type InteractionObserver = Arc<dyn Fn(&InteractionEvent) + Send + Sync>;

/// Handle to one registered observer, used to remove it again.
///
/// Ids are minted by the tree and are only meaningful to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Wraps a raw observer id. Intended for tree implementations.
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[must_use]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// An opaque, queryable, observable tree of visual elements.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the runtime shares one tree
/// across every container created against it.
pub trait ElementTree: Send + Sync {
    /// Returns the first element in document order whose module-marker
    /// list includes `module`, or `None` (a headless module is legal).
    fn find_module_root(&self, module: &ModuleName) -> Option<ElementId>;

    /// Returns the parent of `element`, or `None` for the root, for a
    /// detached element, and for an unknown id.
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Returns the role marker of `element`, if it carries one.
    fn role(&self, element: ElementId) -> Option<String>;

    /// Returns `true` if `element` carries any module marker.
    fn is_module_root(&self, element: ElementId) -> bool;

    /// Returns `true` if the id refers to an element of this tree,
    /// attached or detached.
    fn contains(&self, element: ElementId) -> bool;

    /// Registers an observer for `kind` interactions reaching `element`
    /// (originating on it or bubbling up from its descendants).
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::UnknownElement`] if `element` is not part of
    /// this tree.
    fn observe(
        &self,
        element: ElementId,
        kind: InteractionKind,
        observer: InteractionObserver,
    ) -> Result<ObserverId, ViewError>;

    /// Removes a previously registered observer. No-op when the element or
    /// observer is already gone.
    fn ignore(&self, element: ElementId, kind: InteractionKind, observer: ObserverId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observer_id_round_trip() {
        let id = ObserverId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id, ObserverId::new(42));
        assert_ne!(id, ObserverId::new(43));
    }
}
