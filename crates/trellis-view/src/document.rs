//! In-memory reference tree.
//!
//! [`DocumentTree`] is the canonical [`ElementTree`] implementation used by
//! tests, demos, and hosts that have no native tree of their own. Elements
//! live in a slotmap arena, so ids are generational: a removed element's id
//! never aliases a later insertion.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use trellis_view::{DocumentTree, Element, ElementTree};
//! use trellis_types::ModuleName;
//!
//! let tree = DocumentTree::new();
//! let panel = tree
//!     .append(tree.root(), Element::new("section").module("counter"))
//!     .unwrap();
//! let button = tree
//!     .append(panel, Element::new("button").role("increment"))
//!     .unwrap();
//!
//! assert_eq!(tree.find_module_root(&ModuleName::new("counter")), Some(panel));
//! assert_eq!(tree.role(button).as_deref(), Some("increment"));
//! ```

use crate::{ElementTree, InteractionObserver, ObserverId, ViewError};
use parking_lot::RwLock;
use serde_json::Value;
use slotmap::SlotMap;
use std::collections::HashMap;
use trellis_event::{InteractionEvent, InteractionKind};
use trellis_types::{ElementId, ModuleName};

/// Blueprint for a new element.
///
/// Markers are fixed at append time; the runtime resolves module roots and
/// roles from them, never from tags.
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    modules: Vec<ModuleName>,
    role: Option<String>,
}

impl Element {
    /// Starts a blueprint with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            modules: Vec::new(),
            role: None,
        }
    }

    /// Adds a module marker. The marker value-list may name several
    /// modules; each call appends one.
    #[must_use]
    pub fn module(mut self, module: impl Into<ModuleName>) -> Self {
        self.modules.push(module.into());
        self
    }

    /// Sets the role marker.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

struct Node {
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    modules: Vec<ModuleName>,
    role: Option<String>,
    observers: HashMap<InteractionKind, Vec<(ObserverId, InteractionObserver)>>,
}

impl Node {
    fn from_blueprint(blueprint: Element, parent: Option<ElementId>) -> Self {
        Self {
            tag: blueprint.tag,
            parent,
            children: Vec::new(),
            modules: blueprint.modules,
            role: blueprint.role,
            observers: HashMap::new(),
        }
    }
}

struct TreeInner {
    nodes: SlotMap<ElementId, Node>,
    root: ElementId,
    next_observer: u64,
}

/// In-memory implementation of [`ElementTree`].
///
/// A fresh tree holds a single root element (tag `root`, no markers).
/// Detaching an element unlinks it from its parent but keeps it alive;
/// interactions can still fire on it, which is exactly the situation origin
/// resolution must tolerate. Removal deletes the whole subtree.
pub struct DocumentTree {
    inner: RwLock<TreeInner>,
}

impl DocumentTree {
    /// Creates a tree containing only the root element.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::from_blueprint(Element::new("root"), None));
        Self {
            inner: RwLock::new(TreeInner {
                nodes,
                root,
                next_observer: 0,
            }),
        }
    }

    /// Returns the root element.
    #[must_use]
    pub fn root(&self) -> ElementId {
        self.inner.read().root
    }

    /// Appends a new element under `parent`.
    ///
    /// A detached parent is legal; the new element joins the detached
    /// subtree.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::UnknownElement`] if `parent` is not part of
    /// this tree.
    pub fn append(&self, parent: ElementId, blueprint: Element) -> Result<ElementId, ViewError> {
        let mut inner = self.inner.write();
        if !inner.nodes.contains_key(parent) {
            return Err(ViewError::UnknownElement);
        }
        let id = inner.nodes.insert(Node::from_blueprint(blueprint, Some(parent)));
        inner.nodes[parent].children.push(id);
        Ok(id)
    }

    /// Unlinks `element` from its parent, keeping the subtree alive.
    ///
    /// # Errors
    ///
    /// - [`ViewError::RootDetach`] for the root element
    /// - [`ViewError::UnknownElement`] for an id not in this tree
    pub fn detach(&self, element: ElementId) -> Result<(), ViewError> {
        let mut inner = self.inner.write();
        if element == inner.root {
            return Err(ViewError::RootDetach);
        }
        let parent = match inner.nodes.get(element) {
            Some(node) => node.parent,
            None => return Err(ViewError::UnknownElement),
        };
        if let Some(parent) = parent {
            if let Some(parent_node) = inner.nodes.get_mut(parent) {
                parent_node.children.retain(|&child| child != element);
            }
        }
        inner.nodes[element].parent = None;
        Ok(())
    }

    /// Deletes `element` and its whole subtree.
    ///
    /// # Errors
    ///
    /// Same conditions as [`detach`](Self::detach).
    pub fn remove(&self, element: ElementId) -> Result<(), ViewError> {
        self.detach(element)?;
        let mut inner = self.inner.write();
        let mut pending = vec![element];
        while let Some(current) = pending.pop() {
            if let Some(node) = inner.nodes.remove(current) {
                pending.extend(node.children);
            }
        }
        Ok(())
    }

    /// Returns the tag `element` was created with, if it still exists.
    #[must_use]
    pub fn tag(&self, element: ElementId) -> Option<String> {
        self.inner.read().nodes.get(element).map(|n| n.tag.clone())
    }

    /// Returns the number of live elements, including detached ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().nodes.len()
    }

    /// Returns `true` if only the root exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Synthesizes a `kind` interaction originating on `origin` and
    /// delivers it, bubbling: observers on the origin fire first, then
    /// each ancestor's in attachment order. A detached origin fires too;
    /// its chain just ends early.
    ///
    /// Returns the number of observers invoked.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::UnknownElement`] if `origin` is not part of
    /// this tree.
    pub fn fire(
        &self,
        origin: ElementId,
        kind: InteractionKind,
        detail: Value,
    ) -> Result<usize, ViewError> {
        // Snapshot the observer chain, then invoke outside the lock so
        // observers can query and mutate the tree.
        let chain: Vec<InteractionObserver> = {
            let inner = self.inner.read();
            if !inner.nodes.contains_key(origin) {
                return Err(ViewError::UnknownElement);
            }
            let mut chain = Vec::new();
            let mut current = Some(origin);
            while let Some(id) = current {
                let node = &inner.nodes[id];
                if let Some(observers) = node.observers.get(&kind) {
                    chain.extend(observers.iter().map(|(_, observer)| observer.clone()));
                }
                current = node.parent;
            }
            chain
        };

        let event = InteractionEvent::new(kind, origin, detail);
        for observer in &chain {
            observer(&event);
        }
        Ok(chain.len())
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree for DocumentTree {
    fn find_module_root(&self, module: &ModuleName) -> Option<ElementId> {
        let inner = self.inner.read();
        // Depth-first preorder from the root = document order.
        let mut stack = vec![inner.root];
        while let Some(id) = stack.pop() {
            let node = &inner.nodes[id];
            if node.modules.contains(module) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.inner.read().nodes.get(element).and_then(|n| n.parent)
    }

    fn role(&self, element: ElementId) -> Option<String> {
        self.inner
            .read()
            .nodes
            .get(element)
            .and_then(|n| n.role.clone())
    }

    fn is_module_root(&self, element: ElementId) -> bool {
        self.inner
            .read()
            .nodes
            .get(element)
            .is_some_and(|n| !n.modules.is_empty())
    }

    fn contains(&self, element: ElementId) -> bool {
        self.inner.read().nodes.contains_key(element)
    }

    fn observe(
        &self,
        element: ElementId,
        kind: InteractionKind,
        observer: InteractionObserver,
    ) -> Result<ObserverId, ViewError> {
        let mut inner = self.inner.write();
        if !inner.nodes.contains_key(element) {
            return Err(ViewError::UnknownElement);
        }
        let id = ObserverId::new(inner.next_observer);
        inner.next_observer += 1;
        inner.nodes[element]
            .observers
            .entry(kind)
            .or_default()
            .push((id, observer));
        Ok(id)
    }

    fn ignore(&self, element: ElementId, kind: InteractionKind, observer: ObserverId) {
        let mut inner = self.inner.write();
        if let Some(node) = inner.nodes.get_mut(element) {
            if let Some(observers) = node.observers.get_mut(&kind) {
                observers.retain(|(id, _)| *id != observer);
                if observers.is_empty() {
                    node.observers.remove(&kind);
                }
            }
        }
    }
}
