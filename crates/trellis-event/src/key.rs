//! Structured event keys.
//!
//! The bus is keyed on `(scope, name)` tuples. The module scope is what
//! gives each module a private namespace: two modules listening to the same
//! local name `"changed"` produce two distinct keys, and a module can only
//! observe another module's events by constructing a key with that module's
//! name: the same knowledge boundary the rest of the runtime uses.

use serde::{Deserialize, Serialize};
use trellis_types::ModuleName;

/// Namespace of an event key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventScope {
    /// Container-level events, e.g. the `error` channel.
    Runtime,
    /// Events private to one module's namespace.
    Module(ModuleName),
}

/// Key of a bus event: a scope plus a local name.
///
/// Keys compare and hash as the full tuple. The [`Display`] form renders
/// the legacy `module-name` spelling for logs; it is never parsed back.
///
/// # Example
///
/// ```
/// use trellis_event::EventKey;
/// use trellis_types::ModuleName;
///
/// let a = EventKey::module(ModuleName::new("a"), "x");
/// let b = EventKey::module(ModuleName::new("b"), "x");
/// assert_ne!(a, b);
/// assert_eq!(a.to_string(), "a-x");
/// assert_eq!(EventKey::error().to_string(), "error");
/// ```
///
/// [`Display`]: std::fmt::Display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventKey {
    scope: EventScope,
    name: String,
}

/// Local name of the container-level error channel.
const ERROR_EVENT: &str = "error";

impl EventKey {
    /// Creates a container-level key.
    #[must_use]
    pub fn runtime(name: impl Into<String>) -> Self {
        Self {
            scope: EventScope::Runtime,
            name: name.into(),
        }
    }

    /// Creates a module-scoped key.
    #[must_use]
    pub fn module(module: ModuleName, name: impl Into<String>) -> Self {
        Self {
            scope: EventScope::Module(module),
            name: name.into(),
        }
    }

    /// The container-level `error` channel carrying contained faults.
    #[must_use]
    pub fn error() -> Self {
        Self::runtime(ERROR_EVENT)
    }

    /// Returns the key's scope.
    #[must_use]
    pub fn scope(&self) -> &EventScope {
        &self.scope
    }

    /// Returns the local event name within the scope.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the module this key is scoped to, if any.
    #[must_use]
    pub fn module_scope(&self) -> Option<&ModuleName> {
        match &self.scope {
            EventScope::Module(module) => Some(module),
            EventScope::Runtime => None,
        }
    }
}

impl std::fmt::Display for EventKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.scope {
            EventScope::Runtime => f.write_str(&self.name),
            EventScope::Module(module) => write!(f, "{module}-{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn module_scopes_do_not_collide() {
        let a = EventKey::module(ModuleName::new("a"), "x");
        let b = EventKey::module(ModuleName::new("b"), "x");
        let runtime = EventKey::runtime("x");

        let mut set = HashSet::new();
        set.insert(a.clone());
        assert!(!set.contains(&b));
        assert!(!set.contains(&runtime));
        assert!(set.contains(&a));
    }

    #[test]
    fn separator_in_module_name_cannot_alias() {
        // Under string concatenation, ("a-x", "y") and ("a", "x-y") would
        // both render "a-x-y". As tuples they stay distinct.
        let tricky = EventKey::module(ModuleName::new("a-x"), "y");
        let plain = EventKey::module(ModuleName::new("a"), "x-y");
        assert_eq!(tricky.to_string(), plain.to_string());
        assert_ne!(tricky, plain);
    }

    #[test]
    fn error_key_is_runtime_scoped() {
        let key = EventKey::error();
        assert_eq!(key.scope(), &EventScope::Runtime);
        assert_eq!(key.name(), "error");
        assert!(key.module_scope().is_none());
    }

    #[test]
    fn module_scope_accessor() {
        let key = EventKey::module(ModuleName::new("counter"), "changed");
        assert_eq!(key.module_scope(), Some(&ModuleName::new("counter")));
        assert_eq!(key.name(), "changed");
    }
}
