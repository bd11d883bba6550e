//! The runtime directory.
//!
//! An arena-style, process-wide registry of named runtime containers, so
//! multiple independent runtimes can coexist without collision. The
//! directory is an explicit cloneable handle; pass it where testability
//! matters. [`RuntimeDirectory::global`] exists as a convenience instance
//! for hosts that want exactly one.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trellis_runtime::{RuntimeConfig, RuntimeDirectory};
//! use trellis_view::DocumentTree;
//!
//! let directory = RuntimeDirectory::new();
//! let tree = Arc::new(DocumentTree::new());
//!
//! let app = directory
//!     .create(RuntimeConfig::new("app"), tree.clone())
//!     .unwrap();
//! assert!(directory.create(RuntimeConfig::new("app"), tree).is_err());
//!
//! app.destroy();
//! assert_eq!(directory.count(), 0);
//! ```

use crate::{RuntimeConfig, RuntimeContainer, RuntimeError};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::info;
use trellis_types::{Dictionary, RuntimeName};
use trellis_view::ElementTree;

pub(crate) struct DirectoryInner {
    pub(crate) runtimes: Dictionary<RuntimeContainer>,
}

/// Process-wide convenience directory.
static GLOBAL: Lazy<RuntimeDirectory> = Lazy::new(RuntimeDirectory::new);

/// Registry of named [`RuntimeContainer`]s.
///
/// Invariants: names are unique; `create` with a taken name fails without
/// touching the existing container; `get` on an unknown name fails.
#[derive(Clone)]
pub struct RuntimeDirectory {
    inner: Arc<DirectoryInner>,
}

impl RuntimeDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DirectoryInner {
                runtimes: Dictionary::new(),
            }),
        }
    }

    /// The process-wide convenience instance.
    #[must_use]
    pub fn global() -> &'static RuntimeDirectory {
        &GLOBAL
    }

    pub(crate) fn from_inner(inner: Arc<DirectoryInner>) -> Self {
        Self { inner }
    }

    /// Creates a container from `config`, bound to `tree`, and registers
    /// it under its name.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::MissingName`] if the config has no name
    /// - [`RuntimeError::DuplicateRuntime`] if the name is taken
    /// - [`RuntimeError::Store`] if a seeded global has an empty key
    pub fn create(
        &self,
        config: RuntimeConfig,
        tree: Arc<dyn ElementTree>,
    ) -> Result<RuntimeContainer, RuntimeError> {
        let name = config.name.clone();
        if name.is_empty() {
            return Err(RuntimeError::MissingName);
        }
        if self.inner.runtimes.has(name.as_str()) {
            return Err(RuntimeError::DuplicateRuntime(name));
        }

        let container = RuntimeContainer::create(config, tree)?;
        *container.inner.directory.write() = Arc::downgrade(&self.inner);
        self.inner
            .runtimes
            .add(name.as_str(), container.clone())
            .map_err(|_| RuntimeError::DuplicateRuntime(name.clone()))?;

        info!(runtime = %name, "registered runtime");
        Ok(container)
    }

    /// Looks up a container by name.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::MissingName`] for an empty name
    /// - [`RuntimeError::UnknownRuntime`] for a name never created (or
    ///   already destroyed)
    pub fn get(&self, name: impl Into<RuntimeName>) -> Result<RuntimeContainer, RuntimeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RuntimeError::MissingName);
        }
        self.inner
            .runtimes
            .get(name.as_str())?
            .ok_or(RuntimeError::UnknownRuntime(name))
    }

    /// Destroys the named container: stops its modules, clears its store,
    /// and removes it from this directory.
    ///
    /// # Errors
    ///
    /// Same lookup failures as [`get`](Self::get).
    pub fn destroy(&self, name: impl Into<RuntimeName>) -> Result<(), RuntimeError> {
        self.get(name)?.destroy();
        Ok(())
    }

    /// Names of all registered runtimes, in creation order.
    #[must_use]
    pub fn names(&self) -> Vec<RuntimeName> {
        self.inner
            .runtimes
            .keys()
            .into_iter()
            .map(RuntimeName::from)
            .collect()
    }

    /// Number of registered runtimes.
    #[must_use]
    pub fn count(&self) -> usize {
        self.inner.runtimes.count()
    }
}

impl Default for RuntimeDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuntimeDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeDirectory")
            .field("runtimes", &self.names())
            .finish_non_exhaustive()
    }
}
