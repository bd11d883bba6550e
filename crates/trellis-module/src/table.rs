//! Object-of-methods module builder.
//!
//! Most real modules implement [`Module`] directly on their own struct.
//! [`MethodTable`] covers the other cases (tests, demos, small glue
//! modules) where building a named method map from closures reads better
//! than declaring a type.

use crate::{Module, ModuleError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

type MethodFn = Arc<dyn Fn(Value) -> Result<Value, ModuleError> + Send + Sync>;
type StopFn = Arc<dyn Fn() + Send + Sync>;

/// A [`Module`] assembled from named closures.
///
/// # Example
///
/// ```
/// use serde_json::{json, Value};
/// use trellis_module::{MethodTable, Module};
///
/// let module = MethodTable::new()
///     .method("greet", |payload: Value| {
///         let name = payload["name"].as_str().unwrap_or("world");
///         Ok(json!(format!("hello, {name}")))
///     });
///
/// let reply = module.invoke("greet", json!({"name": "trellis"})).unwrap();
/// assert_eq!(reply, json!("hello, trellis"));
/// ```
#[derive(Default)]
pub struct MethodTable {
    methods: HashMap<String, MethodFn>,
    on_stop: Option<StopFn>,
}

impl MethodTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a method. A later registration under the same name
    /// replaces the earlier one.
    #[must_use]
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, ModuleError> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    /// Registers the stop hook.
    #[must_use]
    pub fn on_stop<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_stop = Some(Arc::new(f));
        self
    }

    /// Returns the registered method names.
    #[must_use]
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).collect()
    }
}

impl Module for MethodTable {
    fn invoke(&self, method: &str, payload: Value) -> Result<Value, ModuleError> {
        match self.methods.get(method) {
            Some(f) => f(payload),
            None => Err(ModuleError::NotSupported(method.to_string())),
        }
    }

    fn on_stop(&self) {
        if let Some(f) = &self.on_stop {
            f();
        }
    }
}

impl std::fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodTable")
            .field("methods", &self.method_names())
            .finish_non_exhaustive()
    }
}
