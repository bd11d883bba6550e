//! Contained-failure record.
//!
//! When a module method fails in production mode, the runtime does not let
//! the failure propagate; it is annotated with where it happened and
//! published on the bus as an `error` notice. [`Fault`] is the record that
//! crosses the bus: plain serializable data, carrying the machine-readable
//! code of the originating error.
//!
//! # Example
//!
//! ```
//! use trellis_types::{Fault, ModuleName};
//!
//! let fault = Fault::new("MODULE_EXECUTION_FAILED", "overflow")
//!     .with_module(ModuleName::new("counter"))
//!     .with_method("increment");
//!
//! assert_eq!(fault.code, "MODULE_EXECUTION_FAILED");
//! assert_eq!(fault.to_string(), "counter.increment() - overflow");
//! ```

use crate::ModuleName;
use serde::{Deserialize, Serialize};

/// A failure caught and carried as data.
///
/// # Fields
///
/// | Field | Meaning |
/// |-------|---------|
/// | `code` | Machine-readable code of the originating error |
/// | `message` | Human-readable description |
/// | `module` | Module the failure was contained in, when known |
/// | `method` | Method that raised it, when known |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    /// Machine-readable code, UPPER_SNAKE_CASE.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Module the failure was contained in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<ModuleName>,
    /// Method the failure was raised from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl Fault {
    /// Creates a fault from a code and message.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            module: None,
            method: None,
        }
    }

    /// Annotates the fault with the module it was contained in.
    #[must_use]
    pub fn with_module(mut self, module: ModuleName) -> Self {
        self.module = Some(module);
        self
    }

    /// Annotates the fault with the method that raised it.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

impl std::fmt::Display for Fault {
    /// Renders `module.method() - message` with the parts that are known.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.module, &self.method) {
            (Some(module), Some(method)) => {
                write!(f, "{module}.{method}() - {}", self.message)
            }
            (Some(module), None) => write!(f, "{module} - {}", self.message),
            (None, Some(method)) => write!(f, "{method}() - {}", self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}
