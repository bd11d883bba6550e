//! Runtime container configuration.
//!
//! A [`RuntimeConfig`] names the container and seeds its global store.
//! Everything besides `name` and `debug` is free-form: unknown keys
//! deserialize into [`globals`](RuntimeConfig::globals) and land in the
//! store verbatim, so configuration files stay flat:
//!
//! ```
//! use trellis_runtime::RuntimeConfig;
//!
//! let config: RuntimeConfig = serde_json::from_str(
//!     r#"{ "name": "app", "debug": true, "apiKey": "1B:2B:2D" }"#,
//! ).unwrap();
//!
//! assert_eq!(config.name.as_str(), "app");
//! assert!(config.debug);
//! assert_eq!(config.globals["apiKey"], "1B:2B:2D");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use trellis_types::RuntimeName;

/// Configuration for creating a runtime container.
///
/// The `debug` flag is seeded into the global store under the `"debug"`
/// key, where the error-propagation policy reads it dynamically: modules
/// see it through `ctx.global("debug")` like any other global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Name of the container; required and unique per directory.
    pub name: RuntimeName,
    /// Fail-loud (`true`) vs fail-soft (`false`) error propagation.
    #[serde(default)]
    pub debug: bool,
    /// Additional globals seeded into the store at creation.
    #[serde(flatten)]
    pub globals: Map<String, Value>,
}

impl RuntimeConfig {
    /// Starts a config with the given name, production mode, no globals.
    #[must_use]
    pub fn new(name: impl Into<RuntimeName>) -> Self {
        Self {
            name: name.into(),
            debug: false,
            globals: Map::new(),
        }
    }

    /// Sets the debug flag.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Seeds one global. A later call with the same key replaces the
    /// earlier value.
    #[must_use]
    pub fn with_global(mut self, key: impl Into<String>, value: Value) -> Self {
        self.globals.insert(key.into(), value);
        self
    }
}
