//! Trellis runtime - module lifecycle, sandboxed contexts, containers.
//!
//! This crate is the composition root of the trellis architecture: it owns
//! the module registry, builds sandboxed contexts, wires interaction
//! delegates, and applies the error-containment policy.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Module SDK Layer                          │
//! │  (External, SemVer stable, safe to depend on)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  trellis-types  : names, ElementId, Fault, Dictionary       │
//! │  trellis-event  : EventKey, Notice, Dispatcher              │
//! │  trellis-module : Module trait                              │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Runtime Layer (THIS CRATE)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  RuntimeDirectory : name → RuntimeContainer arena           │
//! │  RuntimeContainer : dispatcher + store + registry + tree    │
//! │  ModuleRegistry   : lazy start, stop cycle, containment     │
//! │  ModuleContext    : the sandboxed capability surface        │
//! │  ModuleHandle     : guarded public instance                 │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    View Layer                                │
//! │  trellis-view : ElementTree seam, InteractionDelegate       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Data Flow
//!
//! ```text
//! RuntimeDirectory::create(config, tree)
//!     │
//!     ▼
//! container.module().add("counter", false, factory)
//!     │
//!     ▼ init() / get() (lazy)
//! start: resolve root → build ModuleContext → run factory
//!        → attach InteractionDelegate → record instance
//!     │
//!     ▼
//! tree interaction → delegate → Dispatcher (module-scoped key)
//!                                   → module's own handlers
//! ```
//!
//! # Error Containment
//!
//! A single dynamic `debug` flag governs the whole runtime: truthy means
//! every caught failure re-raises synchronously to its caller; falsy means
//! it is published as an `error` notice carrying a
//! [`Fault`](trellis_types::Fault) and execution continues. See
//! [`ModuleHandle::invoke`] for the guard.
//!
//! # Example
//!
//! ```
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//! use trellis_module::MethodTable;
//! use trellis_runtime::{RuntimeConfig, RuntimeDirectory};
//! use trellis_view::DocumentTree;
//!
//! let directory = RuntimeDirectory::new();
//! let tree = Arc::new(DocumentTree::new());
//! let app = directory
//!     .create(RuntimeConfig::new("app"), tree)
//!     .unwrap();
//!
//! app.module()
//!     .add("greeter", true, |_ctx| {
//!         Ok(Box::new(MethodTable::new().method("greet", |_: Value| {
//!             Ok(json!("hello"))
//!         })))
//!     })
//!     .unwrap();
//!
//! let app = app.init().unwrap();
//! let greeter = app.module().get("greeter").unwrap();
//! assert_eq!(greeter.invoke("greet", Value::Null).unwrap(), json!("hello"));
//! assert!(app.main().is_some());
//! ```

mod config;
mod container;
mod context;
mod directory;
mod error;
mod handle;
mod registry;

pub use config::RuntimeConfig;
pub use container::RuntimeContainer;
pub use context::ModuleContext;
pub use directory::RuntimeDirectory;
pub use error::RuntimeError;
pub use handle::ModuleHandle;
pub use registry::{ModuleFactory, ModuleRegistry};

// Re-exports from the SDK layer for convenience.
pub use trellis_event::{
    Dispatcher, EventKey, EventScope, Handler, InteractionKind, Notice, NoticePayload,
};
pub use trellis_module::{MethodTable, Module, ModuleError};
pub use trellis_types::{ErrorCode, Fault, ModuleName, RuntimeName};
