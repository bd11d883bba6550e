//! Module trait for trellis runtime participants.
//!
//! A module is a named unit of behavior, lazily instantiated from a factory
//! given a sandboxed context. Once started, its only externally invocable
//! surface is [`Module::invoke`]: named methods over JSON payloads,
//! reached through the runtime's containment guard.
//!
//! # Module Lifecycle
//!
//! ```text
//! unregistered ──add──► registered ──start/get──► started
//!                            ▲                       │
//!                            └───────── stop ────────┘
//!                         (record evicted; restart re-instantiates)
//! ```
//!
//! # Example
//!
//! ```
//! use serde_json::{json, Value};
//! use std::sync::atomic::{AtomicI64, Ordering};
//! use trellis_module::{Module, ModuleError};
//!
//! struct Counter {
//!     value: AtomicI64,
//! }
//!
//! impl Module for Counter {
//!     fn invoke(&self, method: &str, _payload: Value) -> Result<Value, ModuleError> {
//!         match method {
//!             "increment" => Ok(json!(self.value.fetch_add(1, Ordering::SeqCst) + 1)),
//!             "value" => Ok(json!(self.value.load(Ordering::SeqCst))),
//!             _ => Err(ModuleError::NotSupported(method.to_string())),
//!         }
//!     }
//! }
//!
//! let counter = Counter { value: AtomicI64::new(0) };
//! assert_eq!(counter.invoke("increment", Value::Null).unwrap(), json!(1));
//! ```
//!
//! # Crate Structure
//!
//! - [`Module`] - the instance trait
//! - [`ModuleError`] - failures raised by module code
//! - [`MethodTable`] - object-of-methods builder for tests and demos

mod error;
mod module;
mod table;

pub use error::ModuleError;
pub use module::Module;
pub use table::MethodTable;
