//! Core types for the trellis module runtime.
//!
//! This crate provides the foundational identifier, fault, and store types
//! shared by every layer of the trellis architecture.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Module SDK Layer                          │
//! │  (External, SemVer stable, safe to depend on)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  trellis-types  : names, ElementId, Fault, store  ◄── HERE  │
//! │  trellis-event  : EventKey, Notice, Dispatcher              │
//! │  trellis-module : Module trait                              │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Runtime Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  trellis-view    : element tree seam, delegate              │
//! │  trellis-runtime : registry, container, directory           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identifier Design
//!
//! Runtimes and modules are identified by caller-chosen names, not
//! generated ids. Names are plain string newtypes; emptiness is rejected at
//! the boundaries that require a name (directory creation, store lookups)
//! rather than at construction, so building a name is always infallible.
//!
//! # Error Handling
//!
//! All trellis error types implement [`ErrorCode`] for unified handling:
//!
//! ```
//! use trellis_types::{DictionaryError, ErrorCode};
//!
//! let err = DictionaryError::EmptyKey;
//! assert_eq!(err.code(), "DICT_EMPTY_KEY");
//! assert!(!err.is_recoverable());
//! ```
//!
//! # Crate Structure
//!
//! - [`RuntimeName`], [`ModuleName`] - string identity newtypes
//! - [`ElementId`] - opaque visual-element key
//! - [`Fault`] - serializable contained-failure record
//! - [`Dictionary`] - string-keyed value store
//! - [`ErrorCode`] - machine-readable error code interface

mod dictionary;
mod error;
mod fault;
mod id;
mod name;

pub use dictionary::{Dictionary, DictionaryError};
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use fault::Fault;
pub use id::ElementId;
pub use name::{ModuleName, RuntimeName};
