//! Visual-element tree seam and interaction delegation for trellis.
//!
//! The runtime treats the visual-element tree as an opaque, queryable,
//! observable collaborator. This crate owns that seam:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     trellis-runtime                          │
//! │   module start → find root, attach InteractionDelegate       │
//! └──────────────────────────────────────────────────────────────┘
//!                     │ ElementTree trait (THIS CRATE)
//!                     ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │   any tree: DocumentTree (in-memory reference), or a host-   │
//! │   provided implementation over a real widget/scene tree      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Marker Conventions
//!
//! - A module's **root element** is the first element in document order
//!   whose module-marker list includes the module's name.
//! - Interaction-origin resolution looks for the nearest ancestor
//!   (inclusive) carrying a **role marker**, bounded by the nearest module
//!   boundary, and tolerates origins that were already detached.
//!
//! # Crate Structure
//!
//! - [`ElementTree`], [`InteractionObserver`], [`ObserverId`] - the seam
//! - [`DocumentTree`], [`Element`] - in-memory reference implementation
//! - [`InteractionDelegate`], [`FaultSink`] - interest-filtered translation
//!   of tree interactions into namespaced bus notices
//! - [`resolve_typed_target`] - the origin resolution walk

mod delegate;
mod document;
mod error;
mod tree;

pub use delegate::{resolve_typed_target, FaultSink, InteractionDelegate};
pub use document::{DocumentTree, Element};
pub use error::ViewError;
pub use tree::{ElementTree, InteractionObserver, ObserverId};
