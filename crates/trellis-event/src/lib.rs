//! Event system for the trellis module runtime.
//!
//! This crate provides the publish/subscribe bus ([`Dispatcher`]) and the
//! message types that cross it. One dispatcher is shared by all modules in
//! a runtime container; module privacy comes from the structured
//! [`EventKey`], not from separate buses.
//!
//! # Event Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      RuntimeContainer                         │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                     Dispatcher                          │  │
//! │  │   key (scope, name) → ordered handler list              │  │
//! │  │   notify = synchronous, subscription order              │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//!        ▲ (module, "refresh")      ▲ (module, "pointer-press")
//!        │                          │
//!  ┌───────────┐             ┌──────────────┐
//!  │  Module   │             │  Interaction │
//!  │  context  │             │   delegate   │
//!  └───────────┘             └──────────────┘
//! ```
//!
//! # Message Types
//!
//! | Type | Raised by | Payload |
//! |------|-----------|---------|
//! | data notice | module contexts | arbitrary [`serde_json::Value`] |
//! | interaction notice | interaction delegates | [`InteractionNotice`] |
//! | fault notice | runtime error containment | [`Fault`](trellis_types::Fault) |
//!
//! # Namespacing
//!
//! Keys are the tuple `(scope, name)`, never a concatenated string, so a
//! module name containing the legacy `-` separator cannot collide with
//! another module's events. The canonical string form only appears in logs.
//!
//! # Delivery Contract
//!
//! All notification is synchronous and runs on the calling turn. Handlers
//! for one key fire strictly in subscription order, and every handler runs
//! (or the first failing handler's error propagates) before
//! [`Dispatcher::notify`] returns. There is no batching, coalescing, or
//! cancellation of an in-flight notification.
//!
//! # Usage
//!
//! ```
//! use serde_json::json;
//! use trellis_event::{Dispatcher, EventKey, Handler, NoticePayload};
//! use trellis_types::ModuleName;
//!
//! let bus = Dispatcher::new();
//! let key = EventKey::module(ModuleName::new("counter"), "changed");
//!
//! bus.listen(key.clone(), Handler::new(|notice| {
//!     assert_eq!(notice.payload.as_data(), Some(&json!(41)));
//!     Ok(())
//! }));
//!
//! bus.notify(&key, NoticePayload::Data(json!(41))).unwrap();
//! ```

mod dispatcher;
mod error;
mod handler;
mod interaction;
mod key;
mod notice;

pub use dispatcher::Dispatcher;
pub use error::EventError;
pub use handler::Handler;
pub use interaction::{InteractionEvent, InteractionKind, InteractionNotice};
pub use key::{EventKey, EventScope};
pub use notice::{Notice, NoticePayload};
